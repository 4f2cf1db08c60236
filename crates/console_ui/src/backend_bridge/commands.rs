//! Backend commands queued from UI to backend worker.

use client_core::PartUpload;
use shared::{
    domain::{BaselineId, ProductFilter},
    protocol::{BaselineCreationRequest, BaselineDuplicationRequest},
};

use crate::controller::baseline_list::ListGeneration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    FetchConfigurationItems,
    QueryProducts {
        query: String,
    },
    FetchBaselines {
        generation: ListGeneration,
        filter: ProductFilter,
    },
    DeleteBaselines {
        generation: ListGeneration,
        ids: Vec<BaselineId>,
    },
    CreateBaseline {
        request: BaselineCreationRequest,
    },
    DuplicateBaseline {
        source: BaselineId,
        request: BaselineDuplicationRequest,
    },
    ImportPart {
        upload: PartUpload,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchConfigurationItems => "fetch_configuration_items",
            BackendCommand::QueryProducts { .. } => "query_products",
            BackendCommand::FetchBaselines { .. } => "fetch_baselines",
            BackendCommand::DeleteBaselines { .. } => "delete_baselines",
            BackendCommand::CreateBaseline { .. } => "create_baseline",
            BackendCommand::DuplicateBaseline { .. } => "duplicate_baseline",
            BackendCommand::ImportPart { .. } => "import_part",
        }
    }
}

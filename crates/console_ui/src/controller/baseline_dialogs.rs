//! Modal dialogs opened by the baseline panel over the page root.

use client_core::Messages;
use shared::{
    domain::{BaselineId, BaselineKind, ProductFilter, ProductId},
    protocol::{BaselineCreationRequest, BaselineDuplicationRequest, BaselineSummary},
};

/// Unsaved configuration item the creation dialog edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationItemDraft {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineCreationDialog {
    collection_filter: ProductFilter,
    existing_names: Vec<String>,
    pub name: String,
    pub description: String,
    pub configuration_item: ConfigurationItemDraft,
    pub kind: BaselineKind,
}

impl BaselineCreationDialog {
    /// Seeds the dialog from the mounted list's collection.
    pub fn seeded(collection_filter: ProductFilter, rows: &[BaselineSummary]) -> Self {
        let configuration_item = ConfigurationItemDraft {
            id: collection_filter
                .product_id()
                .map(|id| id.as_str().to_string())
                .unwrap_or_default(),
        };
        Self {
            collection_filter,
            existing_names: rows.iter().map(|row| row.name.clone()).collect(),
            name: String::new(),
            description: String::new(),
            configuration_item,
            kind: BaselineKind::default(),
        }
    }

    /// Builds the request, or the warning to show instead.
    pub fn validate(&self, messages: &Messages) -> Result<BaselineCreationRequest, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(messages.baseline_name_required.clone());
        }
        let Some(product_id) = ProductId::parse(&self.configuration_item.id) else {
            return Err(messages.baseline_product_required.clone());
        };
        if self.collection_filter.covers(&product_id)
            && self.existing_names.iter().any(|existing| existing == name)
        {
            return Err(format!("A baseline named '{name}' is already listed"));
        }
        Ok(BaselineCreationRequest {
            name: name.to_string(),
            description: non_blank(&self.description),
            configuration_item_id: product_id,
            kind: self.kind,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineDuplicateDialog {
    source: BaselineSummary,
    pub name: String,
    pub description: String,
}

impl BaselineDuplicateDialog {
    pub fn seeded(source: BaselineSummary) -> Self {
        Self {
            name: source.name.clone(),
            description: source.description.clone().unwrap_or_default(),
            source,
        }
    }

    pub fn source(&self) -> &BaselineSummary {
        &self.source
    }

    pub fn validate(
        &self,
        messages: &Messages,
    ) -> Result<(BaselineId, BaselineDuplicationRequest), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(messages.baseline_name_required.clone());
        }
        Ok((
            self.source.id,
            BaselineDuplicationRequest {
                name: name.to_string(),
                description: non_blank(&self.description),
            },
        ))
    }
}

/// Dialog currently shown over the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    CreateBaseline(BaselineCreationDialog),
    DuplicateBaseline(BaselineDuplicateDialog),
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

//! Runtime bridge between UI command queue and backend event intake.
//!
//! The worker owns a dedicated thread with a tokio runtime. Each command runs
//! as its own task, so a slow upload never holds up a list refresh, and every
//! result goes back to the UI thread as a [`UiEvent`].

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use anyhow::Context;
use client_core::RemoteApi;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use futures::future::join_all;
use shared::domain::ProductId;
use tracing::{debug, error, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    api: Arc<dyn RemoteApi>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match build_runtime() {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to build backend runtime: {err:#}");
                post(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )),
                );
                return;
            }
        };
        post(&ui_tx, UiEvent::Info("Backend worker ready".to_string()));

        let mut tasks = Vec::new();
        while let Ok(cmd) = cmd_rx.recv() {
            debug!(command = cmd.name(), "backend command received");
            tasks.retain(|task: &tokio::task::JoinHandle<()>| !task.is_finished());
            let api = Arc::clone(&api);
            let ui_tx = ui_tx.clone();
            tasks.push(runtime.spawn(async move {
                let event = execute(api.as_ref(), cmd).await;
                post(&ui_tx, event);
            }));
        }

        debug!(pending = tasks.len(), "command queue closed; draining backend tasks");
        runtime.block_on(join_all(tasks));
    })
}

fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("console-backend")
        .build()
        .context("failed to build tokio runtime")
}

fn post(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => warn!("ui event queue is full; dropping backend event"),
        Err(TrySendError::Disconnected(_)) => {
            debug!("ui event queue closed; dropping backend event")
        }
    }
}

/// Runs one command against the remote API and describes the outcome.
pub async fn execute(api: &dyn RemoteApi, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::FetchConfigurationItems => match api.list_configuration_items().await {
            Ok(items) => UiEvent::ConfigurationItemsLoaded { count: items.len() },
            Err(err) => UiEvent::ConfigurationItemsFailed(UiError::from_client_error(
                UiErrorContext::ConfigurationItems,
                &err,
            )),
        },
        BackendCommand::QueryProducts { query } => match api.list_products().await {
            Ok(products) => UiEvent::ProductsListed {
                query,
                ids: products.into_iter().map(|p| p.id).collect::<Vec<ProductId>>(),
            },
            Err(err) => UiEvent::ProductQueryFailed {
                query,
                error: UiError::from_client_error(UiErrorContext::ProductQuery, &err),
            },
        },
        BackendCommand::FetchBaselines { generation, filter } => {
            match api.list_baselines(&filter).await {
                Ok(baselines) => UiEvent::BaselinesLoaded {
                    generation,
                    baselines,
                },
                Err(err) => UiEvent::BaselinesFailed {
                    generation,
                    error: UiError::from_client_error(UiErrorContext::BaselineList, &err),
                },
            }
        }
        BackendCommand::DeleteBaselines { generation, ids } => {
            let outcomes = join_all(ids.iter().map(|id| api.delete_baseline(*id))).await;
            let mut deleted = Vec::new();
            let mut failures = Vec::new();
            for (id, outcome) in ids.into_iter().zip(outcomes) {
                match outcome {
                    Ok(()) => deleted.push(id),
                    Err(err) => failures.push((
                        id,
                        UiError::from_client_error(UiErrorContext::BaselineDelete, &err),
                    )),
                }
            }
            UiEvent::BaselinesDeleted {
                generation,
                deleted,
                failures,
            }
        }
        BackendCommand::CreateBaseline { request } => match api.create_baseline(&request).await {
            Ok(baseline) => UiEvent::BaselineCreated(baseline),
            Err(err) => UiEvent::BaselineOperationFailed(UiError::from_client_error(
                UiErrorContext::BaselineCreate,
                &err,
            )),
        },
        BackendCommand::DuplicateBaseline { source, request } => {
            match api.duplicate_baseline(source, &request).await {
                Ok(baseline) => UiEvent::BaselineDuplicated { source, baseline },
                Err(err) => UiEvent::BaselineOperationFailed(UiError::from_client_error(
                    UiErrorContext::BaselineDuplicate,
                    &err,
                )),
            }
        }
        BackendCommand::ImportPart { upload } => {
            let file_name = upload.file_name.clone();
            let result = api
                .import_part(upload)
                .await
                .map_err(|err| UiError::from_client_error(UiErrorContext::PartImport, &err));
            if let Err(err) = &result {
                warn!(
                    file = %file_name,
                    category = ?err.category(),
                    "part import failed: {}",
                    err.message()
                );
            }
            UiEvent::PartImportFinished { file_name, result }
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;

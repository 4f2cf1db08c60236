//! Applies backend results to whichever controllers are mounted.

use crate::{
    controller::{
        baseline_panel::BaselinePanelController, events::UiEvent, part_import::PartImportController,
    },
    notify::{NotificationKind, NotificationLog, NotificationSink},
};

/// Controllers currently on screen.
pub struct ConsoleScreen<N: NotificationSink = NotificationLog> {
    pub panel: Option<BaselinePanelController<N>>,
    pub importer: Option<PartImportController<N>>,
}

impl<N: NotificationSink> Default for ConsoleScreen<N> {
    fn default() -> Self {
        Self {
            panel: None,
            importer: None,
        }
    }
}

/// Routes one event. Events no mounted controller accepts are handed back.
pub fn reduce<N: NotificationSink>(
    screen: &mut ConsoleScreen<N>,
    event: UiEvent,
) -> Option<UiEvent> {
    match event {
        UiEvent::PartImportFinished { file_name, result } => match screen.importer.as_mut() {
            Some(importer) => {
                importer.on_import_finished(&file_name, result);
                None
            }
            None => Some(UiEvent::PartImportFinished { file_name, result }),
        },
        UiEvent::Error(error) if screen.panel.is_none() => match screen.importer.as_mut() {
            Some(importer) => {
                importer
                    .notifications_mut()
                    .notify(NotificationKind::Error, error.display_message());
                None
            }
            None => Some(UiEvent::Error(error)),
        },
        event => match screen.panel.as_mut() {
            Some(panel) => apply_to_panel(panel, event),
            None => Some(event),
        },
    }
}

fn apply_to_panel<N: NotificationSink>(
    panel: &mut BaselinePanelController<N>,
    event: UiEvent,
) -> Option<UiEvent> {
    match event {
        UiEvent::Info(message) => tracing::info!("{message}"),
        UiEvent::Error(error) => panel.on_error(error.message(), error.response()),
        UiEvent::ConfigurationItemsLoaded { count } => panel.on_configuration_items_loaded(count),
        UiEvent::ConfigurationItemsFailed(error) => panel.on_configuration_items_failed(&error),
        UiEvent::ProductsListed { query, ids } => {
            panel.on_products_listed(&query, ids);
        }
        UiEvent::ProductQueryFailed { query, error } => {
            panel.on_product_query_failed(&query, &error);
        }
        UiEvent::BaselinesLoaded {
            generation,
            baselines,
        } => {
            panel.on_baselines_loaded(generation, baselines);
        }
        UiEvent::BaselinesFailed { generation, error } => {
            panel.on_baselines_failed(generation, &error);
        }
        UiEvent::BaselinesDeleted {
            generation,
            deleted,
            failures,
        } => {
            panel.on_baselines_deleted(generation, &deleted, &failures);
        }
        UiEvent::BaselineCreated(baseline) => panel.on_baseline_created(baseline),
        UiEvent::BaselineDuplicated { source, baseline } => {
            panel.on_baseline_duplicated(source, baseline)
        }
        UiEvent::BaselineOperationFailed(error) => panel.on_baseline_operation_failed(&error),
        event @ UiEvent::PartImportFinished { .. } => return Some(event),
    }
    None
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;

//! Baseline management panel: product filter, the mounted baseline list, and
//! the delete/duplicate/create affordances around it.

use std::sync::Arc;

use client_core::ConsoleConfig;
use crossbeam_channel::Sender;
use shared::{
    domain::{BaselineId, ProductFilter, ProductId},
    error::ErrorResponse,
    protocol::BaselineSummary,
};
use tracing::{debug, info, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        baseline_dialogs::{BaselineCreationDialog, BaselineDuplicateDialog, Overlay},
        baseline_list::{BaselineListObserver, BaselinesListView, ListGeneration},
        events::UiError,
        orchestration::{dispatch_backend_command, DispatchError},
    },
    notify::{NotificationKind, NotificationLog, NotificationSink},
};

/// The panel's own widgets: action buttons and the notification area.
#[derive(Debug)]
struct PanelChrome<N> {
    notifications: N,
    create_visible: bool,
    delete_visible: bool,
    duplicate_visible: bool,
}

impl<N: NotificationSink> PanelChrome<N> {
    fn report(&mut self, kind: NotificationKind, source: &str, response: Option<&ErrorResponse>) {
        let message = response
            .and_then(ErrorResponse::display_text)
            .unwrap_or(source);
        self.notifications.notify(kind, message);
    }
}

impl<N: NotificationSink> BaselineListObserver for PanelChrome<N> {
    fn on_error(&mut self, message: &str, response: Option<&ErrorResponse>) {
        self.report(NotificationKind::Error, message, response);
    }

    fn on_warning(&mut self, message: &str, response: Option<&ErrorResponse>) {
        self.report(NotificationKind::Warning, message, response);
    }

    fn on_delete_button_display(&mut self, visible: bool) {
        self.delete_visible = visible;
    }

    fn on_duplicate_button_display(&mut self, visible: bool) {
        self.duplicate_visible = visible;
    }
}

#[derive(Debug, Default)]
struct ProductAutocomplete {
    enabled: bool,
    pending_query: Option<String>,
    suggestions: Vec<ProductId>,
}

pub struct BaselinePanelController<N: NotificationSink = NotificationLog> {
    config: Arc<ConsoleConfig>,
    cmd_tx: Sender<BackendCommand>,
    chrome: PanelChrome<N>,
    product_input: String,
    list: Option<BaselinesListView>,
    last_generation: u64,
    overlay: Option<Overlay>,
    autocomplete: ProductAutocomplete,
}

impl<N: NotificationSink> BaselinePanelController<N> {
    pub fn new(
        config: Arc<ConsoleConfig>,
        cmd_tx: Sender<BackendCommand>,
        notifications: N,
    ) -> Self {
        Self {
            config,
            cmd_tx,
            chrome: PanelChrome {
                notifications,
                create_visible: false,
                delete_visible: false,
                duplicate_visible: false,
            },
            product_input: String::new(),
            list: None,
            last_generation: 0,
            overlay: None,
            autocomplete: ProductAutocomplete::default(),
        }
    }

    /// Shows the panel, starts the configuration-item check, enables product
    /// autocompletion, and mounts the first list.
    pub fn render(&mut self) -> &mut Self {
        self.chrome.create_visible = true;
        self.dispatch(BackendCommand::FetchConfigurationItems);
        self.autocomplete.enabled = true;
        self.rebuild_list();
        self
    }

    // ===== Queries =====

    pub fn product_input(&self) -> &str {
        &self.product_input
    }

    pub fn product_filter(&self) -> ProductFilter {
        ProductFilter::from_input(&self.product_input)
    }

    pub fn list(&self) -> Option<&BaselinesListView> {
        self.list.as_ref()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn is_create_visible(&self) -> bool {
        self.chrome.create_visible
    }

    pub fn is_delete_visible(&self) -> bool {
        self.chrome.delete_visible
    }

    pub fn is_duplicate_visible(&self) -> bool {
        self.chrome.duplicate_visible
    }

    pub fn product_suggestions(&self) -> &[ProductId] {
        &self.autocomplete.suggestions
    }

    pub fn notifications(&self) -> &N {
        &self.chrome.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut N {
        &mut self.chrome.notifications
    }

    // ===== User actions =====

    /// Product-id field changed (including to empty): the list is rebuilt from scratch.
    pub fn on_product_filter_changed(&mut self, raw: &str) {
        self.product_input = raw.to_string();
        self.rebuild_list();
    }

    /// Keystroke in the product-id field.
    pub fn on_product_query(&mut self, query: &str) {
        if !self.autocomplete.enabled {
            return;
        }
        self.autocomplete.pending_query = Some(query.to_string());
        self.dispatch(BackendCommand::QueryProducts {
            query: query.to_string(),
        });
    }

    pub fn toggle_baseline_selection(&mut self, id: BaselineId) -> bool {
        match self.list.as_mut() {
            Some(list) => list.toggle_selection(id, &mut self.chrome),
            None => false,
        }
    }

    pub fn select_all_baselines(&mut self, selected: bool) {
        if let Some(list) = self.list.as_mut() {
            list.select_all(selected, &mut self.chrome);
        }
    }

    pub fn create_baseline(&mut self) {
        let dialog = match &self.list {
            Some(list) => BaselineCreationDialog::seeded(list.filter().clone(), list.rows()),
            None => BaselineCreationDialog::seeded(self.product_filter(), &[]),
        };
        self.overlay = Some(Overlay::CreateBaseline(dialog));
    }

    pub fn delete_baseline(&mut self) {
        let Some(list) = self.list.as_mut() else {
            return;
        };
        if let Err(err) = list.delete_selected_baselines(&self.cmd_tx) {
            self.report_dispatch_failure(err);
        }
    }

    pub fn duplicate_baseline(&mut self) {
        let Some(source) = self
            .list
            .as_ref()
            .and_then(BaselinesListView::selected_baseline)
        else {
            debug!("duplicate requested without a single selected baseline");
            return;
        };
        self.overlay = Some(Overlay::DuplicateBaseline(BaselineDuplicateDialog::seeded(
            source.clone(),
        )));
    }

    pub fn creation_dialog_mut(&mut self) -> Option<&mut BaselineCreationDialog> {
        match self.overlay.as_mut() {
            Some(Overlay::CreateBaseline(dialog)) => Some(dialog),
            _ => None,
        }
    }

    pub fn duplicate_dialog_mut(&mut self) -> Option<&mut BaselineDuplicateDialog> {
        match self.overlay.as_mut() {
            Some(Overlay::DuplicateBaseline(dialog)) => Some(dialog),
            _ => None,
        }
    }

    /// Submits the open dialog. Validation problems become warnings and keep it open.
    pub fn submit_overlay(&mut self) -> bool {
        let Some(overlay) = &self.overlay else {
            return false;
        };
        let messages = &self.config.messages;
        let command = match overlay {
            Overlay::CreateBaseline(dialog) => dialog
                .validate(messages)
                .map(|request| BackendCommand::CreateBaseline { request }),
            Overlay::DuplicateBaseline(dialog) => dialog
                .validate(messages)
                .map(|(source, request)| BackendCommand::DuplicateBaseline { source, request }),
        };
        match command {
            Ok(command) => {
                if !self.dispatch(command) {
                    return false;
                }
                self.overlay = None;
                true
            }
            Err(warning) => {
                self.on_warning(&warning, None);
                false
            }
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    // ===== Signals =====

    pub fn on_delete_button_visibility_changed(&mut self, visible: bool) {
        self.chrome.on_delete_button_display(visible);
    }

    pub fn on_duplicate_button_visibility_changed(&mut self, visible: bool) {
        self.chrome.on_duplicate_button_display(visible);
    }

    pub fn on_error(&mut self, source: &str, response: Option<&ErrorResponse>) {
        self.chrome.on_error(source, response);
    }

    pub fn on_warning(&mut self, source: &str, response: Option<&ErrorResponse>) {
        self.chrome.on_warning(source, response);
    }

    // ===== Backend results =====

    pub fn on_configuration_items_loaded(&mut self, count: usize) {
        if count == 0 {
            let message = self.config.messages.create_product_before_baseline.clone();
            self.chrome
                .notifications
                .notify(NotificationKind::Info, &message);
        }
    }

    pub fn on_configuration_items_failed(&mut self, error: &UiError) {
        warn!(
            "configuration item check failed, skipping advisory: {}",
            error.message()
        );
    }

    pub fn on_products_listed(&mut self, query: &str, ids: Vec<ProductId>) -> bool {
        if self.autocomplete.pending_query.as_deref() != Some(query) {
            debug!(query, "dropping superseded product suggestions");
            return false;
        }
        let needle = query.trim().to_lowercase();
        self.autocomplete.suggestions = ids
            .into_iter()
            .filter(|id| id.as_str().to_lowercase().contains(&needle))
            .collect();
        true
    }

    pub fn on_product_query_failed(&mut self, query: &str, error: &UiError) {
        if self.autocomplete.pending_query.as_deref() == Some(query) {
            self.autocomplete.suggestions.clear();
        }
        warn!(query, "product suggestion query failed: {}", error.message());
    }

    pub fn on_baselines_loaded(
        &mut self,
        generation: ListGeneration,
        baselines: Vec<BaselineSummary>,
    ) -> bool {
        match mounted_list(&mut self.list, generation) {
            Some(list) => {
                info!(
                    generation = generation.0,
                    rows = baselines.len(),
                    "baseline list loaded"
                );
                list.apply_loaded(baselines, &mut self.chrome);
                true
            }
            None => false,
        }
    }

    pub fn on_baselines_failed(&mut self, generation: ListGeneration, error: &UiError) -> bool {
        match mounted_list(&mut self.list, generation) {
            Some(list) => {
                list.apply_failed(error, &mut self.chrome);
                true
            }
            None => false,
        }
    }

    pub fn on_baselines_deleted(
        &mut self,
        generation: ListGeneration,
        deleted: &[BaselineId],
        failures: &[(BaselineId, UiError)],
    ) -> bool {
        match mounted_list(&mut self.list, generation) {
            Some(list) => {
                list.apply_deleted(deleted, failures, &mut self.chrome);
                true
            }
            None => false,
        }
    }

    pub fn on_baseline_created(&mut self, baseline: BaselineSummary) {
        info!(baseline_id = baseline.id.0, "baseline created");
        if let Some(list) = self.list.as_mut() {
            list.append(baseline);
        }
    }

    pub fn on_baseline_duplicated(&mut self, source: BaselineId, baseline: BaselineSummary) {
        info!(
            source_id = source.0,
            baseline_id = baseline.id.0,
            "baseline duplicated"
        );
        if let Some(list) = self.list.as_mut() {
            list.append(baseline);
        }
    }

    pub fn on_baseline_operation_failed(&mut self, error: &UiError) {
        self.chrome.on_error(error.message(), error.response());
    }

    // ===== Internals =====

    /// Tears down the mounted list, hides the selection affordances, and mounts
    /// a list for the current filter.
    fn rebuild_list(&mut self) {
        if let Some(old) = self.list.take() {
            debug!(generation = old.generation().0, "detaching baseline list");
        }
        self.chrome.on_delete_button_display(false);
        self.chrome.on_duplicate_button_display(false);

        self.last_generation += 1;
        let generation = ListGeneration(self.last_generation);
        let filter = self.product_filter();
        info!(
            generation = generation.0,
            product_id = filter.product_id().map(ProductId::as_str).unwrap_or("*"),
            "mounting baseline list"
        );
        let mut list = BaselinesListView::new(generation, filter);
        if let Err(err) = list.render(&self.cmd_tx) {
            self.report_dispatch_failure(err);
        }
        self.list = Some(list);
    }

    fn dispatch(&mut self, command: BackendCommand) -> bool {
        match dispatch_backend_command(&self.cmd_tx, command) {
            Ok(()) => true,
            Err(err) => {
                self.report_dispatch_failure(err);
                false
            }
        }
    }

    fn report_dispatch_failure(&mut self, err: DispatchError) {
        let message = err.user_message(&self.config.messages);
        self.chrome
            .notifications
            .notify(NotificationKind::Error, message);
    }
}

/// The mounted list when it is still the one `generation` was issued for.
fn mounted_list(
    list: &mut Option<BaselinesListView>,
    generation: ListGeneration,
) -> Option<&mut BaselinesListView> {
    match list.as_mut() {
        Some(list) if list.generation() == generation => Some(list),
        _ => {
            debug!(generation = generation.0, "dropping result for detached baseline list");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/baseline_panel_tests.rs"]
mod tests;

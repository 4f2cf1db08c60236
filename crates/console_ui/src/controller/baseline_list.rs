//! Baseline list sub-view: rows for one product filter plus row selection.
//!
//! A list never changes its filter. The panel throws it away and builds a new
//! one with a fresh [`ListGeneration`]; results addressed to an older
//! generation are stale and get dropped by the panel.

use std::collections::BTreeSet;

use crossbeam_channel::Sender;
use shared::{
    domain::{BaselineId, ProductFilter},
    error::ErrorResponse,
    protocol::BaselineSummary,
};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::UiError,
        orchestration::{dispatch_backend_command, DispatchError},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListGeneration(pub u64);

/// Signals a list sends to whoever hosts it.
pub trait BaselineListObserver {
    fn on_error(&mut self, message: &str, response: Option<&ErrorResponse>);
    fn on_warning(&mut self, message: &str, response: Option<&ErrorResponse>);
    fn on_delete_button_display(&mut self, visible: bool);
    fn on_duplicate_button_display(&mut self, visible: bool);

    /// Deleting needs at least one row; duplicating needs exactly one.
    fn on_selection_changed(&mut self, count: usize) {
        self.on_delete_button_display(count >= 1);
        self.on_duplicate_button_display(count == 1);
    }
}

#[derive(Debug)]
pub struct BaselinesListView {
    generation: ListGeneration,
    filter: ProductFilter,
    rows: Vec<BaselineSummary>,
    selection: BTreeSet<BaselineId>,
    loading: bool,
    deleting: bool,
}

impl BaselinesListView {
    pub fn new(generation: ListGeneration, filter: ProductFilter) -> Self {
        Self {
            generation,
            filter,
            rows: Vec::new(),
            selection: BTreeSet::new(),
            loading: false,
            deleting: false,
        }
    }

    /// Starts fetching the rows for this list's filter.
    pub fn render(&mut self, cmd_tx: &Sender<BackendCommand>) -> Result<(), DispatchError> {
        dispatch_backend_command(
            cmd_tx,
            BackendCommand::FetchBaselines {
                generation: self.generation,
                filter: self.filter.clone(),
            },
        )?;
        self.loading = true;
        Ok(())
    }

    pub fn generation(&self) -> ListGeneration {
        self.generation
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    pub fn rows(&self) -> &[BaselineSummary] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, id: BaselineId) -> bool {
        self.selection.contains(&id)
    }

    /// The selected row, only when exactly one row is selected.
    pub fn selected_baseline(&self) -> Option<&BaselineSummary> {
        if self.selection.len() != 1 {
            return None;
        }
        let id = self.selection.first()?;
        self.rows.iter().find(|row| row.id == *id)
    }

    pub fn apply_loaded(
        &mut self,
        baselines: Vec<BaselineSummary>,
        observer: &mut dyn BaselineListObserver,
    ) {
        self.loading = false;
        self.rows = baselines;
        let rows = &self.rows;
        self.selection.retain(|id| rows.iter().any(|row| row.id == *id));
        observer.on_selection_changed(self.selection.len());
    }

    pub fn apply_failed(&mut self, error: &UiError, observer: &mut dyn BaselineListObserver) {
        self.loading = false;
        observer.on_error(error.message(), error.response());
    }

    /// Returns `false` when `id` is not one of the listed rows.
    pub fn toggle_selection(
        &mut self,
        id: BaselineId,
        observer: &mut dyn BaselineListObserver,
    ) -> bool {
        if !self.rows.iter().any(|row| row.id == id) {
            return false;
        }
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
        observer.on_selection_changed(self.selection.len());
        true
    }

    pub fn select_all(&mut self, selected: bool, observer: &mut dyn BaselineListObserver) {
        if selected {
            self.selection = self.rows.iter().map(|row| row.id).collect();
        } else {
            self.selection.clear();
        }
        observer.on_selection_changed(self.selection.len());
    }

    /// Queues one delete command for every selected row. Nothing selected, or a
    /// delete still in flight, is a no-op.
    pub fn delete_selected_baselines(
        &mut self,
        cmd_tx: &Sender<BackendCommand>,
    ) -> Result<(), DispatchError> {
        if self.selection.is_empty() {
            return Ok(());
        }
        if self.deleting {
            tracing::debug!(generation = self.generation.0, "delete already in flight");
            return Ok(());
        }
        dispatch_backend_command(
            cmd_tx,
            BackendCommand::DeleteBaselines {
                generation: self.generation,
                ids: self.selection.iter().copied().collect(),
            },
        )?;
        self.deleting = true;
        Ok(())
    }

    pub fn apply_deleted(
        &mut self,
        deleted: &[BaselineId],
        failures: &[(BaselineId, UiError)],
        observer: &mut dyn BaselineListObserver,
    ) {
        self.deleting = false;
        self.rows.retain(|row| !deleted.contains(&row.id));
        for id in deleted {
            self.selection.remove(id);
        }
        for (id, error) in failures {
            tracing::warn!(baseline_id = id.0, "baseline delete failed: {}", error.message());
            observer.on_error(error.message(), error.response());
        }
        observer.on_selection_changed(self.selection.len());
    }

    /// Adds a row created elsewhere when it belongs to this list's filter.
    pub fn append(&mut self, baseline: BaselineSummary) -> bool {
        if !self.filter.covers(&baseline.configuration_item_id)
            || self.rows.iter().any(|row| row.id == baseline.id)
        {
            return false;
        }
        self.rows.push(baseline);
        true
    }
}

#[cfg(test)]
#[path = "tests/baseline_list_tests.rs"]
mod tests;

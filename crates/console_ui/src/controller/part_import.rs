//! Part import dialog: stages one file by drag-and-drop or file picker and
//! submits it as a multipart upload.
//!
//! ```text
//! Idle ──drag over──▶ Hovering ──drop──▶ Staged ──submit──▶ Submitting ──▶ Finished
//!  ▲                     │                  │
//!  └────drag leave───────┘                  └──cancel──▶ Finished
//! ```
//!
//! The dialog holds a single staged-file slot. Every staged file replaces the
//! previous one, so a multi-file drop outside single-file mode keeps only the
//! last file offered.

use std::sync::Arc;

use client_core::{ConsoleConfig, FileSource, OfferedFile, PartUpload};
use crossbeam_channel::Sender;
use shared::protocol::ImportOptions;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{events::UiError, orchestration::dispatch_backend_command},
    notify::{NotificationKind, NotificationLog, NotificationSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Submitted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    Hovering,
    Staged,
    Submitting,
    Finished(ImportOutcome),
}

/// What the toolkit adapter must do with the native drag event it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeDragDisposition {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl NativeDragDisposition {
    const HANDLED: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
}

/// Disposition for `drop`/`dragenter` seen at document level, wherever they
/// land: the browser must never navigate to a dropped file.
pub fn document_drag_guard() -> NativeDragDisposition {
    NativeDragDisposition {
        prevent_default: true,
        stop_propagation: false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// NFC-normalized file name.
    pub name: String,
    pub source: FileSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkbox {
    pub checked: bool,
    pub enabled: bool,
}

impl Checkbox {
    const fn enabled() -> Self {
        Self {
            checked: false,
            enabled: true,
        }
    }

    const fn disabled() -> Self {
        Self {
            checked: false,
            enabled: false,
        }
    }
}

/// Import form controls. Auto-checkin only makes sense with auto-checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportForm {
    auto_checkout: Checkbox,
    auto_checkin: Checkbox,
    permissive_update: Checkbox,
    revision_note_enabled: Checkbox,
    revision_note: String,
}

impl Default for ImportForm {
    fn default() -> Self {
        Self {
            auto_checkout: Checkbox::enabled(),
            auto_checkin: Checkbox::disabled(),
            permissive_update: Checkbox::enabled(),
            revision_note_enabled: Checkbox::enabled(),
            revision_note: String::new(),
        }
    }
}

impl ImportForm {
    pub fn auto_checkout(&self) -> Checkbox {
        self.auto_checkout
    }

    pub fn auto_checkin(&self) -> Checkbox {
        self.auto_checkin
    }

    pub fn permissive_update(&self) -> Checkbox {
        self.permissive_update
    }

    pub fn revision_note_enabled(&self) -> Checkbox {
        self.revision_note_enabled
    }

    pub fn revision_note(&self) -> &str {
        &self.revision_note
    }

    pub fn set_auto_checkout(&mut self, checked: bool) {
        self.auto_checkout.checked = checked;
        if checked {
            self.auto_checkin.enabled = true;
        } else {
            self.auto_checkin.enabled = false;
            self.auto_checkin.checked = false;
        }
    }

    /// Ignored while the control is disabled.
    pub fn set_auto_checkin(&mut self, checked: bool) -> bool {
        if !self.auto_checkin.enabled {
            return false;
        }
        self.auto_checkin.checked = checked;
        true
    }

    pub fn set_permissive_update(&mut self, checked: bool) {
        self.permissive_update.checked = checked;
    }

    pub fn set_revision_note_enabled(&mut self, checked: bool) {
        self.revision_note_enabled.checked = checked;
    }

    pub fn set_revision_note(&mut self, text: impl Into<String>) {
        self.revision_note = text.into();
    }

    /// Current control values; the note only counts while its checkbox is ticked.
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            auto_checkout: self.auto_checkout.checked,
            auto_checkin: self.auto_checkin.enabled && self.auto_checkin.checked,
            permissive_update: self.permissive_update.checked,
            revision_note: if self.revision_note_enabled.checked {
                self.revision_note.clone()
            } else {
                String::new()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportDialogOptions {
    /// Reject drops that carry more than one file.
    pub single_file: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCompletion {
    pub file_name: String,
    pub result: Result<(), UiError>,
}

type CompletionHook = Box<dyn FnMut(&ImportCompletion)>;

pub struct PartImportController<N: NotificationSink = NotificationLog> {
    config: Arc<ConsoleConfig>,
    cmd_tx: Sender<BackendCommand>,
    notifications: N,
    options: ImportDialogOptions,
    state: ImportState,
    hover_marker: bool,
    staged: Option<StagedFile>,
    displayed: Vec<String>,
    form: ImportForm,
    in_flight: Option<String>,
    completion: Option<ImportCompletion>,
    on_complete: Option<CompletionHook>,
}

impl<N: NotificationSink> PartImportController<N> {
    pub fn new(
        config: Arc<ConsoleConfig>,
        cmd_tx: Sender<BackendCommand>,
        notifications: N,
        options: ImportDialogOptions,
    ) -> Self {
        Self {
            config,
            cmd_tx,
            notifications,
            options,
            state: ImportState::Idle,
            hover_marker: false,
            staged: None,
            displayed: Vec::new(),
            form: ImportForm::default(),
            in_flight: None,
            completion: None,
            on_complete: None,
        }
    }

    /// Caller hook run when the backend reports how the upload went.
    pub fn on_import_complete(&mut self, hook: impl FnMut(&ImportCompletion) + 'static) {
        self.on_complete = Some(Box::new(hook));
    }

    /// Resets the dialog to a blank form.
    pub fn render(&mut self) -> &mut Self {
        self.state = ImportState::Idle;
        self.hover_marker = false;
        self.staged = None;
        self.displayed.clear();
        self.form = ImportForm::default();
        self
    }

    // ===== Queries =====

    pub fn state(&self) -> ImportState {
        self.state
    }

    pub fn is_hover_marked(&self) -> bool {
        self.hover_marker
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        self.staged.as_ref()
    }

    /// Entries of the "selected file" list.
    pub fn displayed_files(&self) -> &[String] {
        &self.displayed
    }

    pub fn form(&self) -> &ImportForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ImportForm {
        &mut self.form
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    pub fn completion(&self) -> Option<&ImportCompletion> {
        self.completion.as_ref()
    }

    pub fn notifications(&self) -> &N {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut N {
        &mut self.notifications
    }

    fn is_closed(&self) -> bool {
        matches!(
            self.state,
            ImportState::Submitting | ImportState::Finished(_)
        )
    }

    fn pre_hover_state(&self) -> ImportState {
        if self.staged.is_some() {
            ImportState::Staged
        } else {
            ImportState::Idle
        }
    }

    // ===== Drag and drop =====

    /// Drag entered or moved over the drop area.
    pub fn on_drag_over(&mut self) -> NativeDragDisposition {
        if !self.is_closed() {
            self.hover_marker = true;
            self.state = ImportState::Hovering;
        }
        NativeDragDisposition::HANDLED
    }

    pub fn on_drag_leave(&mut self) -> NativeDragDisposition {
        self.hover_marker = false;
        if self.state == ImportState::Hovering {
            self.state = self.pre_hover_state();
        }
        NativeDragDisposition::HANDLED
    }

    pub fn on_drop(&mut self, files: Vec<OfferedFile>) -> NativeDragDisposition {
        self.hover_marker = false;
        if self.is_closed() {
            debug!(state = ?self.state, "drop ignored on closed import dialog");
            return NativeDragDisposition::HANDLED;
        }
        self.state = self.pre_hover_state();

        if self.options.single_file && files.len() > 1 {
            warn!(count = files.len(), "multi-file drop rejected in single-file mode");
            let message = self.config.messages.single_file_restriction.clone();
            self.notifications.notify(NotificationKind::Error, &message);
            return NativeDragDisposition::HANDLED;
        }

        for file in files {
            self.load_new_file(file);
        }
        NativeDragDisposition::HANDLED
    }

    /// File picker change; the picker itself limits how many files come in.
    pub fn on_files_selected(&mut self, files: Vec<OfferedFile>) {
        if self.is_closed() {
            debug!(state = ?self.state, "file selection ignored on closed import dialog");
            return;
        }
        for file in files {
            self.load_new_file(file);
        }
    }

    fn load_new_file(&mut self, file: OfferedFile) {
        let name: String = file.name.nfc().collect();
        debug!(file = %name, "staging file");
        self.displayed = vec![name.clone()];
        self.staged = Some(StagedFile {
            name,
            source: file.source,
        });
        self.hover_marker = false;
        self.state = ImportState::Staged;
    }

    // ===== Actions =====

    /// Only a hovering or staged dialog can be cancelled.
    pub fn cancel(&mut self) {
        if !matches!(self.state, ImportState::Hovering | ImportState::Staged) {
            debug!(state = ?self.state, "cancel ignored");
            return;
        }
        self.staged = None;
        self.displayed.clear();
        self.hover_marker = false;
        self.state = ImportState::Finished(ImportOutcome::Cancelled);
        info!("part import cancelled");
    }

    /// Sends the staged file. Returns `false` when nothing was dispatched.
    pub fn submit(&mut self) -> bool {
        if self.state != ImportState::Staged {
            debug!(state = ?self.state, "submit ignored");
            return false;
        }
        let Some(staged) = self.staged.take() else {
            debug!("submit ignored: no staged file");
            return false;
        };

        let options = self.form.options();
        let url = match self.config.part_import_url(&options) {
            Ok(url) => url,
            Err(err) => {
                self.staged = Some(staged);
                self.notifications
                    .notify(NotificationKind::Error, &err.to_string());
                return false;
            }
        };

        self.state = ImportState::Submitting;
        let file_name = staged.name.clone();
        let upload = PartUpload {
            url,
            file_name: staged.name.clone(),
            source: staged.source.clone(),
        };
        let command = BackendCommand::ImportPart { upload };
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, command) {
            self.staged = Some(staged);
            self.state = ImportState::Staged;
            let message = err.user_message(&self.config.messages);
            self.notifications.notify(NotificationKind::Error, message);
            return false;
        }

        info!(file = %file_name, ?options, "part import dispatched");
        self.displayed.clear();
        self.in_flight = Some(file_name);
        self.state = ImportState::Finished(ImportOutcome::Submitted);
        true
    }

    // ===== Backend results =====

    pub fn on_import_finished(&mut self, file_name: &str, result: Result<(), UiError>) {
        if self.in_flight.as_deref() == Some(file_name) {
            self.in_flight = None;
        }
        let completion = ImportCompletion {
            file_name: file_name.to_string(),
            result,
        };
        if let Some(hook) = self.on_complete.as_mut() {
            hook(&completion);
        }
        self.completion = Some(completion);
    }
}

#[cfg(test)]
#[path = "tests/part_import_tests.rs"]
mod tests;

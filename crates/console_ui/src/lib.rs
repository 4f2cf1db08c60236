//! Toolkit-agnostic controllers for the product console: the baseline panel and
//! the part import dialog, plus the bridge that runs their remote calls.

pub mod backend_bridge;
pub mod controller;
pub mod notify;

pub use controller::{
    baseline_panel::BaselinePanelController,
    part_import::{ImportState, PartImportController},
    reducer::{reduce, ConsoleScreen},
};
pub use notify::{Notification, NotificationKind, NotificationLog, NotificationSink};

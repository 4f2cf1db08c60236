//! Controller layer: UI events, reducer-like state transitions, and command orchestration.

pub mod baseline_dialogs;
pub mod baseline_list;
pub mod baseline_panel;
pub mod events;
pub mod orchestration;
pub mod part_import;
pub mod reducer;

use super::*;

use crossbeam_channel::bounded;
use shared::domain::{BaselineKind, ProductId};

use crate::controller::events::UiErrorContext;

#[derive(Default)]
struct Recorder {
    delete_visible: Vec<bool>,
    duplicate_visible: Vec<bool>,
    errors: Vec<String>,
}

impl BaselineListObserver for Recorder {
    fn on_error(&mut self, message: &str, response: Option<&ErrorResponse>) {
        let text = response
            .and_then(ErrorResponse::display_text)
            .unwrap_or(message);
        self.errors.push(text.to_string());
    }

    fn on_warning(&mut self, _message: &str, _response: Option<&ErrorResponse>) {}

    fn on_delete_button_display(&mut self, visible: bool) {
        self.delete_visible.push(visible);
    }

    fn on_duplicate_button_display(&mut self, visible: bool) {
        self.duplicate_visible.push(visible);
    }
}

fn baseline(id: i64, product: &str) -> BaselineSummary {
    BaselineSummary {
        id: BaselineId(id),
        name: format!("baseline-{id}"),
        description: None,
        configuration_item_id: ProductId(product.into()),
        creation_date: None,
        kind: BaselineKind::Latest,
    }
}

fn loaded_list(ids: &[i64]) -> (BaselinesListView, Recorder) {
    let mut list = BaselinesListView::new(ListGeneration(1), ProductFilter::all());
    let mut recorder = Recorder::default();
    list.apply_loaded(ids.iter().map(|id| baseline(*id, "ENGINE")).collect(), &mut recorder);
    (list, recorder)
}

#[test]
fn affordances_follow_selection_count() {
    let (mut list, mut recorder) = loaded_list(&[1, 2, 3]);
    assert_eq!(recorder.delete_visible.last(), Some(&false));
    assert_eq!(recorder.duplicate_visible.last(), Some(&false));

    list.toggle_selection(BaselineId(1), &mut recorder);
    assert_eq!(recorder.delete_visible.last(), Some(&true));
    assert_eq!(recorder.duplicate_visible.last(), Some(&true));

    list.toggle_selection(BaselineId(2), &mut recorder);
    assert_eq!(recorder.delete_visible.last(), Some(&true));
    assert_eq!(recorder.duplicate_visible.last(), Some(&false));

    list.select_all(false, &mut recorder);
    assert_eq!(recorder.delete_visible.last(), Some(&false));
    assert_eq!(recorder.duplicate_visible.last(), Some(&false));
}

#[test]
fn unknown_rows_cannot_be_selected() {
    let (mut list, mut recorder) = loaded_list(&[1]);
    let signals_before = recorder.delete_visible.len();
    assert!(!list.toggle_selection(BaselineId(99), &mut recorder));
    assert_eq!(recorder.delete_visible.len(), signals_before);
    assert_eq!(list.selection_count(), 0);
}

#[test]
fn selected_baseline_requires_single_selection() {
    let (mut list, mut recorder) = loaded_list(&[1, 2]);
    assert!(list.selected_baseline().is_none());

    list.toggle_selection(BaselineId(2), &mut recorder);
    assert_eq!(list.selected_baseline().map(|b| b.id), Some(BaselineId(2)));

    list.select_all(true, &mut recorder);
    assert!(list.selected_baseline().is_none());
}

#[test]
fn render_queues_fetch_for_own_generation_and_filter() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let filter = ProductFilter::product(ProductId("WING".into()));
    let mut list = BaselinesListView::new(ListGeneration(7), filter.clone());

    list.render(&cmd_tx).expect("dispatch");
    assert!(list.is_loading());
    assert_eq!(
        cmd_rx.try_recv().expect("command"),
        BackendCommand::FetchBaselines {
            generation: ListGeneration(7),
            filter,
        }
    );
}

#[test]
fn delete_without_selection_sends_nothing() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (mut list, _recorder) = loaded_list(&[1, 2]);
    list.delete_selected_baselines(&cmd_tx).expect("no-op");
    assert!(cmd_rx.try_recv().is_err());
    assert!(!list.is_deleting());
}

#[test]
fn repeated_delete_waits_for_first_outcome() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (mut list, mut recorder) = loaded_list(&[1, 2]);
    list.toggle_selection(BaselineId(1), &mut recorder);

    list.delete_selected_baselines(&cmd_tx).expect("dispatch");
    list.delete_selected_baselines(&cmd_tx).expect("ignored");
    assert_eq!(cmd_rx.try_iter().count(), 1);
    assert!(list.is_deleting());

    list.apply_deleted(&[BaselineId(1)], &[], &mut recorder);
    assert!(!list.is_deleting());
    list.toggle_selection(BaselineId(2), &mut recorder);
    list.delete_selected_baselines(&cmd_tx).expect("dispatch");
    assert_eq!(cmd_rx.try_iter().count(), 1);
}

#[test]
fn delete_removes_rows_and_reports_failures() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (mut list, mut recorder) = loaded_list(&[1, 2, 3]);
    list.select_all(true, &mut recorder);
    list.delete_selected_baselines(&cmd_tx).expect("dispatch");
    assert_eq!(
        cmd_rx.try_recv().expect("command"),
        BackendCommand::DeleteBaselines {
            generation: ListGeneration(1),
            ids: vec![BaselineId(1), BaselineId(2), BaselineId(3)],
        }
    );

    let failure = UiError::from_message(UiErrorContext::BaselineDelete, "baseline 3 is in use");
    list.apply_deleted(
        &[BaselineId(1), BaselineId(2)],
        &[(BaselineId(3), failure)],
        &mut recorder,
    );

    let remaining: Vec<BaselineId> = list.rows().iter().map(|row| row.id).collect();
    assert_eq!(remaining, vec![BaselineId(3)]);
    assert!(list.is_selected(BaselineId(3)));
    assert_eq!(recorder.errors, vec!["baseline 3 is in use".to_string()]);
    assert_eq!(recorder.duplicate_visible.last(), Some(&true));
}

#[test]
fn reload_drops_selection_of_vanished_rows() {
    let (mut list, mut recorder) = loaded_list(&[1, 2]);
    list.select_all(true, &mut recorder);
    list.apply_loaded(vec![baseline(2, "ENGINE")], &mut recorder);
    assert_eq!(list.selection_count(), 1);
    assert_eq!(recorder.duplicate_visible.last(), Some(&true));
}

#[test]
fn append_respects_filter() {
    let mut list = BaselinesListView::new(
        ListGeneration(2),
        ProductFilter::product(ProductId("ENGINE".into())),
    );
    assert!(list.append(baseline(5, "ENGINE")));
    assert!(!list.append(baseline(5, "ENGINE")));
    assert!(!list.append(baseline(6, "WING")));
    assert_eq!(list.rows().len(), 1);
}

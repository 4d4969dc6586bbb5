use std::sync::Arc;

use crate::level::{Level, ResultArray};
use crate::model::{ModelEvent, QrCodeModel};
use crate::projection::{ListOp, ObservedList, diff};

fn tagged(text: &str, level: Level) -> String {
	format!("{level}:{text}")
}

fn computed(model: &mut QrCodeModel, text: &str) {
	model.set_text(text).expect("set_text");
	model.wait_worker_idle();
	model.pump();
}

/// Must express every operation against the list as it is when applied.
///
/// * Enforced in: `projection::diff`
/// * Failure symptom: views insert or remove the wrong row after a mixed
///   insert/remove recompute.
#[cfg_attr(test, test)]
pub(crate) fn test_diff_positions_follow_live_list() {
	let previous = ResultArray::from_slots([None, Some("X".to_string()), None, Some("Y".to_string())]);
	let next = ResultArray::from_slots([None, Some("X".to_string()), Some("Z".to_string()), None]);

	let ops = diff(&previous, &next);
	assert_eq!(
		ops,
		vec![
			ListOp::Insert {
				position: 1,
				level: Level::Quartile,
				variant: "Z".to_string(),
			},
			ListOp::Remove {
				position: 2,
				level: Level::High,
			},
		]
	);

	let mut list = ObservedList::from_results(&previous);
	for op in &ops {
		list.apply(op).expect("op should apply to the live list");
	}
	assert_eq!(list, ObservedList::from_results(&next));
}

/// Must leave no rows and no live task after the text is emptied.
///
/// * Enforced in: `QrCodeModel::set_text`
/// * Failure symptom: stale codes stay on screen for an empty input.
#[cfg_attr(test, test)]
pub(crate) fn test_empty_text_always_clears() {
	let mut model = QrCodeModel::new(Arc::new(tagged)).expect("model should start");
	computed(&mut model, "abc");
	model.set_text("abd").expect("set_text");

	model.set_text("").expect("set_text");
	assert_eq!(model.count(), 0);
	assert!(!model.is_busy());
	assert_eq!(model.generation(), None);
}

/// Must keep the list length equal to the number of present levels.
///
/// * Enforced in: `QrCodeModel::apply_ops`
/// * Failure symptom: `count()` and `at()` disagree, views index past the end.
#[cfg_attr(test, test)]
pub(crate) fn test_count_matches_present_levels() {
	let mut model = QrCodeModel::new(Arc::new(|text: &str, level: Level| if level == Level::Medium { String::new() } else { tagged(text, level) }))
		.expect("model should start");
	computed(&mut model, "abc");

	assert_eq!(model.count(), 3);
	assert_eq!(model.count(), model.results().count());
	assert_eq!(model.observed().len(), model.count());
	assert!(model.at(model.count()).is_none());
}

/// Must hold at most one live task and replace it on every text change.
///
/// * Enforced in: `QrCodeModel::withdraw_current`
/// * Failure symptom: two generations race and the older one wins.
#[cfg_attr(test, test)]
pub(crate) fn test_single_live_task() {
	let mut model = QrCodeModel::new(Arc::new(tagged)).expect("model should start");
	model.set_text("a").expect("set_text");
	let first = model.generation();
	model.set_text("b").expect("set_text");
	let second = model.generation();

	assert!(first.is_some() && second.is_some());
	assert_ne!(first, second);
	model.wait_worker_idle();
	assert_eq!(model.pump(), 1, "only the live task is committed");
	assert_eq!(model.primary(), Some("low:b"));
}

/// Must raise busy exactly while a task handle is live, signalled once per edge.
///
/// * Enforced in: `QrCodeModel::{set_text,on_task_done}`
/// * Failure symptom: spinners flicker or stay up after results arrive.
#[cfg_attr(test, test)]
pub(crate) fn test_busy_signal_tracks_handle() {
	let mut model = QrCodeModel::new(Arc::new(tagged)).expect("model should start");
	model.set_text("a").expect("set_text");
	model.set_text("b").expect("set_text");
	model.wait_worker_idle();
	model.pump();

	let busy_edges = model.drain_events().into_iter().filter(|event| *event == ModelEvent::BusyChanged).count();
	assert_eq!(busy_edges, 2);
	assert!(!model.is_busy());
}

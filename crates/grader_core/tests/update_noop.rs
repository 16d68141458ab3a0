use grader_core::{update, Msg, PanelPolicy, PanelState};

#[test]
fn tick_without_jobs_is_noop() {
    let state = PanelState::new(PanelPolicy::rubric_key());
    let (mut next, effects) = update(state, Msg::RefreshTick);

    assert!(effects.is_empty());
    assert!(!next.refresh_in_flight());
    assert!(!next.consume_dirty());
}

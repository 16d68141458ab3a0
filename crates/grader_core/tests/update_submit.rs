use std::sync::Once;

use grader_core::{
    update, Effect, GradeForm, JobId, Msg, Notice, PanelPolicy, PanelState, RubricField,
    RubricPayload, SubmitOutcome, QUEUED_STATUS,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(grader_logging::initialize_for_tests);
}

fn inline_form(rubric: &str) -> GradeForm {
    GradeForm {
        userid: "u1".to_string(),
        assignmentid: "a1".to_string(),
        github_link: "g".to_string(),
        assignmentname: "n".to_string(),
        assignmentactivity: "x".to_string(),
        rubric: RubricField::Inline(rubric.to_string()),
    }
}

fn accepted(id: &str) -> Msg {
    Msg::SubmitFinished(SubmitOutcome::Accepted {
        job_id: JobId::new(id).unwrap(),
    })
}

fn ids(state: &PanelState) -> Vec<String> {
    state
        .jobs()
        .iter()
        .map(|job| job.job_id().to_string())
        .collect()
}

#[test]
fn form_submission_emits_request_without_touching_the_list() {
    init_logging();
    let state = PanelState::new(PanelPolicy::inline_rubric());
    let (mut state, effects) = update(
        state,
        Msg::FormSubmitted(inline_form(r#"{"criteria": []}"#)),
    );

    assert!(state.jobs().is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::SubmitGrade { request } => {
            assert_eq!(request.userid, "u1");
            assert_eq!(
                request.rubric,
                RubricPayload::Inline {
                    assignmentrubric: json!({"criteria": []})
                }
            );
        }
        other => panic!("unexpected effect {other:?}"),
    }
}

#[test]
fn malformed_rubric_falls_back_to_empty_mapping() {
    init_logging();
    let state = PanelState::new(PanelPolicy::inline_rubric());
    let (mut state, effects) = update(state, Msg::FormSubmitted(inline_form("{not json")));

    let Effect::SubmitGrade { request } = &effects[0] else {
        panic!("expected submit effect, got {effects:?}");
    };
    let body = serde_json::to_value(request).unwrap();
    assert_eq!(body["assignmentrubric"], json!({}));
    assert!(matches!(
        state.notice(),
        Some(Notice::RubricFallback { .. })
    ));
    // Only the notice needs drawing; no error path is taken.
    assert!(state.consume_dirty());
    assert!(state.jobs().is_empty());
}

#[test]
fn empty_fields_pass_through_unchanged() {
    let state = PanelState::new(PanelPolicy::rubric_key());
    let form = GradeForm {
        rubric: RubricField::Keyed {
            assignmentintro: String::new(),
            rubric_key: String::new(),
        },
        ..GradeForm::default()
    };
    let (_state, effects) = update(state, Msg::FormSubmitted(form));
    let Effect::SubmitGrade { request } = &effects[0] else {
        panic!("expected submit effect");
    };
    assert_eq!(
        serde_json::to_value(request).unwrap(),
        json!({
            "userid": "",
            "assignmentid": "",
            "github_link": "",
            "assignmentname": "",
            "assignmentactivity": "",
            "assignmentintro": "",
            "rubric_key": "",
        })
    );
}

#[test]
fn accepted_submit_adds_exactly_one_queued_job() {
    init_logging();
    let state = PanelState::new(PanelPolicy::inline_rubric());
    let (state, _) = update(state, Msg::FormSubmitted(inline_form("{}")));
    let (mut state, effects) = update(state, accepted("J1"));

    assert!(effects.is_empty());
    assert_eq!(state.jobs().len(), 1);
    assert_eq!(state.jobs()[0].status(), QUEUED_STATUS);
    assert!(state.jobs()[0].result().is_none());
    assert!(state.consume_dirty());
}

#[test]
fn prepend_policy_puts_newest_first() {
    let state = PanelState::new(PanelPolicy::inline_rubric());
    let (state, _) = update(state, accepted("J1"));
    let (state, _) = update(state, accepted("J2"));
    let (state, _) = update(state, accepted("J3"));

    assert_eq!(ids(&state), vec!["J3", "J2", "J1"]);
}

#[test]
fn append_policy_keeps_submission_order() {
    let state = PanelState::new(PanelPolicy::rubric_key());
    let (state, _) = update(state, accepted("J1"));
    let (state, _) = update(state, accepted("J2"));
    let (state, _) = update(state, accepted("J3"));

    assert_eq!(ids(&state), vec!["J1", "J2", "J3"]);
}

#[test]
fn repeated_job_id_is_not_inserted_twice() {
    let state = PanelState::new(PanelPolicy::rubric_key());
    let (mut state, _) = update(state, accepted("J1"));
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, accepted("J1"));
    assert!(effects.is_empty());
    assert_eq!(state.jobs().len(), 1);
    assert!(!state.consume_dirty());
}

#[test]
fn rejection_alerts_when_policy_surfaces_errors() {
    init_logging();
    let state = PanelState::new(PanelPolicy::inline_rubric());
    let (state, _) = update(state, Msg::FormSubmitted(inline_form("{}")));
    let (state, effects) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Rejected {
            error: "Missing fields".to_string(),
        }),
    );

    assert_eq!(
        effects,
        vec![Effect::Alert {
            message: "Error: Missing fields".to_string()
        }]
    );
    assert!(state.jobs().is_empty());
    assert_eq!(state.view().notice.as_deref(), Some("Error: Missing fields"));
}

#[test]
fn rejection_is_ignored_when_policy_hides_errors() {
    let state = PanelState::new(PanelPolicy::rubric_key());
    let (mut state, effects) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Rejected {
            error: "Missing fields".to_string(),
        }),
    );

    assert!(effects.is_empty());
    assert!(state.jobs().is_empty());
    assert!(state.notice().is_none());
    assert!(!state.consume_dirty());
}

#[test]
fn unrecognized_response_produces_no_job_and_no_alert() {
    let state = PanelState::new(PanelPolicy::inline_rubric());
    let (mut state, effects) = update(state, Msg::SubmitFinished(SubmitOutcome::Unrecognized));

    assert!(effects.is_empty());
    assert!(state.jobs().is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn transport_failure_alerts_like_a_rejection() {
    let state = PanelState::new(PanelPolicy::inline_rubric());
    let (_state, effects) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Failed {
            reason: "network error: connection refused".to_string(),
        }),
    );

    assert_eq!(
        effects,
        vec![Effect::Alert {
            message: "Error: network error: connection refused".to_string()
        }]
    );
}

#[test]
fn next_clean_submission_clears_the_notice() {
    let state = PanelState::new(PanelPolicy::inline_rubric());
    let (state, _) = update(state, Msg::FormSubmitted(inline_form("nope")));
    assert!(state.notice().is_some());

    let (state, _) = update(state, Msg::FormSubmitted(inline_form("{}")));
    assert!(state.notice().is_none());
}

#[test]
fn pending_submit_keeps_panel_busy() {
    let state = PanelState::new(PanelPolicy::inline_rubric());
    assert!(state.is_idle());

    let (state, _) = update(state, Msg::FormSubmitted(inline_form("{}")));
    assert!(!state.is_idle());

    let (state, _) = update(state, Msg::SubmitFinished(SubmitOutcome::Unrecognized));
    assert!(state.is_idle());
}

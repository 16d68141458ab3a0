use crate::{Effect, Msg, Notice, PanelState, SubmitOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormSubmitted(form) => {
            let (request, fallback) = form.into_request();
            match fallback {
                Some(reason) => state.set_notice(Notice::RubricFallback { reason }),
                None => state.clear_notice(),
            }
            state.begin_submit();
            vec![Effect::SubmitGrade { request }]
        }
        Msg::SubmitFinished(outcome) => {
            state.finish_submit();
            match outcome {
                SubmitOutcome::Accepted { job_id } => {
                    // A repeated id leaves the list untouched.
                    state.insert_job(job_id);
                    Vec::new()
                }
                SubmitOutcome::Rejected { error: message }
                | SubmitOutcome::Failed { reason: message } => {
                    if state.policy().surface_submit_errors {
                        let notice = Notice::SubmitError { message };
                        let alert = notice.to_string();
                        state.set_notice(notice);
                        vec![Effect::Alert { message: alert }]
                    } else {
                        Vec::new()
                    }
                }
                SubmitOutcome::Unrecognized => Vec::new(),
            }
        }
        Msg::RefreshTick => match state.begin_refresh() {
            Some(job_ids) => vec![Effect::RefreshStatuses { job_ids }],
            None => Vec::new(),
        },
        Msg::RefreshFinished(reports) => {
            state.apply_reports(reports);
            Vec::new()
        }
    };

    (state, effects)
}

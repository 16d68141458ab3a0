use grader_core::{JobRowView, PanelViewModel};

/// Full redraw of the panel: optional notice, one block per job, then a summary.
pub fn render(view: &PanelViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(notice) = &view.notice {
        lines.push(format!("! {notice}"));
        lines.push(String::new());
    }

    for job in &view.jobs {
        push_job(&mut lines, job);
    }

    lines.push(format!(
        "Jobs: {} | Pending: {}",
        view.job_count, view.pending_count
    ));
    lines
}

fn push_job(lines: &mut Vec<String>, job: &JobRowView) {
    lines.push(format!("Job {}", job.job_id));
    lines.push(format!("Status: {}", job.status));
    if let Some(result) = &job.result {
        lines.extend(result.lines().map(|line| format!("    {line}")));
    }
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use grader_core::{update, JobId, Msg, PanelPolicy, PanelState, StatusReport, SubmitOutcome};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn accept(state: PanelState, id: &str) -> PanelState {
        update(
            state,
            Msg::SubmitFinished(SubmitOutcome::Accepted {
                job_id: JobId::new(id).unwrap(),
            }),
        )
        .0
    }

    #[test]
    fn renders_one_block_per_job() {
        let state = PanelState::new(PanelPolicy::rubric_key());
        let state = accept(state, "J1");
        let state = accept(state, "J2");
        let (state, _) = update(state, Msg::RefreshTick);
        let (state, _) = update(
            state,
            Msg::RefreshFinished(vec![StatusReport::Updated {
                job_id: JobId::new("J2").unwrap(),
                status: "done".to_string(),
                result: Some(json!({"score": 9})),
            }]),
        );

        assert_eq!(
            render(&state.view()),
            vec![
                "Job J1",
                "Status: queued",
                "",
                "Job J2",
                "Status: done",
                "    {",
                "      \"score\": 9",
                "    }",
                "",
                "Jobs: 2 | Pending: 1",
            ]
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let state = accept(PanelState::new(PanelPolicy::inline_rubric()), "J1");
        let view = state.view();
        assert_eq!(render(&view), render(&view));
        assert_eq!(render(&view), render(&state.view()));
    }

    #[test]
    fn empty_panel_renders_only_the_summary() {
        let view = PanelState::new(PanelPolicy::default()).view();
        assert_eq!(render(&view), vec!["Jobs: 0 | Pending: 0"]);
    }

    #[test]
    fn notice_is_shown_first() {
        let view = PanelViewModel {
            notice: Some("Error: Missing fields".to_string()),
            ..PanelViewModel::default()
        };
        assert_eq!(render(&view)[0], "! Error: Missing fields");
    }
}

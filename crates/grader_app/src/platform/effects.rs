use std::sync::Arc;

use grader_core::{Effect, JobId, Msg, StatusReport, SubmitOutcome};
use grader_engine::{
    ClientError, EngineEvent, EngineEvents, EngineHandle, GradingClient, StatusReply, SubmitReply,
};
use grader_logging::{grader_info, grader_warn};
use tokio::sync::mpsc;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(client: Arc<dyn GradingClient>, msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        let (engine, events) = EngineHandle::new(client);
        spawn_event_loop(events, msg_tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitGrade { request } => {
                    self.engine.submit(request);
                }
                Effect::RefreshStatuses { job_ids } => {
                    grader_info!("Refreshing {} job(s)", job_ids.len());
                    self.engine.refresh(job_ids);
                }
                Effect::Alert { message } => {
                    // Alerts belong to the surface; nothing to execute here.
                    grader_warn!("Alert reached the effect runner: {}", message);
                }
            }
        }
    }
}

fn spawn_event_loop(mut events: EngineEvents, msg_tx: mpsc::UnboundedSender<Msg>) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let msg = match event {
                EngineEvent::SubmitFinished(result) => Msg::SubmitFinished(submit_outcome(result)),
                EngineEvent::RefreshFinished(results) => {
                    Msg::RefreshFinished(status_reports(results))
                }
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

/// A job id wins over an error, and empty values count as absent. A numeric
/// id of `0` arrives as the text "0" and is accepted like any other id.
pub(crate) fn submit_outcome(result: Result<SubmitReply, ClientError>) -> SubmitOutcome {
    match result {
        Ok(reply) => {
            if let Some(job_id) = reply.job_id.and_then(JobId::new) {
                grader_info!("Submit accepted job_id={}", job_id);
                return SubmitOutcome::Accepted { job_id };
            }
            match reply.error.filter(|error| !error.is_empty()) {
                Some(error) => {
                    grader_warn!("Submit rejected: {}", error);
                    SubmitOutcome::Rejected { error }
                }
                None => {
                    grader_warn!("Submit response had neither job_id nor error");
                    SubmitOutcome::Unrecognized
                }
            }
        }
        Err(err) => {
            grader_warn!("Submit failed: {}", err);
            SubmitOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

pub(crate) fn status_reports(
    results: Vec<(JobId, Result<StatusReply, ClientError>)>,
) -> Vec<StatusReport> {
    results
        .into_iter()
        .map(|(job_id, result)| match result {
            Ok(reply) => StatusReport::Updated {
                job_id,
                status: reply.status,
                result: reply.result,
            },
            Err(err) => {
                grader_warn!("Status poll for job {} skipped: {}", job_id, err);
                StatusReport::Skipped {
                    job_id,
                    reason: err.to_string(),
                }
            }
        })
        .collect()
}

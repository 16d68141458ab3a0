use std::sync::Arc;

use grader_core::{GradeRequest, JobId};
use grader_logging::{grader_debug, grader_info};
use tokio::sync::mpsc;

use crate::{ClientError, EngineEvent, GradingClient, StatusReply};

/// Runs remote calls on the current tokio runtime and reports back as events.
#[derive(Clone)]
pub struct EngineHandle {
    client: Arc<dyn GradingClient>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
}

/// Receiving side of the events published by an [`EngineHandle`].
pub struct EngineEvents {
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineEvents {
    /// Waits for the next event; `None` once every handle is dropped.
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }
}

impl EngineHandle {
    pub fn new(client: Arc<dyn GradingClient>) -> (Self, EngineEvents) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (Self { client, event_tx }, EngineEvents { event_rx })
    }

    /// Posts the request in the background. Must be called inside a tokio runtime.
    pub fn submit(&self, request: GradeRequest) {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            grader_info!(
                "Submitting grade request userid={} assignmentid={}",
                request.userid,
                request.assignmentid
            );
            let result = client.submit(&request).await;
            let _ = event_tx.send(EngineEvent::SubmitFinished(result));
        });
    }

    /// Polls every job in the background, one after another.
    pub fn refresh(&self, job_ids: Vec<JobId>) {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let results = poll_sequentially(client.as_ref(), job_ids).await;
            let _ = event_tx.send(EngineEvent::RefreshFinished(results));
        });
    }
}

/// Each status call is awaited before the next one starts.
pub async fn poll_sequentially(
    client: &dyn GradingClient,
    job_ids: Vec<JobId>,
) -> Vec<(JobId, Result<StatusReply, ClientError>)> {
    grader_debug!("Refresh pass over {} job(s)", job_ids.len());
    let mut results = Vec::with_capacity(job_ids.len());
    for job_id in job_ids {
        let result = client.status(&job_id).await;
        results.push((job_id, result));
    }
    results
}

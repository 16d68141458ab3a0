use serde_json::Value;

use crate::{GradeForm, JobId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted the grading form.
    FormSubmitted(GradeForm),
    /// The submit call for a previously submitted form returned.
    SubmitFinished(SubmitOutcome),
    /// Refresh timer fired.
    RefreshTick,
    /// A refresh pass polled every target it was given.
    RefreshFinished(Vec<StatusReport>),
}

/// What the grading service answered to a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Response carried a job id.
    Accepted { job_id: JobId },
    /// Response carried an `error` field.
    Rejected { error: String },
    /// Response decoded but had neither a job id nor an error.
    Unrecognized,
    /// The call itself failed (network, timeout, undecodable body).
    Failed { reason: String },
}

/// Result of polling one job during a refresh pass.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusReport {
    Updated {
        job_id: JobId,
        status: String,
        result: Option<Value>,
    },
    /// Non-success response or failed call; the job is polled again next tick.
    Skipped { job_id: JobId, reason: String },
}

impl StatusReport {
    pub fn job_id(&self) -> &JobId {
        match self {
            StatusReport::Updated { job_id, .. } | StatusReport::Skipped { job_id, .. } => job_id,
        }
    }
}

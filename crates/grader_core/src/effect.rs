use crate::{GradeRequest, JobId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Post the request to the grading service.
    SubmitGrade { request: GradeRequest },
    /// Poll each job once, in order, one call at a time.
    RefreshStatuses { job_ids: Vec<JobId> },
    /// Blocking user notification.
    Alert { message: String },
}

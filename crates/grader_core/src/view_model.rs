use crate::{JobId, JobRecord};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub jobs: Vec<JobRowView>,
    pub job_count: usize,
    pub pending_count: usize,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub status: String,
    /// Pretty-printed result, `None` until the service reports one.
    pub result: Option<String>,
}

impl JobRowView {
    pub(crate) fn from_record(record: &JobRecord) -> Self {
        Self {
            job_id: record.job_id().clone(),
            status: record.status().to_string(),
            // Any reported value is shown, including `false`, `0` and `""`.
            result: record.result().map(|value| {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }),
        }
    }
}

use std::fmt;

use serde_json::Value;

use crate::view_model::{JobRowView, PanelViewModel};
use crate::{InsertionOrder, PanelPolicy, StatusReport};

/// Status every job starts in until the service reports otherwise.
pub const QUEUED_STATUS: &str = "queued";

/// Opaque, non-empty job identifier assigned by the grading service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(String);

impl JobId {
    /// Returns `None` for an empty identifier.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    job_id: JobId,
    status: String,
    result: Option<Value>,
}

impl JobRecord {
    fn queued(job_id: JobId) -> Self {
        Self {
            job_id,
            status: QUEUED_STATUS.to_string(),
            result: None,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }
}

/// Non-blocking message shown above the job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The inline rubric did not parse and an empty one was sent.
    RubricFallback { reason: String },
    SubmitError { message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::RubricFallback { reason } => {
                write!(f, "Rubric is not valid JSON ({reason}); sent an empty rubric")
            }
            Notice::SubmitError { message } => write!(f, "Error: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelState {
    policy: PanelPolicy,
    jobs: Vec<JobRecord>,
    notice: Option<Notice>,
    submits_in_flight: usize,
    refresh_in_flight: bool,
    dirty: bool,
}

impl PanelState {
    pub fn new(policy: PanelPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &PanelPolicy {
        &self.policy
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn job(&self, job_id: &JobId) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| &job.job_id == job_id)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn refresh_in_flight(&self) -> bool {
        self.refresh_in_flight
    }

    /// True while any tracked job has not reached a terminal status.
    pub fn has_pending_jobs(&self) -> bool {
        self.jobs
            .iter()
            .any(|job| !self.policy.is_terminal(&job.status))
    }

    /// Nothing in flight and nothing left to poll.
    pub fn is_idle(&self) -> bool {
        self.submits_in_flight == 0 && !self.refresh_in_flight && !self.has_pending_jobs()
    }

    pub fn view(&self) -> PanelViewModel {
        let jobs: Vec<JobRowView> = self.jobs.iter().map(JobRowView::from_record).collect();
        PanelViewModel {
            job_count: jobs.len(),
            pending_count: self
                .jobs
                .iter()
                .filter(|job| !self.policy.is_terminal(&job.status))
                .count(),
            jobs,
            notice: self.notice.as_ref().map(ToString::to_string),
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_submit(&mut self) {
        self.submits_in_flight += 1;
    }

    pub(crate) fn finish_submit(&mut self) {
        self.submits_in_flight = self.submits_in_flight.saturating_sub(1);
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Inserts a fresh queued record. Returns false if the id is already tracked.
    pub(crate) fn insert_job(&mut self, job_id: JobId) -> bool {
        if self.job(&job_id).is_some() {
            return false;
        }
        let record = JobRecord::queued(job_id);
        match self.policy.insertion_order {
            InsertionOrder::Append => self.jobs.push(record),
            InsertionOrder::Prepend => self.jobs.insert(0, record),
        }
        self.mark_dirty();
        true
    }

    /// Starts a refresh pass and returns its targets, or `None` when a pass is
    /// already running or nothing needs polling.
    pub(crate) fn begin_refresh(&mut self) -> Option<Vec<JobId>> {
        if self.refresh_in_flight {
            return None;
        }
        let targets = self.refresh_targets();
        if targets.is_empty() {
            return None;
        }
        self.refresh_in_flight = true;
        Some(targets)
    }

    pub(crate) fn apply_reports(&mut self, reports: Vec<StatusReport>) {
        for report in reports {
            if let StatusReport::Updated {
                job_id,
                status,
                result,
            } = report
            {
                if let Some(job) = self.jobs.iter_mut().find(|job| job.job_id == job_id) {
                    job.status = status;
                    job.result = result;
                }
            }
        }
        self.refresh_in_flight = false;
        self.mark_dirty();
    }

    /// Non-terminal jobs, capped to the most recently submitted, in list order.
    fn refresh_targets(&self) -> Vec<JobId> {
        let pending: Vec<&JobRecord> = self
            .jobs
            .iter()
            .filter(|job| !self.policy.is_terminal(&job.status))
            .collect();
        let limit = self
            .policy
            .refresh_limit
            .map_or(pending.len(), |limit| limit.min(pending.len()));
        let recent = match self.policy.insertion_order {
            InsertionOrder::Prepend => &pending[..limit],
            InsertionOrder::Append => &pending[pending.len() - limit..],
        };
        recent.iter().map(|job| job.job_id.clone()).collect()
    }
}

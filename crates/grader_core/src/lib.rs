//! Grader core: pure job-panel state machine and view-model helpers.
mod effect;
mod form;
mod msg;
mod policy;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use form::{parse_rubric, GradeForm, GradeRequest, RubricField, RubricPayload};
pub use msg::{Msg, StatusReport, SubmitOutcome};
pub use policy::{
    FormVariant, InsertionOrder, PanelPolicy, DEFAULT_TERMINAL_STATUSES, INLINE_REFRESH_LIMIT,
};
pub use state::{JobId, JobRecord, Notice, PanelState, QUEUED_STATUS};
pub use update::update;
pub use view_model::{JobRowView, PanelViewModel};

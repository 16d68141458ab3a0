//! Grader engine: remote calls to the grading service and effect execution.
mod client;
mod engine;
mod timer;
mod types;

pub use client::{ClientSettings, GradingClient, ReqwestGradingClient};
pub use engine::{poll_sequentially, EngineEvents, EngineHandle};
pub use timer::RefreshTimer;
pub use types::{ClientError, EngineEvent, FailureKind, StatusReply, SubmitReply};

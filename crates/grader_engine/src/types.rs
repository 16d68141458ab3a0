use std::fmt;

use grader_core::JobId;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Decoded body of `POST /grade`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SubmitReply {
    /// The service sends either a string or a number; numbers keep their decimal text.
    #[serde(default, deserialize_with = "deserialize_job_id")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Decoded body of `GET /grade_status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(default)]
    pub result: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SubmitFinished(Result<SubmitReply, ClientError>),
    /// One entry per polled job, in polling order.
    RefreshFinished(Vec<(JobId, Result<StatusReply, ClientError>)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Encode,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Encode => write!(f, "request encoding failed"),
            FailureKind::Decode => write!(f, "response decoding failed"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireJobId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_job_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<WireJobId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        WireJobId::Text(text) => text,
        WireJobId::Number(number) => number.to_string(),
    }))
}

use std::time::Duration;

use grader_core::{GradeRequest, JobId};
use grader_logging::grader_debug;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::{ClientError, FailureKind, StatusReply, SubmitReply};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the grading service, e.g. `http://127.0.0.1:5535`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` lets a hung call wait forever.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5535".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

#[async_trait::async_trait]
pub trait GradingClient: Send + Sync {
    /// `POST /grade`.
    async fn submit(&self, request: &GradeRequest) -> Result<SubmitReply, ClientError>;

    /// `GET /grade_status/{job_id}`.
    async fn status(&self, job_id: &JobId) -> Result<StatusReply, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGradingClient {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestGradingClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    /// Appends path segments to the base url, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::new(FailureKind::InvalidUrl, "base url cannot have a path")
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl GradingClient for ReqwestGradingClient {
    async fn submit(&self, request: &GradeRequest) -> Result<SubmitReply, ClientError> {
        let url = self.endpoint(&["grade"])?;
        let body = serde_json::to_vec(request)
            .map_err(|err| ClientError::new(FailureKind::Encode, err.to_string()))?;
        grader_debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // Rejections arrive as `{"error": ...}` with a 4xx status, so the body
        // is decoded before the status is considered.
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        match serde_json::from_slice::<SubmitReply>(&bytes) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )),
            Err(err) => Err(ClientError::new(FailureKind::Decode, err.to_string())),
        }
    }

    async fn status(&self, job_id: &JobId) -> Result<StatusReply, ClientError> {
        let url = self.endpoint(&["grade_status", job_id.as_str()])?;
        grader_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}

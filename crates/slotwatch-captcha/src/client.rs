//! Client for a 2Captcha-compatible solving service.

use crate::error::{CaptchaError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Default service endpoint.
pub const DEFAULT_API_BASE: &str = "http://2captcha.com";

/// Per-request timeout against the service.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// One poll of the service for a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The solution token is ready.
    Ready(String),
    /// The service is still working on the challenge.
    Pending,
}

/// External solving service: submit a challenge, poll for the token.
#[async_trait::async_trait]
pub trait SolverService: Send + Sync {
    /// Submit a challenge; returns the service's opaque task id.
    async fn submit(&self, site_key: &str, page_url: &str) -> Result<String>;

    /// Poll a previously submitted task.
    async fn poll(&self, task_id: &str) -> Result<PollOutcome>;
}

/// JSON envelope shared by the service's submit and poll endpoints.
///
/// `status == 1` means `request` carries the payload (task id or token);
/// otherwise `request` is a status or error code.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: i32,
    request: String,
}

const NOT_READY: &str = "CAPCHA_NOT_READY";

/// reqwest-backed client for the 2Captcha HTTP API.
pub struct TwoCaptchaClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl TwoCaptchaClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_api_base(api_key, DEFAULT_API_BASE)
    }

    /// Point the client at a different endpoint (tests, compatible services).
    pub fn with_api_base(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SolverService for TwoCaptchaClient {
    async fn submit(&self, site_key: &str, page_url: &str) -> Result<String> {
        let response: ApiResponse = self
            .http
            .post(format!("{}/in.php", self.api_base))
            .form(&[
                ("key", self.api_key.as_str()),
                ("method", "userrecaptcha"),
                ("googlekey", site_key),
                ("pageurl", page_url),
                ("json", "1"),
            ])
            .timeout(API_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        if response.status == 1 {
            Ok(response.request)
        } else {
            Err(CaptchaError::Service(response.request))
        }
    }

    async fn poll(&self, task_id: &str) -> Result<PollOutcome> {
        let response: ApiResponse = self
            .http
            .get(format!("{}/res.php", self.api_base))
            .query(&[
                ("key", self.api_key.as_str()),
                ("action", "get"),
                ("id", task_id),
                ("json", "1"),
            ])
            .timeout(API_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        if response.status == 1 {
            Ok(PollOutcome::Ready(response.request))
        } else if response.request == NOT_READY {
            Ok(PollOutcome::Pending)
        } else {
            Err(CaptchaError::Service(response.request))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let client = TwoCaptchaClient::with_api_base("k", "http://solver.test/");
        assert_eq!(client.api_base, "http://solver.test");
    }

    #[test]
    fn test_envelope_parsing() {
        let ok: ApiResponse = serde_json::from_str(r#"{"status":1,"request":"12345"}"#)
            .expect("parse ok envelope");
        assert_eq!(ok.status, 1);
        assert_eq!(ok.request, "12345");

        let pending: ApiResponse =
            serde_json::from_str(r#"{"status":0,"request":"CAPCHA_NOT_READY"}"#)
                .expect("parse pending envelope");
        assert_eq!(pending.status, 0);
        assert_eq!(pending.request, NOT_READY);
    }
}

//! Drives one challenge solve against a loaded login page.

use crate::client::{PollOutcome, SolverService};
use slotwatch_browser::BrowserActions;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

/// Marker element carrying the widget's sitekey.
const SITE_KEY_SELECTOR: &str = "[data-sitekey]";
const SITE_KEY_ATTRIBUTE: &str = "data-sitekey";

/// Outcome of one challenge solve attempt.
///
/// Every branch is terminal; the solver never retries internally. Retrying
/// the whole challenge only happens implicitly on the next poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// Token retrieved and injected.
    Success,
    /// No challenge marker on the page; the service was never contacted.
    NoChallengeFound,
    /// The service produced no token within the attempt budget.
    SolveFailed,
    /// Token retrieved but the page rejected the injection script.
    InjectionFailed,
}

impl ChallengeOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ChallengeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "SUCCESS",
            Self::NoChallengeFound => "NO_CHALLENGE_FOUND",
            Self::SolveFailed => "SOLVE_FAILED",
            Self::InjectionFailed => "INJECTION_FAILED",
        };
        write!(f, "{label}")
    }
}

/// Solves the login page's visual challenge through an external service.
pub struct ChallengeSolver<S> {
    service: S,
    poll_interval: Duration,
    max_attempts: u32,
}

impl<S: SolverService> ChallengeSolver<S> {
    pub fn new(service: S, poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            service,
            poll_interval,
            max_attempts,
        }
    }

    /// Detect, submit, poll, and inject. Logs each phase transition and
    /// mutates nothing beyond the page under test.
    pub async fn solve<P>(&self, page: &P, page_url: &str) -> ChallengeOutcome
    where
        P: BrowserActions + Sync,
    {
        let site_key = match page.attribute(SITE_KEY_SELECTOR, SITE_KEY_ATTRIBUTE).await {
            Ok(Some(key)) if !key.is_empty() => key,
            Ok(_) => {
                error!("no challenge sitekey found on page");
                return ChallengeOutcome::NoChallengeFound;
            }
            Err(e) => {
                error!("sitekey lookup failed: {}", e);
                return ChallengeOutcome::NoChallengeFound;
            }
        };

        let prefix: String = site_key.chars().take(8).collect();
        info!("challenge sitekey found (sitekey={}…)", prefix);

        let task_id = match self.service.submit(&site_key, page_url).await {
            Ok(id) => id,
            Err(e) => {
                error!("solve request failed: {}", e);
                return ChallengeOutcome::SolveFailed;
            }
        };
        info!("solve request accepted (task={}), polling for token", task_id);

        let mut token = None;
        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;
            match self.service.poll(&task_id).await {
                Ok(PollOutcome::Ready(t)) => {
                    token = Some(t);
                    break;
                }
                Ok(PollOutcome::Pending) => {
                    info!("waiting for token ({}/{})", attempt, self.max_attempts);
                }
                Err(e) => {
                    warn!("token poll failed ({}/{}): {}", attempt, self.max_attempts, e);
                }
            }
        }

        let Some(token) = token else {
            error!("no token after {} attempts", self.max_attempts);
            return ChallengeOutcome::SolveFailed;
        };

        info!("token received, injecting into response field");
        match page.execute_script(&inject_script(&token)).await {
            Ok(()) => ChallengeOutcome::Success,
            Err(e) => {
                error!("token injection failed: {}", e);
                ChallengeOutcome::InjectionFailed
            }
        }
    }
}

/// Script writing the token into the widget's response field. Sets
/// `innerText` only; the portal reads the field on submit, no callback
/// needs firing.
fn inject_script(token: &str) -> String {
    let token = serde_json::to_string(token).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "document.querySelector('[name=\"g-recaptcha-response\"]').innerText = {token};"
    )
}

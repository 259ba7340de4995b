use slotwatch_browser::BrowserError;
use slotwatch_captcha::ChallengeOutcome;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Browser-level failure: navigation, missing selector, wait timeout.
    /// Recoverable; the loop retries on the next cycle.
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// The login challenge did not end in success. Needs operator
    /// attention (wrong service key, exhausted balance, page redesign),
    /// so the loop must not retry it.
    #[error("challenge verification failed: {0}")]
    Challenge(ChallengeOutcome),
}

impl SessionError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Challenge(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_is_fatal() {
        let err = SessionError::Challenge(ChallengeOutcome::SolveFailed);
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "challenge verification failed: SOLVE_FAILED"
        );
    }

    #[test]
    fn test_browser_error_is_recoverable() {
        let err = SessionError::Browser(BrowserError::Timeout("'#login' after 30000ms".into()));
        assert!(!err.is_fatal());
    }
}

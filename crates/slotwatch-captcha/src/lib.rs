//! Visual-challenge solving for the portal login.
//!
//! The login modal embeds a reCAPTCHA v2 widget. This crate submits the
//! widget's sitekey to an external 2Captcha-compatible solving service,
//! polls for the solution token, and injects it into the page's response
//! field. The solver reports an explicit [`ChallengeOutcome`] instead of
//! raising; the caller decides how severe each outcome is.

pub mod client;
pub mod error;
pub mod solver;

pub use client::{PollOutcome, SolverService, TwoCaptchaClient};
pub use error::{CaptchaError, Result};
pub use solver::{ChallengeOutcome, ChallengeSolver};

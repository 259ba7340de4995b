//! Shared domain types for a single watch cycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Portal login credentials plus the course the account is watching.
///
/// Built once from config at startup and owned by the session for the
/// process lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Portal account user ID
    pub user_id: String,
    /// Portal account password
    pub password: String,
    /// Course/group dropdown value to select on the booking page
    pub course_value: String,
}

impl Credentials {
    /// Create credentials from their parts.
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        course_value: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
            course_value: course_value.into(),
        }
    }
}

// Debug output must not carry the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .field("course_value", &self.course_value)
            .finish()
    }
}

/// Availability state of one time window on the booking page.
///
/// The portal shows up to three windows (M1..M3), each covering one
/// calendar month starting from the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStatus {
    /// Window label as shown on the portal ("M1".."M3")
    pub label: String,
    /// Raw text of the window's session indicator
    pub raw_text: String,
    /// Calendar year the window falls in
    pub year: i32,
    /// Calendar month the window falls in (1-12)
    pub month: u32,
    /// Whether the indicator text reports available sessions
    pub available: bool,
}

impl WindowStatus {
    /// Abbreviated month name for message composition ("Jan", "Feb", ...).
    pub fn month_abbrev(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b").to_string())
            .unwrap_or_default()
    }
}

/// Outcome of one poll cycle over the booking page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleResult {
    /// The portal showed its fully-booked indicator
    pub fully_booked: bool,
    /// Per-window availability, in portal order
    pub windows: Vec<WindowStatus>,
    /// Error message if the scan failed partway
    pub error: Option<String>,
}

impl CycleResult {
    /// Result for a page showing the fully-booked indicator.
    pub fn fully_booked() -> Self {
        Self {
            fully_booked: true,
            windows: Vec::new(),
            error: None,
        }
    }

    /// Result carrying per-window statuses.
    pub fn with_windows(windows: Vec<WindowStatus>) -> Self {
        Self {
            fully_booked: false,
            windows,
            error: None,
        }
    }

    /// Result for a scan that failed partway.
    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            fully_booked: false,
            windows: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Windows whose indicator reported availability.
    pub fn available_windows(&self) -> impl Iterator<Item = &WindowStatus> {
        self.windows.iter().filter(|w| w.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("S1234567A", "hunter2", "3A");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("S1234567A"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_month_abbrev() {
        let status = WindowStatus {
            label: "M2".to_string(),
            raw_text: "3 sessions available".to_string(),
            year: 2026,
            month: 1,
            available: true,
        };
        assert_eq!(status.month_abbrev(), "Jan");
    }

    #[test]
    fn test_fully_booked_result() {
        let result = CycleResult::fully_booked();
        assert!(result.fully_booked);
        assert!(result.windows.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_available_windows_filter() {
        let result = CycleResult::with_windows(vec![
            WindowStatus {
                label: "M1".to_string(),
                raw_text: "Fully booked".to_string(),
                year: 2026,
                month: 8,
                available: false,
            },
            WindowStatus {
                label: "M2".to_string(),
                raw_text: "2 available".to_string(),
                year: 2026,
                month: 9,
                available: true,
            },
        ]);

        let available: Vec<_> = result.available_windows().collect();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].label, "M2");
    }

    #[test]
    fn test_errored_result() {
        let result = CycleResult::errored("selector vanished");
        assert_eq!(result.error.as_deref(), Some("selector vanished"));
        assert!(!result.fully_booked);
    }
}

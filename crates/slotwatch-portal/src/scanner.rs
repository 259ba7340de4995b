//! Availability scanning on the loaded booking page.

use crate::months::resolve_window_month;
use chrono::{Datelike, Local};
use slotwatch_browser::{BrowserActions, BrowserError};
use slotwatch_core::{CycleResult, WindowStatus};
use slotwatch_notify::Notify;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const COURSE_SELECT: &str = "#ctl00_ContentPlaceHolder1_ddlCourse";
const FULLY_BOOKED_LABEL: &str = "#ctl00_ContentPlaceHolder1_lblFullBookMsg";
const WINDOW_COUNT: u32 = 3;

/// Interval between polls while waiting for a window to turn available.
const SIGNAL_POLL_INTERVAL: Duration = Duration::from_millis(500);

fn window_selector(ordinal: u32) -> String {
    format!("#ctl00_ContentPlaceHolder1_lblM{ordinal}SesNo")
}

/// Classifies per-window availability on the booking page.
pub struct AvailabilityScanner {
    course_value: String,
    element_timeout: Duration,
    select_settle: Duration,
    notifier: Arc<dyn Notify>,
}

impl AvailabilityScanner {
    pub fn new(
        course_value: impl Into<String>,
        element_timeout: Duration,
        select_settle: Duration,
        notifier: Arc<dyn Notify>,
    ) -> Self {
        Self {
            course_value: course_value.into(),
            element_timeout,
            select_settle,
            notifier,
        }
    }

    /// Scan the booking page. Never propagates: scan failures are logged,
    /// reported through the notifier, and folded into the result.
    pub async fn scan<P>(&self, page: &P) -> CycleResult
    where
        P: BrowserActions + Sync,
    {
        match self.scan_inner(page).await {
            Ok(result) => result,
            Err(e) => {
                error!("error checking slot availability: {}", e);
                self.notifier
                    .notify(&format!(
                        "Bot hit an issue while checking slot availability - {e}"
                    ))
                    .await;
                CycleResult::errored(e.to_string())
            }
        }
    }

    async fn scan_inner<P>(&self, page: &P) -> Result<CycleResult, BrowserError>
    where
        P: BrowserActions + Sync,
    {
        page.wait_for_selector(COURSE_SELECT, self.element_timeout)
            .await?;
        info!("course dropdown loaded");

        page.select_value(COURSE_SELECT, &self.course_value).await?;
        info!("course selected: {}", self.course_value);
        tokio::time::sleep(self.select_settle).await;

        if page.element_exists(FULLY_BOOKED_LABEL).await? {
            info!("no slots available - fully booked");
            return Ok(CycleResult::fully_booked());
        }

        info!("slots available - checking month availability");
        self.notifier
            .notify("Slots available! Checking month availability")
            .await;

        if !self.wait_for_window_signal(page).await? {
            // Neither the fully-booked banner nor any window indicator
            // rendered; nothing to report this cycle.
            return Ok(CycleResult::with_windows(Vec::new()));
        }

        let today = Local::now().date_naive();
        let mut windows = Vec::new();
        for ordinal in 1..=WINDOW_COUNT {
            let selector = window_selector(ordinal);
            if !page.element_exists(&selector).await? {
                continue;
            }
            let raw_text = page.element_text(&selector).await?;
            let (year, month) = resolve_window_month(today.year(), today.month(), ordinal);
            let available = raw_text.to_lowercase().contains("available");
            windows.push(WindowStatus {
                label: format!("M{ordinal}"),
                raw_text,
                year,
                month,
                available,
            });
        }

        Ok(CycleResult::with_windows(windows))
    }

    /// Block until some window indicator reports availability, bounded by
    /// the element timeout. `Ok(false)` means the page shows no window
    /// indicators at all.
    async fn wait_for_window_signal<P>(&self, page: &P) -> Result<bool, BrowserError>
    where
        P: BrowserActions + Sync,
    {
        let start = tokio::time::Instant::now();
        loop {
            let mut any_present = false;
            for ordinal in 1..=WINDOW_COUNT {
                let selector = window_selector(ordinal);
                if page.element_exists(&selector).await? {
                    any_present = true;
                    let text = page.element_text(&selector).await?;
                    if text.to_lowercase().contains("available") {
                        return Ok(true);
                    }
                }
            }

            if !any_present {
                return Ok(false);
            }
            if start.elapsed() >= self.element_timeout {
                return Err(BrowserError::Timeout(format!(
                    "no session window turned available within {}ms",
                    self.element_timeout.as_millis()
                )));
            }
            tokio::time::sleep(SIGNAL_POLL_INTERVAL).await;
        }
    }
}

//! One watch cycle: fresh browser, login, challenge, scan, teardown.

use crate::error::SessionError;
use crate::scanner::AvailabilityScanner;
use slotwatch_browser::{BrowserActions, BrowserLauncher, PortalBrowser};
use slotwatch_captcha::{ChallengeSolver, SolverService};
use slotwatch_core::{Credentials, CycleResult, PortalConfig};
use std::time::Duration;
use tracing::{error, info};

const USERNAME_FIELD: &str = r#"[name="userId_4"]"#;
const PASSWORD_FIELD: &str = r#"[name="password_4"]"#;
const LOGIN_SUBMIT: &str = ".btn-login-submit";

/// Drives a browser through login and onto the booking page.
///
/// Owns the credentials for the process lifetime. Every cycle gets a
/// freshly launched browser; nothing carries over.
pub struct PortalSession<L, S>
where
    L: BrowserLauncher,
    S: SolverService,
{
    credentials: Credentials,
    login_url: String,
    booking_url: String,
    modal_wait: Duration,
    login_settle: Duration,
    element_timeout: Duration,
    launcher: L,
    solver: ChallengeSolver<S>,
    scanner: AvailabilityScanner,
}

impl<L, S> PortalSession<L, S>
where
    L: BrowserLauncher,
    S: SolverService,
{
    pub fn new(
        config: &PortalConfig,
        element_timeout: Duration,
        launcher: L,
        solver: ChallengeSolver<S>,
        scanner: AvailabilityScanner,
    ) -> Self {
        Self {
            credentials: Credentials::new(
                config.user_id.clone(),
                config.password.clone(),
                config.course_value.clone(),
            ),
            login_url: config.login_url.clone(),
            booking_url: config.booking_url.clone(),
            modal_wait: Duration::from_secs(config.modal_wait_secs),
            login_settle: Duration::from_secs(config.login_settle_secs),
            element_timeout,
            launcher,
            solver,
            scanner,
        }
    }

    /// Run one full cycle. The browser is torn down on every exit path,
    /// exactly once, before the result is returned.
    pub async fn run_cycle(&self) -> Result<CycleResult, SessionError> {
        let browser = self.launcher.launch().await?;

        let outcome = match browser.new_page().await {
            Ok(page) => self.drive(&page).await,
            Err(e) => Err(e.into()),
        };

        browser.shutdown().await;
        outcome
    }

    async fn drive<P>(&self, page: &P) -> Result<CycleResult, SessionError>
    where
        P: BrowserActions + Sync,
    {
        info!("navigating to portal login: {}", self.login_url);
        page.navigate(&self.login_url).await?;
        tokio::time::sleep(self.modal_wait).await;

        info!("waiting for login modal");
        page.wait_for_selector(USERNAME_FIELD, self.element_timeout)
            .await?;
        page.fill_field(USERNAME_FIELD, &self.credentials.user_id)
            .await?;
        page.wait_for_selector(PASSWORD_FIELD, self.element_timeout)
            .await?;
        page.fill_field(PASSWORD_FIELD, &self.credentials.password)
            .await?;

        let outcome = self.solver.solve(page, &self.login_url).await;
        if !outcome.is_success() {
            error!("challenge failed - {}", outcome);
            return Err(SessionError::Challenge(outcome));
        }
        info!("challenge solved - logging in");

        page.click(LOGIN_SUBMIT).await?;
        tokio::time::sleep(self.login_settle).await;

        info!("checking for available practical slots");
        page.navigate(&self.booking_url).await?;
        Ok(self.scanner.scan(page).await)
    }
}

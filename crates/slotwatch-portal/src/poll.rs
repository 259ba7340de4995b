//! The indefinite watch loop with jittered inter-cycle delay.

use crate::error::SessionError;
use crate::session::PortalSession;
use chrono::Local;
use rand::Rng;
use slotwatch_browser::BrowserLauncher;
use slotwatch_captcha::SolverService;
use slotwatch_core::{CycleResult, PollConfig};
use slotwatch_notify::Notify;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Uniformly random delay in `[min, max]`, drawn fresh per call.
///
/// The jitter keeps cycle traffic from forming a detectable period.
pub fn random_delay(min: Duration, max: Duration) -> Duration {
    if min >= max {
        return min;
    }
    rand::thread_rng().gen_range(min..=max)
}

/// Runs watch cycles until cancelled.
pub struct PollLoop<L, S>
where
    L: BrowserLauncher,
    S: SolverService,
{
    session: PortalSession<L, S>,
    notifier: Arc<dyn Notify>,
    delay_min: Duration,
    delay_max: Duration,
    shutdown: CancellationToken,
}

impl<L, S> PollLoop<L, S>
where
    L: BrowserLauncher,
    S: SolverService,
{
    pub fn new(
        session: PortalSession<L, S>,
        notifier: Arc<dyn Notify>,
        config: &PollConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            session,
            notifier,
            delay_min: Duration::from_secs(config.min_delay_secs),
            delay_max: Duration::from_secs(config.max_delay_secs),
            shutdown,
        }
    }

    /// Cycle until the shutdown token fires or a fatal error surfaces.
    ///
    /// Cancellation is cooperative: it is observed between cycles and
    /// during the inter-cycle sleep. A cycle already in flight runs to its
    /// own timeout budget; per-cycle browser teardown covers cleanup.
    pub async fn run(&self) -> Result<(), SessionError> {
        loop {
            if self.shutdown.is_cancelled() {
                info!("watcher stopped");
                return Ok(());
            }

            info!("new cycle starting");
            match self.session.run_cycle().await {
                Ok(result) => self.announce(&result).await,
                Err(e) if e.is_fatal() => {
                    error!("exiting: {}", e);
                    return Err(e);
                }
                Err(e) => error!("cycle failed: {}", e),
            }

            if self.shutdown.is_cancelled() {
                info!("watcher stopped");
                return Ok(());
            }

            let delay = random_delay(self.delay_min, self.delay_max);
            let next_run = Local::now() + chrono::Duration::seconds(delay.as_secs() as i64);
            info!(
                "sleeping for {} min {:02} s, next cycle at {}",
                delay.as_secs() / 60,
                delay.as_secs() % 60,
                next_run.format("%Y-%m-%d %H:%M:%S")
            );

            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("watcher stopped");
                    return Ok(());
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn announce(&self, result: &CycleResult) {
        for window in result.available_windows() {
            let message = format!(
                "Slots available in {} ({}) - {}",
                window.month_abbrev(),
                window.label,
                window.raw_text
            );
            info!("{}", message);
            self.notifier.notify(&message).await;
        }
    }
}

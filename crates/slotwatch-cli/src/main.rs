use anyhow::Context;
use clap::Parser;
use slotwatch_browser::{ChromiumLauncher, LaunchOptions};
use slotwatch_captcha::{ChallengeSolver, TwoCaptchaClient};
use slotwatch_core::AppConfig;
use slotwatch_notify::{Notify, TelegramNotifier};
use slotwatch_portal::{AvailabilityScanner, PollLoop, PortalSession};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Watch a booking portal for available training slots and alert on Telegram.
#[derive(Parser)]
#[command(name = "slotwatch", version, about)]
struct Cli {
    /// Path to the config file (defaults to the XDG config dir)
    #[arg(short, long, env = "SLOTWATCH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Console plus daily-rolling file output.
    std::fs::create_dir_all("logs").ok();
    let file_appender = tracing_appender::rolling::daily("logs", "slotwatch.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load().context("loading config")?,
    };
    config.apply_env();
    config.validate().context("validating config")?;

    if config.telegram.enabled {
        info!("telegram alerts enabled");
        if config.telegram.thread_id.is_some() {
            info!("alerts scoped to a chat thread");
        }
    } else {
        info!("telegram alerts disabled");
    }

    let notifier: Arc<dyn Notify> = Arc::new(TelegramNotifier::new(config.telegram.clone()));

    let solver = ChallengeSolver::new(
        TwoCaptchaClient::new(config.captcha.api_key.clone()),
        Duration::from_secs(config.captcha.poll_interval_secs),
        config.captcha.max_attempts,
    );

    let launcher = ChromiumLauncher::new(LaunchOptions {
        window_width: config.browser.window_width,
        window_height: config.browser.window_height,
        chrome_binary: config.browser.chrome_binary.clone(),
    });

    let element_timeout = Duration::from_secs(config.browser.element_timeout_secs);
    let scanner = AvailabilityScanner::new(
        config.portal.course_value.clone(),
        element_timeout,
        Duration::from_secs(config.portal.select_settle_secs),
        notifier.clone(),
    );

    let session = PortalSession::new(&config.portal, element_timeout, launcher, solver, scanner);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            signal_token.cancel();
        }
    });

    let poll = PollLoop::new(session, notifier, &config.poll, shutdown);
    poll.run().await?;
    Ok(())
}

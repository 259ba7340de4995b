use crate::actions::BrowserActions;
use crate::error::{BrowserError, Result};
use crate::page::PortalPage;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::stream::StreamExt;
use tokio::task::JoinHandle;

/// Launch options for the portal browser.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub window_width: u32,
    pub window_height: u32,
    /// Explicit Chrome/Chromium binary, autodetected when `None`.
    pub chrome_binary: Option<std::path::PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            window_width: 1600,
            window_height: 768,
            chrome_binary: None,
        }
    }
}

/// A browser acquired for one cycle: create pages, then tear down.
#[async_trait::async_trait]
pub trait PortalBrowser: Send + Sized {
    type Page: BrowserActions + Send + Sync;

    /// Open a fresh page.
    async fn new_page(&self) -> Result<Self::Page>;

    /// Tear the browser down. Consumes the instance so a cycle cannot
    /// touch it after teardown.
    async fn shutdown(self);
}

/// Acquires a fresh browser for each cycle.
#[async_trait::async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Browser: PortalBrowser;

    async fn launch(&self) -> Result<Self::Browser>;
}

/// Browser automation engine over a real Chromium instance.
pub struct BrowserEngine {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserEngine {
    /// Launch a Chromium instance configured for the portal: sandboxing
    /// disabled, no proxy, fixed window size, headful. The portal's login
    /// flow rejects headless fingerprints.
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--no-proxy-server")
            .window_size(options.window_width, options.window_height)
            .with_head();
        if let Some(binary) = &options.chrome_binary {
            builder = builder.chrome_executable(binary);
        }
        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }
}

impl Drop for BrowserEngine {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

#[async_trait::async_trait]
impl PortalBrowser for BrowserEngine {
    type Page = PortalPage;

    async fn new_page(&self) -> Result<PortalPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(PortalPage::new(page))
    }

    async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("browser close failed: {}", e);
        }
        let _ = self.browser.wait().await;
    }
}

/// Production launcher: one fresh Chromium per cycle.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    options: LaunchOptions,
}

impl ChromiumLauncher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }
}

#[async_trait::async_trait]
impl BrowserLauncher for ChromiumLauncher {
    type Browser = BrowserEngine;

    async fn launch(&self) -> Result<BrowserEngine> {
        BrowserEngine::launch(&self.options).await
    }
}

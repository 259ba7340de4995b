use crate::actions::BrowserActions;
use crate::error::{BrowserError, Result};
use chromiumoxide::Page;
use std::time::Duration;

/// A portal page driven over the Chrome DevTools Protocol.
pub struct PortalPage {
    page: Page,
}

impl PortalPage {
    pub(crate) fn new(page: Page) -> Self {
        Self { page }
    }
}

/// Quote a Rust string as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script that sets a `<select>` value and fires the change event the
/// portal's postback machinery listens for.
fn select_script(selector: &str, value: &str) -> String {
    format!(
        "(() => {{ \
            const el = document.querySelector({sel}); \
            if (!el) throw new Error('no such select: ' + {sel}); \
            el.value = {val}; \
            el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
        }})()",
        sel = js_string(selector),
        val = js_string(value),
    )
}

#[async_trait::async_trait]
impl BrowserActions for PortalPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        element
            .type_str(value)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let start = std::time::Instant::now();
        let mut poll_interval = Duration::from_millis(100);
        let max_interval = Duration::from_secs(1);

        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }

            if start.elapsed() >= timeout {
                return Err(BrowserError::Timeout(format!(
                    "'{selector}' after {}ms",
                    timeout.as_millis()
                )));
            }

            tokio::time::sleep(poll_interval).await;
            poll_interval = (poll_interval * 2).min(max_interval);
        }
    }

    async fn element_exists(&self, selector: &str) -> Result<bool> {
        match self.page.find_elements(selector).await {
            Ok(elements) => Ok(!elements.is_empty()),
            Err(e) => {
                tracing::debug!("find_elements('{}') failed: {}", selector, e);
                Ok(false)
            }
        }
    }

    async fn element_text(&self, selector: &str) -> Result<String> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let Ok(element) = self.page.find_element(selector).await else {
            return Ok(None);
        };
        element
            .attribute(name)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    async fn select_value(&self, selector: &str, value: &str) -> Result<()> {
        self.execute_script(&select_script(selector, value)).await
    }

    async fn execute_script(&self, script: &str) -> Result<()> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;
        Ok(())
    }
}

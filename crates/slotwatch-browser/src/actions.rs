use crate::error::Result;
use std::time::Duration;

/// Browser actions for automation.
///
/// The session, solver, and scanner all drive the portal through this
/// trait, which keeps them testable against scripted fakes.
#[async_trait::async_trait]
pub trait BrowserActions {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Fill a form field by selector
    async fn fill_field(&self, selector: &str, value: &str) -> Result<()>;

    /// Click an element by selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Wait for a selector to appear, polling up to `timeout`
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Whether at least one element matches the selector right now
    async fn element_exists(&self, selector: &str) -> Result<bool>;

    /// Extract the rendered text of an element
    async fn element_text(&self, selector: &str) -> Result<String>;

    /// Read an attribute from the first matching element, `None` if the
    /// element or attribute is absent
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Set a `<select>` element's value and fire its change event
    async fn select_value(&self, selector: &str, value: &str) -> Result<()>;

    /// Run a script in the page
    async fn execute_script(&self, script: &str) -> Result<()>;
}

//! Fire-and-forget alerting for slot availability.
//!
//! Delivery is strictly best-effort: failures are logged and swallowed so a
//! broken notification channel can never take down a watch cycle.

pub mod telegram;

pub use telegram::TelegramNotifier;

/// A channel that accepts a text alert.
///
/// Object-safe so the scanner and poll loop can share one
/// `Arc<dyn Notify>`. Implementations must never raise and never retry.
#[async_trait::async_trait]
pub trait Notify: Send + Sync {
    /// Deliver a message, best-effort.
    async fn notify(&self, text: &str);
}

//! Browser automation surface for the booking portal.
//!
//! Provides headless-protocol browser control behind a small trait so the
//! session and scanner never touch the driver directly.

pub mod actions;
pub mod engine;
pub mod error;
pub mod page;

pub use actions::BrowserActions;
pub use engine::{BrowserEngine, BrowserLauncher, ChromiumLauncher, LaunchOptions, PortalBrowser};
pub use error::{BrowserError, Result};
pub use page::PortalPage;

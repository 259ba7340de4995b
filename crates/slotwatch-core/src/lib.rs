//! Slotwatch core - foundation crate for the slotwatch booking watcher.
//!
//! This crate provides the configuration model, shared domain types, and
//! configuration errors that all other slotwatch crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared domain types (`Credentials`, `WindowStatus`, `CycleResult`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, CaptchaConfig, PollConfig, PortalConfig, TelegramConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use types::{Credentials, CycleResult, WindowStatus};

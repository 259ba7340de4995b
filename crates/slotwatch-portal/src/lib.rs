//! The watch workflow: drive a fresh browser through portal login, scan the
//! booking page for per-month availability, and repeat on a jittered timer.

pub mod error;
pub mod months;
pub mod poll;
pub mod scanner;
pub mod session;

pub use error::SessionError;
pub use poll::{random_delay, PollLoop};
pub use scanner::AvailabilityScanner;
pub use session::PortalSession;

//! Auth feature covering bootstrap, login, registration, logout and the
//! password/email flows. Operations report their result as typed outcomes and
//! never return `Err` to the caller; failures that are deliberately silent
//! (bootstrap downgrade, best-effort logout) are visible in the outcome type.
//!
//! This module handles passwords and tokens and must never log them.

pub mod service;
pub mod state;
pub mod types;

pub use service::{AuthOutcome, AuthService, BootstrapOutcome, LogoutOutcome};
pub use state::{Session, SessionEvent, SessionStore};
pub use types::{LoginCredentials, RegisterRequest, User};

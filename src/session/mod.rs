//! Cookie based sessions.
//!
//! Flow Overview: a successful login calls [`SessionStore::create`], which
//! mints a [`SessionToken`] that is sent back in the `cctech_be` cookie built by
//! [`cookie::serialize`]. Protected routes run [`require_session`], which
//! parses the cookie, resolves the token in the store and attaches a
//! [`Principal`] to the request for the handlers behind it.
//!
//! Sessions live only in memory: they end on logout, on expiry, or when the
//! process exits.

pub mod cookie;
mod config;
mod error;
mod middleware;
mod store;
mod token;

pub use config::SessionConfig;
pub use error::{SessionError, SessionErrorKind};
pub use middleware::{authenticate, require_session, Principal};
pub use store::{Expiry, Session, SessionStore};
pub use token::{SessionToken, TOKEN_BYTES};

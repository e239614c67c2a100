//! # cctech
//!
//! A small task-list web service guarded by cookie sessions.
//!
//! Users log in with a form post. On success the server mints a random
//! 254 character hex token, remembers `token -> username` in an in-memory
//! [`session::SessionStore`], and hands the token back in the `cctech_be`
//! cookie. Every protected route runs through
//! [`session::require_session`], which resolves the cookie to a
//! [`session::Principal`] or answers `401` with a JSON error.
//!
//! ## Sessions
//!
//! Sessions expire after a configurable max-age (ten minutes by default, `0`
//! disables expiry). A timer task evicts each session at its deadline and
//! lookups double check the deadline, so an expired token is never accepted.
//! Sessions are process local and do not survive a restart.
//!
//! ## Tasks
//!
//! Users and tasks live in `PostgreSQL` (see `sql/schema.sql`). Any logged in
//! user can read every task; only the author may update or delete one.

pub mod api;
pub mod cli;
pub mod session;
pub mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

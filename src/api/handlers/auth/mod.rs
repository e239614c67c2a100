//! Form login and logout.
//!
//! `POST /login` verifies the salted password record from the user store and
//! hands the browser a session cookie; `POST /logout` sits behind the session
//! middleware and tears the session down again.

pub mod login;
pub mod logout;
pub mod password;

pub use login::{login, LoginForm};
pub use logout::logout;

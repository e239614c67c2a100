use std::time::Duration;

use super::cookie::SESSION_COOKIE_NAME;

const DEFAULT_SESSION_MAX_AGE_MS: u64 = 600_000;

/// Session cookie settings shared by the login handler and the middleware.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    cookie_name: String,
    max_age: Option<Duration>,
    cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            max_age: Some(Duration::from_millis(DEFAULT_SESSION_MAX_AGE_MS)),
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session lifetime in milliseconds; `0` disables expiry.
    #[must_use]
    pub fn with_max_age_ms(mut self, max_age_ms: u64) -> Self {
        self.max_age = (max_age_ms > 0).then(|| Duration::from_millis(max_age_ms));
        self
    }

    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    #[must_use]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

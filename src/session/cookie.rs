//! Session cookie parsing and `Set-Cookie` directives.

use std::time::Duration;

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE_NAME: &str = "cctech_be";

/// Find the value of the cookie called `name` in a raw `Cookie` header.
///
/// Pairs are separated by `;` with optional whitespace. Pairs without `=` are
/// skipped, and an empty value counts as absent.
#[must_use]
pub fn parse<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| unquote(value.trim()))
        .filter(|value| !value.is_empty())
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

/// Build a `Set-Cookie` value carrying `token`.
///
/// `max_age` is rounded up to whole seconds; `None` or zero yields a browser
/// session cookie without `Max-Age`.
#[must_use]
pub fn serialize(name: &str, token: &str, max_age: Option<Duration>, secure: bool) -> String {
    let mut cookie = format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(max_age) = max_age.filter(|age| !age.is_zero()) {
        cookie.push_str(&format!("; Max-Age={}", max_age.as_millis().div_ceil(1000)));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a `Set-Cookie` value that makes the browser drop the cookie.
#[must_use]
pub fn clear(name: &str, secure: bool) -> String {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

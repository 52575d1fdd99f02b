//! Plaintext cookie transport.
//!
//! The `username` cookie is the whole session: whatever it names is the
//! caller. `registerSuccess` is a one-shot flag for the confirmation page.
//! Neither cookie is signed or encrypted.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;

pub const USERNAME: &str = "username";
pub const REGISTER_SUCCESS: &str = "registerSuccess";

/// Ten hours.
pub const SESSION_MAX_AGE_SECS: i64 = 10 * 60 * 60;
pub const REGISTER_SUCCESS_MAX_AGE_SECS: i64 = 60;

/// Value of the named cookie, quotes stripped; empty values count as absent.
pub fn read(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|value| !value.is_empty())
}

/// The username the caller claims, if any.
pub fn session(jar: &CookieJar) -> Option<String> {
    read(jar, USERNAME)
}

/// A site-wide cookie living `max_age_secs` seconds.
pub fn build(name: &'static str, value: impl Into<String>, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name, value.into()))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Matches a cookie set by [`build`] so `CookieJar::remove` can expire it.
pub fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

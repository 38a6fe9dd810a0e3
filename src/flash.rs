//! One-line status messages shown on the next rendered page.
//!
//! Messages produced while rendering a page are passed straight to the
//! template. Messages that must survive a redirect ride along in a cookie that
//! the next page consumes.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const COOKIE_NAME: &str = "venue_book_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: Category,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: Category::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: Category::Error,
            message: message.into(),
        }
    }
}

/// Removes pending messages from the jar and returns them.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    let Some(cookie) = jar.get(COOKIE_NAME) else {
        return (jar, Vec::new());
    };
    let messages = serde_json::from_str(cookie.value()).unwrap_or_else(|err| {
        warn!(error = %err, "discarding unreadable flash cookie");
        Vec::new()
    });
    (jar.remove(Cookie::build(COOKIE_NAME).path("/")), messages)
}

/// Queues a message for the next page.
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    let mut pending: Vec<Flash> = jar
        .get(COOKIE_NAME)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default();
    pending.push(flash);

    let payload = match serde_json::to_string(&pending) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "could not encode flash messages");
            return jar;
        }
    };
    jar.add(
        Cookie::build((COOKIE_NAME, payload))
            .path("/")
            .http_only(true),
    )
}

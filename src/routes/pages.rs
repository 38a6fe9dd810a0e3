use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use minijinja::context;

use crate::error::{Error, Result};
use crate::flash::{self, Flash};
use crate::templates;

pub async fn index(jar: CookieJar) -> Result<(CookieJar, Html<String>)> {
    let (jar, messages) = flash::take(jar);
    Ok((jar, home(messages)?))
}

pub async fn not_found() -> Response {
    Error::NotFound.into_response()
}

/// The landing page, also rendered after every create.
pub(super) fn home(messages: Vec<Flash>) -> Result<Html<String>> {
    templates::render_page("pages/home.html", context! { messages => messages })
}

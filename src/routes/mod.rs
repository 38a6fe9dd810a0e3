mod artists;
mod pages;
mod shows;
mod venues;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::error::Error;
use crate::flash::Flash;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/venues", get(venues::list))
        .route("/venues/search", post(venues::search))
        .route(
            "/venues/create",
            get(venues::create_form).post(venues::create_submission),
        )
        .route("/venues/:venue_id", get(venues::show).delete(venues::delete))
        .route("/venues/:venue_id/delete", post(venues::delete))
        .route(
            "/venues/:venue_id/edit",
            get(venues::edit_form).post(venues::edit_submission),
        )
        .route("/artists", get(artists::list))
        .route("/artists/search", post(artists::search))
        .route(
            "/artists/create",
            get(artists::create_form).post(artists::create_submission),
        )
        .route("/artists/:artist_id", get(artists::show))
        .route(
            "/artists/:artist_id/edit",
            get(artists::edit_form).post(artists::edit_submission),
        )
        .route("/shows", get(shows::list))
        .route(
            "/shows/create",
            get(shows::create_form).post(shows::create_submission),
        )
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Integer primary key from the path. Anything else is a 404.
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::NotFound)?;
        raw.parse().map(RecordId).map_err(|_| Error::NotFound)
    }
}

/// Messages shown after a failed write: the headline, plus what was wrong
/// with the form when that was the cause.
fn failure_messages(err: &Error, headline: String) -> Vec<Flash> {
    let mut messages = vec![Flash::error(headline)];
    if let Error::Validation(problems) = err {
        messages.push(Flash::error(problems.clone()));
    }
    messages
}

use axum::{extract::State, response::Html};
use axum_extra::extract::{cookie::CookieJar, Form};
use minijinja::context;
use tracing::{error, info};

use super::{failure_messages, pages};
use crate::db::{Artists, Repository, Shows, Venues};
use crate::error::Result;
use crate::flash::{self, Flash};
use crate::forms::ShowForm;
use crate::state::AppState;
use crate::templates;

pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, messages) = flash::take(jar);
    let shows = state
        .store
        .call(|store| store.read(|conn| Shows::listings(conn)))
        .await?;
    let page = templates::render_page(
        "pages/shows.html",
        context! { messages => messages, shows => shows },
    )?;
    Ok((jar, page))
}

/// Offers every artist and venue as a choice.
pub async fn create_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, messages) = flash::take(jar);
    let (artists, venues) = state
        .store
        .call(|store| store.read(|conn| Ok((Artists::list(conn)?, Venues::list(conn)?))))
        .await?;
    let page = templates::render_page(
        "forms/new_show.html",
        context! {
            messages => messages,
            form => ShowForm::starting_now(),
            artists => artists,
            venues => venues,
        },
    )?;
    Ok((jar, page))
}

pub async fn create_submission(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, mut messages) = flash::take(jar);
    let outcome = match form.validate() {
        Ok(draft) => {
            state
                .store
                .call(move |store| store.transaction(|tx| Shows::create(tx, &draft)))
                .await
        }
        Err(err) => Err(err),
    };

    match outcome {
        Ok(show_id) => {
            info!(show_id, "show listed");
            messages.push(Flash::success("Show was successfully listed!"));
        }
        Err(err) => {
            error!(
                artist_id = %form.artist_id,
                venue_id = %form.venue_id,
                error = %err,
                "show could not be listed"
            );
            messages.extend(failure_messages(
                &err,
                "An error occurred. Show could not be listed.".to_string(),
            ));
        }
    }
    Ok((jar, pages::home(messages)?))
}

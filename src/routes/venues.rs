use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::{cookie::CookieJar, Form};
use minijinja::context;
use tracing::{error, info};

use super::{failure_messages, pages, RecordId};
use crate::db::{Repository, Venues};
use crate::error::{Error, Result};
use crate::flash::{self, Flash};
use crate::forms::{SearchForm, VenueForm, GENRES, STATES};
use crate::models::SearchResults;
use crate::state::AppState;
use crate::templates;
use crate::utils;

pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, messages) = flash::take(jar);
    let now = utils::now_local();
    let areas = state
        .store
        .call(move |store| store.read(|conn| Venues::grouped_by_area(conn, now)))
        .await?;
    let page = templates::render_page(
        "pages/venues.html",
        context! { messages => messages, areas => areas },
    )?;
    Ok((jar, page))
}

pub async fn search(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, messages) = flash::take(jar);
    let now = utils::now_local();
    let term = form.search_term.clone();
    let matches = state
        .store
        .call(move |store| store.read(|conn| Venues::search(conn, &term, now)))
        .await?;
    let page = templates::render_page(
        "pages/search_venues.html",
        context! {
            messages => messages,
            results => SearchResults::new(matches),
            search_term => form.search_term,
        },
    )?;
    Ok((jar, page))
}

pub async fn show(
    State(state): State<AppState>,
    jar: CookieJar,
    RecordId(venue_id): RecordId,
) -> Result<(CookieJar, Html<String>)> {
    let now = utils::now_local();
    let venue = state
        .store
        .call(move |store| store.read(|conn| Venues::detail(conn, venue_id, now)))
        .await?
        .ok_or(Error::NotFound)?;
    let (jar, messages) = flash::take(jar);
    let page = templates::render_page(
        "pages/show_venue.html",
        context! { messages => messages, venue => venue },
    )?;
    Ok((jar, page))
}

pub async fn create_form(jar: CookieJar) -> Result<(CookieJar, Html<String>)> {
    let (jar, messages) = flash::take(jar);
    let page = templates::render_page(
        "forms/new_venue.html",
        context! {
            messages => messages,
            form => VenueForm::default(),
            states => STATES.as_slice(),
            genres => GENRES.as_slice(),
        },
    )?;
    Ok((jar, page))
}

pub async fn create_submission(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, mut messages) = flash::take(jar);
    let name = form.name.trim().to_string();
    let outcome = match form.validate() {
        Ok(draft) => {
            state
                .store
                .call(move |store| store.transaction(|tx| Venues::create(tx, &draft)))
                .await
        }
        Err(err) => Err(err),
    };

    match outcome {
        Ok(venue_id) => {
            info!(venue_id, venue = %name, "venue listed");
            messages.push(Flash::success(format!("Venue {name} was successfully listed!")));
        }
        Err(err) => {
            error!(venue = %name, error = %err, "venue could not be listed");
            messages.extend(failure_messages(
                &err,
                format!("An error occurred. Venue {name} could not be listed."),
            ));
        }
    }
    Ok((jar, pages::home(messages)?))
}

pub async fn edit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    RecordId(venue_id): RecordId,
) -> Result<(CookieJar, Html<String>)> {
    let venue = state
        .store
        .call(move |store| store.read(|conn| Venues::get(conn, venue_id)))
        .await?
        .ok_or(Error::NotFound)?;
    let (jar, messages) = flash::take(jar);
    let page = templates::render_page(
        "forms/edit_venue.html",
        context! {
            messages => messages,
            form => VenueForm::from(&venue),
            venue => venue,
            states => STATES.as_slice(),
            genres => GENRES.as_slice(),
        },
    )?;
    Ok((jar, page))
}

pub async fn edit_submission(
    State(state): State<AppState>,
    jar: CookieJar,
    RecordId(venue_id): RecordId,
    Form(form): Form<VenueForm>,
) -> Result<(CookieJar, Redirect)> {
    let exists = state
        .store
        .call(move |store| store.read(|conn| Venues::get(conn, venue_id)))
        .await?
        .is_some();
    if !exists {
        return Err(Error::NotFound);
    }

    let name = form.name.trim().to_string();
    let outcome = match form.validate() {
        Ok(draft) => {
            state
                .store
                .call(move |store| store.transaction(|tx| Venues::update(tx, venue_id, &draft)))
                .await
        }
        Err(err) => Err(err),
    };

    let jar = match outcome {
        Ok(true) => {
            info!(venue_id, venue = %name, "venue updated");
            flash::push(jar, Flash::success(format!("Venue {name} was successfully updated!")))
        }
        Ok(false) => return Err(Error::NotFound),
        Err(err) => {
            error!(venue_id, error = %err, "venue could not be updated");
            failure_messages(
                &err,
                format!("An error occurred. Venue {name} could not be updated."),
            )
            .into_iter()
            .fold(jar, flash::push)
        }
    };
    Ok((jar, Redirect::to(&format!("/venues/{venue_id}"))))
}

/// Serves both `DELETE /venues/:id` and the form-friendly
/// `POST /venues/:id/delete`.
pub async fn delete(
    State(state): State<AppState>,
    jar: CookieJar,
    RecordId(venue_id): RecordId,
) -> Result<(CookieJar, Redirect)> {
    let name = state
        .store
        .call(move |store| store.read(|conn| Venues::get(conn, venue_id)))
        .await?
        .ok_or(Error::NotFound)?
        .name;

    let outcome = state
        .store
        .call(move |store| store.transaction(|tx| Venues::delete(tx, venue_id)))
        .await;

    match outcome {
        Ok(true) => {
            info!(venue_id, venue = %name, "venue deleted");
            let jar = flash::push(jar, Flash::success(format!("Venue {name} was successfully deleted!")));
            Ok((jar, Redirect::to("/")))
        }
        Ok(false) => Err(Error::NotFound),
        Err(err) => {
            error!(venue_id, venue = %name, error = %err, "venue could not be deleted");
            let jar = flash::push(
                jar,
                Flash::error(format!("An error occurred. Venue {name} could not be deleted.")),
            );
            Ok((jar, Redirect::to(&format!("/venues/{venue_id}"))))
        }
    }
}

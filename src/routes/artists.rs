use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::{cookie::CookieJar, Form};
use minijinja::context;
use tracing::{error, info};

use super::{failure_messages, pages, RecordId};
use crate::db::{Artists, Repository};
use crate::error::{Error, Result};
use crate::flash::{self, Flash};
use crate::forms::{ArtistForm, SearchForm, GENRES, STATES};
use crate::models::SearchResults;
use crate::state::AppState;
use crate::templates;
use crate::utils;

pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, messages) = flash::take(jar);
    let artists = state
        .store
        .call(|store| store.read(|conn| Artists::list(conn)))
        .await?;
    let page = templates::render_page(
        "pages/artists.html",
        context! { messages => messages, artists => artists },
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
        .call(move |store| store.read(|conn| Artists::search(conn, &term, now)))
        .await?;
    let page = templates::render_page(
        "pages/search_artists.html",
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
    RecordId(artist_id): RecordId,
) -> Result<(CookieJar, Html<String>)> {
    let now = utils::now_local();
    let artist = state
        .store
        .call(move |store| store.read(|conn| Artists::detail(conn, artist_id, now)))
        .await?
        .ok_or(Error::NotFound)?;
    let (jar, messages) = flash::take(jar);
    let page = templates::render_page(
        "pages/show_artist.html",
        context! { messages => messages, artist => artist },
    )?;
    Ok((jar, page))
}

pub async fn create_form(jar: CookieJar) -> Result<(CookieJar, Html<String>)> {
    let (jar, messages) = flash::take(jar);
    let page = templates::render_page(
        "forms/new_artist.html",
        context! {
            messages => messages,
            form => ArtistForm::default(),
            states => STATES.as_slice(),
            genres => GENRES.as_slice(),
        },
    )?;
    Ok((jar, page))
}

pub async fn create_submission(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, mut messages) = flash::take(jar);
    let name = form.name.trim().to_string();
    let outcome = match form.validate() {
        Ok(draft) => {
            state
                .store
                .call(move |store| store.transaction(|tx| Artists::create(tx, &draft)))
                .await
        }
        Err(err) => Err(err),
    };

    match outcome {
        Ok(artist_id) => {
            info!(artist_id, artist = %name, "artist listed");
            messages.push(Flash::success(format!("Artist {name} was successfully listed!")));
        }
        Err(err) => {
            error!(artist = %name, error = %err, "artist could not be listed");
            messages.extend(failure_messages(
                &err,
                format!("An error occurred. Artist {name} could not be listed."),
            ));
        }
    }
    Ok((jar, pages::home(messages)?))
}

pub async fn edit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    RecordId(artist_id): RecordId,
) -> Result<(CookieJar, Html<String>)> {
    let artist = state
        .store
        .call(move |store| store.read(|conn| Artists::get(conn, artist_id)))
        .await?
        .ok_or(Error::NotFound)?;
    let (jar, messages) = flash::take(jar);
    let page = templates::render_page(
        "forms/edit_artist.html",
        context! {
            messages => messages,
            form => ArtistForm::from(&artist),
            artist => artist,
            states => STATES.as_slice(),
            genres => GENRES.as_slice(),
        },
    )?;
    Ok((jar, page))
}

pub async fn edit_submission(
    State(state): State<AppState>,
    jar: CookieJar,
    RecordId(artist_id): RecordId,
    Form(form): Form<ArtistForm>,
) -> Result<(CookieJar, Redirect)> {
    let exists = state
        .store
        .call(move |store| store.read(|conn| Artists::get(conn, artist_id)))
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
                .call(move |store| {
                    store.transaction(|tx| Artists::update(tx, artist_id, &draft))
                })
                .await
        }
        Err(err) => Err(err),
    };

    let jar = match outcome {
        Ok(true) => {
            info!(artist_id, artist = %name, "artist updated");
            flash::push(jar, Flash::success(format!("Artist {name} was successfully updated!")))
        }
        Ok(false) => return Err(Error::NotFound),
        Err(err) => {
            error!(artist_id, error = %err, "artist could not be updated");
            failure_messages(
                &err,
                format!("An error occurred. Artist {name} could not be updated."),
            )
            .into_iter()
            .fold(jar, flash::push)
        }
    };
    Ok((jar, Redirect::to(&format!("/artists/{artist_id}"))))
}

use axum::response::Html;
use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::Result;
use crate::filters;

const TEMPLATES: [(&str, &str); 18] = [
    ("layouts/main.html", include_str!("../templates/layouts/main.html")),
    ("pages/home.html", include_str!("../templates/pages/home.html")),
    ("pages/venues.html", include_str!("../templates/pages/venues.html")),
    ("pages/artists.html", include_str!("../templates/pages/artists.html")),
    ("pages/shows.html", include_str!("../templates/pages/shows.html")),
    ("pages/search_venues.html", include_str!("../templates/pages/search_venues.html")),
    ("pages/search_artists.html", include_str!("../templates/pages/search_artists.html")),
    ("pages/show_venue.html", include_str!("../templates/pages/show_venue.html")),
    ("pages/show_artist.html", include_str!("../templates/pages/show_artist.html")),
    ("forms/venue_fields.html", include_str!("../templates/forms/venue_fields.html")),
    ("forms/artist_fields.html", include_str!("../templates/forms/artist_fields.html")),
    ("forms/new_venue.html", include_str!("../templates/forms/new_venue.html")),
    ("forms/edit_venue.html", include_str!("../templates/forms/edit_venue.html")),
    ("forms/new_artist.html", include_str!("../templates/forms/new_artist.html")),
    ("forms/edit_artist.html", include_str!("../templates/forms/edit_artist.html")),
    ("forms/new_show.html", include_str!("../templates/forms/new_show.html")),
    ("errors/404.html", include_str!("../templates/errors/404.html")),
    ("errors/500.html", include_str!("../templates/errors/500.html")),
];

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        env.add_template(name, source)
            .unwrap_or_else(|err| panic!("template {name} does not parse: {err}"));
    }
    env.add_filter("datetime", filters::datetime);
    env
});

pub fn render<S: Serialize>(name: &str, ctx: S) -> Result<String> {
    Ok(ENV.get_template(name)?.render(ctx)?)
}

pub fn render_page<S: Serialize>(name: &str, ctx: S) -> Result<Html<String>> {
    render(name, ctx).map(Html)
}

/// Error pages take no data so they can render when everything else fails.
pub fn render_error_page(name: &str) -> Result<String> {
    render(name, minijinja::context! { messages => Vec::<()>::new() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn every_template_parses() {
        for (name, _) in TEMPLATES {
            assert!(ENV.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn datetime_filter_is_registered() {
        let tmpl = ENV
            .template_from_str("{{ when|datetime('full') }}")
            .expect("inline template");
        let out = tmpl
            .render(context! { when => "2019-05-21T21:30:00" })
            .expect("render");
        assert_eq!(out, "Tuesday May, 21, 2019 at 9:30PM");
    }

    #[test]
    fn output_is_escaped() {
        let html = render(
            "pages/home.html",
            context! { messages => vec![crate::flash::Flash::error("<script>")] },
        )
        .expect("render home");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn error_pages_render_standalone() {
        assert!(render_error_page("errors/404.html")
            .expect("404")
            .contains("Not Found"));
        assert!(render_error_page("errors/500.html")
            .expect("500")
            .contains("Internal Server Error"));
    }
}

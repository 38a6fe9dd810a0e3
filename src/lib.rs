mod config;
pub mod db;
mod error;
mod filters;
mod flash;
pub mod forms;
mod logging;
pub mod models;
mod routes;
mod state;
mod templates;
mod utils;

use anyhow::Context;
use tokio::{
    net::TcpListener,
    signal::ctrl_c,
};
use tracing::info;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

pub use config::AppConfig;
pub use db::Store;
pub use error::{Error, Result};
pub use routes::router;
pub use state::AppState;

pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load();
    logging::init(&config)?;

    let database_path = config.database_path();
    let store = Store::open(&database_path, config.pool_size)
        .with_context(|| format!("unable to open database {:?}", database_path))?;
    if config.seed_demo_data {
        let seeded = store.clone();
        tokio::task::spawn_blocking(move || seeded.seed_if_empty())
            .await?
            .context("unable to seed demo data")?;
    }

    let app = router(AppState::new(store));
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("unable to bind {address}"))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = ctrl_c().await {
            tracing::error!(error = %err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "unable to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

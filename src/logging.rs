use std::{fs::OpenOptions, sync::Arc};

use anyhow::{anyhow, Context};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::utils;

/// Debug mode logs to stdout; otherwise records are appended to the error log
/// file with their source location.
pub fn init(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.debug {
        fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|err| anyhow!(err))?;
        info!("debug mode, logging to stdout");
        return Ok(());
    }

    let path = config.log_path();
    utils::ensure_parent(&path);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("unable to open log file {:?}", path))?;

    fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Arc::new(file))
        .try_init()
        .map_err(|err| anyhow!(err))?;
    info!("logging to {:?}", path);
    Ok(())
}

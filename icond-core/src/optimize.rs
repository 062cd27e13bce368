//! Optional svgo pass over freshly exported SVG files.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::SvgoConfig;
use crate::error::FetchError;
use crate::tool;

/// Config file written into the SVG directory for the duration of one run.
/// Hidden, so the build never mistakes it for an icon.
pub const SVGO_CONFIG_FILE: &str = ".icond-svgo.config.mjs";

/// svgo config module enabling exactly `plugins`.
pub fn svgo_config_source(plugins: &[String]) -> Result<String, serde_json::Error> {
    Ok(format!(
        "export default {{ plugins: {} }};\n",
        serde_json::to_string(plugins)?
    ))
}

/// Arguments optimizing every SVG in `dir` in place.
pub fn svgo_args(config_file: &Path, dir: &Path) -> Vec<String> {
    vec![
        "--config".to_string(),
        config_file.display().to_string(),
        "--folder".to_string(),
        dir.display().to_string(),
        "--quiet".to_string(),
    ]
}

pub async fn optimize_dir(config: &SvgoConfig, dir: &Path) -> Result<(), FetchError> {
    let config_file = dir.join(SVGO_CONFIG_FILE);
    info!(dir = %dir.display(), plugins = ?config.plugins, "Optimizing SVGs with svgo");
    tokio::fs::write(&config_file, svgo_config_source(&config.plugins)?)
        .await
        .map_err(|source| FetchError::Io {
            path: config_file.clone(),
            source,
        })?;

    let result = tool::capture(&config.bin, svgo_args(&config_file, dir), None).await;

    if let Err(e) = tokio::fs::remove_file(&config_file).await {
        warn!(path = %config_file.display(), error = %e, "Could not remove svgo config");
    }
    result?;
    debug!(dir = %dir.display(), "svgo finished");
    Ok(())
}

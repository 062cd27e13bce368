/// `load_config` module: reads the YAML config file and injects secrets from the environment.
///
/// This module is the only place where untrusted YAML is parsed into the
/// strongly-typed [`IconConfig`] of the core crate.
///
/// # Responsibilities
/// - Parse `icond.yaml` (every key optional, see the defaults in `icond_core::config`)
/// - Resolve relative output paths against the directory holding the config file
/// - Inject `FIGMA_TOKEN` from the environment; the token never lives in the file
/// - Write the starter config for `icond init`
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Context, Result};
use icond_core::config::IconConfig;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Environment variable holding the Figma personal access token.
pub const FIGMA_TOKEN_ENV: &str = "FIGMA_TOKEN";

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "icond.yaml";

/// Starter config written by `icond init`.
pub const CONFIG_TEMPLATE: &str = r#"# icond configuration
# The Figma token is read from the FIGMA_TOKEN environment variable (or a .env file).

figma:
  # Your Figma file ID (from the file URL)
  file_id: ""
  # Only export from these pages; leave empty for all pages
  pages: []
  # Run exported SVGs through svgo (must be on PATH)
  # svgo:
  #   plugins: [preset-default]

output:
  svg: ./src/svg
  icons: ./src/icons
  dist: ./dist

process:
  # warn | suffix | reject
  collision_policy: warn

icon_generation:
  prefix: icon
  # strip | keep
  dash_policy: strip
  # Also export a completeIconSet array from the barrel
  export_complete_icon_set: false

library:
  name: "@your-org/icons"
  version: 1.0.0
  description: Icon library from Figma
  license: MIT
"#;

/// Loads the YAML config at `path`, resolves its root directory and injects
/// `FIGMA_TOKEN`. A missing token is not an error here; only `fetch` needs it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<IconConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {} (run `icond init` to create one)",
                path_ref,
                e
            ));
        }
    };

    let config: IconConfig = if config_content.trim().is_empty() {
        warn!(config_path = ?path_ref, "Config file is empty, using defaults");
        IconConfig::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    let root = match path_ref.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let mut config = config.with_root(root);

    match std::env::var(FIGMA_TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            info!("FIGMA_TOKEN found in environment");
            config.figma.token = Some(token);
        }
        _ => info!("FIGMA_TOKEN not set; fetch will be unavailable"),
    }

    config.trace_loaded();
    Ok(config)
}

/// Writes [`CONFIG_TEMPLATE`] to `path`. Refuses to overwrite an existing file
/// unless `force` is set.
pub fn write_config_template<P: AsRef<Path>>(path: P, force: bool) -> Result<()> {
    let path = path.as_ref();
    if path.exists() && !force {
        error!(config_path = ?path, "Config file already exists");
        bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    info!(config_path = ?path, force, "Wrote config template");
    Ok(())
}

//! Bundling of the generated sources with esbuild, and declaration emit with tsc.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{BuildConfig, BundleFormat};
use crate::contract::{BundleOutput, Bundler};
use crate::error::BundleError;
use crate::tool;

/// Command-line arguments for one esbuild run.
pub fn esbuild_args(config: &BuildConfig, format: BundleFormat, entry: &Path, outfile: &Path) -> Vec<String> {
    let mut args = vec![
        entry.display().to_string(),
        "--bundle".to_string(),
        format!("--outfile={}", outfile.display()),
        "--platform=neutral".to_string(),
        format!("--format={}", format.as_str()),
        format!("--target={}", config.target),
        "--tree-shaking=true".to_string(),
    ];
    if config.minify {
        args.push("--minify".to_string());
    }
    if config.sourcemap {
        args.push("--sourcemap".to_string());
    }
    args
}

/// Command-line arguments for emitting `.d.ts` files next to the bundle.
pub fn tsc_args(entry: &Path, dist: &Path) -> Vec<String> {
    vec![
        entry.display().to_string(),
        "--declaration".to_string(),
        "--emitDeclarationOnly".to_string(),
        "--outDir".to_string(),
        dist.display().to_string(),
    ]
}

#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    config: BuildConfig,
}

impl EsbuildBundler {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle(&self, entry: &Path, dist: &Path) -> Result<BundleOutput, BundleError> {
        if !entry.exists() {
            return Err(BundleError::MissingEntry {
                path: entry.to_path_buf(),
            });
        }
        info!(entry = %entry.display(), dist = %dist.display(), formats = ?self.config.formats, "Bundling icon library");

        if dist.exists() {
            tokio::fs::remove_dir_all(dist)
                .await
                .map_err(|source| BundleError::Io {
                    path: dist.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::create_dir_all(dist)
            .await
            .map_err(|source| BundleError::Io {
                path: dist.to_path_buf(),
                source,
            })?;

        let mut artifacts: Vec<PathBuf> = Vec::new();
        for format in &self.config.formats {
            let outfile = dist.join(format.file_name());
            let args = esbuild_args(&self.config, *format, entry, &outfile);
            debug!(format = format.as_str(), ?args, "Running esbuild");
            tool::capture(&self.config.esbuild_bin, &args, None).await?;
            artifacts.push(outfile);
        }

        debug!("Emitting type declarations");
        tool::capture(&self.config.tsc_bin, tsc_args(entry, dist), None).await?;

        info!(artifacts = artifacts.len(), "Bundle complete");
        Ok(BundleOutput { artifacts })
    }
}

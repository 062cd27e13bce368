//! Publishing the built package with `npm publish`.

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use crate::config::PublishConfig;
use crate::contract::{PublishOptions, PublishOutcome, Publisher};
use crate::error::PublishError;
use crate::tool;

impl PublishOptions {
    pub fn from_config(config: &PublishConfig, tag: Option<String>, dry_run: bool) -> Self {
        Self {
            access: config.access.clone(),
            registry: config.registry.clone(),
            tag: tag.or_else(|| config.tag.clone()),
            dry_run,
        }
    }
}

pub fn npm_args(options: &PublishOptions) -> Vec<String> {
    let mut args = vec![
        "publish".to_string(),
        "--access".to_string(),
        options.access.clone(),
        "--registry".to_string(),
        options.registry.clone(),
    ];
    if let Some(tag) = &options.tag {
        args.push("--tag".to_string());
        args.push(tag.clone());
    }
    if options.dry_run {
        args.push("--dry-run".to_string());
    }
    args
}

#[derive(Debug, Clone)]
pub struct NpmPublisher {
    npm_bin: String,
}

impl NpmPublisher {
    pub fn new(npm_bin: impl Into<String>) -> Self {
        Self {
            npm_bin: npm_bin.into(),
        }
    }
}

impl Default for NpmPublisher {
    fn default() -> Self {
        Self::new("npm")
    }
}

#[async_trait]
impl Publisher for NpmPublisher {
    async fn publish(
        &self,
        dist: &Path,
        options: &PublishOptions,
    ) -> Result<PublishOutcome, PublishError> {
        if !dist.is_dir() {
            return Err(PublishError::MissingDist {
                path: dist.to_path_buf(),
            });
        }
        if !dist.join("package.json").is_file() {
            return Err(PublishError::MissingManifest {
                path: dist.to_path_buf(),
            });
        }
        info!(
            dist = %dist.display(),
            registry = %options.registry,
            tag = ?options.tag,
            dry_run = options.dry_run,
            "Publishing package"
        );
        tool::run_inherited(&self.npm_bin, npm_args(options), Some(dist)).await?;
        Ok(PublishOutcome {
            package_dir: dist.to_path_buf(),
            dry_run: options.dry_run,
        })
    }
}

//! High-level pipeline: orchestrates fetch → optimize → process → generate → bundle → publish.
//!
//! Each entry point takes the loaded [`IconConfig`] plus the collaborators it
//! needs, so the CLI passes the real implementations and tests pass mocks.
//!
//! # Error Handling
//! Stage failures that leave nothing to continue with (unreadable directory,
//! converter or bundler error) abort with a [`BuildError`]. Per-file problems are
//! collected in the returned [`BuildReport`]; the caller decides what they mean
//! for the exit status.

use std::path::Path;
use tracing::{error, info};

use crate::config::IconConfig;
use crate::contract::{
    BundleOutput, Bundler, ConversionManifest, Converter, ExportManifest, Exporter, IconSource,
    PublishOptions, PublishOutcome, Publisher,
};
use crate::error::{BuildError, BundleError, FetchError, PublishError};
use crate::optimize::optimize_dir;
use crate::package::write_package_files;
use crate::preprocess::{list_svg_files, ProcessReport, Processor};
use crate::rewrite::{ExportRewriter, RewriteReport};

#[derive(Debug)]
pub struct BuildReport {
    pub process: ProcessReport,
    pub conversion: ConversionManifest,
    pub rewrite: RewriteReport,
    pub bundle: BundleOutput,
}

impl BuildReport {
    /// True when no file was skipped by a collision or failure.
    pub fn is_clean(&self) -> bool {
        self.process.is_clean() && self.rewrite.failures.is_empty()
    }
}

async fn clear_dir(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        tokio::fs::remove_dir_all(dir).await?;
    }
    tokio::fs::create_dir_all(dir).await
}

/// Exports raw SVGs into the configured SVG directory, wiping it first when
/// `clean` is set.
pub async fn fetch<E>(config: &IconConfig, exporter: &E, clean: bool) -> Result<ExportManifest, FetchError>
where
    E: Exporter + ?Sized,
{
    let svg_dir = config.svg_dir();
    info!(svg_dir = %svg_dir.display(), clean, "[FETCH] Starting export");
    if clean {
        clear_dir(&svg_dir).await.map_err(|source| FetchError::Io {
            path: svg_dir.clone(),
            source,
        })?;
    }
    let manifest = exporter.export_all().await.map_err(|e| {
        error!(error = %e, "[FETCH][ERROR] Export failed");
        e
    })?;
    info!(files = manifest.files.len(), "[FETCH] Export complete");
    if let Some(svgo) = &config.figma.svgo {
        optimize_dir(svgo, &svg_dir).await.map_err(|e| {
            error!(error = %e, "[FETCH][ERROR] svgo pass failed");
            e
        })?;
        info!(files = manifest.files.len(), "[FETCH] SVGs optimized");
    }
    Ok(manifest)
}

/// Normalizes and names the raw SVGs, generates TypeScript, prefixes its exports,
/// bundles it and writes the package files.
pub async fn build<C, B>(
    config: &IconConfig,
    converter: &C,
    bundler: &B,
    clean: bool,
) -> Result<BuildReport, BuildError>
where
    C: Converter + ?Sized,
    B: Bundler + ?Sized,
{
    let svg_dir = config.svg_dir();
    let icons_dir = config.icons_dir();
    let dist_dir = config.dist_dir();
    info!(svg_dir = %svg_dir.display(), "[BUILD] Starting build pipeline");

    let svg_files = match list_svg_files(&svg_dir).await {
        Ok(files) => files,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(source) => {
            error!(svg_dir = %svg_dir.display(), error = %source, "[BUILD][ERROR] Cannot read SVG directory");
            return Err(BuildError::SvgDir {
                path: svg_dir,
                source,
            });
        }
    };
    if svg_files.is_empty() {
        error!(svg_dir = %svg_dir.display(), "[BUILD][ERROR] No SVG files found");
        return Err(BuildError::NoSvgFiles { path: svg_dir });
    }
    info!(count = svg_files.len(), "[BUILD] Found SVG files");

    if clean {
        clear_dir(&icons_dir)
            .await
            .map_err(|source| BuildError::Clean {
                path: icons_dir.clone(),
                source,
            })?;
    }

    // --- Step 1: Normalize colors and settle names ---
    let process = Processor::from_config(config).process_dir(&svg_dir).await?;
    for collision in &process.collisions {
        error!(%collision, "[BUILD] Naming collision, file left as is");
    }

    // --- Step 2: Generate TypeScript ---
    let icons: Vec<IconSource> = process
        .assets
        .iter()
        .map(|asset| IconSource {
            svg_path: asset.path.clone(),
            symbol: asset.record.local_symbol.clone(),
        })
        .collect();
    let conversion = converter.convert(&icons, &icons_dir).await?;
    info!(files = conversion.files.len(), "[BUILD] TypeScript generated");

    // --- Step 3: Prefix exported identifiers ---
    let rewrite = ExportRewriter::from_config(&config.icon_generation)
        .rewrite_dir(&icons_dir)
        .await?;

    // --- Step 4: Bundle ---
    let entry = config.entry_point();
    if !entry.exists() {
        error!(entry = %entry.display(), "[BUILD][ERROR] Entry point not found");
        return Err(BundleError::MissingEntry { path: entry }.into());
    }
    let bundle = bundler.bundle(&entry, &dist_dir).await?;

    // --- Step 5: Package metadata ---
    write_package_files(&config.library, &dist_dir).await?;

    info!(
        assets = process.assets.len(),
        recolored = process.files_recolored(),
        renamed = process.files_renamed(),
        identifiers_renamed = rewrite.identifiers_renamed(),
        artifacts = bundle.artifacts.len(),
        "[BUILD] Build complete"
    );
    Ok(BuildReport {
        process,
        conversion,
        rewrite,
        bundle,
    })
}

/// Publishes the dist directory.
pub async fn publish<P>(
    config: &IconConfig,
    publisher: &P,
    options: &PublishOptions,
) -> Result<PublishOutcome, PublishError>
where
    P: Publisher + ?Sized,
{
    let dist_dir = config.dist_dir();
    info!(dist = %dist_dir.display(), package = %config.library.name, dry_run = options.dry_run, "[PUBLISH] Starting publish");
    let outcome = publisher.publish(&dist_dir, options).await?;
    info!(package = %config.library.name, version = %config.library.version, "[PUBLISH] Done");
    Ok(outcome)
}

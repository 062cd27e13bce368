//! Normalization and renaming of raw exported SVG files.
//!
//! [`Processor::process_dir`] runs over one flat directory of `*.svg` files:
//!
//! 1. Every file is read, its width extracted, its paint colors normalized and its
//!    view box resolved. Files are handled concurrently; a file that cannot be
//!    read or written is recorded as a [`FileFailure`] and skipped.
//! 2. Names are claimed in sorted path order so that collisions resolve the same
//!    way on every run. Each file's current name is reserved for it first, so no
//!    rename can land on another file of the batch.
//! 3. Files whose name changed are renamed, concurrently.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::{IconConfig, ProcessConfig};
use crate::contract::FileFailure;
use crate::error::PreprocessError;
use crate::naming::{CollisionError, CollisionPolicy, NameRegistry, Namer, NamingRecord, Resolution};
use crate::svg;

/// One SVG file after normalization and naming.
#[derive(Debug, Clone)]
pub struct ProcessedAsset {
    pub original_path: PathBuf,
    /// Location after renaming.
    pub path: PathBuf,
    pub width: u32,
    pub view_box: Option<String>,
    /// Number of fill/stroke attributes rewritten to `currentColor`.
    pub colors_changed: usize,
    pub record: NamingRecord,
}

impl ProcessedAsset {
    pub fn renamed(&self) -> bool {
        self.original_path != self.path
    }
}

#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Assets ready for conversion, sorted by final path.
    pub assets: Vec<ProcessedAsset>,
    /// Files left un-renamed because their name was already taken.
    pub collisions: Vec<CollisionError>,
    pub failures: Vec<FileFailure>,
}

impl ProcessReport {
    pub fn files_recolored(&self) -> usize {
        self.assets.iter().filter(|a| a.colors_changed > 0).count()
    }

    pub fn files_renamed(&self) -> usize {
        self.assets.iter().filter(|a| a.renamed()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.collisions.is_empty() && self.failures.is_empty()
    }
}

/// Outcome of phase 1 for a single file.
#[derive(Debug)]
struct NormalizedFile {
    path: PathBuf,
    width: u32,
    view_box: Option<String>,
    colors_changed: usize,
}

pub struct Processor {
    config: ProcessConfig,
    namer: Namer,
}

impl Processor {
    pub fn new(config: ProcessConfig, namer: Namer) -> Self {
        Self { config, namer }
    }

    pub fn from_config(config: &IconConfig) -> Self {
        let namer = Namer::new(
            config.icon_generation.prefix.clone(),
            config.icon_generation.dash_policy,
            config.process.canonical_size,
        );
        Self::new(config.process.clone(), namer)
    }

    /// Normalizes and renames every `*.svg` file directly inside `dir`.
    ///
    /// Fails as a whole only when the directory cannot be listed, or when a
    /// collision occurs under [`CollisionPolicy::Reject`]; in that case nothing
    /// has been renamed yet (colors may already be normalized, which is harmless
    /// to repeat).
    pub async fn process_dir(&self, dir: &Path) -> Result<ProcessReport, PreprocessError> {
        info!(dir = %dir.display(), policy = ?self.config.collision_policy, "Processing SVG directory");
        let paths = list_svg_files(dir)
            .await
            .map_err(|source| PreprocessError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
        debug!(count = paths.len(), "Found SVG files");

        let mut report = ProcessReport::default();

        let results = join_all(paths.iter().cloned().map(|path| self.normalize_file(path))).await;
        let mut normalized = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(file) => normalized.push(file),
                Err(failure) => report.failures.push(failure),
            }
        }

        // Names that are already lower-case reserve first, so `Home.svg` can never
        // take the slot of an existing `home.svg`.
        let registry = NameRegistry::new();
        let (lower, mixed): (Vec<String>, Vec<String>) = paths
            .iter()
            .map(|p| file_name(p))
            .partition(|name| *name == name.to_lowercase());
        for current in lower.iter().chain(&mixed) {
            registry.reserve_file_name(&current.to_lowercase(), current);
        }

        let mut claimed = Vec::new();
        for file in normalized {
            let owner = file_name(&file.path);
            let named = self
                .namer
                .name(&owner, file.width)
                .and_then(|record| record.check_identifiers().map(|()| record));
            let record = match named {
                Ok(record) => record,
                Err(e) => {
                    warn!(file = %owner, error = %e, "Cannot derive a name");
                    report.failures.push(FileFailure::new(&file.path, e));
                    continue;
                }
            };
            match registry.resolve(&self.namer, &owner, record, self.config.collision_policy) {
                Resolution::Claimed(record) => claimed.push((file, record)),
                Resolution::Collided(collision) => report.collisions.push(collision),
            }
        }

        if self.config.collision_policy == CollisionPolicy::Reject && !report.collisions.is_empty() {
            error!(count = report.collisions.len(), "Naming collisions, batch rejected");
            return Err(PreprocessError::Collisions(report.collisions));
        }

        let renames = join_all(
            claimed
                .into_iter()
                .map(|(file, record)| rename_asset(dir, file, record)),
        )
        .await;
        for result in renames {
            match result {
                Ok(asset) => report.assets.push(asset),
                Err(failure) => report.failures.push(failure),
            }
        }
        report.assets.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            assets = report.assets.len(),
            recolored = report.files_recolored(),
            renamed = report.files_renamed(),
            collisions = report.collisions.len(),
            failures = report.failures.len(),
            "SVG directory processed"
        );
        Ok(report)
    }

    async fn normalize_file(&self, path: PathBuf) -> Result<NormalizedFile, FileFailure> {
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            error!(file = %path.display(), error = %e, "Failed to read SVG");
            FileFailure::new(&path, e)
        })?;

        let width = svg::declared_width(&content).unwrap_or(self.config.canonical_size);
        let normalized = svg::normalize_colors(&content);
        let view_box = svg::resolve_view_box(&normalized.content);

        let mut output = normalized.content;
        let mut dirty = normalized.changed > 0;
        if self.config.inject_view_box {
            if let Some(with_view_box) = view_box
                .as_deref()
                .and_then(|vb| svg::inject_view_box(&output, vb))
            {
                output = with_view_box;
                dirty = true;
            }
        }
        if view_box.is_none() {
            debug!(file = %path.display(), "No view box could be resolved");
        }

        if dirty {
            tokio::fs::write(&path, &output).await.map_err(|e| {
                error!(file = %path.display(), error = %e, "Failed to write SVG");
                FileFailure::new(&path, e)
            })?;
        }
        debug!(
            file = %path.display(),
            width,
            colors_changed = normalized.changed,
            "Normalized SVG"
        );
        Ok(NormalizedFile {
            path,
            width,
            view_box,
            colors_changed: normalized.changed,
        })
    }
}

async fn rename_asset(
    dir: &Path,
    file: NormalizedFile,
    record: NamingRecord,
) -> Result<ProcessedAsset, FileFailure> {
    let target = dir.join(&record.final_file_name);
    if target != file.path {
        tokio::fs::rename(&file.path, &target).await.map_err(|e| {
            error!(from = %file.path.display(), to = %target.display(), error = %e, "Rename failed");
            FileFailure::new(&file.path, e)
        })?;
        debug!(from = %file.path.display(), to = %target.display(), "Renamed SVG");
    }
    Ok(ProcessedAsset {
        original_path: file.path,
        path: target,
        width: file.width,
        view_box: file.view_box,
        colors_changed: file.colors_changed,
        record,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Regular `*.svg` files directly inside `dir`, sorted. Hidden files are skipped.
pub async fn list_svg_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if is_svg && !hidden && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}


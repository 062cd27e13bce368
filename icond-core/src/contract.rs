//! # contract: seams to the external collaborators of the pipeline
//!
//! The normalization and naming passes are pure Rust. Everything around them talks
//! to something outside the process: the Figma API, the file layout of the
//! generated TypeScript, esbuild/tsc and the npm registry. Each of those sits
//! behind one trait here so the pipeline can be driven with mocks in tests.
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`; the mocks are exported under the
//!   `test-export-mocks` feature so the CLI crate's tests can use them too.
//!
//! ## Default implementations
//! - [`Exporter`]: [`crate::fetch::FigmaExporter`]
//! - [`Converter`]: [`crate::convert::TypeScriptConverter`]
//! - [`Bundler`]: [`crate::bundle::EsbuildBundler`]
//! - [`Publisher`]: [`crate::publish::NpmPublisher`]

use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[allow(unused_imports)]
use mockall::{automock, predicate::*};

use crate::error::{BundleError, ConvertError, FetchError, PublishError};

/// Files an [`Exporter`] wrote into the SVG directory.
#[derive(Debug, Clone, Default)]
pub struct ExportManifest {
    pub files: Vec<PathBuf>,
}

/// Pulls raw icon SVGs from the design tool into a local directory.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export_all(&self) -> Result<ExportManifest, FetchError>;
}

/// One normalized SVG handed to the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSource {
    pub svg_path: PathBuf,
    /// Unprefixed symbol to declare, e.g. `arrowLeft`.
    pub symbol: String,
}

/// Files a [`Converter`] generated.
#[derive(Debug, Clone, Default)]
pub struct ConversionManifest {
    /// One declaration file per icon.
    pub files: Vec<PathBuf>,
    /// Barrel file re-exporting every declaration; the bundler entry point.
    pub barrel: PathBuf,
    /// Shared type declarations, if generated.
    pub model: Option<PathBuf>,
}

/// Turns normalized SVG files into TypeScript source declarations.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(
        &self,
        icons: &[IconSource],
        out_dir: &Path,
    ) -> Result<ConversionManifest, ConvertError>;
}

/// Artifacts a [`Bundler`] wrote into the dist directory.
#[derive(Debug, Clone, Default)]
pub struct BundleOutput {
    pub artifacts: Vec<PathBuf>,
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, entry: &Path, dist: &Path) -> Result<BundleOutput, BundleError>;
}

/// Options for one publish run. Registry credentials are npm's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    pub access: String,
    pub registry: String,
    pub tag: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub package_dir: PathBuf,
    pub dry_run: bool,
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        dist: &Path,
        options: &PublishOptions,
    ) -> Result<PublishOutcome, PublishError>;
}

/// A file the batch could not process. The rest of the batch still ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl FileFailure {
    pub fn new(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

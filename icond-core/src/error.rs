//! Error types for the icond pipeline.
//!
//! Each stage has its own error enum so callers can tell a missing tool apart from
//! a broken input file. The CLI wraps all of them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::naming::CollisionError;

/// Failure to run an external program (esbuild, tsc, npm, git).
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("`{program}` was not found on PATH")]
    NotFound { program: String },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the raw SVG normalization and renaming pass.
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("failed to read SVG directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only produced under the `reject` collision policy, before any file is renamed.
    #[error("{} naming collision(s), batch rejected (first: {})", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Collisions(Vec<CollisionError>),
}

/// Errors from the export rewriting pass over generated TypeScript.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("failed to read generated source directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rewrite {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from SVG to TypeScript conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from exporting icon components out of Figma.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("FIGMA_TOKEN is not set")]
    MissingToken,

    #[error("figma.file_id is not configured")]
    MissingFileId,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Figma API returned {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Figma export failed: {0}")]
    Export(String),

    #[error("svgo failed: {0}")]
    Optimize(#[from] ToolError),

    #[error("failed to render svgo config: {0}")]
    SvgoConfig(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from bundling the generated sources.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("entry point not found: {path}")]
    MissingEntry { path: PathBuf },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from publishing the built library.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("distribution directory not found: {path} (run `icond build` first)")]
    MissingDist { path: PathBuf },

    #[error("package.json not found in {path} (run `icond build` first)")]
    MissingManifest { path: PathBuf },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Errors from updating the changelog.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the `build` pipeline as a whole.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("no SVG files found in {path} (run `icond fetch` first)")]
    NoSvgFiles { path: PathBuf },

    #[error("failed to read SVG directory {path}: {source}")]
    SvgDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to clean {path}: {source}")]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error("failed to render package.json: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("failed to write package file {path}: {source}")]
    Package {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

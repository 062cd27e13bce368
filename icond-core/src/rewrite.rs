//! Prefixing of exported identifiers in generated TypeScript.
//!
//! The converter declares each icon under its bare symbol (`export const home: …`)
//! and re-exports it from the barrel (`export { home } from './home.icon';`). This
//! pass turns declarations into `export const iconHome: …` and re-exports into
//! `export { home as iconHome } from './home.icon';`. A re-export keeps the
//! original symbol on the left of `as`, so every renamed declaration also gets a
//! trailing `export { iconHome as home };` that keeps the module's bare symbol.
//!
//! Rewriting is idempotent: names that already carry the prefix are left alone, and
//! aliased exports no longer have the bare shape the patterns look for.

use futures::future::join_all;
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, error, info};

use crate::config::IconGenerationConfig;
use crate::contract::FileFailure;
use crate::error::RewriteError;
use crate::naming::{is_prefixed, prefixed_identifier, DashPolicy};

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<head>\bexport\s+const\s+)(?P<name>[A-Za-z_$][\w$-]*)(?P<tail>\s*:)")
        .expect("declaration pattern")
});

static RE_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<head>\bexport\s*\{\s*)(?P<name>[A-Za-z_$][\w$-]*)(?P<tail>\s*\}\s*from\b)")
        .expect("re-export pattern")
});

/// Result of rewriting one piece of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    /// Distinct original names that were rewritten.
    pub renamed: BTreeSet<String>,
}

impl Rewritten {
    pub fn is_changed(&self) -> bool {
        !self.renamed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RewriteReport {
    pub files_rewritten: usize,
    /// Distinct original names rewritten across all files.
    pub identifiers: BTreeSet<String>,
    pub failures: Vec<FileFailure>,
}

impl RewriteReport {
    pub fn identifiers_renamed(&self) -> usize {
        self.identifiers.len()
    }
}

#[derive(Debug, Clone)]
pub struct ExportRewriter {
    prefix: String,
    dashes: DashPolicy,
}

impl ExportRewriter {
    pub fn new(prefix: impl Into<String>, dashes: DashPolicy) -> Self {
        Self {
            prefix: prefix.into(),
            dashes,
        }
    }

    pub fn from_config(config: &IconGenerationConfig) -> Self {
        Self::new(config.prefix.clone(), config.dash_policy)
    }

    /// The prefixed form of `name`, or `None` when it must be left as is.
    fn target(&self, name: &str) -> Option<String> {
        if is_prefixed(&self.prefix, name) {
            return None;
        }
        let prefixed = prefixed_identifier(&self.prefix, name, self.dashes);
        (prefixed != name).then_some(prefixed)
    }

    pub fn rewrite_text(&self, content: &str) -> Rewritten {
        let mut renamed = BTreeSet::new();
        let mut local_aliases = Vec::new();

        let declared = DECLARATION.replace_all(content, |caps: &Captures<'_>| {
            let name = &caps["name"];
            match self.target(name) {
                Some(prefixed) => {
                    renamed.insert(name.to_string());
                    local_aliases.push(format!("export {{ {prefixed} as {name} }};\n"));
                    format!("{}{prefixed}{}", &caps["head"], &caps["tail"])
                }
                None => caps[0].to_string(),
            }
        });

        let reexported = RE_EXPORT.replace_all(&declared, |caps: &Captures<'_>| {
            let name = &caps["name"];
            match self.target(name) {
                Some(prefixed) => {
                    renamed.insert(name.to_string());
                    format!("{}{name} as {prefixed}{}", &caps["head"], &caps["tail"])
                }
                None => caps[0].to_string(),
            }
        });

        let mut content = reexported.into_owned();
        if !local_aliases.is_empty() {
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            content.extend(local_aliases);
        }

        Rewritten { content, renamed }
    }

    /// Rewrites one file in place. The file is only written when something changed.
    pub async fn rewrite_file(&self, path: &Path) -> Result<Rewritten, RewriteError> {
        let io_error = |source| RewriteError::Io {
            path: path.to_path_buf(),
            source,
        };
        let content = tokio::fs::read_to_string(path).await.map_err(io_error)?;
        let rewritten = self.rewrite_text(&content);
        if rewritten.is_changed() {
            tokio::fs::write(path, &rewritten.content)
                .await
                .map_err(io_error)?;
            debug!(file = %path.display(), identifiers = rewritten.renamed.len(), "Rewrote exports");
        }
        Ok(rewritten)
    }

    /// Rewrites every `*.ts` file directly inside `dir`. A file that fails is
    /// recorded and the others are still rewritten.
    pub async fn rewrite_dir(&self, dir: &Path) -> Result<RewriteReport, RewriteError> {
        info!(dir = %dir.display(), prefix = %self.prefix, "Rewriting exports");
        let files = list_ts_files(dir)
            .await
            .map_err(|source| RewriteError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;

        let results = join_all(files.iter().map(|path| self.rewrite_file(path))).await;
        let mut report = RewriteReport::default();
        for (path, result) in files.iter().zip(results) {
            match result {
                Ok(rewritten) => {
                    if rewritten.is_changed() {
                        report.files_rewritten += 1;
                    }
                    report.identifiers.extend(rewritten.renamed);
                }
                Err(e) => {
                    error!(file = %path.display(), error = %e, "Export rewrite failed");
                    report.failures.push(FileFailure::new(path, e));
                }
            }
        }
        info!(
            files_rewritten = report.files_rewritten,
            identifiers_renamed = report.identifiers_renamed(),
            failures = report.failures.len(),
            "Exports rewritten"
        );
        Ok(report)
    }
}

async fn list_ts_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "ts") && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

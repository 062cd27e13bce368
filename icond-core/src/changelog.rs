//! Changelog entries for icons added or removed since the last release tag.

use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::ChangelogError;
use crate::preprocess::list_svg_files;
use crate::tool;

/// Header for a changelog that does not exist yet.
pub const DEFAULT_HEADER: &str =
    "# Changelog\n\nAll notable changes to this icon library will be documented in this file.\n\n";

/// Fallback comparison point when the repository has no tags.
pub const FALLBACK_REF: &str = "HEAD~1";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl IconDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Icons present in `current` but not in `previous` are added, the reverse removed.
pub fn diff_icons(previous: &BTreeSet<String>, current: &BTreeSet<String>) -> IconDiff {
    IconDiff {
        added: current.difference(previous).cloned().collect(),
        removed: previous.difference(current).cloned().collect(),
    }
}

fn icon_label(file_name: &str) -> &str {
    file_name.strip_suffix(".svg").unwrap_or(file_name)
}

pub fn render_entry(diff: &IconDiff, date: NaiveDate) -> String {
    let mut entry = format!("## [Unreleased] - {}\n\n", date.format("%Y-%m-%d"));
    for (heading, icons) in [("Added", &diff.added), ("Removed", &diff.removed)] {
        if icons.is_empty() {
            continue;
        }
        entry.push_str(&format!("### {heading}\n\n"));
        for icon in icons {
            entry.push_str(&format!("- `{}`\n", icon_label(icon)));
        }
        entry.push('\n');
    }
    entry
}

/// Places `entry` above the newest release section, or after the existing text
/// when there is none yet.
pub fn insert_entry(existing: Option<&str>, entry: &str) -> String {
    let content = existing.unwrap_or(DEFAULT_HEADER);
    let entry = entry.trim_end();
    let newest_section = content
        .split_inclusive('\n')
        .scan(0usize, |offset, line| {
            let start = *offset;
            *offset += line.len();
            Some((start, line))
        })
        .find(|(_, line)| line.starts_with("## "))
        .map(|(start, _)| start);
    match newest_section {
        Some(at) => format!("{}{entry}\n\n{}", &content[..at], &content[at..]),
        None => format!("{}\n\n{entry}\n", content.trim_end()),
    }
}

/// Most recent tag reachable from `HEAD`, if any.
pub async fn latest_tag(repo: &Path) -> Option<String> {
    match tool::capture("git", ["describe", "--tags", "--abbrev=0"], Some(repo)).await {
        Ok(out) => Some(out.trim().to_string()).filter(|t| !t.is_empty()),
        Err(e) => {
            debug!(error = %e, "No tag found");
            None
        }
    }
}

/// SVG file names tracked under `svg_dir` at `git_ref`. Unknown refs yield an empty set.
pub async fn icons_at_ref(repo: &Path, svg_dir: &Path, git_ref: &str) -> BTreeSet<String> {
    let svg_dir = svg_dir.display().to_string();
    let args = ["ls-tree", "-r", "--name-only", git_ref, "--", svg_dir.as_str()];
    match tool::capture("git", args, Some(repo)).await {
        Ok(out) => out
            .lines()
            .filter(|l| l.ends_with(".svg"))
            .filter_map(|l| l.rsplit('/').next())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!(git_ref, error = %e, "Could not list icons at ref");
            BTreeSet::new()
        }
    }
}

/// SVG file names currently in `svg_dir`. A missing directory yields an empty set.
pub async fn current_icons(svg_dir: &Path) -> BTreeSet<String> {
    list_svg_files(svg_dir)
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}

/// Diffs the icon set against the latest tag and prepends an entry to
/// `changelog`. Returns the diff; the file is left untouched when it is empty.
pub async fn update_changelog(
    repo: &Path,
    svg_dir: &Path,
    changelog: &Path,
) -> Result<IconDiff, ChangelogError> {
    let git_ref = latest_tag(repo).await.unwrap_or_else(|| FALLBACK_REF.to_string());
    info!(git_ref = %git_ref, svg_dir = %svg_dir.display(), "Comparing icons");

    let previous = icons_at_ref(repo, svg_dir, &git_ref).await;
    let current = current_icons(svg_dir).await;
    let diff = diff_icons(&previous, &current);
    if diff.is_empty() {
        info!("No icon changes detected");
        return Ok(diff);
    }

    let existing = match tokio::fs::read_to_string(changelog).await {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => {
            return Err(ChangelogError::Io {
                path: changelog.to_path_buf(),
                source,
            })
        }
    };
    let entry = render_entry(&diff, Local::now().date_naive());
    tokio::fs::write(changelog, insert_entry(existing.as_deref(), &entry))
        .await
        .map_err(|source| ChangelogError::Io {
            path: changelog.to_path_buf(),
            source,
        })?;
    info!(
        added = diff.added.len(),
        removed = diff.removed.len(),
        path = %changelog.display(),
        "Updated changelog"
    );
    Ok(diff)
}

use chrono::NaiveDate;
use icond_core::changelog::{diff_icons, insert_entry, render_entry, update_changelog, IconDiff};
use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[test]
fn diff_is_sorted_both_ways() {
    let previous = set(&["home.svg", "old.svg", "user.svg"]);
    let current = set(&["zoom.svg", "home.svg", "arrow.svg", "user.svg"]);
    let diff = diff_icons(&previous, &current);
    assert_eq!(diff.added, ["arrow.svg", "zoom.svg"]);
    assert_eq!(diff.removed, ["old.svg"]);
}

#[test]
fn entry_lists_added_and_removed_icons() {
    let diff = IconDiff {
        added: vec!["arrow.svg".to_string(), "home.svg".to_string()],
        removed: vec!["old.svg".to_string()],
    };
    assert_eq!(
        render_entry(&diff, date()),
        "## [Unreleased] - 2024-05-01\n\n### Added\n\n- `arrow`\n- `home`\n\n### Removed\n\n- `old`\n\n"
    );
}

#[test]
fn entry_omits_empty_sections() {
    let diff = IconDiff {
        added: vec!["home.svg".to_string()],
        removed: vec![],
    };
    let entry = render_entry(&diff, date());
    assert!(entry.contains("### Added"));
    assert!(!entry.contains("### Removed"));
}

#[test]
fn new_changelog_gets_default_header() {
    let out = insert_entry(None, "## [Unreleased] - 2024-05-01\n\n### Added\n\n- `home`\n\n");
    assert_eq!(
        out,
        "# Changelog\n\nAll notable changes to this icon library will be documented in this file.\n\n\
         ## [Unreleased] - 2024-05-01\n\n### Added\n\n- `home`\n"
    );
}

#[test]
fn entry_goes_above_newest_release() {
    let existing = "# Changelog\n\nIntro\n\n## [1.0.0] - 2024-01-01\n\n- first\n";
    let out = insert_entry(Some(existing), "## [Unreleased] - 2024-05-01\n\n- `home`\n\n");
    assert_eq!(
        out,
        "# Changelog\n\nIntro\n\n## [Unreleased] - 2024-05-01\n\n- `home`\n\n## [1.0.0] - 2024-01-01\n\n- first\n"
    );
}

#[tokio::test]
async fn outside_a_repository_every_icon_counts_as_added() {
    let dir = tempdir().unwrap();
    let svg_dir = dir.path().join("svg");
    fs::create_dir_all(&svg_dir).unwrap();
    fs::write(svg_dir.join("home.svg"), "<svg/>").unwrap();
    fs::write(svg_dir.join("user.svg"), "<svg/>").unwrap();
    let changelog = dir.path().join("CHANGELOG.md");

    let diff = update_changelog(dir.path(), &svg_dir, &changelog)
        .await
        .unwrap();
    assert_eq!(diff.added, ["home.svg", "user.svg"]);
    assert!(diff.removed.is_empty());

    let text = fs::read_to_string(&changelog).unwrap();
    assert!(text.starts_with("# Changelog\n"));
    assert!(text.contains("- `home`\n- `user`"));
}

#[tokio::test]
async fn no_changes_leave_changelog_untouched() {
    let dir = tempdir().unwrap();
    let svg_dir = dir.path().join("svg");
    fs::create_dir_all(&svg_dir).unwrap();
    let changelog = dir.path().join("CHANGELOG.md");

    let diff = update_changelog(dir.path(), &svg_dir, &changelog)
        .await
        .unwrap();
    assert!(diff.is_empty());
    assert!(!changelog.exists());
}

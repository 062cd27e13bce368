//! Attribute scanning over raw SVG text: width, paint colors and view box.
//!
//! Attributes are matched with regular expressions, not a document tree, so
//! malformed markup never fails a file. An attribute inside a comment or CDATA
//! block is matched like any other.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::config::CANONICAL_SIZE;

/// Paint value that inherits the surrounding text color.
pub const THEME_SENTINEL: &str = "currentColor";

/// Paint value meaning "no paint". Never themed.
pub const NO_PAINT: &str = "none";

static ROOT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<svg\b[^>]*>").expect("root tag pattern"));

static WIDTH_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)width\s*=\s*["'](\d+)["']"#).expect("width pattern")
});

static HEIGHT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)height\s*=\s*["'](\d+)["']"#).expect("height pattern")
});

static VIEW_BOX_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)viewBox\s*=\s*["']([^"']+)["']"#).expect("viewBox pattern")
});

static PAINT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<lead>\s)(?P<attr>fill|stroke)(?P<eq>\s*=\s*)(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#,
    )
    .expect("paint pattern")
});

/// Attributes are looked up on the root `<svg>` tag when there is one, so that a
/// child `<rect width="…">` never stands in for the icon size.
fn root_scope(content: &str) -> &str {
    ROOT_TAG
        .find(content)
        .map(|m| m.as_str())
        .unwrap_or(content)
}

fn int_attribute(pattern: &Regex, content: &str) -> Option<u32> {
    pattern
        .captures(root_scope(content))
        .and_then(|caps| caps[1].parse().ok())
}

/// The declared width, if the file carries one as a quoted integer.
pub fn declared_width(content: &str) -> Option<u32> {
    int_attribute(&WIDTH_ATTR, content)
}

/// The declared height, if the file carries one as a quoted integer.
pub fn declared_height(content: &str) -> Option<u32> {
    int_attribute(&HEIGHT_ATTR, content)
}

/// Width of the icon, falling back to the canonical size on a missing or
/// malformed attribute.
pub fn extract_width(content: &str) -> u32 {
    declared_width(content).unwrap_or(CANONICAL_SIZE)
}

/// Result of one color normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub content: String,
    /// Number of fill/stroke attributes rewritten.
    pub changed: usize,
}

impl Normalized {
    pub fn is_changed(&self) -> bool {
        self.changed > 0
    }
}

/// Rewrites every `fill`/`stroke` value other than `none` and `currentColor` to
/// `currentColor`. Running it again over its own output changes nothing.
pub fn normalize_colors(content: &str) -> Normalized {
    let mut changed = 0usize;
    let rewritten = PAINT_ATTR.replace_all(content, |caps: &Captures<'_>| {
        let quoted = caps
            .name("dq")
            .map(|v| ('"', v.as_str()))
            .or_else(|| caps.name("sq").map(|v| ('\'', v.as_str())));
        match quoted {
            Some((quote, value)) if value != NO_PAINT && value != THEME_SENTINEL => {
                changed += 1;
                format!(
                    "{}{}{}{quote}{THEME_SENTINEL}{quote}",
                    &caps["lead"], &caps["attr"], &caps["eq"]
                )
            }
            _ => caps[0].to_string(),
        }
    });
    Normalized {
        content: rewritten.into_owned(),
        changed,
    }
}

/// The explicit `viewBox` if present, otherwise `0 0 <width> <height>` when both
/// dimensions are integers, otherwise `None`.
pub fn resolve_view_box(content: &str) -> Option<String> {
    if let Some(caps) = VIEW_BOX_ATTR.captures(root_scope(content)) {
        return Some(caps[1].to_string());
    }
    match (declared_width(content), declared_height(content)) {
        (Some(width), Some(height)) => Some(format!("0 0 {width} {height}")),
        _ => None,
    }
}

/// Inserts a `viewBox` attribute into the root tag. Returns `None` when there is
/// no root tag or it already has one.
pub fn inject_view_box(content: &str, view_box: &str) -> Option<String> {
    let root = ROOT_TAG.find(content)?;
    if VIEW_BOX_ATTR.is_match(root.as_str()) {
        return None;
    }
    let insert_at = root.start() + "<svg".len();
    let mut out = String::with_capacity(content.len() + view_box.len() + 12);
    out.push_str(&content[..insert_at]);
    out.push_str(&format!(" viewBox=\"{view_box}\""));
    out.push_str(&content[insert_at..]);
    Some(out)
}

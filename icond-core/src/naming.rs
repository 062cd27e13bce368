//! File and identifier naming for normalized icons, plus the registry that keeps
//! both unique across a batch.
//!
//! A label such as `"  Arrow   Left  "` at 16px becomes:
//! - base name `Arrow-Left`
//! - file name `arrow-left-16.svg`
//! - export identifier `iconArrowLeft16` (or `iconArrow-Left-16` when dashes are kept)
//!
//! Under [`DashPolicy::Strip`] the identifier is derived from the lower-cased stem,
//! so it only depends on the final file name and survives the rename on a rerun.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, Mutex, PoisonError};
use thiserror::Error;
use tracing::warn;

use crate::config::CANONICAL_SIZE;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

static DASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("dash pattern"));

/// Whether dashes from the sanitized base name survive into the export identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashPolicy {
    /// `Arrow-Left` → `iconArrow-Left`. Not a valid TypeScript identifier when a
    /// dash survives; builds refuse such names.
    Keep,
    /// `Arrow-Left` → `iconArrowLeft`, each dash-separated word capitalized
    #[default]
    Strip,
}

/// What to do when two assets map to the same file name or identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep the first-seen mapping, leave the later asset un-renamed and report it.
    #[default]
    Warn,
    /// Append `-2`, `-3`, … to the later asset's base name until it is free.
    Suffix,
    /// Fail the whole batch before anything is renamed.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    FileName,
    Identifier,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionKind::FileName => f.write_str("file name"),
            CollisionKind::Identifier => f.write_str("export identifier"),
        }
    }
}

/// Two distinct source files that resolve to the same output name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} `{name}` of {second} collides with {first}")]
pub struct CollisionError {
    pub kind: CollisionKind,
    pub name: String,
    /// Original file name that claimed `name` first.
    pub first: String,
    /// Original file name that was refused.
    pub second: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("`{raw}` has no usable name after sanitizing")]
    EmptyName { raw: String },

    #[error("`{symbol}` is not a valid TypeScript identifier")]
    InvalidIdentifier { symbol: String },
}

/// Trim, turn whitespace runs into a dash, then squash dash runs.
pub fn sanitize_base_name(raw: &str) -> String {
    let dashed = WHITESPACE_RUN.replace_all(raw.trim(), "-");
    DASH_RUN.replace_all(&dashed, "-").into_owned()
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drops dashes, upper-casing the first letter of every word after the first.
fn join_words(name: &str) -> String {
    name.split('-')
        .filter(|w| !w.is_empty())
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_string() } else { upper_first(w) })
        .collect()
}

fn apply_dashes(name: &str, dashes: DashPolicy) -> String {
    match dashes {
        DashPolicy::Keep => name.to_string(),
        DashPolicy::Strip => join_words(name),
    }
}

/// `prefix` followed by `name` with its first letter upper-cased. With
/// [`DashPolicy::Strip`] dashes are dropped and the word after each is capitalized.
pub fn prefixed_identifier(prefix: &str, name: &str, dashes: DashPolicy) -> String {
    format!("{prefix}{}", upper_first(&apply_dashes(name, dashes)))
}

/// True for a plain JavaScript identifier: a letter, `_` or `$`, then letters,
/// digits, `_` or `$`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// True when `name` already has the shape `<prefix><Upper>…`, i.e. it was produced
/// by [`prefixed_identifier`] with this prefix.
pub fn is_prefixed(prefix: &str, name: &str) -> bool {
    !prefix.is_empty()
        && name
            .strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_uppercase)
}

/// Derived identity of one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRecord {
    /// Sanitized label, original letter case preserved.
    pub base_name: String,
    /// Declared width when it differs from the canonical size.
    pub size_suffix: Option<u32>,
    pub final_file_name: String,
    /// Public symbol, e.g. `iconArrowLeft`. Always the name the export rewriter
    /// produces from `local_symbol`.
    pub export_identifier: String,
    /// Symbol the converter declares, e.g. `arrowLeft`. When it already has the
    /// prefixed shape (`Icon Home` gives `iconHome`) it is exported unchanged.
    pub local_symbol: String,
}

impl NamingRecord {
    /// File stem without the `.svg` extension.
    pub fn file_stem(&self) -> &str {
        self.final_file_name
            .strip_suffix(".svg")
            .unwrap_or(&self.final_file_name)
    }

    /// Both symbols must be declarable in generated TypeScript.
    pub fn check_identifiers(&self) -> Result<(), NamingError> {
        match [&self.local_symbol, &self.export_identifier]
            .into_iter()
            .find(|symbol| !is_valid_identifier(symbol))
        {
            Some(symbol) => Err(NamingError::InvalidIdentifier {
                symbol: symbol.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Derives [`NamingRecord`]s from raw file names and resolved widths.
#[derive(Debug, Clone)]
pub struct Namer {
    pub prefix: String,
    pub dashes: DashPolicy,
    pub canonical_size: u32,
}

impl Default for Namer {
    fn default() -> Self {
        Self {
            prefix: "icon".to_string(),
            dashes: DashPolicy::default(),
            canonical_size: CANONICAL_SIZE,
        }
    }
}

impl Namer {
    pub fn new(prefix: impl Into<String>, dashes: DashPolicy, canonical_size: u32) -> Self {
        Self {
            prefix: prefix.into(),
            dashes,
            canonical_size,
        }
    }

    /// Names an asset from its exported file name (with or without `.svg`).
    pub fn name(&self, raw_file_name: &str, width: u32) -> Result<NamingRecord, NamingError> {
        let label = match raw_file_name.len().checked_sub(4) {
            Some(cut)
                if raw_file_name.is_char_boundary(cut)
                    && raw_file_name[cut..].eq_ignore_ascii_case(".svg") =>
            {
                &raw_file_name[..cut]
            }
            _ => raw_file_name,
        };
        let base_name = sanitize_base_name(label);
        if base_name.is_empty() || base_name == "-" {
            return Err(NamingError::EmptyName {
                raw: raw_file_name.to_string(),
            });
        }
        let size_suffix = (width != self.canonical_size).then_some(width);
        Ok(self.record(base_name, size_suffix))
    }

    fn record(&self, base_name: String, size_suffix: Option<u32>) -> NamingRecord {
        // A file renamed on an earlier run already ends in its size.
        let stem = match size_suffix {
            Some(size) if !base_name.ends_with(&format!("-{size}")) => {
                format!("{base_name}-{size}")
            }
            _ => base_name.clone(),
        };
        let body = match self.dashes {
            DashPolicy::Keep => stem.clone(),
            DashPolicy::Strip => join_words(&stem.to_lowercase()),
        };
        let local_symbol = lower_first(&body);
        let export_identifier = if is_prefixed(&self.prefix, &local_symbol) {
            local_symbol.clone()
        } else {
            format!("{}{}", self.prefix, upper_first(&body))
        };
        NamingRecord {
            final_file_name: format!("{}.svg", stem.to_lowercase()),
            base_name,
            size_suffix,
            export_identifier,
            local_symbol,
        }
    }

    /// Same asset with `-<n>` appended to its base name.
    pub fn disambiguate(&self, record: &NamingRecord, n: usize) -> NamingRecord {
        self.record(format!("{}-{n}", record.base_name), record.size_suffix)
    }
}

#[derive(Debug, Default)]
struct Claims {
    file_names: HashMap<String, String>,
    identifiers: HashMap<String, String>,
}

/// Outcome of asking the registry for a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Claimed(NamingRecord),
    Collided(CollisionError),
}

/// Assigned file names and identifiers for one output directory. Safe to share
/// between tasks.
#[derive(Debug, Default)]
pub struct NameRegistry {
    claims: Mutex<Claims>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a file name as taken without an identifier, e.g. a file on disk that
    /// could not be processed and must not be overwritten.
    pub fn reserve_file_name(&self, file_name: &str, owner: &str) {
        let mut claims = self.claims.lock().unwrap_or_else(PoisonError::into_inner);
        claims
            .file_names
            .entry(file_name.to_string())
            .or_insert_with(|| owner.to_string());
    }

    /// Claims both names of `record` for `owner`, or neither.
    pub fn claim(&self, owner: &str, record: &NamingRecord) -> Result<(), CollisionError> {
        let mut claims = self.claims.lock().unwrap_or_else(PoisonError::into_inner);
        let conflict = [
            (
                CollisionKind::FileName,
                &record.final_file_name,
                claims.file_names.get(&record.final_file_name),
            ),
            (
                CollisionKind::Identifier,
                &record.export_identifier,
                claims.identifiers.get(&record.export_identifier),
            ),
        ]
        .into_iter()
        .find_map(|(kind, name, holder)| {
            holder
                .filter(|holder| holder.as_str() != owner)
                .map(|holder| CollisionError {
                    kind,
                    name: name.clone(),
                    first: holder.clone(),
                    second: owner.to_string(),
                })
        });
        if let Some(collision) = conflict {
            return Err(collision);
        }
        claims
            .file_names
            .insert(record.final_file_name.clone(), owner.to_string());
        claims
            .identifiers
            .insert(record.export_identifier.clone(), owner.to_string());
        Ok(())
    }

    /// Claims a name for `owner`, applying `policy` on collision.
    pub fn resolve(
        &self,
        namer: &Namer,
        owner: &str,
        record: NamingRecord,
        policy: CollisionPolicy,
    ) -> Resolution {
        let collision = match self.claim(owner, &record) {
            Ok(()) => return Resolution::Claimed(record),
            Err(collision) => collision,
        };
        warn!(
            kind = %collision.kind,
            name = %collision.name,
            first = %collision.first,
            second = %collision.second,
            ?policy,
            "Naming collision"
        );
        if policy != CollisionPolicy::Suffix {
            return Resolution::Collided(collision);
        }
        let mut n = 2;
        loop {
            let candidate = namer.disambiguate(&record, n);
            if self.claim(owner, &candidate).is_ok() {
                return Resolution::Claimed(candidate);
            }
            n += 1;
        }
    }
}

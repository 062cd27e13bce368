//! SVG to TypeScript conversion.
//!
//! For every normalized `<stem>.svg` the converter writes `<stem>.icon.ts`
//! declaring the icon under its bare symbol, plus a model file with the icon name
//! union and interface, plus a barrel file re-exporting everything. The export
//! rewriter prefixes the symbols afterwards.

use async_trait::async_trait;
use futures::future::try_join_all;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::config::{Delimiter, IconGenerationConfig};
use crate::contract::{ConversionManifest, Converter, IconSource};
use crate::error::ConvertError;

static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("between-tags pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

static WORD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s]+").expect("word separator pattern"));

/// Collapses the markup onto one line and escapes it for a single-quoted
/// TypeScript string literal.
pub fn svg_literal(svg: &str) -> String {
    let tight = BETWEEN_TAGS.replace_all(svg.trim(), "><");
    let single_line = WHITESPACE_RUN.replace_all(&tight, " ");
    single_line.replace('\\', "\\\\").replace('\'', "\\'")
}

/// The `name` value of an icon, cased per `delimiter`.
pub fn icon_name(stem: &str, delimiter: Delimiter) -> String {
    let words: Vec<String> = WORD_SEPARATOR
        .split(stem)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    match delimiter {
        Delimiter::Camel => words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
            .collect(),
        Delimiter::Kebab => words.join("-"),
        Delimiter::Snake => words.join("_"),
        Delimiter::Upper => words.join("_").to_uppercase(),
        Delimiter::None => stem.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn svg_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Writes icon declarations with the layout described in the module docs.
#[derive(Debug, Clone)]
pub struct TypeScriptConverter {
    config: IconGenerationConfig,
}

/// One icon ready to render.
struct Declaration<'a> {
    stem: String,
    symbol: &'a str,
    name: String,
    svg_path: &'a Path,
}

impl TypeScriptConverter {
    pub fn new(config: IconGenerationConfig) -> Self {
        Self { config }
    }

    pub fn render_icon(&self, symbol: &str, name: &str, svg: &str) -> String {
        format!(
            "export const {symbol}: {{\n  name: '{name}';\n  data: string;\n}} = {{\n  name: '{name}',\n  data: '{}'\n}};\n",
            svg_literal(svg)
        )
    }

    pub fn render_model(&self, names: &[String]) -> String {
        let union = if names.is_empty() {
            "never".to_string()
        } else {
            names
                .iter()
                .map(|n| format!("'{n}'"))
                .collect::<Vec<_>>()
                .join(" | ")
        };
        format!(
            "export type {type_name} = {union};\n\nexport interface {interface} {{\n  name: {type_name};\n  data: string;\n}}\n",
            type_name = self.config.type_name,
            interface = self.config.interface_name,
        )
    }

    /// Barrel lines for `(stem, symbol)` pairs, in the given order. With
    /// `export_complete_icon_set` the barrel also imports every icon and exports
    /// them as `completeIconSet`.
    pub fn render_barrel<'a>(&self, icons: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
        let icons: Vec<(&str, &str)> = icons.into_iter().collect();
        let mut out = String::new();
        for (stem, symbol) in &icons {
            out.push_str(&format!("export {{ {symbol} }} from './{stem}.icon';\n"));
        }
        if self.config.export_complete_icon_set {
            for (stem, symbol) in &icons {
                out.push_str(&format!("import {{ {symbol} }} from './{stem}.icon';\n"));
            }
            let symbols: Vec<&str> = icons.iter().map(|(_, symbol)| *symbol).collect();
            out.push_str(&format!(
                "export const completeIconSet = [{}];\n",
                symbols.join(", ")
            ));
        }
        if self.config.generate_type {
            out.push_str(&format!(
                "export type {{ {}, {} }} from './{}';\n",
                self.config.interface_name, self.config.type_name, self.config.model_file_name
            ));
        }
        out
    }

    async fn write_icon(&self, decl: &Declaration<'_>, out_dir: &Path) -> Result<PathBuf, ConvertError> {
        let svg = tokio::fs::read_to_string(decl.svg_path)
            .await
            .map_err(|source| ConvertError::Io {
                path: decl.svg_path.to_path_buf(),
                source,
            })?;
        let target = out_dir.join(format!("{}.icon.ts", decl.stem));
        write(&target, self.render_icon(decl.symbol, &decl.name, &svg)).await?;
        debug!(file = %target.display(), symbol = decl.symbol, "Generated icon declaration");
        Ok(target)
    }
}

async fn write(path: &Path, content: String) -> Result<(), ConvertError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Deletes generated `*.ts` files left over from an earlier run.
async fn remove_stale_sources(dir: &Path) -> Result<usize, ConvertError> {
    let io_error = |source| ConvertError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_error)?;
    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "ts") {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|source| ConvertError::Io {
                    path: path.clone(),
                    source,
                })?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[async_trait]
impl Converter for TypeScriptConverter {
    async fn convert(
        &self,
        icons: &[IconSource],
        out_dir: &Path,
    ) -> Result<ConversionManifest, ConvertError> {
        info!(icons = icons.len(), out_dir = %out_dir.display(), "Generating TypeScript sources");
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| ConvertError::Io {
                path: out_dir.to_path_buf(),
                source,
            })?;
        let removed = remove_stale_sources(out_dir).await?;
        debug!(removed, "Removed stale sources");

        let declarations: Vec<Declaration<'_>> = icons
            .iter()
            .map(|icon| {
                let stem = svg_stem(&icon.svg_path);
                Declaration {
                    name: icon_name(&stem, self.config.delimiter),
                    stem,
                    symbol: &icon.symbol,
                    svg_path: &icon.svg_path,
                }
            })
            .collect();

        let files = try_join_all(declarations.iter().map(|d| self.write_icon(d, out_dir))).await?;

        let model = if self.config.generate_type {
            let names: Vec<String> = declarations.iter().map(|d| d.name.clone()).collect();
            let path = out_dir.join(format!("{}.ts", self.config.model_file_name));
            write(&path, self.render_model(&names)).await?;
            Some(path)
        } else {
            None
        };

        let barrel = out_dir.join(format!("{}.ts", self.config.barrel_file_name));
        let barrel_source =
            self.render_barrel(declarations.iter().map(|d| (d.stem.as_str(), d.symbol)));
        write(&barrel, barrel_source).await?;

        info!(files = files.len(), barrel = %barrel.display(), "TypeScript sources generated");
        Ok(ConversionManifest {
            files,
            barrel,
            model,
        })
    }
}

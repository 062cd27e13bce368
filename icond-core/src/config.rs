use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::naming::{CollisionPolicy, DashPolicy};

/// Reference icon size. Files at this width carry no size suffix.
pub const CANONICAL_SIZE: u32 = 24;

/// The one configuration value threaded through every pipeline entry point.
///
/// Every field has a default (see the `Default` impls below), so a config file only
/// needs to name what it changes. `root` and `figma.token` never come from the file:
/// the loader fills them in from the config file location and the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Directory that relative paths are resolved against.
    #[serde(skip)]
    pub root: PathBuf,
    pub figma: FigmaConfig,
    pub output: OutputConfig,
    pub process: ProcessConfig,
    pub icon_generation: IconGenerationConfig,
    pub build: BuildConfig,
    pub library: LibraryConfig,
    pub publish: PublishConfig,
}

impl IconConfig {
    pub fn trace_loaded(&self) {
        info!(
            root = %self.root.display(),
            svg_dir = %self.svg_dir().display(),
            icons_dir = %self.icons_dir().display(),
            dist_dir = %self.dist_dir().display(),
            prefix = %self.icon_generation.prefix,
            "Loaded IconConfig"
        );
        debug!(?self, "IconConfig loaded (full debug)");
    }

    pub fn svg_dir(&self) -> PathBuf {
        self.root.join(&self.output.svg)
    }

    pub fn icons_dir(&self) -> PathBuf {
        self.root.join(&self.output.icons)
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(&self.output.dist)
    }

    /// Path of the generated barrel file, the bundler's entry point.
    pub fn entry_point(&self) -> PathBuf {
        self.icons_dir()
            .join(format!("{}.ts", self.icon_generation.barrel_file_name))
    }

    /// Sets the root directory used to resolve relative output paths.
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }
}

/// Figma file to export icon components from.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigmaConfig {
    /// Personal access token, injected from `FIGMA_TOKEN`.
    #[serde(skip)]
    pub token: Option<String>,
    pub file_id: String,
    /// Page names to export from. Empty means every page.
    pub pages: Vec<String>,
    pub api_base: String,
    /// Run exported files through svgo when set.
    pub svgo: Option<SvgoConfig>,
}

impl std::fmt::Debug for FigmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigmaConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("file_id", &self.file_id)
            .field("pages", &self.pages)
            .field("api_base", &self.api_base)
            .field("svgo", &self.svgo)
            .finish()
    }
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            token: None,
            file_id: String::new(),
            pages: Vec::new(),
            api_base: "https://api.figma.com/v1".to_string(),
            svgo: None,
        }
    }
}

/// svgo pass over freshly exported files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgoConfig {
    /// Plugin names, passed to svgo as its `plugins` list.
    pub plugins: Vec<String>,
    pub bin: String,
}

impl Default for SvgoConfig {
    fn default() -> Self {
        Self {
            plugins: Vec::new(),
            bin: "svgo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Raw and normalized SVG files.
    pub svg: PathBuf,
    /// Generated TypeScript declarations.
    pub icons: PathBuf,
    /// Bundled package.
    pub dist: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            svg: PathBuf::from("./src/svg"),
            icons: PathBuf::from("./src/icons"),
            dist: PathBuf::from("./dist"),
        }
    }
}

/// Settings for the normalization and naming pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub canonical_size: u32,
    pub collision_policy: CollisionPolicy,
    /// Write a synthesized `viewBox` into files that lack one.
    pub inject_view_box: bool,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            canonical_size: CANONICAL_SIZE,
            collision_policy: CollisionPolicy::default(),
            inject_view_box: false,
        }
    }
}

/// How the `name` literal of each generated icon is cased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Camel,
    Kebab,
    Snake,
    Upper,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconGenerationConfig {
    pub prefix: String,
    pub dash_policy: DashPolicy,
    pub interface_name: String,
    pub type_name: String,
    pub delimiter: Delimiter,
    pub barrel_file_name: String,
    pub model_file_name: String,
    pub generate_type: bool,
    /// Also export a `completeIconSet` array of every icon from the barrel.
    pub export_complete_icon_set: bool,
}

impl Default for IconGenerationConfig {
    fn default() -> Self {
        Self {
            prefix: "icon".to_string(),
            dash_policy: DashPolicy::default(),
            interface_name: "Icon".to_string(),
            type_name: "IconName".to_string(),
            delimiter: Delimiter::default(),
            barrel_file_name: "index".to_string(),
            model_file_name: "icon.model".to_string(),
            generate_type: true,
            export_complete_icon_set: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleFormat {
    Esm,
    Cjs,
}

impl BundleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleFormat::Esm => "esm",
            BundleFormat::Cjs => "cjs",
        }
    }

    /// Output file name inside the dist directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            BundleFormat::Esm => "index.js",
            BundleFormat::Cjs => "index.cjs",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub formats: Vec<BundleFormat>,
    pub minify: bool,
    pub sourcemap: bool,
    pub target: String,
    pub esbuild_bin: String,
    pub tsc_bin: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            formats: vec![BundleFormat::Esm, BundleFormat::Cjs],
            minify: true,
            sourcemap: true,
            target: "es2020".to_string(),
            esbuild_bin: "esbuild".to_string(),
            tsc_bin: "tsc".to_string(),
        }
    }
}

/// Metadata for the published npm package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub license: String,
    pub author: Option<String>,
    pub keywords: Vec<String>,
    pub repository: Option<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: "@your-org/icons".to_string(),
            version: "1.0.0".to_string(),
            description: None,
            license: "MIT".to_string(),
            author: None,
            keywords: Vec::new(),
            repository: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub access: String,
    pub registry: String,
    pub tag: Option<String>,
    pub npm_bin: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            access: "public".to_string(),
            registry: "https://registry.npmjs.org".to_string(),
            tag: None,
            npm_bin: "npm".to_string(),
        }
    }
}

//! `package.json` and `README.md` for the published library.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::LibraryConfig;
use crate::error::BuildError;

const DEFAULT_KEYWORDS: [&str; 3] = ["icons", "svg", "typescript"];

#[derive(Debug, Serialize)]
pub struct ExportTarget {
    pub import: String,
    pub require: String,
    pub types: String,
}

#[derive(Debug, Serialize)]
pub struct Repository {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Serialized field order is the order npm users expect to read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub main: String,
    pub module: String,
    pub types: String,
    pub exports: BTreeMap<String, ExportTarget>,
    pub side_effects: bool,
    pub files: Vec<String>,
    pub keywords: Vec<String>,
    pub author: String,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
}

impl PackageManifest {
    pub fn from_library(library: &LibraryConfig) -> Self {
        let exports = BTreeMap::from([
            (
                ".".to_string(),
                ExportTarget {
                    import: "./index.js".to_string(),
                    require: "./index.cjs".to_string(),
                    types: "./index.d.ts".to_string(),
                },
            ),
            (
                "./*.icon".to_string(),
                ExportTarget {
                    import: "./*.icon.js".to_string(),
                    require: "./*.icon.cjs".to_string(),
                    types: "./*.icon.d.ts".to_string(),
                },
            ),
        ]);
        let keywords = if library.keywords.is_empty() {
            DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
        } else {
            library.keywords.clone()
        };
        Self {
            name: library.name.clone(),
            version: library.version.clone(),
            description: library
                .description
                .clone()
                .unwrap_or_else(|| format!("{} - Icon library", library.name)),
            module_type: "module".to_string(),
            main: "./index.cjs".to_string(),
            module: "./index.js".to_string(),
            types: "./index.d.ts".to_string(),
            exports,
            side_effects: false,
            files: ["**/*.js", "**/*.cjs", "**/*.d.ts", "**/*.d.cts"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
            keywords,
            author: library.author.clone().unwrap_or_default(),
            license: library.license.clone(),
            repository: library.repository.as_ref().map(|url| Repository {
                kind: "git".to_string(),
                url: url.clone(),
            }),
        }
    }
}

pub fn package_json(library: &LibraryConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PackageManifest::from_library(library))
}

pub fn readme(library: &LibraryConfig) -> String {
    let name = &library.name;
    let description = library
        .description
        .as_deref()
        .unwrap_or("Icon library generated from Figma");
    format!(
        r#"# {name}

{description}

## Installation

```bash
npm install {name}
# or
pnpm add {name}
# or
yarn add {name}
```

## Usage

### Import all icons

```typescript
import {{ iconHome, iconUser, type IconName }} from '{name}';

console.log(iconHome.data); // '<svg>...</svg>'
console.log(iconHome.name); // 'home'
```

### Import individual icons (tree-shakable)

```typescript
import {{ iconHome }} from '{name}/home.icon';
```

### Vanilla JS

```javascript
import {{ iconHome }} from '{name}';

document.getElementById('icon').innerHTML = iconHome.data;
```

## Type Safety

All icon names are exported as a TypeScript type:

```typescript
import type {{ IconName }} from '{name}';

const iconName: IconName = 'home';
```

## Tree Shaking

Only the icons you import end up in your bundle.

## License

{license}
"#,
        license = library.license,
    )
}

/// Writes `package.json` and `README.md` into `dist`, returning their paths.
pub async fn write_package_files(library: &LibraryConfig, dist: &Path) -> Result<Vec<PathBuf>, BuildError> {
    tokio::fs::create_dir_all(dist)
        .await
        .map_err(|source| BuildError::Package {
            path: dist.to_path_buf(),
            source,
        })?;
    let files = [
        (dist.join("package.json"), package_json(library)?),
        (dist.join("README.md"), readme(library)),
    ];
    let mut written = Vec::with_capacity(files.len());
    for (path, content) in files {
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| BuildError::Package {
                path: path.clone(),
                source,
            })?;
        written.push(path);
    }
    info!(name = %library.name, version = %library.version, dist = %dist.display(), "Wrote package files");
    Ok(written)
}

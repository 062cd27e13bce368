//! Exporting icon components from a Figma file as SVG.
//!
//! The file's document tree is fetched once and walked for `COMPONENT` nodes on
//! the selected pages. Their SVG renders are then resolved through the images
//! endpoint in batches and downloaded concurrently.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::config::FigmaConfig;
use crate::contract::{ExportManifest, Exporter};
use crate::error::FetchError;

/// Node ids per images request.
const IMAGE_BATCH_SIZE: usize = 100;

/// An icon component found in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub page: String,
}

impl Component {
    /// File name for the exported SVG: the part of the component name after its
    /// last `/`, so `Navigation/Arrow Left` becomes `Arrow Left.svg`.
    pub fn file_name(&self) -> String {
        format!("{}.svg", component_basename(&self.name))
    }
}

pub fn component_basename(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name).trim()
}

/// Every `COMPONENT` node on the `CANVAS` pages of `document`, restricted to
/// `pages` unless it is empty. Components are not searched for nested components.
pub fn collect_components(file: &Value, pages: &[String]) -> Vec<Component> {
    let wanted: HashSet<&str> = pages.iter().map(String::as_str).collect();
    let canvases = file
        .pointer("/document/children")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|node| node.get("type").and_then(Value::as_str) == Some("CANVAS"));

    let mut found = Vec::new();
    for canvas in canvases {
        let page = canvas.get("name").and_then(Value::as_str).unwrap_or_default();
        if !wanted.is_empty() && !wanted.contains(page) {
            continue;
        }
        walk(canvas, page, &mut found);
    }
    found
}

fn walk(node: &Value, page: &str, found: &mut Vec<Component>) {
    let Some(children) = node.get("children").and_then(Value::as_array) else {
        return;
    };
    for child in children {
        if child.get("type").and_then(Value::as_str) == Some("COMPONENT") {
            let id = child.get("id").and_then(Value::as_str);
            let name = child.get("name").and_then(Value::as_str);
            if let (Some(id), Some(name)) = (id, name) {
                found.push(Component {
                    id: id.to_string(),
                    name: name.to_string(),
                    page: page.to_string(),
                });
            }
        } else {
            walk(child, page, found);
        }
    }
}

pub struct FigmaExporter {
    config: FigmaConfig,
    output_dir: PathBuf,
    client: reqwest::Client,
}

impl FigmaExporter {
    pub fn new(config: FigmaConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
            client: reqwest::Client::new(),
        }
    }

    fn token(&self) -> Result<&str, FetchError> {
        self.config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(FetchError::MissingToken)
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url = %url, "Figma API request");
        let resp = self
            .client
            .get(url)
            .header("X-Figma-Token", self.token()?)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(status = %status, url = %url, "Figma API returned error");
            return Err(FetchError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(resp.json::<Value>().await?)
    }

    /// Resolves render URLs for a batch of node ids. Nodes Figma could not
    /// render come back without a URL and are skipped.
    async fn image_urls(&self, ids: &[&str]) -> Result<Vec<(String, String)>, FetchError> {
        let url = format!(
            "{}/images/{}?ids={}&format=svg",
            self.api_base(),
            self.config.file_id,
            ids.join(",")
        );
        let json = self.get_json(&url).await?;
        if let Some(err) = json.get("err").and_then(Value::as_str) {
            return Err(FetchError::Export(err.to_string()));
        }
        let images = json
            .get("images")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let mut urls = Vec::with_capacity(images.len());
        for (id, value) in images {
            match value.as_str() {
                Some(url) => urls.push((id, url.to_string())),
                None => warn!(node_id = %id, "Figma returned no render for node"),
            }
        }
        Ok(urls)
    }

    async fn download_svg(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "SVG download failed");
            return Err(FetchError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.text().await?)
    }

    fn api_base(&self) -> &str {
        self.config.api_base.trim_end_matches('/')
    }
}

#[async_trait]
impl Exporter for FigmaExporter {
    async fn export_all(&self) -> Result<ExportManifest, FetchError> {
        self.token()?;
        if self.config.file_id.trim().is_empty() {
            return Err(FetchError::MissingFileId);
        }
        info!(file_id = %self.config.file_id, pages = ?self.config.pages, "Fetching icons from Figma");

        let file_url = format!("{}/files/{}", self.api_base(), self.config.file_id);
        let document = self.get_json(&file_url).await?;
        let components = collect_components(&document, &self.config.pages);
        info!(count = components.len(), "Found icon components");

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| FetchError::Io {
                path: self.output_dir.clone(),
                source,
            })?;

        let ids: Vec<&str> = components.iter().map(|c| c.id.as_str()).collect();
        let batches = try_join_all(ids.chunks(IMAGE_BATCH_SIZE).map(|batch| self.image_urls(batch))).await?;
        let urls: Vec<(String, String)> = batches.into_iter().flatten().collect();

        let bodies = try_join_all(urls.iter().map(|(_, url)| self.download_svg(url))).await?;

        let mut files = Vec::with_capacity(bodies.len());
        let mut seen = HashSet::new();
        for ((id, _), body) in urls.iter().zip(bodies) {
            let Some(component) = components.iter().find(|c| &c.id == id) else {
                continue;
            };
            let path = self.output_dir.join(component.file_name());
            if !seen.insert(path.clone()) {
                warn!(component = %component.name, path = %path.display(), "Duplicate component name, later export wins");
            }
            tokio::fs::write(&path, body)
                .await
                .map_err(|source| FetchError::Io {
                    path: path.clone(),
                    source,
                })?;
            debug!(component = %component.name, path = %path.display(), "Exported SVG");
            files.push(path);
        }
        files.sort();
        files.dedup();

        info!(files = files.len(), output_dir = %self.output_dir.display(), "Figma export complete");
        Ok(ExportManifest { files })
    }
}

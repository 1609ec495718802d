//! Rasterization collaborator: turns preview markup into an image data URI.
//!
//! Rasterizing HTML needs a browser engine, so the service delegates it over
//! HTTP to a rasterizer endpoint (a headless-browser sidecar). When no
//! endpoint is configured every request fails, which the export bridge
//! reports like any other rasterization failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::export::ExportError;

/// Rendering parameters handed to the rasterizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterOptions {
    pub quality: f32,
    #[serde(rename = "bgcolor")]
    pub background: String,
    pub width: u32,
    pub height: u32,
}

impl RasterOptions {
    /// Full-quality capture on a white background at the preview's pixel size.
    pub fn for_preview(width: u32, height: u32) -> Self {
        Self {
            quality: 1.0,
            background: "#ffffff".to_string(),
            width,
            height,
        }
    }
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Returns a `data:image/...;base64,` URI of the rendered markup.
    async fn rasterize(&self, markup: &str, options: &RasterOptions) -> Result<String, ExportError>;
}

#[derive(Debug, Serialize)]
struct RasterRequest<'a> {
    html: &'a str,
    #[serde(flatten)]
    options: &'a RasterOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RasterResponse {
    data_url: String,
}

/// Rasterizer backed by an HTTP endpoint accepting `{html, quality, bgcolor, width, height}`
/// and answering `{"dataUrl": "..."}`.
#[derive(Clone)]
pub struct HttpRasterizer {
    client: Client,
    endpoint: String,
}

impl HttpRasterizer {
    pub fn new(endpoint: String) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| ExportError::Rasterization(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Rasterizer for HttpRasterizer {
    async fn rasterize(&self, markup: &str, options: &RasterOptions) -> Result<String, ExportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RasterRequest {
                html: markup,
                options,
            })
            .send()
            .await
            .map_err(|e| ExportError::Rasterization(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Rasterization(format!(
                "rasterizer returned {status}: {body}"
            )));
        }

        let body: RasterResponse = response
            .json()
            .await
            .map_err(|e| ExportError::Rasterization(e.to_string()))?;
        debug!(bytes = body.data_url.len(), "Rasterizer returned image");
        Ok(body.data_url)
    }
}

/// Stand-in used when no rasterizer endpoint is configured.
pub struct UnconfiguredRasterizer;

#[async_trait]
impl Rasterizer for UnconfiguredRasterizer {
    async fn rasterize(&self, _markup: &str, _options: &RasterOptions) -> Result<String, ExportError> {
        Err(ExportError::Rasterization(
            "no rasterizer is configured (set RASTERIZER_URL)".to_string(),
        ))
    }
}

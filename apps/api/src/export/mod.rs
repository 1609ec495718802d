// Export bridge: hands the rendered preview to the rasterization and
// document-encoding collaborators, and wraps preview markup into a .doc file.
// PDF encoding is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod encoder;
pub mod rasterizer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info};

pub use encoder::{LopdfEncoder, PageEncoder, PageGeometry};
pub use rasterizer::{HttpRasterizer, RasterOptions, Rasterizer, UnconfiguredRasterizer};

pub const PDF_FILENAME: &str = "resume.pdf";
pub const DOC_FILENAME: &str = "resume.doc";

const DOC_STYLES: &str = r#"<style>
body{font-family:Arial,sans-serif;font-size:12pt;color:#333;}
h1{font-size:24pt;color:#0056b3;margin:0;} h2{font-size:14pt;color:#0056b3;margin-top:0;}
h3{font-size:14pt;border-bottom:1px solid #ccc;padding-bottom:2px;margin-top:20px;}
p{margin:5px 0;} .resume-contact{display:flex;justify-content:center;gap:20px;margin:10px 0;}
.item-header{display:flex;justify-content:space-between;} .item-title{font-weight:bold;}
.skills-container{display:flex;flex-wrap:wrap;gap:10px;margin-top:10px;}
.skill-badge{display:inline-block;background-color:#e0e0e0;color:#333;padding:5px 12px;border-radius:15px;font-size:10pt;margin:2px;}
</style>"#;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("An export of this kind is already in progress")]
    InProgress,

    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    #[error("Document encoding failed: {0}")]
    Encoding(String),
}

/// A downloadable file produced by an export.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// Per-action latch refusing a second export while one is in flight.
#[derive(Debug, Default)]
pub struct ExportLatch {
    busy: AtomicBool,
}

impl ExportLatch {
    pub fn try_acquire(&self) -> Option<LatchGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LatchGuard { latch: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the latch when dropped, whether the export succeeded or failed.
pub struct LatchGuard<'a> {
    latch: &'a ExportLatch,
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.busy.store(false, Ordering::Release);
    }
}

pub struct ExportBridge {
    rasterizer: Arc<dyn Rasterizer>,
    encoder: Arc<dyn PageEncoder>,
    page: PageGeometry,
    pdf_latch: ExportLatch,
}

impl ExportBridge {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, encoder: Arc<dyn PageEncoder>) -> Self {
        Self {
            rasterizer,
            encoder,
            page: PageGeometry::A4,
            pdf_latch: ExportLatch::default(),
        }
    }

    pub fn pdf_in_progress(&self) -> bool {
        self.pdf_latch.is_busy()
    }

    /// Rasterizes `preview_html` and encodes it as a one-page PDF.
    ///
    /// Fails with `InProgress` while another PDF export is running. Failures are
    /// not retried.
    pub async fn export_pdf(
        &self,
        preview_html: &str,
        options: RasterOptions,
    ) -> Result<ExportArtifact, ExportError> {
        let _guard = self.pdf_latch.try_acquire().ok_or(ExportError::InProgress)?;

        let data_uri = self
            .rasterizer
            .rasterize(preview_html, &options)
            .await
            .inspect_err(|e| error!("PDF generation failed: {e}"))?;

        let encoder = Arc::clone(&self.encoder);
        let page = self.page;
        let bytes = tokio::task::spawn_blocking(move || encoder.encode(&page, &data_uri))
            .await
            .map_err(|e| ExportError::Encoding(format!("encoder task failed: {e}")))?
            .inspect_err(|e| error!("PDF generation failed: {e}"))?;

        info!(bytes = bytes.len(), "PDF export complete");
        Ok(ExportArtifact {
            filename: PDF_FILENAME,
            content_type: "application/pdf",
            bytes: Bytes::from(bytes),
        })
    }

    /// Wraps the preview markup with the fixed .doc style sheet.
    pub fn export_doc(&self, preview_html: &str) -> ExportArtifact {
        ExportArtifact {
            filename: DOC_FILENAME,
            content_type: "application/msword",
            bytes: Bytes::from(wrap_doc(preview_html)),
        }
    }
}

fn wrap_doc(preview_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="UTF-8">{DOC_STYLES}</head><body>{preview_html}</body></html>"#
    )
}

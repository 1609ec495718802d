//! Document-encoding collaborator: places a rasterized preview on a PDF page.
//!
//! The image is scaled to the full page width with its aspect ratio preserved
//! and anchored at the top-left corner. Tall previews run past the bottom edge
//! of the single page, exactly as the rasterized capture would.

use base64::Engine;
use lopdf::{dictionary, Document as PdfDocument, Object, Stream};

use crate::export::ExportError;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageGeometry {
    /// A4 portrait.
    pub const A4: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    /// Size of an image of `image_width` × `image_height` pixels scaled to the page width.
    pub fn fit_to_width(&self, image_width: u32, image_height: u32) -> (f32, f32) {
        let ratio = image_width as f32 / image_height.max(1) as f32;
        (self.width_mm, self.width_mm / ratio)
    }
}

pub trait PageEncoder: Send + Sync {
    /// Encodes the image behind `data_uri` onto a page and returns the file bytes.
    fn encode(&self, page: &PageGeometry, data_uri: &str) -> Result<Vec<u8>, ExportError>;
}

/// Writes a single-page PDF with the image as an RGB XObject.
pub struct LopdfEncoder;

impl PageEncoder for LopdfEncoder {
    fn encode(&self, page: &PageGeometry, data_uri: &str) -> Result<Vec<u8>, ExportError> {
        let bytes = decode_data_uri(data_uri)?;
        let rgb = image::load_from_memory(&bytes)
            .map_err(|e| ExportError::Encoding(format!("unreadable image: {e}")))?
            .to_rgb8();
        let (pixel_w, pixel_h) = rgb.dimensions();
        let (image_w_mm, image_h_mm) = page.fit_to_width(pixel_w, pixel_h);

        let page_w = page.width_mm * POINTS_PER_MM;
        let page_h = page.height_mm * POINTS_PER_MM;
        let image_w = image_w_mm * POINTS_PER_MM;
        let image_h = image_h_mm * POINTS_PER_MM;

        let mut doc = PdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(pixel_w),
                "Height" => i64::from(pixel_h),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            rgb.into_raw(),
        ));

        let content = format!(
            "q {image_w:.2} 0 0 {image_h:.2} 0 {:.2} cm /Im0 Do Q",
            page_h - image_h
        );
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        });

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), page_w.into(), page_h.into()],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1_i64,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| ExportError::Encoding(format!("failed to write PDF: {e}")))?;
        Ok(out)
    }
}

/// Extracts the payload of a base64 `data:` URI.
fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, ExportError> {
    let payload = data_uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| ExportError::Encoding("expected a base64 data URI".to_string()))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ExportError::Encoding(format!("invalid base64 image: {e}")))
}

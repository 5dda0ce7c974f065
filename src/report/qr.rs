//! QR code rasterisation
//!
//! The code is drawn to a temporary PNG which the renderer loads and embeds.
//! The temp file is removed when the returned handle is closed or dropped.

use printpdf::image_crate::{self, DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use tempfile::NamedTempFile;

use crate::error::ReportError;

/// Pixels per QR module
const MODULE_PX: u32 = 8;
/// Light border around the code, in modules
const QUIET_ZONE: u32 = 4;

pub fn rasterize(payload: &str) -> Result<GrayImage, ReportError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| ReportError::Qr(e.to_string()))?;
    let width = code.width() as u32;
    let colors = code.to_colors();
    let side = (width + 2 * QUIET_ZONE) * MODULE_PX;

    Ok(GrayImage::from_fn(side, side, |x, y| {
        let mx = (x / MODULE_PX) as i64 - QUIET_ZONE as i64;
        let my = (y / MODULE_PX) as i64 - QUIET_ZONE as i64;
        let dark = mx >= 0
            && my >= 0
            && (mx as u32) < width
            && (my as u32) < width
            && colors[(my as u32 * width + mx as u32) as usize] == Color::Dark;
        Luma([if dark { 0 } else { 255 }])
    }))
}

/// Write the QR code for `payload` to a temporary PNG file
pub fn to_temp_png(payload: &str) -> Result<NamedTempFile, ReportError> {
    let image = rasterize(payload)?;
    let temp = tempfile::Builder::new().prefix("persona-qr-").suffix(".png").tempfile()?;
    image
        .save_with_format(temp.path(), ImageFormat::Png)
        .map_err(|e| ReportError::Image {
            path: temp.path().to_path_buf(),
            reason: e.to_string(),
        })?;
    log::debug!("Wrote QR code to {}", temp.path().display());
    Ok(temp)
}

/// Load a raster image from disk as RGB, ready for embedding
pub fn load_rgb(path: &std::path::Path) -> Result<DynamicImage, ReportError> {
    let image = image_crate::open(path).map_err(|e| ReportError::Image {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

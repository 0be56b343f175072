//! QR image rendering.
//!
//! [`ImageEncoder`] is the seam between channel bookkeeping and the actual
//! QR library. The default [`QrPngEncoder`] uses the `qrcode` crate for the
//! symbol and `image` for the PNG, and scales the symbol so the output is
//! exactly [`RenderOptions::width`] pixels wide whenever that is at least one
//! pixel per module.

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// Default output width in pixels.
pub const DEFAULT_WIDTH: u32 = 280;

/// Default quiet zone in modules.
pub const DEFAULT_MARGIN: u32 = 2;

/// Default foreground color.
pub const DEFAULT_DARK: &str = "#000000";

/// Default background color.
pub const DEFAULT_LIGHT: &str = "#FFFFFF";

/// Pixels per module when the requested width is too small to honor.
const FALLBACK_SCALE: f64 = 4.0;

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// ~7% recovery.
    #[serde(alias = "L")]
    Low,
    /// ~15% recovery.
    #[default]
    #[serde(alias = "M")]
    Medium,
    /// ~25% recovery.
    #[serde(alias = "Q")]
    Quartile,
    /// ~30% recovery.
    #[serde(alias = "H")]
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(ec: ErrorCorrection) -> Self {
        match ec {
            ErrorCorrection::Low => Self::L,
            ErrorCorrection::Medium => Self::M,
            ErrorCorrection::Quartile => Self::Q,
            ErrorCorrection::High => Self::H,
        }
    }
}

/// Rendering parameters handed to the encoder with every payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Output width (and height) in pixels.
    pub width: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin: u32,
    /// Foreground color as a hex string.
    pub dark: String,
    /// Background color as a hex string.
    pub light: String,
    /// Error correction level.
    pub error_correction: ErrorCorrection,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
            dark: DEFAULT_DARK.to_string(),
            light: DEFAULT_LIGHT.to_string(),
            error_correction: ErrorCorrection::default(),
        }
    }
}

impl RenderOptions {
    /// Parse both colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] if either color is malformed.
    pub fn colors(&self) -> Result<(Rgba<u8>, Rgba<u8>)> {
        Ok((parse_hex_color(&self.dark)?, parse_hex_color(&self.light)?))
    }
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
///
/// # Errors
///
/// Returns [`Error::InvalidColor`] for any other shape or non-hex digits.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>> {
    let invalid = |reason| Error::InvalidColor {
        value: value.to_string(),
        reason,
    };

    let hex = value.strip_prefix('#').unwrap_or(value);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }

    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return Err(invalid("expected 3, 4, 6 or 8 hex digits")),
    };

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid("bad hex digit"))
    };
    let alpha = if expanded.len() == 8 { channel(6)? } else { 0xFF };

    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// A rendered QR image: a self-contained PNG.
#[derive(Clone, PartialEq, Eq)]
pub struct QrImage {
    png: Vec<u8>,
    width: u32,
}

impl QrImage {
    /// The encoded PNG bytes.
    #[must_use]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Width and height in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The image as a `data:image/png;base64,...` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&self.png)
        )
    }

    /// Write the PNG to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.png)?;
        Ok(())
    }
}

impl std::fmt::Debug for QrImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrImage")
            .field("width", &self.width)
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// Something that turns a payload into a QR image.
#[async_trait]
pub trait ImageEncoder: Send + Sync {
    /// Encode `payload` with the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded or rendered.
    async fn encode(&self, payload: &str, options: &RenderOptions) -> Result<QrImage>;
}

/// PNG encoder backed by the `qrcode` crate.
///
/// Rasterization runs on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrPngEncoder;

impl QrPngEncoder {
    /// Create the encoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageEncoder for QrPngEncoder {
    async fn encode(&self, payload: &str, options: &RenderOptions) -> Result<QrImage> {
        let payload = payload.to_string();
        let options = options.clone();
        tokio::task::spawn_blocking(move || render_png(&payload, &options))
            .await
            .map_err(|e| Error::internal(format!("encode task failed: {e}")))?
    }
}

/// Encode `payload` as a PNG QR image, synchronously.
///
/// # Errors
///
/// Returns an error for malformed colors, payloads too long for a QR code,
/// or PNG encoding failures.
pub fn render_png(payload: &str, options: &RenderOptions) -> Result<QrImage> {
    let (dark, light) = options.colors()?;
    let code = QrCode::with_error_correction_level(payload, options.error_correction.into())
        .map_err(|e| Error::encode(payload, e.to_string()))?;

    let raster = rasterize(&code, options.width, options.margin, dark, light);
    let width = raster.width();

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(raster).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    trace!(
        "Rendered {}px QR code ({} modules) for {} byte payload",
        width,
        code.width(),
        payload.len()
    );
    Ok(QrImage { png, width })
}

/// Paint the symbol into an RGBA buffer.
///
/// The scale is `width / (modules + 2 * margin)` so the image is exactly
/// `width` pixels, unless that would be under one pixel per module, in which
/// case a fixed scale is used.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn rasterize(code: &QrCode, width: u32, margin: u32, dark: Rgba<u8>, light: Rgba<u8>) -> RgbaImage {
    let size = code.width();
    let colors = code.to_colors();
    let total_modules = size as u32 + margin * 2;

    let (scale, image_width) = if width >= total_modules {
        (f64::from(width) / f64::from(total_modules), width)
    } else {
        (
            FALLBACK_SCALE,
            (f64::from(total_modules) * FALLBACK_SCALE) as u32,
        )
    };
    // Bounds stay fractional so the quiet zone is never painted.
    let scaled_margin = f64::from(margin) * scale;
    let far_edge = f64::from(image_width) - scaled_margin;

    RgbaImage::from_fn(image_width, image_width, |x, y| {
        let (x, y) = (f64::from(x), f64::from(y));
        if x < scaled_margin || y < scaled_margin || x >= far_edge || y >= far_edge {
            return light;
        }
        let col = (((x - scaled_margin) / scale).floor() as usize).min(size - 1);
        let row = (((y - scaled_margin) / scale).floor() as usize).min(size - 1);
        if colors[row * size + col] == qrcode::Color::Dark {
            dark
        } else {
            light
        }
    })
}

/// Render `payload` for a terminal using half-block characters.
///
/// Colors are inverted so the code scans on dark terminal backgrounds.
///
/// # Errors
///
/// Returns an error if the payload cannot be encoded.
pub fn to_terminal_string(payload: &str, error_correction: ErrorCorrection) -> Result<String> {
    let code = QrCode::with_error_correction_level(payload, error_correction.into())
        .map_err(|e| Error::encode(payload, e.to_string()))?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

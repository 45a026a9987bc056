//! QR image rendering.
//!
//! Builds the QR matrix for a payload, rasterizes it black-on-white and
//! resizes the result to the exact requested square size with Lanczos3.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::payload::WifiPayload;

/// Target pixels are divided by this to get the per-module box size.
const BOX_SIZE_DIVISOR: u32 = 25;
/// Quiet zone around the symbol, in modules.
pub const QUIET_ZONE_MODULES: u32 = 2;
/// Largest accepted output size. Bounds the intermediate raster.
pub const MAX_SIZE: u32 = 2048;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// QR redundancy level, resolved from its single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    #[default]
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

impl ErrorCorrection {
    pub const ALL: [Self; 4] = [Self::L, Self::M, Self::Q, Self::H];

    pub fn code(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }

    pub fn ec_level(self) -> EcLevel {
        match self {
            Self::L => EcLevel::L,
            Self::M => EcLevel::M,
            Self::Q => EcLevel::Q,
            Self::H => EcLevel::H,
        }
    }

    /// Approximate share of codewords that can be restored.
    pub fn recovery_percent(self) -> u8 {
        match self {
            Self::L => 7,
            Self::M => 15,
            Self::Q => 25,
            Self::H => 30,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.code() == code)
            .ok_or_else(|| Error::UnknownErrorCorrection(s.to_string()))
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parameters for a single render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Final width and height of the image in pixels.
    pub size: u32,
    /// Level code, looked up when rendering.
    pub error_correction: String,
    pub output_path: PathBuf,
}

/// Pixels per module before the final resize. Never zero.
pub fn box_size(size: u32) -> u32 {
    (size / BOX_SIZE_DIVISOR).max(1)
}

/// Render `payload` to `options.output_path`.
///
/// Failures are logged and reported as `false`; nothing is propagated.
pub fn render(payload: &WifiPayload, options: &RenderOptions) -> bool {
    match try_render(payload, options) {
        Ok(()) => {
            info!(path = %options.output_path.display(), size = options.size, "QR code saved");
            true
        }
        Err(err) => {
            error!(
                error = %err,
                path = %options.output_path.display(),
                "failed to generate QR code"
            );
            false
        }
    }
}

/// Fallible core of [`render`].
pub fn try_render(payload: &WifiPayload, options: &RenderOptions) -> Result<()> {
    let image = build_image(payload, options)?;
    save_png(&image, &options.output_path)
}

/// Encode and rasterize without touching the filesystem.
pub fn build_image(payload: &WifiPayload, options: &RenderOptions) -> Result<GrayImage> {
    if options.size == 0 || options.size > MAX_SIZE {
        return Err(Error::InvalidSize(options.size));
    }
    let level: ErrorCorrection = options.error_correction.parse()?;
    let code = QrCode::with_error_correction_level(payload.as_bytes(), level.ec_level())?;
    let scale = box_size(options.size);
    debug!(
        version = ?code.version(),
        modules = code.width(),
        box_size = scale,
        level = %level,
        recovery_percent = level.recovery_percent(),
        "QR matrix built"
    );
    let raster = rasterize(&code, scale, QUIET_ZONE_MODULES)?;
    Ok(resize_square(&raster, options.size))
}

/// Paint each dark module as a `scale`-pixel square inside a light quiet zone.
pub fn rasterize(code: &QrCode, scale: u32, quiet_zone: u32) -> Result<GrayImage> {
    let modules = code.width() as u32;
    let side = quiet_zone
        .checked_mul(2)
        .and_then(|border| border.checked_add(modules))
        .and_then(|span| span.checked_mul(scale))
        .ok_or(Error::InvalidSize(scale))?;
    let mut img = GrayImage::from_pixel(side, side, LIGHT);

    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let x = (i as u32 % modules + quiet_zone) * scale;
        let y = (i as u32 / modules + quiet_zone) * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(x + dx, y + dy, DARK);
            }
        }
    }
    Ok(img)
}

/// Force the image to exactly `size` x `size`.
fn resize_square(img: &GrayImage, size: u32) -> GrayImage {
    if img.width() == size && img.height() == size {
        debug!(size, "raster already at target size, skipping resize");
        return img.clone();
    }
    debug!(
        orig_w = img.width(),
        orig_h = img.height(),
        size,
        "resizing QR raster"
    );
    imageops::resize(img, size, size, FilterType::Lanczos3)
}

fn save_png(img: &GrayImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

use thiserror::Error;

/// Library error type for QR generation.
///
/// Every variant is caught at the render boundary and reported as a `false`
/// outcome; callers of [`crate::render::try_render`] see the detail.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured error-correction code is not one of L, M, Q or H.
    #[error("unknown error-correction level: {0:?}")]
    UnknownErrorCorrection(String),

    /// Requested image size was zero or above the supported maximum.
    #[error("invalid image size: {0}px")]
    InvalidSize(u32),

    /// Output filename is empty, absolute, or escapes the output directory.
    #[error("invalid output filename: {0:?}")]
    InvalidFilename(String),

    /// Payload does not fit in any QR symbol version at the chosen level.
    #[error("failed to encode QR symbol: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// Rasterizing or writing the image failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Text handed to the payload parser is not a WiFi-QR payload.
    #[error("malformed WiFi payload: {0}")]
    Payload(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

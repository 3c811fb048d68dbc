//! QR self-card rendering.
//!
//! # Responsibility
//! - Encode a text payload as a QR code image (PNG, SVG or terminal text).
//!
//! # Invariants
//! - Rendered output encodes the payload bytes unchanged.
//! - PNG output is square and at least `min_size` pixels per side.
//! - `min_size` above `MAX_QR_SIZE` is rejected before rendering.

use image::{ImageFormat, Luma};
use qrcode::render::{svg, unicode};
use qrcode::types::QrError as EncodeError;
use qrcode::QrCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Cursor;

/// Default side length used by the profile screen.
pub const DEFAULT_QR_SIZE: u32 = 200;
/// Largest side length accepted by the renderers.
pub const MAX_QR_SIZE: u32 = 4096;

/// QR rendering errors.
#[derive(Debug)]
pub enum QrError {
    /// Payload does not fit in any QR version.
    Encode(EncodeError),
    /// PNG encoding failed.
    Image(image::ImageError),
    /// Requested side length exceeds `MAX_QR_SIZE`.
    SizeTooLarge { requested: u32 },
}

impl Display for QrError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "qr encode failed: {err}"),
            Self::Image(err) => write!(f, "qr image encode failed: {err}"),
            Self::SizeTooLarge { requested } => write!(
                f,
                "qr size {requested}px exceeds maximum {MAX_QR_SIZE}px"
            ),
        }
    }
}

impl Error for QrError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Image(err) => Some(err),
            Self::SizeTooLarge { .. } => None,
        }
    }
}

impl From<EncodeError> for QrError {
    fn from(value: EncodeError) -> Self {
        Self::Encode(value)
    }
}

impl From<image::ImageError> for QrError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

/// Renders `payload` as PNG bytes, at least `min_size` pixels square.
pub fn render_png(payload: &str, min_size: u32) -> Result<Vec<u8>, QrError> {
    check_size(min_size)?;
    let code = QrCode::new(payload.as_bytes())?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(min_size, min_size)
        .build();

    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Renders `payload` as a standalone SVG document.
pub fn render_svg(payload: &str, min_size: u32) -> Result<String, QrError> {
    check_size(min_size)?;
    let code = QrCode::new(payload.as_bytes())?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(min_size, min_size)
        .build())
}

/// Renders `payload` with unicode half blocks for terminal display.
pub fn render_terminal(payload: &str) -> Result<String, QrError> {
    let code = QrCode::new(payload.as_bytes())?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

fn check_size(min_size: u32) -> Result<(), QrError> {
    if min_size > MAX_QR_SIZE {
        return Err(QrError::SizeTooLarge {
            requested: min_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        render_png, render_svg, render_terminal, QrError, DEFAULT_QR_SIZE, MAX_QR_SIZE,
    };

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn png_output_has_signature_and_minimum_size() {
        let bytes = render_png("Anonymous\nyou@yoursite.com", DEFAULT_QR_SIZE).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), decoded.height());
        assert!(decoded.width() >= DEFAULT_QR_SIZE);
    }

    #[test]
    fn svg_output_is_a_document() {
        let svg = render_svg("A\nb@x.com", 64).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn terminal_output_is_multiline() {
        let text = render_terminal("A\nb@x.com").unwrap();
        assert!(text.lines().count() > 5);
    }

    #[test]
    fn oversized_payload_is_an_encode_error() {
        let payload = "x".repeat(8_000);
        assert!(matches!(
            render_png(&payload, DEFAULT_QR_SIZE),
            Err(QrError::Encode(_))
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(matches!(
            render_png("A\nb", u32::MAX),
            Err(QrError::SizeTooLarge { requested: u32::MAX })
        ));
        assert!(matches!(
            render_svg("A\nb", MAX_QR_SIZE + 1),
            Err(QrError::SizeTooLarge { .. })
        ));
        assert!(render_svg("A\nb", MAX_QR_SIZE).is_ok());
    }
}

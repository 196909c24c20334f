use std::io::Cursor;

use image::ImageReader;
use thiserror::Error;

pub type ImageFormResult<T> = Result<T, ImageFormError>;

/// Errors produced by the upload image gate.
#[derive(Debug, Error)]
pub enum ImageFormError {
    /// The bytes could not be decoded as a known image format.
    #[error("file is not a recognizable image")]
    Unreadable,
    /// The image failed the dimension or size thresholds for its context.
    #[error("{0}")]
    Rejected(String),
}

/// Upload context; each has its own dimension, aspect and size thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Logo,
    Banner,
    Product,
}

/// Per-context thresholds. Aspect ratio is width divided by height.
struct ImageLimits {
    min_width: u32,
    max_width: u32,
    min_height: u32,
    max_height: u32,
    min_aspect: f64,
    max_aspect: f64,
    max_bytes: usize,
}

impl ImageKind {
    fn limits(&self) -> ImageLimits {
        match self {
            ImageKind::Logo => ImageLimits {
                min_width: 256,
                max_width: 2048,
                min_height: 256,
                max_height: 2048,
                min_aspect: 0.9,
                max_aspect: 1.1,
                max_bytes: 2 * 1024 * 1024,
            },
            ImageKind::Banner => ImageLimits {
                min_width: 1024,
                max_width: 4096,
                min_height: 256,
                max_height: 1024,
                min_aspect: 4.0,
                max_aspect: 6.0,
                max_bytes: 3 * 1024 * 1024,
            },
            ImageKind::Product => ImageLimits {
                min_width: 300,
                max_width: 4096,
                min_height: 300,
                max_height: 4096,
                min_aspect: 0.5,
                max_aspect: 2.0,
                max_bytes: 5 * 1024 * 1024,
            },
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ImageKind::Logo => "logo",
            ImageKind::Banner => "banner",
            ImageKind::Product => "product image",
        }
    }

    /// Human-readable requirements string used in rejection messages.
    pub fn requirements(&self) -> String {
        let limits = self.limits();
        format!(
            "{}: {}x{} to {}x{} px, aspect ratio {:.1}-{:.1}, at most {} MiB",
            self.label(),
            limits.min_width,
            limits.min_height,
            limits.max_width,
            limits.max_height,
            limits.min_aspect,
            limits.max_aspect,
            limits.max_bytes / (1024 * 1024),
        )
    }
}

/// Check uploaded image bytes against the thresholds for `kind`.
///
/// Only the header is parsed to get the dimensions; the pixels are never
/// decoded.
pub fn validate_image(kind: ImageKind, bytes: &[u8]) -> ImageFormResult<()> {
    let limits = kind.limits();

    if bytes.len() > limits.max_bytes {
        return Err(ImageFormError::Rejected(format!(
            "file is {} bytes, over the limit; expected {}",
            bytes.len(),
            kind.requirements(),
        )));
    }

    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| ImageFormError::Unreadable)?
        .into_dimensions()
        .map_err(|_| ImageFormError::Unreadable)?;

    if width < limits.min_width
        || width > limits.max_width
        || height < limits.min_height
        || height > limits.max_height
    {
        return Err(ImageFormError::Rejected(format!(
            "image is {width}x{height} px; expected {}",
            kind.requirements(),
        )));
    }

    let aspect = f64::from(width) / f64::from(height);
    if aspect < limits.min_aspect || aspect > limits.max_aspect {
        return Err(ImageFormError::Rejected(format!(
            "image aspect ratio is {aspect:.2}; expected {}",
            kind.requirements(),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::new(width, height);
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, ImageFormat::Png)
            .expect("png encoding should succeed");
        bytes.into_inner()
    }

    #[test]
    fn square_300px_image_passes_as_logo_but_not_banner() {
        let bytes = png_bytes(300, 300);

        assert!(validate_image(ImageKind::Logo, &bytes).is_ok());

        match validate_image(ImageKind::Banner, &bytes) {
            Err(ImageFormError::Rejected(reason)) => {
                assert!(reason.contains("banner"), "reason should name the context");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn square_300px_image_passes_as_product() {
        let bytes = png_bytes(300, 300);
        assert!(validate_image(ImageKind::Product, &bytes).is_ok());
    }

    #[test]
    fn tiny_image_is_rejected_as_logo() {
        let bytes = png_bytes(100, 100);
        assert!(matches!(
            validate_image(ImageKind::Logo, &bytes),
            Err(ImageFormError::Rejected(_))
        ));
    }

    #[test]
    fn wide_banner_passes() {
        let bytes = png_bytes(2000, 400);
        assert!(validate_image(ImageKind::Banner, &bytes).is_ok());
    }

    #[test]
    fn logo_aspect_ratio_band_is_enforced() {
        // Within the size band but 1.56 aspect, outside 0.9-1.1.
        let bytes = png_bytes(400, 256);
        assert!(matches!(
            validate_image(ImageKind::Logo, &bytes),
            Err(ImageFormError::Rejected(_))
        ));
    }

    #[test]
    fn garbage_bytes_are_unreadable() {
        assert!(matches!(
            validate_image(ImageKind::Product, b"not an image"),
            Err(ImageFormError::Unreadable)
        ));
    }
}

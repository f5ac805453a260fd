//! Fast image decoding with format-specific optimizations.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to image crate for other formats.

use crate::error::ImageError;
use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Whether the extension says JPEG, the one format with a dedicated decoder
fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

/// Fast image decoder that uses optimized decoders per format
pub struct FastDecoder;

impl FastDecoder {
    /// Decode an image from a file path using the fastest available decoder.
    ///
    /// Zero-sized images are rejected with [`ImageError::EmptyImage`].
    pub fn decode(path: &Path) -> Result<DynamicImage, ImageError> {
        if !path.is_file() {
            return Err(ImageError::IoError {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        let image = if is_jpeg(path) {
            Self::decode_jpeg(path).or_else(|_| Self::decode_fallback(path))?
        } else {
            Self::decode_fallback(path)?
        };

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(path = %path.display(), width, height, "decoded image");
        Ok(image)
    }

    /// Fast JPEG decoding using zune-jpeg
    fn decode_jpeg(path: &Path) -> Result<DynamicImage, ImageError> {
        let file_bytes = fs::read(path).map_err(|e| ImageError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| ImageError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| ImageError::DecodeError {
            path: path.to_path_buf(),
            reason: "Failed to get image info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;

        let buffer_error = |kind: &str| ImageError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("Failed to create {} buffer", kind),
        };

        // The decoder may ignore the requested colorspace for some inputs
        let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGB"))?;
                DynamicImage::ImageRgb8(buffer)
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGBA"))?;
                DynamicImage::ImageRgba8(buffer)
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("Luma"))?;
                DynamicImage::ImageLuma8(buffer)
            }
            _ => return Self::decode_fallback(path),
        };

        Ok(image)
    }

    /// Fallback to image crate for non-JPEG formats
    fn decode_fallback(path: &Path) -> Result<DynamicImage, ImageError> {
        image::open(path).map_err(|e| match e {
            image::ImageError::IoError(source) => ImageError::IoError {
                path: path.to_path_buf(),
                source,
            },
            other => ImageError::DecodeError {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    #[test]
    fn jpeg_detection_ignores_case() {
        assert!(is_jpeg(Path::new("photo.jpg")));
        assert!(is_jpeg(Path::new("photo.JPEG")));
        assert!(!is_jpeg(Path::new("image.png")));
        assert!(!is_jpeg(Path::new("no_extension")));
    }

    #[test]
    fn png_goes_through_generic_decoder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ramp.png");
        RgbImage::from_fn(16, 12, |x, _| Rgb([(x * 16) as u8, 0, 0]))
            .save(&path)
            .unwrap();

        let image = FastDecoder::decode(&path).unwrap();
        assert_eq!(image.dimensions(), (16, 12));
    }

    #[test]
    fn decodes_jpeg_written_by_image_crate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gradient.jpg");
        RgbImage::from_fn(32, 24, |x, y| Rgb([(x * 8) as u8, (y * 10) as u8, 128]))
            .save(&path)
            .unwrap();

        let image = FastDecoder::decode(&path).unwrap();
        assert_eq!(image.dimensions(), (32, 24));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = FastDecoder::decode(Path::new("/nonexistent/photo.png"));
        assert!(matches!(result, Err(ImageError::IoError { .. })));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.png");
        fs::write(&path, b"this is not a valid image file").unwrap();

        let result = FastDecoder::decode(&path);
        assert!(matches!(result, Err(ImageError::DecodeError { .. })));
    }
}

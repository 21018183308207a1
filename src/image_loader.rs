//! # Logo Loading
//!
//! The company logo is drawn into the page header at most 168 x 56pt, on
//! every page. Whatever the request hands us is fitted to that box at
//! [`LOGO_PIXELS_PER_POINT`] before it is embedded, so a camera-sized PNG
//! does not end up in the PDF at full resolution.
//!
//! JPEGs that already fit are embedded as they are (DCTDecode); larger ones
//! are scaled down and re-encoded as JPEG. PNGs are decoded, scaled down when
//! needed, and split into RGB plus an alpha channel for the SMask.

use std::io::Cursor;

use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat};

use crate::assets;
use crate::error::{ReportError, Result};

/// Print resolution kept for logos, in pixels per point (288 dpi).
pub const LOGO_PIXELS_PER_POINT: u32 = 4;
/// Largest logo width in pixels.
pub const MAX_LOGO_WIDTH_PX: u32 = 168 * LOGO_PIXELS_PER_POINT;
/// Largest logo height in pixels.
pub const MAX_LOGO_HEIGHT_PX: u32 = 56 * LOGO_PIXELS_PER_POINT;

const JPEG_QUALITY: u8 = 90;

/// A logo ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// The pixel data in a format the PDF serializer can consume directly.
#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// JPEG bytes, embedded with DCTDecode.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// RGB pixels plus an alpha channel, `None` when fully opaque.
    Decoded {
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

/// JPEG color space for the PDF /ColorSpace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

/// Load a logo from an asset source string (see [`crate::assets`]).
///
/// Fetch failures surface as [`ReportError::Asset`], decode failures as
/// [`ReportError::Image`]. Both abort the export.
pub fn load_image(src: &str) -> Result<LoadedImage> {
    let bytes = assets::load_bytes(src)?;
    decode_logo(&bytes)
}

/// Decode JPEG or PNG bytes and fit them to the header logo box.
pub fn decode_logo(data: &[u8]) -> Result<LoadedImage> {
    let format = image::guess_format(data).map_err(|_| {
        ReportError::Image("unrecognised logo data (expected JPEG or PNG)".to_string())
    })?;
    match format {
        ImageFormat::Jpeg => jpeg_logo(data),
        ImageFormat::Png => {
            let img = image::load_from_memory_with_format(data, ImageFormat::Png)
                .map_err(|e| ReportError::Image(format!("failed to decode PNG logo: {}", e)))?;
            check_size(img.width(), img.height())?;
            Ok(split_alpha(&fit_to_header(img)))
        }
        other => Err(ReportError::Image(format!(
            "unsupported logo format {:?} (expected JPEG or PNG)",
            other
        ))),
    }
}

fn jpeg_logo(data: &[u8]) -> Result<LoadedImage> {
    let decoder = JpegDecoder::new(Cursor::new(data))
        .map_err(|e| ReportError::Image(format!("failed to read JPEG logo: {}", e)))?;
    let (width, height) = decoder.dimensions();
    check_size(width, height)?;
    let color_space = if decoder.color_type() == ColorType::L8 {
        JpegColorSpace::DeviceGray
    } else {
        JpegColorSpace::DeviceRGB
    };

    if fits_header(width, height) {
        return Ok(LoadedImage {
            pixel_data: ImagePixelData::Jpeg {
                data: data.to_vec(),
                color_space,
            },
            width_px: width,
            height_px: height,
        });
    }

    let img = DynamicImage::from_decoder(decoder)
        .map_err(|e| ReportError::Image(format!("failed to decode JPEG logo: {}", e)))?;
    let img = fit_to_header(img);
    let (w, h) = (img.width(), img.height());
    let mut buf = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
        match color_space {
            JpegColorSpace::DeviceGray => encoder.encode(img.to_luma8().as_raw(), w, h, ColorType::L8),
            JpegColorSpace::DeviceRGB => encoder.encode(img.to_rgb8().as_raw(), w, h, ColorType::Rgb8),
        }
        .map_err(|e| ReportError::Image(format!("failed to re-encode JPEG logo: {}", e)))?;
    }

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: buf,
            color_space,
        },
        width_px: w,
        height_px: h,
    })
}

fn check_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ReportError::Image(format!(
            "logo has no pixels ({}x{})",
            width, height
        )));
    }
    Ok(())
}

fn fits_header(width: u32, height: u32) -> bool {
    width <= MAX_LOGO_WIDTH_PX && height <= MAX_LOGO_HEIGHT_PX
}

/// Scale down, keeping the aspect ratio, until the logo fits the header box.
fn fit_to_header(img: DynamicImage) -> DynamicImage {
    if fits_header(img.width(), img.height()) {
        return img;
    }
    let scaled = img.resize(MAX_LOGO_WIDTH_PX, MAX_LOGO_HEIGHT_PX, FilterType::CatmullRom);
    log::debug!(
        "logo scaled from {}x{} to {}x{}",
        img.width(),
        img.height(),
        scaled.width(),
        scaled.height()
    );
    scaled
}

fn split_alpha(img: &DynamicImage) -> LoadedImage {
    let rgba = img.to_rgba8();
    let pixels = (rgba.width() * rgba.height()) as usize;
    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }
    let opaque = alpha.iter().all(|a| *a == u8::MAX);

    LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: (!opaque).then_some(alpha),
        },
        width_px: rgba.width(),
        height_px: rgba.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    fn png(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, alpha]));
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(img.as_raw(), width, height, ColorType::Rgba8)
            .unwrap();
        buf
    }

    fn jpeg(width: u32, height: u32, gray: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = JpegEncoder::new(&mut buf);
        if gray {
            let img = image::GrayImage::from_pixel(width, height, image::Luma([90]));
            encoder.write_image(img.as_raw(), width, height, ColorType::L8).unwrap();
        } else {
            let img = image::RgbImage::from_pixel(width, height, image::Rgb([0, 128, 255]));
            encoder.write_image(img.as_raw(), width, height, ColorType::Rgb8).unwrap();
        }
        buf
    }

    #[test]
    fn test_small_jpeg_is_embedded_as_is() {
        let bytes = jpeg(40, 20, false);
        let logo = decode_logo(&bytes).unwrap();
        assert_eq!((logo.width_px, logo.height_px), (40, 20));
        match &logo.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                assert_eq!(data, &bytes);
                assert_eq!(*color_space, JpegColorSpace::DeviceRGB);
            }
            _ => panic!("JPEG logo should stay JPEG"),
        }
    }

    #[test]
    fn test_grayscale_jpeg_keeps_gray_color_space() {
        let logo = decode_logo(&jpeg(16, 16, true)).unwrap();
        assert!(matches!(
            logo.pixel_data,
            ImagePixelData::Jpeg { color_space: JpegColorSpace::DeviceGray, .. }
        ));
    }

    #[test]
    fn test_large_jpeg_is_scaled_and_reencoded() {
        let bytes = jpeg(2400, 800, false);
        let logo = decode_logo(&bytes).unwrap();
        assert_eq!((logo.width_px, logo.height_px), (MAX_LOGO_WIDTH_PX, MAX_LOGO_HEIGHT_PX));
        match &logo.pixel_data {
            ImagePixelData::Jpeg { data, .. } => {
                assert!(data.starts_with(&[0xFF, 0xD8]));
                assert!(data.len() < bytes.len());
            }
            _ => panic!("JPEG logo should stay JPEG"),
        }
    }

    #[test]
    fn test_large_png_is_scaled_keeping_aspect() {
        let logo = decode_logo(&png(3000, 500, 255)).unwrap();
        assert_eq!(logo.width_px, MAX_LOGO_WIDTH_PX);
        assert_eq!(logo.height_px, 112);
        match &logo.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb.len(), (logo.width_px * logo.height_px * 3) as usize);
                assert!(alpha.is_none());
            }
            _ => panic!("PNG logo should be decoded"),
        }
    }

    #[test]
    fn test_tall_png_is_bounded_by_height() {
        let logo = decode_logo(&png(100, 1000, 255)).unwrap();
        assert_eq!(logo.height_px, MAX_LOGO_HEIGHT_PX);
        assert!(logo.width_px <= 23);
    }

    #[test]
    fn test_translucent_png_keeps_alpha() {
        let logo = decode_logo(&png(2, 1, 128)).unwrap();
        match &logo.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb, &[255, 0, 0, 255, 0, 0]);
                assert_eq!(alpha.as_deref(), Some(&[128, 128][..]));
            }
            _ => panic!("PNG logo should be decoded"),
        }
    }

    #[test]
    fn test_unsupported_or_garbage_data_is_image_error() {
        assert!(matches!(decode_logo(b"GIF89a\x01\x00\x01\x00"), Err(ReportError::Image(_))));
        assert!(matches!(decode_logo(&[0x00, 0x01]), Err(ReportError::Image(_))));
        let truncated = &png(4, 4, 255)[..20];
        assert!(matches!(decode_logo(truncated), Err(ReportError::Image(_))));
    }

    #[test]
    fn test_invalid_data_uri_is_asset_error() {
        let result = load_image("data:image/png;base64");
        assert!(matches!(result, Err(ReportError::Asset { .. })));
    }

    #[test]
    fn test_logo_from_data_uri() {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode(png(1, 1, 255));
        let logo = load_image(&format!("data:image/png;base64,{}", b64)).unwrap();
        assert_eq!((logo.width_px, logo.height_px), (1, 1));
    }
}

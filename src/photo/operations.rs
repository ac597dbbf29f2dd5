//! Pixel work: decode uploads, crop, resize, encode.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;

use super::PhotoError;
use super::params::CropSettings;
use super::session::{CropRect, DisplaySize, output_placement, source_region};

/// Crop `rect` (displayed coordinates) out of `image` and encode the result
/// as an `output_size` square JPEG.
///
/// Whatever part of the selection lies outside the image stays black, the
/// way an empty canvas encodes, rather than stretching the image into it.
pub fn crop_photo(
    image: &DynamicImage,
    rect: CropRect,
    display: DisplaySize,
    settings: &CropSettings,
) -> Result<Vec<u8>, PhotoError> {
    let (x, y, w, h) = source_region(rect, display, (image.width(), image.height()))
        .ok_or(PhotoError::EmptyRegion)?;
    let (dx, dy, dw, dh) =
        output_placement(rect, display, settings.output_size).ok_or(PhotoError::EmptyRegion)?;
    tracing::debug!(x, y, w, h, dx, dy, dw, dh, size = settings.output_size, "cropping photo");

    let patch = image
        .crop_imm(x, y, w, h)
        .resize_exact(dw, dh, FilterType::Lanczos3)
        .to_rgb8();
    let mut canvas = RgbImage::new(settings.output_size, settings.output_size);
    imageops::overlay(&mut canvas, &patch, i64::from(dx), i64::from(dy));
    let rgb = DynamicImage::ImageRgb8(canvas);

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, settings.quality.value() as u8);
    rgb.write_with_encoder(encoder)
        .map_err(|e| PhotoError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// [`crop_photo`] wrapped as a `data:image/jpeg;base64,` URI, the form stored
/// in the record's photo field.
pub fn crop_to_data_uri(
    image: &DynamicImage,
    rect: CropRect,
    display: DisplaySize,
    settings: &CropSettings,
) -> Result<String, PhotoError> {
    let jpeg = crop_photo(image, rect, display, settings)?;
    Ok(to_data_uri("image/jpeg", &jpeg))
}

pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decode a base64 `data:` URI into an image.
pub fn decode_data_uri(uri: &str) -> Result<DynamicImage, PhotoError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| PhotoError::InvalidDataUri("missing 'data:' prefix".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PhotoError::InvalidDataUri("missing ',' separator".into()))?;
    if !meta.ends_with(";base64") {
        return Err(PhotoError::InvalidDataUri("only base64 payloads are supported".into()));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| PhotoError::InvalidDataUri(e.to_string()))?;
    decode_bytes(&bytes)
}

/// Load an upload given either as a `data:` URI or a file path.
pub fn load_photo(source: &str) -> Result<DynamicImage, PhotoError> {
    if source.starts_with("data:") {
        return decode_data_uri(source);
    }
    let path = Path::new(source);
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| PhotoError::Decode(format!("{}: {}", path.display(), e)))
}

fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, PhotoError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(|e| PhotoError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::params::Quality;
    use image::{GenericImageView, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn crop_is_exact_output_size_jpeg() {
        let img = gradient(800, 600);
        let jpeg = crop_photo(
            &img,
            CropRect::default(),
            DisplaySize::new(400.0, 300.0),
            &CropSettings::default(),
        )
        .unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (200, 200));
    }

    #[test]
    fn non_square_region_is_stretched_to_square() {
        let img = gradient(300, 100);
        let rect = CropRect {
            x: 0.0,
            y: 0.0,
            width: 300.0,
            height: 50.0,
        };
        let settings = CropSettings {
            output_size: 64,
            quality: Quality::new(90),
        };
        let jpeg = crop_photo(&img, rect, DisplaySize::new(300.0, 100.0), &settings).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (64, 64));
    }

    #[test]
    fn overhanging_selection_is_not_stretched() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 150, image::Rgb([255, 255, 255])));
        let jpeg = crop_photo(
            &img,
            CropRect::square(0.0, 0.0, 200.0),
            DisplaySize::new(400.0, 150.0),
            &CropSettings::default(),
        )
        .unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (200, 200));

        // Image occupies the top 150 rows, the rest is empty canvas.
        assert!(decoded.get_pixel(100, 50).0.iter().all(|&c| c > 220));
        assert!(decoded.get_pixel(100, 195).0.iter().all(|&c| c < 35));
    }

    #[test]
    fn crop_outside_image_is_an_error() {
        let img = gradient(100, 100);
        let rect = CropRect::square(150.0, 150.0, 20.0);
        let result = crop_photo(&img, rect, DisplaySize::new(100.0, 100.0), &CropSettings::default());
        assert!(matches!(result, Err(PhotoError::EmptyRegion)));
    }

    #[test]
    fn data_uri_round_trips_through_decoder() {
        let img = gradient(400, 300);
        let uri = crop_to_data_uri(
            &img,
            CropRect::default(),
            DisplaySize::new(400.0, 300.0),
            &CropSettings::default(),
        )
        .unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        let decoded = decode_data_uri(&uri).unwrap();
        assert_eq!(decoded.dimensions(), (200, 200));
    }

    #[test]
    fn malformed_data_uris_are_rejected() {
        assert!(matches!(
            decode_data_uri("image/png;base64,AAAA"),
            Err(PhotoError::InvalidDataUri(_))
        ));
        assert!(matches!(
            decode_data_uri("data:image/png,plain"),
            Err(PhotoError::InvalidDataUri(_))
        ));
        assert!(matches!(
            decode_data_uri("data:image/png;base64,!!!"),
            Err(PhotoError::InvalidDataUri(_))
        ));
    }

    #[test]
    fn load_photo_accepts_paths_and_data_uris() {
        let img = gradient(40, 30);
        let bytes = png_bytes(&img);

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("upload.png");
        std::fs::write(&path, &bytes).unwrap();
        let from_path = load_photo(path.to_str().unwrap()).unwrap();
        assert_eq!(from_path.dimensions(), (40, 30));

        let from_uri = load_photo(&to_data_uri("image/png", &bytes)).unwrap();
        assert_eq!(from_uri.dimensions(), (40, 30));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_photo("/definitely/not/here.jpg");
        assert!(matches!(result, Err(PhotoError::Io(_))));
    }
}

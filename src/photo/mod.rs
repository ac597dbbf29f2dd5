//! Profile photo cropping.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Load upload** | `image::ImageReader` (file path or base64 `data:` URI) |
//! | **Drag selection** | [`CropSession`], pure geometry |
//! | **Crop + resize** | `crop_imm` + `resize_exact` with `Lanczos3` |
//! | **Compose** | `imageops::overlay` onto a blank square, overhang left empty |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` at quality 80 |
//! | **Embed** | `base64` into a `data:image/jpeg` URI |
//!
//! The tool is a pure transform: source image + rectangle in, fixed-size JPEG
//! out. Only an active drag holds state, and only inside a [`CropSession`].

mod operations;
mod params;
mod session;

use thiserror::Error;

pub use operations::{crop_photo, crop_to_data_uri, decode_data_uri, load_photo, to_data_uri};
pub use params::{CropSettings, Quality};
pub use session::{CropRect, CropSession, DisplaySize, Point, output_placement, source_region};

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
    #[error("Crop region does not overlap the image")]
    EmptyRegion,
}

//! Uploaded image handling and format conversion
//!
//! Decodes user uploads (PNG/JPEG) and re-encodes them as base64 PNG for the
//! image host.

pub mod encoder;
pub mod format;

pub use encoder::{encode_png_base64, ImageEncoder};
pub use format::ImageKind;

use crate::{Error, Result};
use image::DynamicImage;

/// A user upload: the original bytes plus the decoded pixel buffer.
#[derive(Debug)]
pub struct UploadedImage {
    file_name: Option<String>,
    kind: ImageKind,
    bytes: Vec<u8>,
    image: DynamicImage,
}

impl UploadedImage {
    pub fn decode(file_name: Option<String>, bytes: Vec<u8>) -> Result<Self> {
        let kind = ImageKind::detect(&bytes).ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "{} is not a PNG or JPEG image",
                file_name.as_deref().unwrap_or("upload")
            ))
        })?;
        let image = image::load_from_memory_with_format(&bytes, kind.image_format())?;

        tracing::debug!(
            "Decoded {} upload ({} bytes, {}x{})",
            kind.mime(),
            bytes.len(),
            image.width(),
            image.height()
        );

        Ok(Self {
            file_name,
            kind,
            bytes,
            image,
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Original upload bytes, served back for the preview.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

#[cfg(test)]
pub(crate) mod test_images {
    use image::{ImageFormat, RgbImage, RgbaImage};
    use std::io::Cursor;

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([0, 128, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        bytes
    }
}

use super::UploadedImage;
use crate::models::EncodedPayload;
use crate::{Error, Result};
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;

/// Re-encode a decoded image as PNG and wrap it in standard base64.
pub fn encode_png_base64(image: &DynamicImage) -> Result<EncodedPayload> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(EncodedPayload::new(
        base64::engine::general_purpose::STANDARD.encode(&png),
    ))
}

/// Runs PNG/base64 encoding off the async executor.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }

    pub async fn encode(&self, upload: Arc<UploadedImage>) -> Result<EncodedPayload> {
        let payload = tokio::task::spawn_blocking(move || encode_png_base64(upload.image()))
            .await
            .map_err(|e| Error::Invariant(format!("Image encoding task join error: {}", e)))??;

        tracing::debug!("Encoded image as base64 PNG ({} chars)", payload.len());
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::test_images;

    fn decode_payload(payload: &EncodedPayload) -> DynamicImage {
        let png = base64::engine::general_purpose::STANDARD
            .decode(payload.as_str())
            .unwrap();
        assert_eq!(&png[..4], &[0x89, 0x50, 0x4E, 0x47]);
        image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap()
    }

    #[test]
    fn test_png_round_trip_keeps_dimensions() {
        let upload = UploadedImage::decode(None, test_images::png(7, 5)).unwrap();

        let payload = encode_png_base64(upload.image()).unwrap();
        let decoded = decode_payload(&payload);

        assert_eq!((decoded.width(), decoded.height()), (7, 5));
    }

    #[test]
    fn test_jpeg_is_converted_to_png() {
        let upload = UploadedImage::decode(None, test_images::jpeg(33, 17)).unwrap();

        let payload = encode_png_base64(upload.image()).unwrap();
        let decoded = decode_payload(&payload);

        assert_eq!((decoded.width(), decoded.height()), (33, 17));
    }

    #[test]
    fn test_payload_has_no_line_breaks() {
        let upload = UploadedImage::decode(None, test_images::png(64, 64)).unwrap();

        let payload = encode_png_base64(upload.image()).unwrap();

        assert!(!payload.is_empty());
        assert!(!payload.as_str().contains('\n'));
        assert!(!payload.as_str().contains('\r'));
    }

    #[tokio::test]
    async fn test_async_encoder_matches_sync_output() {
        let upload = Arc::new(UploadedImage::decode(None, test_images::png(3, 3)).unwrap());

        let expected = encode_png_base64(upload.image()).unwrap();
        let actual = ImageEncoder::new().encode(upload).await.unwrap();

        assert_eq!(actual, expected);
    }
}

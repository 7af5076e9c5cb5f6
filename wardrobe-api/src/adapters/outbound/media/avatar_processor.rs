use std::path::Path;

use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, ImageFormat};

use crate::domain::{
    models::{AvatarUpload, ProcessedAvatar, AVATAR_MIME_TYPE},
    ports::outbound::AvatarProcessor,
    AvatarError,
};

const MAX_DIMENSION: u32 = 400;
const JPEG_QUALITY: u8 = 85;
const FALLBACK_FILE_STEM: &str = "avatar";

/// Flattens to opaque RGB, bounds the longest side and re-encodes as JPEG.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegAvatarProcessor;

impl AvatarProcessor for JpegAvatarProcessor {
    fn process(&self, upload: &AvatarUpload) -> Result<ProcessedAvatar, AvatarError> {
        let format = image::guess_format(&upload.bytes).map_err(|_| AvatarError::DecodeError)?;

        let declared = upload.content_type.as_deref().and_then(ImageFormat::from_mime_type);
        if declared.is_some_and(|declared| declared != format) {
            tracing::debug!(
                declared = ?upload.content_type,
                detected = ?format,
                "declared avatar content type does not match file signature"
            );
        }

        let image = image::load_from_memory_with_format(&upload.bytes, format)
            .map_err(|_| AvatarError::DecodeError)?;

        // Alpha is dropped, not composited.
        let image = DynamicImage::ImageRgb8(image.to_rgb8());

        let image = if image.width() > MAX_DIMENSION || image.height() > MAX_DIMENSION {
            image.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
        } else {
            image
        };

        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
            .encode_image(&rgb)
            .map_err(|err| AvatarError::Processing(format!("jpeg encoding failed: {err}")))?;

        Ok(ProcessedAvatar {
            bytes,
            mime_type: AVATAR_MIME_TYPE.to_string(),
            file_name: jpeg_file_name(upload.file_name.as_deref()),
            width,
            height,
        })
    }
}

fn jpeg_file_name(original: Option<&str>) -> String {
    let stem = original
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(FALLBACK_FILE_STEM);

    format!("{stem}.jpg")
}

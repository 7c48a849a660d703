//! Fit photos under the upload ceiling.
//!
//! Each failed attempt shrinks the target width by 10% and drops JPEG quality by 5,
//! together, until the encoded size fits or quality falls below the floor.
//! Chroma is never subsampled; only width and quality move.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::{BotError, Result};

/// Maximum accepted upload size in bytes.
pub const SIZE_CEILING: usize = 1_000_000;
pub const MAX_WIDTH: u32 = 1920;
pub const START_QUALITY: u8 = 90;
pub const MIN_QUALITY: u8 = 30;
pub const QUALITY_STEP: u8 = 5;
pub const WIDTH_FACTOR: f64 = 0.9;

const JPEG_MIME: &str = "image/jpeg";

/// Bytes ready for upload. Re-encoded output is always JPEG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl CompressedImage {
    pub fn new(bytes: Vec<u8>, mime_type: &'static str) -> Self {
        Self { bytes, mime_type }
    }

    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, JPEG_MIME)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Tunables for the width + quality search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionSettings {
    pub ceiling: usize,
    pub max_width: u32,
    pub start_quality: u8,
    pub min_quality: u8,
    pub quality_step: u8,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            ceiling: SIZE_CEILING,
            max_width: MAX_WIDTH,
            start_quality: START_QUALITY,
            min_quality: MIN_QUALITY,
            quality_step: QUALITY_STEP,
        }
    }
}

/// One encode attempt. `dimensions` is `None` when the source size is unknown,
/// in which case the image is encoded at its own size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub iteration: u32,
    pub dimensions: Option<(u32, u32)>,
    pub quality: u8,
}

/// The sequence of attempts for a source, from start quality down to the floor.
#[derive(Debug, Clone)]
pub struct CompressionPlan {
    settings: CompressionSettings,
    source: Option<(u32, u32)>,
    iteration: u32,
}

impl CompressionPlan {
    pub fn new(settings: CompressionSettings, source: Option<(u32, u32)>) -> Self {
        Self {
            settings,
            source: source.filter(|&(w, h)| w > 0 && h > 0),
            iteration: 0,
        }
    }

    /// `floor(max_width * 0.9^iteration)`, never below one pixel.
    pub fn width_at(max_width: u32, iteration: u32) -> u32 {
        let width = (f64::from(max_width) * WIDTH_FACTOR.powi(iteration as i32)).floor();
        (width as u32).max(1)
    }

    /// Height preserving the source aspect ratio: `floor(width / (src_w / src_h))`.
    pub fn height_for(width: u32, (src_w, src_h): (u32, u32)) -> u32 {
        let height = u64::from(width) * u64::from(src_h) / u64::from(src_w);
        (height as u32).max(1)
    }

    fn quality_at(&self, iteration: u32) -> Option<u8> {
        let drop = u32::from(self.settings.quality_step).checked_mul(iteration)?;
        let quality = u32::from(self.settings.start_quality).checked_sub(drop)?;
        if quality < u32::from(self.settings.min_quality) {
            return None;
        }
        u8::try_from(quality).ok()
    }
}

impl Iterator for CompressionPlan {
    type Item = Attempt;

    fn next(&mut self) -> Option<Attempt> {
        let quality = self.quality_at(self.iteration)?;
        let dimensions = self.source.map(|source| {
            let width = Self::width_at(self.settings.max_width, self.iteration);
            (width, Self::height_for(width, source))
        });

        let attempt = Attempt {
            iteration: self.iteration,
            dimensions,
            quality,
        };
        self.iteration += 1;
        Some(attempt)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCompressor {
    settings: CompressionSettings,
}

impl ImageCompressor {
    pub fn new(settings: CompressionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompressionSettings {
        &self.settings
    }

    /// Compress `source` to at most the ceiling.
    ///
    /// A source already within the ceiling is returned untouched, tagged with its sniffed
    /// MIME type. Anything larger is decoded and re-encoded as JPEG.
    pub fn compress(&self, source: &[u8]) -> Result<CompressedImage> {
        if source.len() <= self.settings.ceiling {
            let mime_type = image::guess_format(source)
                .map(|format| format.to_mime_type())
                .unwrap_or(JPEG_MIME);
            debug!(size = source.len(), mime_type, "Source already within ceiling");
            return Ok(CompressedImage::new(source.to_vec(), mime_type));
        }

        let image = image::load_from_memory(source)?;
        let (width, height) = image.dimensions();
        let compressed = self.search(Some((width, height)), |attempt| {
            encode_jpeg(&image, attempt)
        })?;

        info!(
            source_size = source.len(),
            compressed_size = compressed.len(),
            "Image compressed"
        );
        Ok(compressed)
    }

    /// Run the plan against an arbitrary encoder, returning the first output within the
    /// ceiling. Fails with `CompressionFailure` once quality would drop below the floor.
    pub fn search<F>(&self, source: Option<(u32, u32)>, mut encode: F) -> Result<CompressedImage>
    where
        F: FnMut(&Attempt) -> Result<Vec<u8>>,
    {
        let mut last = None;

        for attempt in CompressionPlan::new(self.settings, source) {
            let bytes = encode(&attempt)?;
            debug!(
                iteration = attempt.iteration,
                dimensions = ?attempt.dimensions,
                quality = attempt.quality,
                size = bytes.len(),
                "Encoded attempt"
            );

            if bytes.len() <= self.settings.ceiling {
                return Ok(CompressedImage::jpeg(bytes));
            }
            last = Some((bytes.len(), attempt.quality));
        }

        let (last_size, last_quality) = last.unwrap_or((0, self.settings.start_quality));
        Err(BotError::CompressionFailure {
            ceiling: self.settings.ceiling,
            last_size,
            last_quality,
        })
    }
}

fn encode_jpeg(image: &DynamicImage, attempt: &Attempt) -> Result<Vec<u8>> {
    let rgb = match attempt.dimensions {
        Some((width, height)) => image.resize_exact(width, height, FilterType::Lanczos3).to_rgb8(),
        None => image.to_rgb8(),
    };

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, attempt.quality);
    DynamicImage::ImageRgb8(rgb).write_with_encoder(encoder)?;
    Ok(buf)
}

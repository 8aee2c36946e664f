//! Image transcoding between container formats.
//!
//! [`ImageTranscoder`] decodes a source file and re-encodes it in the target
//! format. JPEG output honours the configured quality; WebP output is
//! lossless, which is the only WebP mode the `image` encoder provides.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageReader};
use photoforge_common::ImageFormat;

use crate::{Error, Result};

/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 90;

/// Converts one image file into another.
pub trait Transcoder {
    /// Decode `input` and write it to `output` in the target format.
    ///
    /// `output` is created or truncated. The file handle is released before
    /// this returns, whether or not encoding succeeded.
    fn transcode(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Whether this build can decode `format`.
pub fn supports_decoding(format: ImageFormat) -> bool {
    match format {
        ImageFormat::Heic => cfg!(feature = "heif"),
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Webp => true,
    }
}

/// Whether this build can encode `format`.
pub fn supports_encoding(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Heic)
}

/// [`Transcoder`] backed by the `image` crate (and libheif for HEIC input).
#[derive(Debug, Clone)]
pub struct ImageTranscoder {
    source: ImageFormat,
    target: ImageFormat,
    quality: u8,
}

impl ImageTranscoder {
    /// Create a transcoder for `source` -> `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if this build cannot decode `source` or
    /// encode `target`, and [`Error::InvalidInput`] if `quality` is outside
    /// `1..=100`.
    pub fn new(source: ImageFormat, target: ImageFormat, quality: u8) -> Result<Self> {
        if !(1..=100).contains(&quality) {
            return Err(Error::InvalidInput(format!(
                "quality must be between 1 and 100, got {quality}"
            )));
        }
        if !supports_decoding(source) {
            return Err(Error::Unsupported(format!(
                "decoding {source} requires building with the `heif` feature"
            )));
        }
        if !supports_encoding(target) {
            return Err(Error::Unsupported(format!("encoding {target}")));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Transcoder ready: {} -> {} (quality {})", source, target, quality);

        Ok(Self {
            source,
            target,
            quality,
        })
    }

    fn decode(&self, input: &Path) -> Result<DynamicImage> {
        if !input.exists() {
            return Err(Error::file_not_found(input));
        }

        match self.source {
            #[cfg(feature = "heif")]
            ImageFormat::Heic => crate::heif::decode(input),
            #[cfg(not(feature = "heif"))]
            ImageFormat::Heic => Err(Error::Unsupported(format!("decoding {}", self.source))),
            ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Webp => {
                let img = ImageReader::open(input)?.with_guessed_format()?.decode()?;
                Ok(img)
            }
        }
    }

    fn encode(&self, img: &DynamicImage, output: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(output)?);

        match self.target {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, self.quality))?;
            }
            ImageFormat::Webp => {
                let pixels = if img.color().has_alpha() {
                    DynamicImage::ImageRgba8(img.to_rgba8())
                } else {
                    DynamicImage::ImageRgb8(img.to_rgb8())
                };
                pixels.write_with_encoder(WebPEncoder::new_lossless(&mut writer))?;
            }
            ImageFormat::Png => {
                img.write_with_encoder(PngEncoder::new(&mut writer))?;
            }
            ImageFormat::Heic => {
                return Err(Error::Unsupported(format!("encoding {}", self.target)));
            }
        }

        writer.flush()?;
        Ok(())
    }
}

impl Transcoder for ImageTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        let img = self.decode(input)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            "Decoded {:?}: {}x{} {:?}",
            input,
            img.width(),
            img.height(),
            img.color()
        );

        self.encode(&img, output)
    }
}

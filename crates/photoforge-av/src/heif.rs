//! HEIC/HEIF decoding through libheif.

use std::path::Path;

use image::{DynamicImage, RgbImage, RgbaImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

use crate::{Error, Result};

/// Decode the primary image of a HEIF container into interleaved 8-bit RGB(A).
pub(crate) fn decode(path: &Path) -> Result<DynamicImage> {
    let path_str = path
        .to_str()
        .ok_or_else(|| Error::InvalidInput(format!("path is not valid UTF-8: {:?}", path)))?;

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_file(path_str)?;
    let handle = ctx.primary_image_handle()?;

    let has_alpha = handle.has_alpha_channel();
    let chroma = if has_alpha {
        RgbChroma::Rgba
    } else {
        RgbChroma::Rgb
    };
    let decoded = lib_heif.decode(&handle, ColorSpace::Rgb(chroma), None)?;

    let planes = decoded.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| Error::Heif("decoded image has no interleaved plane".to_string()))?;

    let channels = if has_alpha { 4 } else { 3 };
    let width = plane.width;
    let height = plane.height;
    let buf = pack_rows(
        plane.data,
        plane.stride,
        width as usize * channels,
        height as usize,
    )?;

    let image = if has_alpha {
        RgbaImage::from_raw(width, height, buf).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(width, height, buf).map(DynamicImage::ImageRgb8)
    };

    image.ok_or_else(|| Error::Heif("decoded buffer does not match image dimensions".to_string()))
}

/// Copy `height` rows of `row_len` bytes out of a plane whose rows are
/// `stride` bytes apart, dropping the padding at the end of each row.
fn pack_rows(data: &[u8], stride: usize, row_len: usize, height: usize) -> Result<Vec<u8>> {
    if stride == 0 || stride < row_len {
        return Err(Error::Heif(format!(
            "plane stride {stride} is smaller than a row of {row_len} bytes"
        )));
    }

    let mut buf = Vec::with_capacity(row_len * height);
    for row in data.chunks(stride).take(height) {
        let row = row
            .get(..row_len)
            .ok_or_else(|| Error::Heif("decoded row shorter than image width".to_string()))?;
        buf.extend_from_slice(row);
    }

    if buf.len() != row_len * height {
        return Err(Error::Heif(format!(
            "decoded plane holds {} of {} rows",
            buf.len() / row_len.max(1),
            height
        )));
    }

    Ok(buf)
}

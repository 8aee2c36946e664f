//! Path utilities for selecting input files and naming outputs.
//!
//! Extension checks are case-insensitive: `IMG_0001.HEIC`, `IMG_0001.heic`
//! and `IMG_0001.Heic` are all HEIC candidates.

use std::path::{Path, PathBuf};

use crate::ImageFormat;

/// Check if a path has one of the input extensions of `format`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use photoforge_common::{paths::has_format_extension, ImageFormat};
///
/// assert!(has_format_extension(Path::new("photo.HEIC"), ImageFormat::Heic));
/// assert!(has_format_extension(Path::new("/path/to/avatar.png"), ImageFormat::Png));
/// assert!(!has_format_extension(Path::new("notes.txt"), ImageFormat::Png));
/// ```
pub fn has_format_extension(path: &Path, format: ImageFormat) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            format
                .input_extensions()
                .contains(&ext.to_lowercase().as_str())
        })
        .unwrap_or(false)
}

/// Build the output path for `input` under `output_dir`.
///
/// The base name is kept and the extension replaced by the canonical
/// extension of `target`, whatever the case of the original extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use photoforge_common::{paths::output_path_for, ImageFormat};
///
/// let out = output_path_for(Path::new("Diciembre/IMG_1.HEIC"), Path::new("out"), ImageFormat::Jpeg);
/// assert_eq!(out, Path::new("out/IMG_1.jpg"));
/// ```
pub fn output_path_for(input: &Path, output_dir: &Path, target: ImageFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let mut name = stem;
    name.push(".");
    name.push(target.extension());
    output_dir.join(name)
}

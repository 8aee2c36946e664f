//! Core type definitions for the image formats photoforge reads and writes.
//!
//! Formats are serialized in lowercase so they can be written directly in
//! TOML configuration files and on the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An image container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// HEIC/HEIF, as produced by phone cameras.
    #[serde(alias = "heif")]
    Heic,
    /// JPEG.
    #[serde(alias = "jpg")]
    Jpeg,
    /// PNG.
    Png,
    /// WebP.
    Webp,
}

impl ImageFormat {
    /// Extension used when writing a file of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Heic => "heic",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// Extensions accepted when selecting input files of this format (lowercase).
    pub fn input_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Heic => &["heic", "heif"],
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Png => &["png"],
            Self::Webp => &["webp"],
        }
    }

    /// All known formats.
    pub fn all() -> &'static [ImageFormat] {
        &[Self::Heic, Self::Jpeg, Self::Png, Self::Webp]
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heic => write!(f, "heic"),
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::Webp => write!(f, "webp"),
        }
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|format| format.input_extensions().contains(&lower.as_str()))
            .ok_or_else(|| Error::unknown_format(s))
    }
}

//! # photoforge-av
//!
//! Image transcoding and external tool integration for photoforge.
//!
//! This crate provides functionality for:
//! - Transcoding images between formats (HEIC, PNG, JPEG -> JPEG, WebP, PNG)
//! - Detecting external tools on `PATH`
//! - Copying date metadata from a source image onto its converted output
//!   with ExifTool
//!
//! ## Features
//!
//! - `heif` - Decode HEIC/HEIF sources through libheif
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use photoforge_av::{ImageTranscoder, Transcoder};
//! use photoforge_common::ImageFormat;
//! use std::path::Path;
//!
//! let transcoder = ImageTranscoder::new(ImageFormat::Png, ImageFormat::Webp, 90)?;
//! transcoder.transcode(Path::new("avatar.png"), Path::new("avatar.webp"))?;
//! # Ok::<(), photoforge_av::Error>(())
//! ```

pub mod codec;
mod error;
#[cfg(feature = "heif")]
mod heif;
pub mod metadata;
pub mod tools;

// Re-exports
pub use codec::{supports_decoding, supports_encoding, ImageTranscoder, Transcoder};
pub use error::{Error, Result};
pub use metadata::{ExifTool, MetadataCopier};
pub use tools::{check_tools, get_tool_path, require_tool, ToolInfo};

//! Photoforge-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across photoforge:
//!
//! - **Core Types**: The [`ImageFormat`] enum and its file extensions
//! - **Path Utilities**: Case-insensitive extension matching and output naming
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use photoforge_common::ImageFormat;
//! use photoforge_common::paths::{has_format_extension, output_path_for};
//! use std::path::Path;
//!
//! assert!(has_format_extension(Path::new("IMG_0001.HEIC"), ImageFormat::Heic));
//!
//! let out = output_path_for(Path::new("in/IMG_0001.HEIC"), Path::new("out"), ImageFormat::Jpeg);
//! assert_eq!(out, Path::new("out/IMG_0001.jpg"));
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

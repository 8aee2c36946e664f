//! Date metadata propagation through ExifTool.
//!
//! Converted images lose the EXIF dates of their source. [`ExifTool`] copies
//! an allow-list of date tags from the original file onto the output,
//! rewriting the output in place without leaving a `_original` backup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::tools::{check_tool_with_arg, get_tool_path};
use crate::{Error, Result};

/// Program name of ExifTool on `PATH`.
pub const EXIFTOOL: &str = "exiftool";

/// Tags copied from the source file.
pub const DATE_TAGS: &[&str] = &["-CreateDate", "-ModifyDate", "-DateTimeOriginal"];

/// Copies metadata from a source image onto a converted output.
pub trait MetadataCopier {
    /// Copy the date tags of `source` onto `destination`, in place.
    fn copy_dates(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// A probed, invocable ExifTool.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
    version: Option<String>,
}

impl ExifTool {
    /// Find ExifTool and probe it with `-ver`.
    ///
    /// `configured` is used when it points at an existing file, otherwise
    /// `exiftool` is looked up on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when no program can be located, and
    /// [`Error::ToolFailed`] when the located program does not answer `-ver`.
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        let program = get_tool_path(EXIFTOOL, configured)?;
        Self::detect_at(&program).ok_or_else(|| {
            Error::tool_failed(EXIFTOOL, format!("{} did not answer -ver", program.display()))
        })
    }

    /// Probe a specific ExifTool program (name or path) with `-ver`.
    pub fn detect_at(program: &Path) -> Option<Self> {
        let info = check_tool_with_arg(&program.to_string_lossy(), "-ver");
        if !info.available {
            return None;
        }
        Some(Self {
            program: info.path.unwrap_or_else(|| program.to_path_buf()),
            version: info.version,
        })
    }

    /// Path or name of the program that will be invoked.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Version reported by `-ver`, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Arguments for copying [`DATE_TAGS`] from `source` to `destination`.
    ///
    /// `exiftool -TagsFromFile <source> -CreateDate -ModifyDate -DateTimeOriginal -overwrite_original <destination>`
    pub fn date_copy_args(source: &Path, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(DATE_TAGS.len() + 4);
        args.push("-TagsFromFile".into());
        args.push(source.as_os_str().to_os_string());
        args.extend(DATE_TAGS.iter().map(OsString::from));
        args.push("-overwrite_original".into());
        args.push(destination.as_os_str().to_os_string());
        args
    }
}

impl MetadataCopier for ExifTool {
    fn copy_dates(&self, source: &Path, destination: &Path) -> Result<()> {
        let tool = self.program.to_string_lossy().to_string();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Copying date tags {:?} -> {:?} with {}",
            source,
            destination,
            tool
        );

        let output = Command::new(&self.program)
            .args(Self::date_copy_args(source, destination))
            .output()
            .map_err(|e| Error::tool_spawn(&tool, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed(
                tool,
                format!("exited with status {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(())
    }
}

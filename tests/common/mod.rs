//! Shared helpers for integration tests.
//!
//! Provides [`Workspace`], a temporary source/destination folder pair, plus
//! fake [`Transcoder`] and [`MetadataCopier`] implementations that record
//! what they were asked to do.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use photoforge::config::ConversionConfig;
use photoforge_av::{Error, MetadataCopier, Transcoder};
use photoforge_common::ImageFormat;
use tempfile::TempDir;

/// A temporary `src/` + `dst/` pair.
pub struct Workspace {
    pub dir: TempDir,
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl Workspace {
    /// Create the workspace; `dst/` is left for the pipeline to create.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");
        std::fs::create_dir_all(&source).unwrap();
        Self { dir, source, dest }
    }

    /// Write a placeholder file into `src/`.
    pub fn add_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.source.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write a small solid-colour PNG into `src/`.
    pub fn add_png(&self, name: &str) -> PathBuf {
        let path = self.source.join(name);
        let mut img = RgbImage::new(8, 6);
        for pixel in img.pixels_mut() {
            *pixel = Rgb([20, 120, 220]);
        }
        img.save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        path
    }

    /// Conversion settings pointing at this workspace.
    pub fn config(&self, from: ImageFormat, to: ImageFormat) -> ConversionConfig {
        ConversionConfig {
            source_dir: self.source.clone(),
            dest_dir: self.dest.clone(),
            from,
            to,
            ..Default::default()
        }
    }

    /// Sorted names of the files in `dst/`.
    pub fn outputs(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(&self.dest) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

/// Succeeds unless the file name contains "corrupt".
#[derive(Default)]
pub struct FakeTranscoder {
    pub attempted: RefCell<Vec<String>>,
}

impl Transcoder for FakeTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> photoforge_av::Result<()> {
        let name = input.file_name().unwrap().to_string_lossy().to_string();
        self.attempted.borrow_mut().push(name.clone());
        if name.contains("corrupt") {
            return Err(Error::InvalidInput(format!("{name}: not a HEIF file")));
        }
        std::fs::write(output, b"\xFF\xD8\xFF\xD9")?;
        Ok(())
    }
}

/// How [`FakeCopier`] answers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CopierMode {
    Succeed,
    /// The tool ran and exited non-zero.
    ExitFailure,
    /// The tool could not be started.
    SpawnFailure,
}

/// Records every copy request.
pub struct FakeCopier {
    pub mode: CopierMode,
    pub calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl FakeCopier {
    fn with_mode(mode: CopierMode) -> Self {
        Self {
            mode,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_mode(CopierMode::Succeed)
    }

    pub fn failing() -> Self {
        Self::with_mode(CopierMode::ExitFailure)
    }

    pub fn unspawnable() -> Self {
        Self::with_mode(CopierMode::SpawnFailure)
    }
}

impl MetadataCopier for FakeCopier {
    fn copy_dates(&self, source: &Path, destination: &Path) -> photoforge_av::Result<()> {
        self.calls
            .borrow_mut()
            .push((source.to_path_buf(), destination.to_path_buf()));
        match self.mode {
            CopierMode::Succeed => Ok(()),
            CopierMode::ExitFailure => {
                Err(Error::tool_failed("exiftool", "exited with status 1: bad file"))
            }
            CopierMode::SpawnFailure => Err(Error::tool_spawn(
                "exiftool",
                std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            )),
        }
    }
}

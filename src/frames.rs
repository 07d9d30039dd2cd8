use image::{DynamicImage, GrayImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{TrackError, TrackResult};
use crate::sequence::FrameSource;

/// Frames stored as image files in one directory.
#[derive(Debug, Clone)]
pub struct ImageDirectory {
    paths: Vec<PathBuf>,
}

impl ImageDirectory {
    /// Get all image files from a directory, ordered by file name.
    ///
    /// # Arguments
    ///
    /// * 'dir' - directory to list (not recursive).
    /// * 'extensions' - accepted extensions, compared case-insensitively.
    ///
    /// # Returns
    ///
    /// TrackResult<ImageDirectory> - fails with EmptyFrameDirectory when no
    /// file matches.
    ///
    pub fn open<P: AsRef<Path>>(dir: P, extensions: &[String]) -> TrackResult<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let accepted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
                .unwrap_or(false);
            if accepted {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(TrackError::EmptyFrameDirectory {
                path: dir.to_path_buf(),
            });
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!(frames = paths.len(), dir = %dir.display(), "Listed frames");

        Ok(Self { paths })
    }

    /// Uses an explicit, already ordered list of frame files.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// Loads a frame as displayable colour image.
    pub fn load_color(&self, index: usize) -> TrackResult<DynamicImage> {
        let path = self.path(index).ok_or(TrackError::FrameUnavailable {
            index,
            frames: self.paths.len(),
        })?;
        image::open(path).map_err(|source| TrackError::FrameLoad {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl FrameSource for ImageDirectory {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn frame_id(&self, index: usize) -> String {
        self.path(index)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("#{index}"))
    }

    fn load_grayscale(&self, index: usize) -> TrackResult<GrayImage> {
        Ok(self.load_color(index)?.to_luma8())
    }
}

/// In-memory frames, mostly for synthetic sequences.
impl FrameSource for [GrayImage] {
    fn len(&self) -> usize {
        <[GrayImage]>::len(self)
    }

    fn frame_id(&self, index: usize) -> String {
        format!("frame {index}")
    }

    fn load_grayscale(&self, index: usize) -> TrackResult<GrayImage> {
        self.get(index)
            .cloned()
            .ok_or(TrackError::FrameUnavailable {
                index,
                frames: <[GrayImage]>::len(self),
            })
    }
}

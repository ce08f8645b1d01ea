use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::Frame;
use crate::error::Error;

/// Image extensions the folder loader recognizes (compared
/// case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "bmp"];

/// List the image files directly inside `dir`, in file name order.
///
/// Only the folder itself is scanned (no recursion), matching what a user
/// expects from "load this folder". Entries that cannot be read are
/// skipped.
pub fn scan_folder(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_image_extension(p))
        .collect()
}

/// Load a single image file as an RGB frame.
pub fn load_frame(path: &Path) -> Result<Frame, Error> {
    Ok(image::open(path)?.to_rgb8())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

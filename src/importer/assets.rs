// src/importer/assets.rs
//! Post-copy cleanup of the archived report pages.

use crate::error::{ReportError, Result};
use crate::reporting;
use regex::{Regex, RegexBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BITMAP_EXT: &str = "bmp";
const PNG_EXT: &str = "png";
pub const INDEX_NAME: &str = "index.html";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub removed: usize,
    pub converted: usize,
    pub errors: usize,
}

/// Compiles the decorative asset patterns, ignoring case so a tree that was
/// not lowercased still matches.
///
/// # Errors
/// Returns error if a pattern is not a valid regex.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(ReportError::from)
        })
        .collect()
}

/// Deletes files whose path relative to `root` matches any pattern.
pub fn remove_decorative(root: &Path, patterns: &[Regex], stats: &mut AssetStats) {
    if patterns.is_empty() {
        return;
    }
    for path in files_below(root, stats) {
        let rel = relative_slash_path(root, &path);
        if !patterns.iter().any(|re| re.is_match(&rel)) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => stats.removed += 1,
            Err(e) => {
                stats.errors += 1;
                reporting::warn(format!("Failed to remove {}: {e}", path.display()));
            }
        }
    }
}

/// Converts every bitmap to PNG and leaves a link under the old name.
///
/// `CHART.bmp` becomes `CHART.png` plus the symlink `CHART.bmp -> CHART.png`,
/// so pages referring to the bitmap keep working.
pub fn convert_bitmaps(root: &Path, stats: &mut AssetStats) {
    for path in files_below(root, stats) {
        let is_bitmap = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(BITMAP_EXT));
        if !is_bitmap {
            continue;
        }
        match convert_bitmap(&path) {
            Ok(_) => stats.converted += 1,
            Err(e) => {
                stats.errors += 1;
                reporting::warn(e);
            }
        }
    }
}

/// Converts one bitmap, returning the path of the new PNG.
///
/// # Errors
/// Returns error if the bitmap cannot be decoded, the PNG cannot be written,
/// or the bitmap cannot be replaced by a link.
pub fn convert_bitmap(path: &Path) -> Result<PathBuf> {
    let png = path.with_extension(PNG_EXT);
    let image = image::open(path).map_err(|e| ReportError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    image
        .save_with_format(&png, image::ImageFormat::Png)
        .map_err(|e| ReportError::Image {
            path: png.clone(),
            message: e.to_string(),
        })?;

    fs::remove_file(path).map_err(|e| ReportError::io(e, path))?;
    let target = png.file_name().map(PathBuf::from).unwrap_or_else(|| png.clone());
    symlink_file(&target, path).map_err(|e| ReportError::io(e, path))?;
    Ok(png)
}

/// Creates `index.html` in `root` pointing at the review page.
///
/// # Errors
/// Returns error if the link cannot be created or `index.html` already exists.
pub fn link_index(root: &Path, target: &str) -> Result<PathBuf> {
    let link = root.join(INDEX_NAME);
    if fs::symlink_metadata(&link).is_ok() {
        return Err(ReportError::io(
            io::Error::new(io::ErrorKind::AlreadyExists, "index already exists"),
            link,
        ));
    }
    symlink_file(Path::new(target), &link).map_err(|e| ReportError::io(e, &link))?;
    Ok(link)
}

// Collected before the caller starts deleting or replacing files.
fn files_below(root: &Path, stats: &mut AssetStats) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|item| match item {
            Ok(e) => Some(e),
            Err(e) => {
                stats.errors += 1;
                reporting::warn(format!("Failed to read entry: {e}"));
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

// src/importer/copy.rs
//! Copies the device report folder into the local archive.

use crate::error::{ReportError, Result};
use crate::reporting;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Operating-system clutter found on removable volumes.
const EXCLUDED_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// Statistics from a copy operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files_copied: usize,
    pub dirs_copied: usize,
    pub files_skipped: usize,
    pub symlinks_skipped: usize,
    pub errors: usize,
}

impl CopyStats {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Copied {} files, {} dirs. Skipped {} files, {} symlinks.",
            self.files_copied, self.dirs_copied, self.files_skipped, self.symlinks_skipped
        )
    }
}

/// Copies everything below `src` into the existing directory `dest`.
///
/// Entries that fail are reported and counted; the copy goes on.
///
/// # Errors
/// Returns error if `dest` is not an existing directory.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<CopyStats> {
    if !dest.is_dir() {
        return Err(ReportError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "destination is not a directory"),
            dest,
        ));
    }

    let mut stats = CopyStats::default();

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                stats.errors += 1;
                reporting::warn(format!("Failed to read entry: {e}"));
                continue;
            }
        };

        let Ok(rel_path) = entry.path().strip_prefix(src) else {
            continue;
        };
        let dest_path = dest.join(rel_path);

        if entry.file_type().is_dir() {
            match fs::create_dir_all(&dest_path) {
                Ok(()) => stats.dirs_copied += 1,
                Err(e) => {
                    stats.errors += 1;
                    reporting::warn(format!("Failed to create dir {}: {e}", dest_path.display()));
                }
            }
        } else if entry.file_type().is_file() {
            if is_excluded(&entry.file_name().to_string_lossy()) {
                stats.files_skipped += 1;
                continue;
            }
            match fs::copy(entry.path(), &dest_path) {
                Ok(_) => stats.files_copied += 1,
                Err(e) => {
                    stats.errors += 1;
                    reporting::warn(format!("Failed to copy {}: {e}", entry.path().display()));
                }
            }
        } else if entry.file_type().is_symlink() {
            stats.symlinks_skipped += 1;
        }
    }

    Ok(stats)
}

/// Adds owner write permission to every entry below and including `root`.
///
/// Files copied from a read-only volume keep their read-only mode. Returns
/// the number of entries that could not be changed.
pub fn grant_write(root: &Path) -> usize {
    let mut errors = 0;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) if !e.file_type().is_symlink() => e,
            Ok(_) => continue,
            Err(e) => {
                errors += 1;
                reporting::warn(format!("Failed to read entry: {e}"));
                continue;
            }
        };
        if let Err(e) = make_writable(entry.path()) {
            errors += 1;
            reporting::warn(format!("Failed to set permissions on {}: {e}", entry.path().display()));
        }
    }
    errors
}

#[cfg(unix)]
fn make_writable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    let mode = perms.mode();
    if mode & 0o200 == 0 {
        perms.set_mode(mode | 0o200);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn make_writable(path: &Path) -> std::io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    if perms.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

fn is_excluded(name: &str) -> bool {
    EXCLUDED_FILES.iter().any(|f| f.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_basic() -> Result<()> {
        let src = TempDir::new()?;
        let dest = TempDir::new()?;

        fs::write(src.path().join("_REVIEW.HTM"), "hello")?;
        fs::create_dir(src.path().join("IMG"))?;
        fs::write(src.path().join("IMG/LOGO.GIF"), "gif")?;

        let stats = copy_tree(src.path(), dest.path())?;

        assert!(stats.is_success());
        assert_eq!(stats.files_copied, 2);
        assert_eq!(stats.dirs_copied, 1);
        assert!(dest.path().join("_REVIEW.HTM").exists());
        assert!(dest.path().join("IMG/LOGO.GIF").exists());
        Ok(())
    }

    #[test]
    fn test_copy_skips_os_clutter() -> Result<()> {
        let src = TempDir::new()?;
        let dest = TempDir::new()?;
        fs::write(src.path().join("Thumbs.db"), "x")?;
        fs::write(src.path().join("DATA.XML"), "<R/>")?;

        let stats = copy_tree(src.path(), dest.path())?;

        assert_eq!(stats.files_skipped, 1);
        assert!(!dest.path().join("Thumbs.db").exists());
        assert!(dest.path().join("DATA.XML").exists());
        Ok(())
    }

    #[test]
    fn test_copy_requires_destination() {
        let src = TempDir::new().unwrap();
        let missing = src.path().join("missing");
        assert!(copy_tree(src.path(), &missing).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_grant_write_sets_owner_bit() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let d = TempDir::new()?;
        let f = d.path().join("ro.htm");
        fs::write(&f, "x")?;
        fs::set_permissions(&f, fs::Permissions::from_mode(0o444))?;

        assert_eq!(grant_write(d.path()), 0);
        assert_ne!(fs::metadata(&f)?.permissions().mode() & 0o200, 0);
        Ok(())
    }
}

// src/normalize.rs
//! Lowercases a report tree in place.
//!
//! The vendor software writes mixed-case file names and links to them from
//! its HTML and XML pages. Every name below the root is lowercased, children
//! before parents, and quoted path-like tokens inside text files are
//! lowercased to match.

use crate::error::{ReportError, Result};
use crate::reporting;
use regex::bytes::{Captures, Regex};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Quoted tokens made of word characters, slashes and dots containing at
/// least one dot, e.g. `"IMG/LOGO.GIF"`.
pub const PATH_TOKEN_PATTERN: &str = r#""([\w/.]+?)\.([\w/.]+?)""#;

static PATH_TOKEN_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(PATH_TOKEN_PATTERN).unwrap_or_else(|_| panic!("Invalid Regex"))
});

// Content that is not UTF-8 only gets ASCII word characters.
static PATH_TOKEN_BYTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?-u){PATH_TOKEN_PATTERN}")).unwrap_or_else(|_| panic!("Invalid Regex"))
});

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Extensions (lowercase, no dot) whose content is left untouched.
    pub skip_extensions: Vec<String>,
    pub verbose: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            skip_extensions: crate::config::NormalizeConfig::default().skip_extensions,
            verbose: false,
        }
    }
}

/// Statistics from a normalization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub renamed: usize,
    pub rewritten: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Lowercases every name below `root` and the references inside text files.
///
/// The root itself keeps its name. Failures on single entries are reported
/// and counted; the rest of the tree is still processed.
pub fn rename_lower_recursive(root: &Path, opts: &NormalizeOptions) -> NormalizeStats {
    let mut stats = NormalizeStats::default();

    // Collected up front: renaming while a directory is being read is unspecified.
    let entries: Vec<_> = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
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
        .collect();

    for entry in entries {
        let path = match rename_lower(entry.path()) {
            Ok(Some(new_path)) => {
                stats.renamed += 1;
                if opts.verbose {
                    reporting::detail(format!("{} -> {}", entry.path().display(), new_path.display()));
                }
                new_path
            }
            Ok(None) => entry.path().to_path_buf(),
            Err(e) => {
                stats.errors += 1;
                reporting::warn(format!("Error renaming: {e}"));
                entry.path().to_path_buf()
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if is_skipped(&path, &opts.skip_extensions) {
            stats.skipped += 1;
            continue;
        }

        match rewrite_references(&path) {
            Ok(true) => stats.rewritten += 1,
            Ok(false) => {}
            Err(e) => {
                stats.errors += 1;
                reporting::warn(format!("Error rewriting file: {e}"));
            }
        }
    }

    stats
}

/// Renames the last component of `path` to lowercase.
///
/// Returns the new path, or `None` if the name was already lowercase.
///
/// # Errors
/// Returns error if the name is not valid UTF-8, a different entry already
/// uses the lowercase name, or the rename fails.
pub fn rename_lower(path: &Path) -> Result<Option<PathBuf>> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ReportError::io(
                io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
                path,
            )
        })?;

    let lower = name.to_lowercase();
    if lower == name {
        return Ok(None);
    }

    let target = path.with_file_name(&lower);
    if fs::symlink_metadata(&target).is_ok() && !same_entry(path, &target) {
        return Err(ReportError::io(
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", target.display()),
            ),
            path,
        ));
    }

    fs::rename(path, &target).map_err(|e| ReportError::io(e, path))?;
    Ok(Some(target))
}

/// Lowercases the quoted path tokens in a file, writing only on change.
///
/// # Errors
/// Returns error if the file cannot be read or written.
pub fn rewrite_references(path: &Path) -> Result<bool> {
    let content = fs::read(path).map_err(|e| ReportError::io(e, path))?;
    match lowercase_references(&content) {
        Cow::Owned(replaced) if replaced != content => {
            fs::write(path, replaced).map_err(|e| ReportError::io(e, path))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Lowercases every quoted path token.
///
/// UTF-8 content is lowercased the same way file names are; other content
/// only has its ASCII letters lowercased.
#[must_use]
pub fn lowercase_references(content: &[u8]) -> Cow<'_, [u8]> {
    match std::str::from_utf8(content) {
        Ok(text) => {
            match PATH_TOKEN_RE.replace_all(text, |caps: &regex::Captures| caps[0].to_lowercase()) {
                Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                Cow::Owned(s) => Cow::Owned(s.into_bytes()),
            }
        }
        Err(_) => {
            PATH_TOKEN_BYTES_RE.replace_all(content, |caps: &Captures| caps[0].to_ascii_lowercase())
        }
    }
}

fn is_skipped(path: &Path, skip_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| skip_extensions.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

// Names differing only in case cannot coexist on these file systems.
#[cfg(not(unix))]
fn same_entry(_a: &Path, _b: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lowercase_references_only_touches_tokens() {
        let html = br#"<A HREF="PAGES/DAY.HTM">Open Day</A> <IMG SRC="IMG/LOGO.GIF">"#;
        let out = lowercase_references(html);
        assert_eq!(
            out.as_ref(),
            br#"<A HREF="pages/day.htm">Open Day</A> <IMG SRC="img/logo.gif">"#.as_slice()
        );
    }

    #[test]
    fn test_tokens_without_dot_untouched() {
        let text = br#"<DIV CLASS="HEADER" ID="MAIN">"#;
        assert!(matches!(lowercase_references(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_non_utf8_content_handled() {
        let mut text = b"\xE9t\xE9 \"IMG/A.GIF\"".to_vec();
        text.push(0xFF);
        let out = lowercase_references(&text);
        assert_eq!(&out[..], b"\xE9t\xE9 \"img/a.gif\"\xFF");
    }

    #[test]
    fn test_non_ascii_reference_matches_renamed_file() {
        let d = TempDir::new().unwrap();
        fs::write(d.path().join("MESSWERTÉ.HTM"), "x").unwrap();
        fs::write(d.path().join("INDEX.HTM"), r#"<A HREF="MESSWERTÉ.HTM">"#).unwrap();

        let stats = rename_lower_recursive(d.path(), &NormalizeOptions::default());

        assert_eq!(stats.errors, 0);
        assert!(d.path().join("messwerté.htm").exists());
        let index = fs::read_to_string(d.path().join("index.htm")).unwrap();
        assert_eq!(index, r#"<A HREF="messwerté.htm">"#);
    }

    #[test]
    fn test_rename_lower_noop_for_lowercase() {
        let d = TempDir::new().unwrap();
        let p = d.path().join("already.htm");
        fs::write(&p, "x").unwrap();
        assert_eq!(rename_lower(&p).unwrap(), None);
    }

    #[test]
    fn test_rewrite_only_when_changed() {
        let d = TempDir::new().unwrap();
        let p = d.path().join("a.htm");
        fs::write(&p, r#"<a href="img/x.gif">"#).unwrap();
        assert!(!rewrite_references(&p).unwrap());
        fs::write(&p, r#"<a href="IMG/X.GIF">"#).unwrap();
        assert!(rewrite_references(&p).unwrap());
        assert_eq!(fs::read_to_string(&p).unwrap(), r#"<a href="img/x.gif">"#);
    }

    #[test]
    fn test_bottom_up_nested_dirs() {
        let d = TempDir::new().unwrap();
        fs::create_dir_all(d.path().join("REPORT/IMG/SUB")).unwrap();
        fs::write(d.path().join("REPORT/IMG/SUB/A.TXT"), "\"X/Y.Z\"").unwrap();

        let stats = rename_lower_recursive(d.path(), &NormalizeOptions::default());
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.renamed, 4);
        let f = d.path().join("report/img/sub/a.txt");
        assert_eq!(fs::read_to_string(f).unwrap(), "\"x/y.z\"");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_conflicting_name_not_overwritten() {
        let d = TempDir::new().unwrap();
        fs::write(d.path().join("DATA.TXT"), "upper").unwrap();
        fs::write(d.path().join("data.txt"), "lower").unwrap();

        let stats = rename_lower_recursive(d.path(), &NormalizeOptions::default());
        assert_eq!(stats.errors, 1);
        assert_eq!(fs::read_to_string(d.path().join("DATA.TXT")).unwrap(), "upper");
        assert_eq!(fs::read_to_string(d.path().join("data.txt")).unwrap(), "lower");
    }
}

// src/discovery.rs
use crate::reporting;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const XML_EXT: &str = "xml";

/// Every `*.xml` file below a root directory.
///
/// Each call to [`XmlReports::iter`] starts a fresh walk, so the sequence can
/// be consumed more than once. Order follows the file system.
#[derive(Debug, Clone)]
pub struct XmlReports {
    root: PathBuf,
}

/// Returns the report files found anywhere under `root`.
#[must_use]
pub fn discover(root: &Path) -> XmlReports {
    XmlReports {
        root: root.to_path_buf(),
    }
}

impl XmlReports {
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|item| match item {
                Ok(entry) => Some(entry),
                Err(e) => {
                    reporting::warn(format!("skipping unreadable entry: {e}"));
                    None
                }
            })
            .filter(|entry| is_report_file(entry) && is_xml(entry.path()))
            .map(walkdir::DirEntry::into_path)
    }
}

impl IntoIterator for &XmlReports {
    type Item = PathBuf;
    type IntoIter = Box<dyn Iterator<Item = PathBuf>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

// Links are listed but not descended into; a link to a file still counts.
fn is_report_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(XML_EXT))
}

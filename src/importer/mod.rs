// src/importer/mod.rs
//! Imports the report pages written by the Smart Pix device.
//!
//! The device folder is copied into `<reports_dir>/<YYYY-MM-DD>`, made
//! writable, lowercased, stripped of decorative images, and its bitmaps are
//! converted to PNG. Nothing is created when the device is not mounted.

pub mod assets;
pub mod copy;

pub use self::assets::AssetStats;
pub use self::copy::CopyStats;

use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::normalize::{self, NormalizeOptions, NormalizeStats};
use crate::reporting;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolved settings for one import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Report folder on the mounted device.
    pub device_dir: PathBuf,
    /// Dated folder the report is copied into. Must not exist yet.
    pub archive_dir: PathBuf,
    /// `None` keeps the vendor's mixed-case names.
    pub normalize: Option<NormalizeOptions>,
    pub decorative_assets: Vec<String>,
    pub index_target: String,
    pub verbose: bool,
}

impl ImportOptions {
    #[must_use]
    pub fn from_config(config: &Config, user: &str, date: &str) -> Self {
        let normalize = config.import.normalize.then(|| NormalizeOptions {
            skip_extensions: config.normalize.skip_extensions.clone(),
            verbose: false,
        });
        Self {
            device_dir: device_report_dir(
                &config.import.media_root,
                user,
                &config.import.device_folder,
            ),
            archive_dir: config.paths.reports_dir.join(date),
            normalize,
            decorative_assets: config.import.decorative_assets.clone(),
            index_target: config.import.index_target.clone(),
            verbose: false,
        }
    }
}

/// Outcome of a completed import.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub archive: PathBuf,
    pub copy: CopyStats,
    pub permission_errors: usize,
    pub normalize: Option<NormalizeStats>,
    pub assets: AssetStats,
}

impl ImportReport {
    /// Recoverable problems reported during the run.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.copy.errors
            + self.permission_errors
            + self.normalize.as_ref().map_or(0, |n| n.errors)
            + self.assets.errors
    }
}

/// `<media_root>/<user>/<device_folder>`
#[must_use]
pub fn device_report_dir(media_root: &Path, user: &str, device_folder: &Path) -> PathBuf {
    media_root.join(user).join(device_folder)
}

/// Today's local date, the name of a new archive folder.
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Runs the full import.
///
/// # Errors
/// Returns [`ReportError::DeviceUnavailable`] if the device folder is missing,
/// [`ReportError::ArchiveExists`] if today's folder was already imported, or
/// an error if the folder cannot be created. Later per-file problems are
/// warnings counted in the report.
pub fn run(opts: &ImportOptions) -> Result<ImportReport> {
    if !opts.device_dir.is_dir() {
        return Err(ReportError::DeviceUnavailable {
            path: opts.device_dir.clone(),
        });
    }
    let patterns = assets::compile_patterns(&opts.decorative_assets)?;

    create_archive(&opts.archive_dir)?;
    let archive = opts.archive_dir.as_path();

    reporting::progress(format!(
        "Copy {} -> {}",
        opts.device_dir.display(),
        archive.display()
    ));
    let mut report = ImportReport {
        archive: archive.to_path_buf(),
        copy: copy::copy_tree(&opts.device_dir, archive)?,
        ..ImportReport::default()
    };
    if opts.verbose {
        reporting::detail(report.copy.summary());
    }

    report.permission_errors = copy::grant_write(archive);

    if let Some(normalize_opts) = &opts.normalize {
        report.normalize = Some(normalize::rename_lower_recursive(archive, normalize_opts));
    }

    assets::remove_decorative(archive, &patterns, &mut report.assets);
    assets::convert_bitmaps(archive, &mut report.assets);

    if let Err(e) = assets::link_index(archive, &opts.index_target) {
        report.assets.errors += 1;
        reporting::warn(format!("Could not create index: {e}"));
    }

    Ok(report)
}

fn create_archive(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ReportError::io(e, parent))?;
        }
    }
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(ReportError::ArchiveExists {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ReportError::io(e, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(tmp: &Path) -> ImportOptions {
        let mut config = Config::new();
        config.import.media_root = tmp.join("media");
        config.paths.reports_dir = tmp.join("reports");
        ImportOptions::from_config(&config, "alice", "2024-05-06")
    }

    #[test]
    fn test_device_dir_layout() {
        let p = device_report_dir(Path::new("/media"), "alice", Path::new("SMART_PIX/REPORT"));
        assert_eq!(p, PathBuf::from("/media/alice/SMART_PIX/REPORT"));
    }

    #[test]
    fn test_today_format() {
        let t = today();
        assert!(chrono::NaiveDate::parse_from_str(&t, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_missing_device_creates_nothing() {
        let d = TempDir::new().unwrap();
        let opts = options(d.path());

        let err = run(&opts).unwrap_err();
        assert!(matches!(err, ReportError::DeviceUnavailable { .. }));
        assert!(!d.path().join("reports").exists());
    }

    #[test]
    fn test_existing_archive_is_refused() {
        let d = TempDir::new().unwrap();
        let opts = options(d.path());
        fs::create_dir_all(&opts.device_dir).unwrap();
        fs::create_dir_all(&opts.archive_dir).unwrap();
        fs::write(opts.archive_dir.join("keep.txt"), "old").unwrap();

        let err = run(&opts).unwrap_err();
        assert!(matches!(err, ReportError::ArchiveExists { .. }));
        assert_eq!(fs::read_to_string(opts.archive_dir.join("keep.txt")).unwrap(), "old");
    }

    #[test]
    fn test_keep_case_skips_normalizer() {
        let d = TempDir::new().unwrap();
        let mut opts = options(d.path());
        opts.normalize = None;
        fs::create_dir_all(&opts.device_dir).unwrap();
        fs::write(opts.device_dir.join("_REVIEW.HTM"), "<html/>").unwrap();

        let report = run(&opts).unwrap();
        assert!(report.normalize.is_none());
        assert!(opts.archive_dir.join("_REVIEW.HTM").exists());
    }
}

// tests/unit_config.rs
use diabetesdoc_core::config::{Config, DedupMode};
use diabetesdoc_core::error::ReportError;
use diabetesdoc_core::exit::DocExit;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_load_explicit_file() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join("diabetesdoc.toml");
    fs::write(
        &path,
        "[paths]\nxml_dir = \"/srv/xml\"\n\n[aggregate]\ndedup = \"content\"\nsort_records = true\n",
    )
    .unwrap();

    let c = Config::load(Some(&path)).unwrap();
    assert_eq!(c.paths.xml_dir, PathBuf::from("/srv/xml"));
    assert_eq!(c.paths.profiles_dir(), PathBuf::from("/srv/xml/ipprofiles"));
    assert_eq!(c.aggregate.dedup, DedupMode::Content);
    assert!(c.aggregate.sort_records);
    assert_eq!(c.paths.reports_dir, PathBuf::from("../reports"));
}

#[test]
fn test_import_section() {
    let c = Config::parse_toml(
        "[import]\nmedia_root = \"/run/media\"\nnormalize = false\ndecorative_assets = []\n",
    )
    .unwrap();
    assert_eq!(c.import.media_root, PathBuf::from("/run/media"));
    assert!(!c.import.normalize);
    assert!(c.import.decorative_assets.is_empty());
    assert_eq!(c.import.index_target, "_review.htm");
}

#[test]
fn test_invalid_toml_maps_to_data_error() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join("bad.toml");
    fs::write(&path, "[paths\nxml_dir = 3").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ReportError::Config { .. }));
    assert_eq!(DocExit::from(&err), DocExit::DataError);
}

#[test]
fn test_exit_from_anyhow() {
    let err = anyhow::Error::from(ReportError::DeviceUnavailable {
        path: PathBuf::from("/media/u/SMART_PIX/REPORT"),
    });
    assert_eq!(DocExit::from_error(&err), DocExit::Unavailable);
    assert_eq!(DocExit::from_error(&anyhow::anyhow!("other")), DocExit::Error);
}

// tests/integration_normalize.rs
use diabetesdoc_core::normalize::{rename_lower_recursive, NormalizeOptions};
use std::fs;
use tempfile::TempDir;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\"IMG/A.B\"";

#[test]
fn test_report_page_and_image() {
    let d = TempDir::new().unwrap();
    fs::write(
        d.path().join("REPORT.HTM"),
        r#"<HTML><IMG SRC="IMG/LOGO.GIF"> Blood Glucose</HTML>"#,
    )
    .unwrap();
    fs::write(d.path().join("Chart.PNG"), PNG_BYTES).unwrap();

    let stats = rename_lower_recursive(d.path(), &NormalizeOptions::default());

    assert!(!d.path().join("REPORT.HTM").exists());
    let page = fs::read_to_string(d.path().join("report.htm")).unwrap();
    assert_eq!(page, r#"<HTML><IMG SRC="img/logo.gif"> Blood Glucose</HTML>"#);

    assert_eq!(fs::read(d.path().join("chart.png")).unwrap(), PNG_BYTES);
    assert_eq!(stats.renamed, 2);
    assert_eq!(stats.rewritten, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.errors, 0);
}

#[test]
fn test_links_resolve_after_normalizing() {
    let d = TempDir::new().unwrap();
    fs::create_dir_all(d.path().join("PAGES/IMG")).unwrap();
    fs::write(d.path().join("PAGES/IMG/LOGO.GIF"), "GIF89a").unwrap();
    fs::write(
        d.path().join("PAGES/DAY.XML"),
        r#"<?xml-stylesheet type="text/xsl" href="DAY.XSL"?><DAY/>"#,
    )
    .unwrap();
    fs::write(d.path().join("PAGES/INDEX.HTM"), r#"<A HREF="IMG/LOGO.GIF">"#).unwrap();

    let stats = rename_lower_recursive(d.path(), &NormalizeOptions::default());
    assert_eq!(stats.errors, 0);

    let pages = d.path().join("pages");
    let index = fs::read_to_string(pages.join("index.htm")).unwrap();
    assert_eq!(index, r#"<A HREF="img/logo.gif">"#);
    assert!(pages.join("img/logo.gif").exists());
    let day = fs::read_to_string(pages.join("day.xml")).unwrap();
    assert!(day.contains(r#"href="day.xsl""#));
    // Attribute values without a dot stay as they are.
    assert!(day.contains(r#"type="text/xsl""#));
}

#[test]
fn test_second_run_changes_nothing() {
    let d = TempDir::new().unwrap();
    fs::create_dir(d.path().join("IMG")).unwrap();
    fs::write(d.path().join("IMG/A.HTM"), r#""X.GIF""#).unwrap();
    let opts = NormalizeOptions::default();

    rename_lower_recursive(d.path(), &opts);
    let again = rename_lower_recursive(d.path(), &opts);

    assert_eq!(again.renamed, 0);
    assert_eq!(again.rewritten, 0);
}

#[test]
fn test_root_keeps_its_name() {
    let d = TempDir::new().unwrap();
    let root = d.path().join("REPORT");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("A.TXT"), "").unwrap();

    rename_lower_recursive(&root, &NormalizeOptions::default());

    assert!(root.exists());
    assert!(root.join("a.txt").exists());
}

#[test]
fn test_custom_skip_list() {
    let d = TempDir::new().unwrap();
    fs::write(d.path().join("data.csv"), r#""A.B""#).unwrap();
    let opts = NormalizeOptions {
        skip_extensions: vec!["csv".to_string()],
        verbose: false,
    };

    let stats = rename_lower_recursive(d.path(), &opts);

    assert_eq!(stats.skipped, 1);
    assert_eq!(fs::read_to_string(d.path().join("data.csv")).unwrap(), r#""A.B""#);
}

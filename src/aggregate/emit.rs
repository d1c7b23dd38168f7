// src/aggregate/emit.rs
//! Day and profile document serialization.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Node, NodeType};

use super::parse::is_safe_date;
use crate::error::{ReportError, Result};
use crate::record::{Profile, Record};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf8"?>"#;
pub const DAY_TAG: &str = "DAY";
const XML_PREFIX: &str = "xml";

/// Output location of the day document for `date`.
///
/// # Errors
/// Returns `ReportError::InvalidDate` if `date` is not a plain file stem.
pub fn day_path(xml_dir: &Path, date: &str) -> Result<PathBuf> {
    dated_path(xml_dir, date)
}

/// Output location of the profile document for `date`.
///
/// # Errors
/// Returns `ReportError::InvalidDate` if `date` is not a plain file stem.
pub fn profile_path(profiles_dir: &Path, date: &str) -> Result<PathBuf> {
    dated_path(profiles_dir, date)
}

fn dated_path(dir: &Path, date: &str) -> Result<PathBuf> {
    if !is_safe_date(date) {
        return Err(ReportError::InvalidDate {
            path: dir.to_path_buf(),
            value: date.to_string(),
        });
    }
    Ok(dir.join(format!("{date}.xml")))
}

/// Renders a complete day document.
#[must_use]
pub fn render_day(date: &str, records: &[Record], stylesheet: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{XML_DECLARATION}");
    let _ = writeln!(
        out,
        r#"<?xml-stylesheet type="text/xsl" href="{}"?>"#,
        escape_attr(stylesheet)
    );

    if records.is_empty() {
        let _ = writeln!(out, r#"<{DAY_TAG} Dt="{}"/>"#, escape_attr(date));
        return out;
    }

    let _ = writeln!(out, r#"<{DAY_TAG} Dt="{}">"#, escape_attr(date));
    for record in records {
        let _ = writeln!(out, "  {}", record.raw);
    }
    let _ = writeln!(out, "</{DAY_TAG}>");
    out
}

/// Renders a profile as its own single-element document.
#[must_use]
pub fn render_profile(profile: &Profile) -> String {
    format!("{}\n", profile.raw)
}

/// Replaces `path` with `content`, creating parent directories as needed.
///
/// Content goes to a temporary sibling first and is renamed into place, so
/// the previous document survives a failed write.
///
/// # Errors
/// Returns error if a directory cannot be created or the file cannot be
/// written or renamed.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ReportError::io(e, parent))?;
        }
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content).map_err(|e| ReportError::io(e, &temp_path))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ReportError::io(e, path));
    }
    Ok(())
}

/// Serializes an element subtree from its parsed form.
///
/// Entity references come out resolved. Namespace bindings in scope are
/// declared on the element itself, so the text is a complete fragment.
#[must_use]
pub fn serialize_element(node: Node<'_, '_>) -> String {
    let mut out = String::new();
    write_node(&mut out, node, None);
    out
}

fn write_node(out: &mut String, node: Node<'_, '_>, parent: Option<Node<'_, '_>>) {
    match node.node_type() {
        NodeType::Element => write_element(out, node, parent),
        NodeType::Text => out.push_str(&escape_text(node.text().unwrap_or_default())),
        NodeType::Comment => {
            let _ = write!(out, "<!--{}-->", node.text().unwrap_or_default());
        }
        NodeType::PI => {
            if let Some(pi) = node.pi() {
                match pi.value {
                    Some(value) => {
                        let _ = write!(out, "<?{} {value}?>", pi.target);
                    }
                    None => {
                        let _ = write!(out, "<?{}?>", pi.target);
                    }
                }
            }
        }
        NodeType::Root => {}
    }
}

fn write_element(out: &mut String, node: Node<'_, '_>, parent: Option<Node<'_, '_>>) {
    let name = qualified_name(node, node.tag_name().namespace(), node.tag_name().name());
    let _ = write!(out, "<{name}");

    for ns in node.namespaces() {
        if ns.name() == Some(XML_PREFIX) {
            continue;
        }
        let inherited = parent.is_some_and(|p| {
            p.namespaces().any(|pn| pn.name() == ns.name() && pn.uri() == ns.uri())
        });
        if inherited {
            continue;
        }
        match ns.name() {
            Some(prefix) => {
                let _ = write!(out, r#" xmlns:{prefix}="{}""#, escape_attr(ns.uri()));
            }
            None => {
                let _ = write!(out, r#" xmlns="{}""#, escape_attr(ns.uri()));
            }
        }
    }

    for attr in node.attributes() {
        let attr_name = qualified_name(node, attr.namespace(), attr.name());
        let _ = write!(out, r#" {attr_name}="{}""#, escape_attr(attr.value()));
    }

    if !node.has_children() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in node.children() {
        write_node(out, child, Some(node));
    }
    let _ = write!(out, "</{name}>");
}

fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// src/aggregate/parse.rs
//! Reading one device report into records and an optional profile.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use roxmltree::{Document, Node, ParsingOptions};

use super::emit;
use crate::error::{ReportError, Result};
use crate::record::{Profile, Record};

pub const PROFILE_TAG: &str = "IP";
pub const PUMP_DATA_TAG: &str = "IPDATA";
pub const METER_DATA_TAG: &str = "BGDATA";
pub const DATE_ATTR: &str = "Dt";
pub const TIME_ATTR: &str = "Tm";

const PREDEFINED_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "apos"];

static ENTITY_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&([A-Za-z_:][\w.:-]*);").unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Everything a single report file contributes.
#[derive(Debug, Default)]
pub struct ParsedReport {
    pub profile: Option<Profile>,
    pub records: Vec<Record>,
    pub skipped: Vec<Skip>,
}

/// An element left out because its date cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    MissingDate { element: String },
    UnsafeDate { element: String, value: String },
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::MissingDate { element } => write!(f, "<{element}> has no {DATE_ATTR} attribute"),
            Skip::UnsafeDate { element, value } => {
                write!(f, "<{element}> has unusable {DATE_ATTR}={value:?}")
            }
        }
    }
}

/// Reads and parses a report file.
///
/// # Errors
/// Returns `ReportError::Io` if the file cannot be read and
/// `ReportError::Xml` if it is not well-formed.
pub fn parse_file(path: &Path) -> Result<ParsedReport> {
    let bytes = fs::read(path).map_err(|e| ReportError::io(e, path))?;
    let text = decode(bytes);
    parse_str(&text).map_err(|source| ReportError::Xml {
        source,
        path: path.to_path_buf(),
    })
}

/// Parses report text.
///
/// # Errors
/// Returns the parser error if the document is not well-formed.
pub fn parse_str(text: &str) -> std::result::Result<ParsedReport, roxmltree::Error> {
    let mut opts = ParsingOptions::default();
    opts.allow_dtd = true;
    let doc = Document::parse_with_options(text, opts)?;
    let root = doc.root_element();

    let mut report = ParsedReport::default();

    if let Some(ip) = child_elements(root).find(|n| n.has_tag_name(PROFILE_TAG)) {
        match element_date(ip) {
            Ok(date) => {
                report.profile = Some(Profile {
                    date: date.to_string(),
                    raw: element_text(text, ip),
                });
            }
            Err(skip) => report.skipped.push(skip),
        }
    }

    for container in [PUMP_DATA_TAG, METER_DATA_TAG] {
        let data = child_elements(root)
            .filter(|n| n.has_tag_name(container))
            .flat_map(|n| child_elements(n));
        for node in data {
            match element_date(node) {
                Ok(date) => report.records.push(Record {
                    name: node.tag_name().name().to_string(),
                    date: date.to_string(),
                    time: node.attribute(TIME_ATTR).map(str::to_string),
                    raw: element_text(text, node),
                }),
                Err(skip) => report.skipped.push(skip),
            }
        }
    }

    Ok(report)
}

/// Parses a previously written day document back into records.
///
/// Children without their own `Dt` inherit the day's date.
///
/// # Errors
/// Returns the parser error if the document is not well-formed.
pub fn parse_day_document(text: &str) -> std::result::Result<Vec<Record>, roxmltree::Error> {
    let mut opts = ParsingOptions::default();
    opts.allow_dtd = true;
    let doc = Document::parse_with_options(text, opts)?;
    let root = doc.root_element();
    let day = root.attribute(DATE_ATTR).unwrap_or_default();

    Ok(child_elements(root)
        .map(|node| Record {
            name: node.tag_name().name().to_string(),
            date: node.attribute(DATE_ATTR).unwrap_or(day).to_string(),
            time: node.attribute(TIME_ATTR).map(str::to_string),
            raw: element_text(text, node),
        })
        .collect())
}

/// Source text of an element that can stand on its own in another document.
///
/// The verbatim slice is kept unless the element refers to entities declared
/// in the report's DTD or uses namespaces declared outside it; those are
/// serialized again from the parsed tree.
#[must_use]
pub fn element_text(text: &str, node: Node<'_, '_>) -> String {
    let raw = &text[node.range()];
    if uses_namespaces(node) || uses_declared_entities(raw) {
        emit::serialize_element(node)
    } else {
        raw.to_string()
    }
}

fn uses_namespaces(node: Node<'_, '_>) -> bool {
    node.descendants().filter(Node::is_element).any(|n| {
        n.tag_name().namespace().is_some() || n.attributes().any(|a| a.namespace().is_some())
    })
}

fn uses_declared_entities(raw: &str) -> bool {
    ENTITY_REF_RE
        .captures_iter(raw)
        .any(|caps| !PREDEFINED_ENTITIES.contains(&&caps[1]))
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn element_date<'a>(node: Node<'a, '_>) -> std::result::Result<&'a str, Skip> {
    let element = node.tag_name().name().to_string();
    match node.attribute(DATE_ATTR) {
        None => Err(Skip::MissingDate { element }),
        Some(value) if !is_safe_date(value) => Err(Skip::UnsafeDate {
            element,
            value: value.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

/// A date is used verbatim as a file stem, so it must stay a single plain
/// path component.
#[must_use]
pub fn is_safe_date(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && !value.contains("..")
        && !value.contains(['/', '\\', '\0'])
}

/// Decodes report bytes: UTF-8 when valid, otherwise ISO-8859-1 (the
/// desktop software's legacy encoding). A leading byte order mark is dropped.
fn decode(bytes: Vec<u8>) -> String {
    let mut text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    };
    if text.starts_with('\u{feff}') {
        text.remove(0);
    }
    text
}

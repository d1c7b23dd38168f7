use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub aggregate: AggregateConfig,
}

/// Where reports are read from and day documents are written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
    #[serde(default = "default_xml_dir")]
    pub xml_dir: PathBuf,
    #[serde(default = "default_profiles_subdir")]
    pub profiles_subdir: String,
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
            xml_dir: default_xml_dir(),
            profiles_subdir: default_profiles_subdir(),
            stylesheet: default_stylesheet(),
        }
    }
}

impl PathConfig {
    #[must_use]
    pub fn profiles_dir(&self) -> PathBuf {
        self.xml_dir.join(&self.profiles_subdir)
    }
}

fn default_reports_dir() -> PathBuf { PathBuf::from("../reports") }
fn default_xml_dir() -> PathBuf { PathBuf::from("../xml") }
fn default_profiles_subdir() -> String { "ipprofiles".to_string() }
fn default_stylesheet() -> String { "day.xsl".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
    #[serde(default = "default_device_folder")]
    pub device_folder: PathBuf,
    #[serde(default = "default_index_target")]
    pub index_target: String,
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// Regexes matched against paths relative to the imported folder.
    #[serde(default = "default_decorative_assets")]
    pub decorative_assets: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            media_root: default_media_root(),
            device_folder: default_device_folder(),
            index_target: default_index_target(),
            normalize: true,
            decorative_assets: default_decorative_assets(),
        }
    }
}

fn default_media_root() -> PathBuf { PathBuf::from("/media") }
fn default_device_folder() -> PathBuf { PathBuf::from("SMART_PIX/REPORT") }
fn default_index_target() -> String { "_review.htm".to_string() }
const fn default_true() -> bool { true }

fn default_decorative_assets() -> Vec<String> {
    vec![
        r"^img/rd.*\.gif$".to_string(),
        r"^img/scanning\.gif$".to_string(),
        r"^img/.*\.png$".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Extensions (without dot) whose content is never rewritten.
    #[serde(default = "default_skip_extensions")]
    pub skip_extensions: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { skip_extensions: default_skip_extensions() }
    }
}

fn default_skip_extensions() -> Vec<String> {
    vec!["bmp".to_string(), "gif".to_string(), "png".to_string()]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateConfig {
    #[serde(default)]
    pub dedup: DedupMode,
    #[serde(default)]
    pub merge_existing: bool,
    #[serde(default)]
    pub sort_records: bool,
}

/// How records of the same day are considered duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Keep every record, duplicates included.
    #[default]
    Off,
    /// Same element name and identical content.
    Content,
    /// Same `Dt`, `Tm` and element name.
    Timestamp,
}

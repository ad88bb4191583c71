//! Runtime configuration
//!
//! Defaults match the strike-hours workbook. A YAML file can override any
//! field; the binaries layer `--source`/`--labels` flags (or their
//! `STRIKE_HOURS_*` environment variables) on top.

use crate::error::{StrikeError, StrikeResult};
use crate::report::HoursDisplay;
use crate::search::EmptyQuery;
use crate::sheet::DEFAULT_NAME_TOKENS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Source file used when nothing else is configured
pub const DEFAULT_SOURCE: &str = "horas_greve.ods";

/// Known sheet names and their short month labels
const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("NOVEMBRO25", "NOV/2025"),
    ("DEZEMBRO 25", "DEZ/2025"),
    ("JANEIRO 26", "JAN/2026"),
];

//==============================================================================
// Sheet labels
//==============================================================================

/// Fixed lookup from raw sheet names to canonical month labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetLabels {
    map: HashMap<String, String>,
}

impl Default for SheetLabels {
    fn default() -> Self {
        let mut labels = Self::empty();
        for (raw, label) in DEFAULT_LABELS {
            labels.insert(raw, label);
        }
        labels
    }
}

impl SheetLabels {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(&mut self, raw_sheet_name: &str, label: &str) {
        self.map
            .insert(sheet_key(raw_sheet_name), label.trim().to_string());
    }

    /// Add every mapping of `other`, overriding existing keys
    pub fn extend(&mut self, other: &SheetLabels) {
        for (raw, label) in &other.map {
            self.insert(raw, label);
        }
    }

    /// Canonical label for a sheet; unknown sheets keep their name, uppercased
    pub fn label_for(&self, raw_sheet_name: &str) -> String {
        let key = sheet_key(raw_sheet_name);
        self.map
            .iter()
            .find(|(raw, _)| sheet_key(raw) == key)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| raw_sheet_name.trim().to_uppercase())
    }

    /// Read extra labels from a YAML mapping of `raw sheet name: label`
    pub fn from_yaml_file(path: &Path) -> StrikeResult<Self> {
        let content = fs::read_to_string(path)?;
        let map: HashMap<String, String> = serde_yaml::from_str(&content)?;
        let mut labels = Self::empty();
        for (raw, label) in &map {
            labels.insert(raw, label);
        }
        Ok(labels)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Lookup key: trimmed, uppercased, inner whitespace collapsed
fn sheet_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

//==============================================================================
// Column aliases
//==============================================================================

/// Header names accepted for each column the report reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub name: Vec<String>,
    pub hours: Vec<String>,
    pub date: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME_TOKENS.iter().map(|s| s.to_string()).collect(),
            hours: ["HORAS /GREVE", "HORAS GREVE", "HORAS", "HOURS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            date: ["DATA", "DATAS", "DIAS", "DATE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

//==============================================================================
// Config
//==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spreadsheet to load (ods, xlsx, xls, xlsb)
    pub source: PathBuf,
    /// Extra or overriding sheet labels, merged over the built-in table
    pub labels: SheetLabels,
    pub columns: ColumnAliases,
    pub empty_query: EmptyQuery,
    pub display: HoursDisplay,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            labels: SheetLabels::default(),
            columns: ColumnAliases::default(),
            empty_query: EmptyQuery::default(),
            display: HoursDisplay::default(),
        }
    }
}

impl Config {
    pub fn with_source<P: Into<PathBuf>>(source: P) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Load a YAML config file; labels in the file extend the built-in ones
    pub fn from_yaml_file(path: &Path) -> StrikeResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> StrikeResult<Self> {
        let mut config: Config = serde_yaml::from_str(content)?;
        let mut labels = SheetLabels::default();
        labels.extend(&config.labels);
        config.labels = labels;
        config.validate()?;
        Ok(config)
    }

    /// Config from an optional YAML file, with command-line overrides on top
    pub fn resolve(
        config_file: Option<&Path>,
        source: Option<PathBuf>,
        labels_file: Option<&Path>,
    ) -> StrikeResult<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        if let Some(source) = source {
            config.source = source;
        }
        if let Some(path) = labels_file {
            config.add_labels_file(path)?;
        }
        Ok(config)
    }

    /// Merge a labels YAML file into this config
    pub fn add_labels_file(&mut self, path: &Path) -> StrikeResult<()> {
        let extra = SheetLabels::from_yaml_file(path)?;
        self.labels.extend(&extra);
        Ok(())
    }

    pub fn validate(&self) -> StrikeResult<()> {
        if self.columns.name.iter().all(|t| t.trim().is_empty()) {
            return Err(StrikeError::Config(
                "at least one name column alias is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_labels() {
        let labels = SheetLabels::default();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.label_for("NOVEMBRO25"), "NOV/2025");
        assert_eq!(labels.label_for("Dezembro 25"), "DEZ/2025");
        assert_eq!(labels.label_for("  janeiro   26 "), "JAN/2026");
    }

    #[test]
    fn test_unknown_sheet_uppercased() {
        let labels = SheetLabels::default();
        assert_eq!(labels.label_for("Fevereiro 26"), "FEVEREIRO 26");
    }

    #[test]
    fn test_labels_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\"FEVEREIRO 26\": FEV/2026").unwrap();
        let extra = SheetLabels::from_yaml_file(file.path()).unwrap();

        let mut labels = SheetLabels::default();
        labels.extend(&extra);
        assert_eq!(labels.label_for("fevereiro 26"), "FEV/2026");
        assert_eq!(labels.label_for("NOVEMBRO25"), "NOV/2025");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source, PathBuf::from(DEFAULT_SOURCE));
        assert_eq!(config.empty_query, EmptyQuery::MatchNone);
        assert_eq!(config.display, HoursDisplay::Numeric);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
source: data/horas.xlsx
display: literal
empty_query: match_all
labels:
  MARCO 26: MAR/2026
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.source, PathBuf::from("data/horas.xlsx"));
        assert_eq!(config.display, HoursDisplay::Literal);
        assert_eq!(config.empty_query, EmptyQuery::MatchAll);
        assert_eq!(config.labels.label_for("Marco 26"), "MAR/2026");
        assert_eq!(config.labels.label_for("JANEIRO 26"), "JAN/2026");
        assert_eq!(config.columns, ColumnAliases::default());
    }

    #[test]
    fn test_resolve_overrides() {
        let mut config_file = NamedTempFile::new().unwrap();
        writeln!(config_file, "source: from_file.ods\ndisplay: literal").unwrap();
        let mut labels_file = NamedTempFile::new().unwrap();
        writeln!(labels_file, "ABRIL 26: ABR/2026").unwrap();

        let config = Config::resolve(
            Some(config_file.path()),
            Some(PathBuf::from("from_flag.xlsx")),
            Some(labels_file.path()),
        )
        .unwrap();
        assert_eq!(config.source, PathBuf::from("from_flag.xlsx"));
        assert_eq!(config.display, HoursDisplay::Literal);
        assert_eq!(config.labels.label_for("abril 26"), "ABR/2026");

        let defaults = Config::resolve(None, None, None).unwrap();
        assert_eq!(defaults, Config::default());
    }

    #[test]
    fn test_resolve_missing_labels_file() {
        let result = Config::resolve(None, None, Some(Path::new("no/such/labels.yaml")));
        assert!(matches!(result, Err(StrikeError::Io(_))));
    }

    #[test]
    fn test_config_rejects_empty_name_aliases() {
        let yaml = "columns:\n  name: []\n";
        assert!(matches!(
            Config::from_yaml_str(yaml),
            Err(StrikeError::Config(_))
        ));
    }

    #[test]
    fn test_config_invalid_yaml() {
        assert!(matches!(
            Config::from_yaml_str("source: [unclosed"),
            Err(StrikeError::Yaml(_))
        ));
    }
}

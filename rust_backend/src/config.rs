//! Daycount configuration file support.
//!
//! This module reads run defaults from a TOML file. Command-line flags
//! override anything set here, and anything left out falls back to the
//! built-in defaults.
//!
//! ```toml
//! [window]
//! start = "20230101"
//! end = "today"
//!
//! [aggregation]
//! mode = "per-person-total"
//! unmapped = "unknown"
//!
//! [ingest]
//! include_cancelled = false
//! remove_duplicates = false
//!
//! [output]
//! path = "daycount.tsv"
//! save_tsv = "nrows_data.tsv"
//! write_mode = "w"
//! display = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::algorithms::aggregation::{AggregationMode, UnmappedPolicy};
use crate::error::{DaycountError, DaycountResult};
use crate::io::loaders::IngestOptions;
use crate::io::writers::WriteMode;

/// File name looked for when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "daycount.toml";

/// Daycount configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaycountConfig {
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub aggregation: AggregationSettings,
    #[serde(default)]
    pub ingest: IngestSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Window bounds, in the same `YYYYMMDD`/`today` form as the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSettings {
    #[serde(default = "default_mode")]
    pub mode: AggregationMode,
    #[serde(default)]
    pub unmapped: UnmappedPolicy,
}

/// Ingestion settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSettings {
    #[serde(default)]
    pub include_cancelled: bool,
    /// Drop rows identical in every column
    #[serde(default)]
    pub remove_duplicates: bool,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Also save the cleaned, merged orders table here
    #[serde(default)]
    pub save_tsv: Option<PathBuf>,
    #[serde(default)]
    pub write_mode: WriteMode,
    #[serde(default)]
    pub display: bool,
}

fn default_mode() -> AggregationMode {
    AggregationMode::Coarse
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            unmapped: UnmappedPolicy::default(),
        }
    }
}

/// Values given on the command line.
///
/// `None` and `false` leave the file value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub start: Option<String>,
    pub end: Option<String>,
    pub mode: Option<AggregationMode>,
    pub unmapped: Option<UnmappedPolicy>,
    pub include_cancelled: bool,
    pub remove_duplicates: bool,
    pub output: Option<PathBuf>,
    pub save_tsv: Option<PathBuf>,
    pub write_mode: Option<WriteMode>,
    pub display: bool,
}

impl DaycountConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(DaycountConfig)` if successful
    /// * `Err(DaycountError::Config)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> DaycountResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DaycountError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> DaycountResult<Self> {
        toml::from_str(content)
            .map_err(|e| DaycountError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Load `daycount.toml` from the current directory if present.
    ///
    /// # Returns
    /// * `Ok(None)` if there is no such file
    pub fn from_default_location() -> DaycountResult<Option<Self>> {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.exists() {
            log::debug!("Using config file {}", path.display());
            return Self::from_file(&path).map(Some);
        }
        Ok(None)
    }

    /// Layer command-line values over this configuration.
    pub fn merge_cli(mut self, cli: CliOverrides) -> Self {
        if cli.start.is_some() {
            self.window.start = cli.start;
        }
        if cli.end.is_some() {
            self.window.end = cli.end;
        }
        if let Some(mode) = cli.mode {
            self.aggregation.mode = mode;
        }
        if let Some(unmapped) = cli.unmapped {
            self.aggregation.unmapped = unmapped;
        }
        self.ingest.include_cancelled |= cli.include_cancelled;
        self.ingest.remove_duplicates |= cli.remove_duplicates;
        if cli.output.is_some() {
            self.output.path = cli.output;
        }
        if cli.save_tsv.is_some() {
            self.output.save_tsv = cli.save_tsv;
        }
        if let Some(write_mode) = cli.write_mode {
            self.output.write_mode = write_mode;
        }
        self.output.display |= cli.display;
        self
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            include_cancelled: self.ingest.include_cancelled,
            remove_duplicates: self.ingest.remove_duplicates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DaycountConfig::from_toml_str("").unwrap();
        assert_eq!(config, DaycountConfig::default());
        assert_eq!(config.aggregation.mode, AggregationMode::Coarse);
        assert_eq!(config.aggregation.unmapped, UnmappedPolicy::Error);
        assert_eq!(config.output.write_mode, WriteMode::FailIfExists);
        assert!(!config.ingest.remove_duplicates);
        assert_eq!(config.ingest_options(), IngestOptions::default());
        assert!(config.window.start.is_none());
    }

    #[test]
    fn test_full_config() {
        let content = r#"
            [window]
            start = "20230101"
            end = "today"

            [aggregation]
            mode = "per-person-total"
            unmapped = "unknown"

            [ingest]
            include_cancelled = true
            remove_duplicates = true

            [output]
            path = "out.tsv"
            write_mode = "a"
            display = true
        "#;
        let config = DaycountConfig::from_toml_str(content).unwrap();
        assert_eq!(config.window.start.as_deref(), Some("20230101"));
        assert_eq!(config.window.end.as_deref(), Some("today"));
        assert_eq!(config.aggregation.mode, AggregationMode::PersonTotal);
        assert_eq!(config.aggregation.unmapped, UnmappedPolicy::Unknown);
        assert_eq!(
            config.ingest_options(),
            IngestOptions {
                include_cancelled: true,
                remove_duplicates: true,
            }
        );
        assert_eq!(config.output.path, Some(PathBuf::from("out.tsv")));
        assert_eq!(config.output.write_mode, WriteMode::Append);
        assert!(config.output.display);
    }

    #[test]
    fn test_every_mode_token_accepted_in_toml() {
        for mode in AggregationMode::ALL {
            let content = format!("[aggregation]\nmode = \"{}\"\n", mode.as_str());
            let config = DaycountConfig::from_toml_str(&content).unwrap();
            assert_eq!(config.aggregation.mode, mode);

            let written = toml::to_string(&config).unwrap();
            assert!(written.contains(&format!("mode = \"{}\"", mode.as_str())));
            assert_eq!(DaycountConfig::from_toml_str(&written).unwrap(), config);
        }
    }

    #[test]
    fn test_legacy_mode_names_accepted_in_toml() {
        let config =
            DaycountConfig::from_toml_str("[aggregation]\nmode = \"sailor_total\"\n").unwrap();
        assert_eq!(config.aggregation.mode, AggregationMode::PersonTotal);
        let config = DaycountConfig::from_toml_str("[aggregation]\nmode = \"all\"\n").unwrap();
        assert_eq!(config.aggregation.mode, AggregationMode::GrandTotal);
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let file = DaycountConfig::from_toml_str(
            r#"
            [window]
            start = "20230101"
            end = "20231231"

            [aggregation]
            mode = "fine"

            [output]
            path = "from-file.tsv"
            write_mode = "a"
            "#,
        )
        .unwrap();

        let merged = file.clone().merge_cli(CliOverrides {
            end: Some("today".to_string()),
            mode: Some(AggregationMode::PersonTotal),
            output: Some(PathBuf::from("from-cli.tsv")),
            remove_duplicates: true,
            ..CliOverrides::default()
        });
        assert_eq!(merged.window.start.as_deref(), Some("20230101"));
        assert_eq!(merged.window.end.as_deref(), Some("today"));
        assert_eq!(merged.aggregation.mode, AggregationMode::PersonTotal);
        assert_eq!(merged.aggregation.unmapped, UnmappedPolicy::Error);
        assert_eq!(merged.output.path, Some(PathBuf::from("from-cli.tsv")));
        assert_eq!(merged.output.write_mode, WriteMode::Append);
        assert!(merged.ingest.remove_duplicates);

        assert_eq!(file.clone().merge_cli(CliOverrides::default()), file);
    }

    #[test]
    fn test_cli_over_defaults_without_file() {
        let merged = DaycountConfig::default().merge_cli(CliOverrides {
            write_mode: Some(WriteMode::Overwrite),
            include_cancelled: true,
            display: true,
            ..CliOverrides::default()
        });
        assert_eq!(merged.aggregation.mode, AggregationMode::Coarse);
        assert_eq!(merged.output.write_mode, WriteMode::Overwrite);
        assert!(merged.ingest.include_cancelled);
        assert!(merged.output.display);
        assert!(merged.output.path.is_none());
    }

    #[test]
    fn test_invalid_mode_is_config_error() {
        let result = DaycountConfig::from_toml_str("[aggregation]\nmode = \"median\"\n");
        assert!(matches!(result, Err(DaycountError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[output]\nwrite_mode = \"overwrite\"\n").unwrap();
        let config = DaycountConfig::from_file(file.path()).unwrap();
        assert_eq!(config.output.write_mode, WriteMode::Overwrite);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = DaycountConfig::from_file("/nonexistent/daycount.toml");
        assert!(matches!(result, Err(DaycountError::Config(_))));
    }
}

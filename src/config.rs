use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::from_reader;
use tracing::{debug, info, instrument};

use crate::{data::normalize::ScaleMode, error::LookbackError};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LookbackConfig {
    /// Path to the delimited source table (date, time, then numeric columns).
    pub source: PathBuf,
    #[serde(rename = "train-cutoff")]
    pub train_cutoff: String,
    pub window: usize,
    pub horizon: usize,
    #[serde(default = "default_normalise")]
    pub normalise: u8,
}

fn default_normalise() -> u8 {
    2
}

const DEFAULT_DATA: &str = r#"
source: "data/demand.csv"
train-cutoff: "2014-01-01"
window: 24
horizon: 12
normalise: 2
"#;

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("data/demand.csv"),
            train_cutoff: "2014-01-01".to_string(),
            window: 24,
            horizon: 12,
            normalise: 2,
        }
    }
}

impl LookbackConfig {
    /// Reads the configuration from a YAML file.
    ///
    /// If the file does not exist, it creates a default configuration file.
    ///
    /// # Arguments
    ///
    /// * `filename` - Optional path to the configuration file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `LookbackConfig` on success or an error on failure.
    #[instrument(level = "info", skip(filename))]
    pub fn read_config<P: AsRef<Path>>(filename: Option<P>) -> Result<Self, LookbackError> {
        let path = filename
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new("config.yml").to_path_buf());

        info!(path = %path.display(), "Reading configuration");

        if !path.exists() {
            info!(
                "Config file does not exist. Creating default config at {}",
                path.display()
            );
            let mut file = File::create(&path)?;
            file.write_all(DEFAULT_DATA.as_bytes())?;
            debug!("Default configuration file created");
            return Ok(LookbackConfig::default());
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let config: Self = from_reader(reader)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Converts the training cutoff to a `NaiveDate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be parsed.
    pub fn train_cutoff(&self) -> Result<NaiveDate, LookbackError> {
        let date = NaiveDate::parse_from_str(&self.train_cutoff, "%Y-%m-%d")?;
        Ok(date)
    }

    /// Converts the numeric `normalise` field to a `ScaleMode`.
    pub fn scale_mode(&self) -> Result<ScaleMode, LookbackError> {
        ScaleMode::try_from(self.normalise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_config_file_does_not_exist() {
        // Create a temp file path but don't create the file
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        drop(temp_file); // Delete the temp file

        assert!(!path.exists());

        let config = LookbackConfig::read_config(Some(&path)).unwrap();

        // Verify default config is returned and the default file is created
        assert_eq!(config, LookbackConfig::default());
        assert!(path.exists());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_config_file_exists_valid_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let yaml_content = r#"
source: "series.csv"
train-cutoff: "2023-01-01"
window: 16
horizon: 4
normalise: 1
"#;
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = LookbackConfig::read_config(Some(temp_file.path())).unwrap();

        assert_eq!(config.source, PathBuf::from("series.csv"));
        assert_eq!(config.train_cutoff, "2023-01-01");
        assert_eq!(config.window, 16);
        assert_eq!(config.horizon, 4);
        assert_eq!(config.normalise, 1);
    }

    #[test]
    fn test_normalise_defaults_to_per_series() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let yaml_content = r#"
source: "series.csv"
train-cutoff: "2023-01-01"
window: 16
horizon: 4
"#; // No normalise field
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = LookbackConfig::read_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.normalise, 2);
        assert_eq!(config.scale_mode().unwrap(), ScaleMode::PerSeries);
    }

    #[test]
    fn test_train_cutoff_valid() {
        let config = LookbackConfig {
            train_cutoff: "2023-01-01".to_string(),
            ..Default::default()
        };
        let date = config.train_cutoff().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn test_train_cutoff_invalid() {
        let config = LookbackConfig {
            train_cutoff: "invalid-date".to_string(),
            ..Default::default()
        };
        let result = config.train_cutoff();
        assert!(matches!(result, Err(LookbackError::ParseDateError(_))));
    }

    #[test]
    fn test_unknown_scale_mode() {
        let config = LookbackConfig {
            normalise: 7,
            ..Default::default()
        };
        let result = config.scale_mode();
        assert!(matches!(result, Err(LookbackError::UnknownScaleMode(7))));
    }

    #[test]
    fn test_read_config_with_missing_fields() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let yaml_content = r#"
source: "series.csv"
window: 16
"#; // Missing train-cutoff and horizon
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let result = LookbackConfig::read_config(Some(temp_file.path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_config_with_extra_fields() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let yaml_content = r#"
source: "series.csv"
train-cutoff: "2023-01-01"
window: 16
horizon: 4
extra-field: "extra"
"#;
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        // Extra fields are ignored
        let config = LookbackConfig::read_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.train_cutoff, "2023-01-01");
    }

    #[test]
    fn compare_default_config() {
        let default_config = LookbackConfig::default();
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(DEFAULT_DATA.as_bytes()).unwrap();
        let config = LookbackConfig::read_config(Some(temp_file.path())).unwrap();
        assert_eq!(default_config, config);
    }
}

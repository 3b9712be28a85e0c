use crate::config::settings::{self, AnalysisSettings, DEFAULT_SHEET};
use crate::core::ConfigProvider;
use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    #[serde(default = "default_sheet")]
    pub sheet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default)]
    pub archive: bool,
}

fn default_sheet() -> String {
    DEFAULT_SHEET.to_string()
}

impl TomlConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalysisError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse the configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AnalysisError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn dataset_path(&self) -> &str {
        &self.source.path
    }

    fn sheet_name(&self) -> &str {
        &self.source.sheet
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn archive(&self) -> bool {
        self.load.archive
    }

    fn analysis(&self) -> &AnalysisSettings {
        &self.analysis
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        settings::validate_source_and_output(
            &self.source.path,
            &self.source.sheet,
            &self.load.output_path,
        )?;
        self.analysis.validate()
    }
}

use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SHEET: &str = "Cleaned dataset";
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "ods", "csv"];

/// Knobs of the analysis itself, shared by the CLI and the TOML config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[serde(default)]
pub struct AnalysisSettings {
    /// 0-based raw row positions excluded before analysis
    #[cfg_attr(
        feature = "cli",
        arg(long, value_delimiter = ',', default_values_t = [0usize, 9, 13])
    )]
    pub outlier_rows: Vec<usize>,

    /// Number of features shown in the top-features chart
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 12))]
    pub top_features: usize,

    /// Bin count of the fee histograms
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 30))]
    pub histogram_bins: usize,

    #[cfg_attr(feature = "cli", command(flatten))]
    pub competitor: CompetitorSettings,
}

/// The hypothetical competitor the dataset's pricing is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[serde(default)]
pub struct CompetitorSettings {
    #[cfg_attr(feature = "cli", arg(long = "competitor-name", default_value = "Competitor A"))]
    pub name: String,

    #[cfg_attr(feature = "cli", arg(long = "competitor-fee", default_value_t = 50000.0))]
    pub course_fee: f64,

    #[cfg_attr(feature = "cli", arg(long = "competitor-hours", default_value_t = 40.0))]
    pub duration_hours: f64,
}

impl CompetitorSettings {
    pub fn hourly_rate(&self) -> f64 {
        self.course_fee / self.duration_hours
    }
}

impl Default for CompetitorSettings {
    fn default() -> Self {
        Self {
            name: "Competitor A".to_string(),
            course_fee: 50000.0,
            duration_hours: 40.0,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            outlier_rows: vec![0, 9, 13],
            top_features: 12,
            histogram_bins: 30,
            competitor: CompetitorSettings::default(),
        }
    }
}

impl Validate for AnalysisSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("analysis.top_features", self.top_features, 1)?;
        validation::validate_range("analysis.histogram_bins", self.histogram_bins, 1, 500)?;
        validation::validate_non_empty_string("analysis.competitor.name", &self.competitor.name)?;

        if !(self.competitor.duration_hours > 0.0) {
            return Err(AnalysisError::InvalidConfigValueError {
                field: "analysis.competitor.duration_hours".to_string(),
                value: self.competitor.duration_hours.to_string(),
                reason: "Duration must be greater than zero".to_string(),
            });
        }
        if !(self.competitor.course_fee >= 0.0) {
            return Err(AnalysisError::InvalidConfigValueError {
                field: "analysis.competitor.course_fee".to_string(),
                value: self.competitor.course_fee.to_string(),
                reason: "Fee cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Checks shared by every config source: where the data comes from and where
/// the report goes.
pub fn validate_source_and_output(dataset_path: &str, sheet: &str, output_path: &str) -> Result<()> {
    validation::validate_path("source.path", dataset_path)?;
    validation::validate_file_extension("source.path", dataset_path, &SUPPORTED_EXTENSIONS)?;
    if !is_csv(dataset_path) {
        validation::validate_non_empty_string("source.sheet", sheet)?;
    }
    validation::validate_path("load.output_path", output_path)
}

pub fn is_csv(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_analysis() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.outlier_rows, vec![0, 9, 13]);
        assert_eq!(settings.top_features, 12);
        assert_eq!(settings.histogram_bins, 30);
        assert_eq!(settings.competitor.hourly_rate(), 1250.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_competitor_duration() {
        let mut settings = AnalysisSettings::default();
        settings.competitor.duration_hours = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_bins() {
        let settings = AnalysisSettings {
            histogram_bins: 0,
            ..AnalysisSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_csv_source_does_not_need_sheet() {
        assert!(validate_source_and_output("data/courses.csv", "", "./out").is_ok());
        assert!(validate_source_and_output("data/courses.xlsx", "", "./out").is_err());
        assert!(validate_source_and_output("data/courses.json", "Sheet1", "./out").is_err());
    }
}

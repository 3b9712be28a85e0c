pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::config::settings::{self, AnalysisSettings, DEFAULT_SHEET};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "course-insights")]
    #[command(about = "Descriptive statistics and charts for coding-course listings")]
    pub struct CliConfig {
        /// Spreadsheet (xlsx, xls, ods) or CSV export of the course listings
        #[arg(long, default_value = "Dataset/Updated_Dataset.xlsx")]
        pub dataset: String,

        /// Worksheet holding the listings; ignored for CSV input
        #[arg(long, default_value = DEFAULT_SHEET)]
        pub sheet: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        /// Read every setting except the flags below from a TOML file
        #[arg(long)]
        pub config: Option<String>,

        #[command(flatten)]
        pub analysis: AnalysisSettings,

        /// Bundle charts, cleaned table and report into one ZIP archive
        #[arg(long)]
        pub archive: bool,

        /// Run the analysis and print the summary without writing anything
        #[arg(long)]
        pub dry_run: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub log_json: bool,
    }

    impl ConfigProvider for CliConfig {
        fn dataset_path(&self) -> &str {
            &self.dataset
        }

        fn sheet_name(&self) -> &str {
            &self.sheet
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn archive(&self) -> bool {
            self.archive
        }

        fn analysis(&self) -> &AnalysisSettings {
            &self.analysis
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            settings::validate_source_and_output(&self.dataset, &self.sheet, &self.output_path)?;
            self.analysis.validate()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::parse_from(["course-insights"]);
            assert_eq!(config.sheet_name(), "Cleaned dataset");
            assert_eq!(config.analysis, AnalysisSettings::default());
            assert!(!config.archive());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_overrides() {
            let config = CliConfig::parse_from([
                "course-insights",
                "--dataset",
                "courses.csv",
                "--outlier-rows",
                "1,2",
                "--top-features",
                "5",
                "--competitor-fee",
                "60000",
                "--competitor-hours",
                "30",
                "--archive",
            ]);
            assert_eq!(config.dataset_path(), "courses.csv");
            assert_eq!(config.analysis.outlier_rows, vec![1, 2]);
            assert_eq!(config.analysis.top_features, 5);
            assert_eq!(config.analysis.competitor.hourly_rate(), 2000.0);
            assert!(config.archive());
        }

        #[test]
        fn test_rejects_unsupported_dataset() {
            let config = CliConfig::parse_from(["course-insights", "--dataset", "courses.json"]);
            assert!(config.validate().is_err());
        }
    }
}

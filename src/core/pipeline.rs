use crate::adapters::dataset;
use crate::core::charts::{self, ChartArtifact};
use crate::core::cleaning;
use crate::core::insights::InsightReport;
use crate::core::{AnalysisResult, ConfigProvider, CourseRecord, Pipeline, Record, Storage};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "course_insights.zip";
pub const CLEANED_CSV: &str = "cleaned_courses.csv";
pub const REPORT_JSON: &str = "insights.json";
pub const CHARTS_DIR: &str = "charts";

/// Reads the dataset through `input`, writes the report through `output`.
pub struct CoursePipeline<S: Storage, C: ConfigProvider> {
    input: S,
    output: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CoursePipeline<S, C> {
    pub fn new(input: S, output: S, config: C) -> Self {
        Self {
            input,
            output,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CoursePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let path = self.config.dataset_path();
        tracing::debug!("Reading dataset from: {}", path);
        let bytes = self.input.read_file(path).await?;
        tracing::debug!("Dataset size: {} bytes", bytes.len());

        dataset::read_records(path, self.config.sheet_name(), bytes)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<AnalysisResult> {
        let rows_loaded = data.len();
        let settings = self.config.analysis();

        let kept = cleaning::drop_rows(data, &settings.outlier_rows);
        tracing::debug!(
            "Dropped {} outlier rows, {} remain",
            rows_loaded - kept.len(),
            kept.len()
        );

        let courses = cleaning::clean_records(&kept);
        let report = InsightReport::build(self.config.dataset_path(), rows_loaded, &courses, settings);

        Ok(AnalysisResult {
            rows_loaded,
            courses,
            report,
        })
    }

    async fn load(&self, result: AnalysisResult) -> Result<String> {
        let charts = charts::render_all(&result.report)?;
        let cleaned_csv = cleaned_csv(&result.courses)?;
        let report_json = serde_json::to_string_pretty(&result.report)?;

        let mut entries: Vec<(String, Vec<u8>)> = charts
            .into_iter()
            .map(|ChartArtifact { file_name, svg }| {
                (format!("{}/{}", CHARTS_DIR, file_name), svg.into_bytes())
            })
            .collect();
        entries.push((CLEANED_CSV.to_string(), cleaned_csv.into_bytes()));
        entries.push((REPORT_JSON.to_string(), report_json.into_bytes()));

        if self.config.archive() {
            tracing::debug!("Creating ZIP archive with {} files", entries.len());
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &entries {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP archive ({} bytes) to storage", zip_data.len());
            self.output.write_file(ARCHIVE_NAME, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), ARCHIVE_NAME));
        }

        for (name, data) in &entries {
            self.output.write_file(name, data).await?;
        }
        tracing::debug!("Wrote {} files", entries.len());
        Ok(self.config.output_path().to_string())
    }
}

/// The cleaned table with derived columns; missing values are empty cells.
pub fn cleaned_csv(courses: &[CourseRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "number",
        "course_name",
        "age_group",
        "min_age",
        "max_age",
        "features",
        "duration_hours",
        "registration_fee",
        "course_fee",
        "hourly_rate",
        "payment_method",
        "delivery_method",
    ])?;

    let cell = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    for course in courses {
        writer.write_record([
            course.number.to_string(),
            course.name.clone(),
            course.age_group.map(|a| a.to_string()).unwrap_or_default(),
            cell(course.min_age()),
            cell(course.max_age()),
            course.features.join("; "),
            cell(course.duration_hours),
            cell(course.registration_fee),
            cell(course.course_fee),
            cell(course.hourly_rate()),
            course.payment_method.clone().unwrap_or_default(),
            course.delivery_method.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| crate::AnalysisError::ProcessingError {
        message: format!("cleaned table is not valid UTF-8: {}", e),
    })
}

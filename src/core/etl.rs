use crate::core::insights::InsightReport;
use crate::core::{summary, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

/// Outcome of a run: where the artifacts went and the analysed report.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output_path: Option<String>,
    pub report: InsightReport,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    dry_run: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            dry_run: false,
        }
    }

    /// Stop after the transform stage; nothing is written.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let started = Instant::now();
        tracing::info!("Starting course analysis");

        tracing::info!("Extracting dataset...");
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", raw_data.len());

        tracing::info!("Cleaning and aggregating...");
        let result = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Analyzed {} courses ({} rows loaded)",
            result.courses.len(),
            result.rows_loaded
        );

        println!("{}", summary::render(&result.report));

        if self.dry_run {
            tracing::info!("Dry run, skipping chart rendering and output");
            return Ok(RunOutcome {
                output_path: None,
                report: result.report,
            });
        }

        tracing::info!("Rendering charts and writing report...");
        let report = result.report.clone();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(RunOutcome {
            output_path: Some(output_path),
            report,
        })
    }
}

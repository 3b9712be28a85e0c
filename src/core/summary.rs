use crate::core::insights::{FeeSummary, InsightReport};
use crate::core::stats::{format_thousands, Summary};
use std::fmt;

fn stat(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_else(|| "NaN".to_string())
}

fn write_summary(f: &mut fmt::Formatter<'_>, title: &str, summary: &Summary) -> fmt::Result {
    writeln!(f, "{}", title)?;
    let rows = [
        ("count", format!("{:.6}", summary.count as f64)),
        ("mean", stat(summary.mean)),
        ("std", stat(summary.std)),
        ("min", stat(summary.min)),
        ("25%", stat(summary.q1)),
        ("50%", stat(summary.median)),
        ("75%", stat(summary.q3)),
        ("max", stat(summary.max)),
    ];
    for (name, value) in rows {
        writeln!(f, "{:<6}{:>16}", name, value)?;
    }
    Ok(())
}

fn fee_cell(value: Option<f64>) -> String {
    value.map(format_thousands).unwrap_or_else(|| "-".to_string())
}

fn write_fee_table(
    f: &mut fmt::Formatter<'_>,
    registration: &FeeSummary,
    course: &FeeSummary,
) -> fmt::Result {
    writeln!(
        f,
        "{:<38}{:>20}{:>20}",
        "Statistic", "Registration Fees", "Course Fees"
    )?;
    let rows = [
        ("Max", fee_cell(registration.max), fee_cell(course.max)),
        ("Min", fee_cell(registration.min), fee_cell(course.min)),
        (
            "Common Range (25th-75th Percentile)",
            registration.common_range.clone().unwrap_or_else(|| "-".to_string()),
            course.common_range.clone().unwrap_or_else(|| "-".to_string()),
        ),
    ];
    for (name, reg, fee) in rows {
        writeln!(f, "{:<38}{:>20}{:>20}", name, reg, fee)?;
    }
    Ok(())
}

/// Terminal view of the descriptive statistics in a report.
pub struct SummaryText<'a>(pub &'a InsightReport);

impl fmt::Display for SummaryText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "Analyzed {} of {} rows from {}\n",
            report.rows_analyzed, report.rows_loaded, report.dataset
        )?;

        write_summary(f, "Summary statistics for Minimum Age:", &report.demographics.min_age)?;
        writeln!(f)?;
        write_summary(f, "Summary statistics for Maximum Age:", &report.demographics.max_age)?;

        writeln!(f, "\nUnique Features:")?;
        if report.features.unique.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for feature in &report.features.unique {
            writeln!(f, "  {}", feature)?;
        }

        match report.pricing.average_hourly_rate {
            Some(rate) => writeln!(
                f,
                "\nThe average hourly rate for the courses is: {:.2} LKR",
                rate
            )?,
            None => writeln!(f, "\nThe average hourly rate for the courses is not available")?,
        }

        writeln!(
            f,
            "\nSummary Statistics for Registration and Course Fees (excluding zeros):"
        )?;
        write_fee_table(f, &report.pricing.registration_fees, &report.pricing.course_fees)?;

        writeln!(f)?;
        write_summary(f, "Summary Statistics for Course Duration:", &report.duration.summary)
    }
}

/// Plain-text rendering of the descriptive statistics for the terminal.
pub fn render(report: &InsightReport) -> String {
    SummaryText(report).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AnalysisSettings;
    use crate::domain::model::{AgeRange, CourseRecord};

    #[test]
    fn test_render_contains_every_section() {
        let courses = vec![CourseRecord {
            number: 1,
            name: "Python Kids".to_string(),
            age_group: Some(AgeRange {
                min: 8,
                max: Some(12),
            }),
            features: vec!["Certificate".to_string()],
            duration_hours: Some(24.0),
            registration_fee: Some(1500.0),
            course_fee: Some(18000.0),
            payment_method: None,
            delivery_method: None,
        }];
        let report = InsightReport::build("courses.csv", 4, &courses, &AnalysisSettings::default());

        let text = render(&report);

        assert!(text.contains("Analyzed 1 of 4 rows from courses.csv"));
        assert!(text.contains("Summary statistics for Minimum Age:"));
        assert!(text.contains("8.000000"));
        // A single value has no sample standard deviation.
        assert!(text.contains("NaN"));
        assert!(text.contains("  Certificate"));
        assert!(text.contains("750.00 LKR"));
        assert!(text.contains("18,000 - 18,000"));
        assert!(text.contains("Summary Statistics for Course Duration:"));
    }
}

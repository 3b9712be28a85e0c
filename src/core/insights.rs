//! The six insight sections plus the competitor comparison, computed from the
//! cleaned course table.

use crate::config::settings::AnalysisSettings;
use crate::core::stats::{self, BoxStats, CategoryCount, HistogramBin, LinearFit, Summary};
use crate::domain::model::CourseRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const OWN_COURSES_LABEL: &str = "Your Courses";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub generated_at: DateTime<Utc>,
    pub dataset: String,
    pub rows_loaded: usize,
    pub rows_analyzed: usize,
    pub demographics: DemographicInsight,
    pub features: FeatureInsight,
    pub pricing: PricingInsight,
    pub duration: DurationInsight,
    pub delivery: DeliveryInsight,
    pub payment: PaymentInsight,
    pub competitor: CompetitorComparison,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAgeRange {
    pub number: usize,
    pub name: String,
    pub min_age: Option<f64>,
    pub max_age: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicInsight {
    pub min_age: Summary,
    pub max_age: Summary,
    pub most_common_min: Option<f64>,
    pub most_common_max: Option<f64>,
    pub ranges: Vec<CourseAgeRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureInsight {
    pub counts: Vec<CategoryCount>,
    pub top: Vec<CategoryCount>,
    pub unique: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseValue {
    pub name: String,
    pub value: Option<f64>,
}

/// Range of the non-zero fees; `common_range` spans the 25th to 75th percentile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSummary {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub common_range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInsight {
    pub hourly_rates: Vec<CourseValue>,
    pub average_hourly_rate: Option<f64>,
    pub registration_fee_histogram: Vec<HistogramBin>,
    pub course_fee_histogram: Vec<HistogramBin>,
    pub registration_fees: FeeSummary,
    pub course_fees: FeeSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDistribution {
    pub method: String,
    pub stats: BoxStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationInsight {
    pub summary: Summary,
    pub per_course: Vec<CourseValue>,
    pub distribution: Option<BoxStats>,
    /// `(duration, course fee)` pairs with missing fees counted as zero.
    pub fee_points: Vec<(f64, f64)>,
    pub trend: Option<LinearFit>,
    pub by_delivery_method: Vec<MethodDistribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryMethodSummary {
    pub method: String,
    pub courses: usize,
    pub share_percent: f64,
    pub average_fee: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryInsight {
    pub methods: Vec<DeliveryMethodSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInsight {
    pub methods: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateComparison {
    pub label: String,
    pub average_hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorComparison {
    pub entries: Vec<RateComparison>,
}

impl InsightReport {
    pub fn build(
        dataset: &str,
        rows_loaded: usize,
        courses: &[CourseRecord],
        settings: &AnalysisSettings,
    ) -> Self {
        tracing::debug!("Computing insights over {} courses", courses.len());
        Self {
            generated_at: Utc::now(),
            dataset: dataset.to_string(),
            rows_loaded,
            rows_analyzed: courses.len(),
            demographics: demographics(courses),
            features: features(courses, settings.top_features),
            pricing: pricing(courses, settings.histogram_bins),
            duration: duration(courses),
            delivery: delivery(courses),
            payment: payment(courses),
            competitor: competitor(courses, settings),
        }
    }
}

pub fn demographics(courses: &[CourseRecord]) -> DemographicInsight {
    let mins: Vec<Option<f64>> = courses.iter().map(CourseRecord::min_age).collect();
    let maxes: Vec<Option<f64>> = courses.iter().map(CourseRecord::max_age).collect();

    DemographicInsight {
        min_age: stats::describe(mins.iter().copied()),
        max_age: stats::describe(maxes.iter().copied()),
        most_common_min: stats::mode(mins),
        most_common_max: stats::mode(maxes),
        ranges: courses
            .iter()
            .map(|course| CourseAgeRange {
                number: course.number,
                name: course.name.clone(),
                min_age: course.min_age(),
                max_age: course.max_age(),
            })
            .collect(),
    }
}

pub fn features(courses: &[CourseRecord], top_n: usize) -> FeatureInsight {
    let counts = stats::value_counts(
        courses
            .iter()
            .flat_map(|course| course.features.iter().map(String::as_str)),
    );
    let unique = counts
        .iter()
        .filter(|c| c.count == 1)
        .map(|c| c.label.clone())
        .collect();

    FeatureInsight {
        top: counts.iter().take(top_n).cloned().collect(),
        unique,
        counts,
    }
}

pub fn pricing(courses: &[CourseRecord], bins: usize) -> PricingInsight {
    let hourly_rates: Vec<CourseValue> = courses
        .iter()
        .map(|course| CourseValue {
            name: course.name.clone(),
            value: course.hourly_rate(),
        })
        .collect();
    let average_hourly_rate = stats::mean(hourly_rates.iter().map(|r| r.value));

    let registration: Vec<f64> = courses
        .iter()
        .map(CourseRecord::registration_fee_or_zero)
        .collect();
    let course: Vec<f64> = courses.iter().map(CourseRecord::course_fee_or_zero).collect();

    PricingInsight {
        hourly_rates,
        average_hourly_rate,
        registration_fee_histogram: stats::histogram(&registration, bins),
        course_fee_histogram: stats::histogram(&course, bins),
        registration_fees: fee_summary(&registration),
        course_fees: fee_summary(&course),
    }
}

/// Summary of the strictly positive fees.
pub fn fee_summary(fees: &[f64]) -> FeeSummary {
    let non_zero: Vec<f64> = fees.iter().copied().filter(|f| *f > 0.0).collect();
    let q1 = stats::quantile(non_zero.iter().copied().map(Some), 0.25);
    let q3 = stats::quantile(non_zero.iter().copied().map(Some), 0.75);

    let common_range = match (q1, q3) {
        (Some(q1), Some(q3)) => Some(format!(
            "{} - {}",
            stats::format_thousands(q1),
            stats::format_thousands(q3)
        )),
        _ => None,
    };

    FeeSummary {
        max: non_zero.iter().copied().reduce(f64::max),
        min: non_zero.iter().copied().reduce(f64::min),
        q1,
        q3,
        common_range,
    }
}

pub fn duration(courses: &[CourseRecord]) -> DurationInsight {
    let durations: Vec<Option<f64>> = courses.iter().map(|c| c.duration_hours).collect();

    let fee_points: Vec<(f64, f64)> = courses
        .iter()
        .filter_map(|c| c.duration_hours.map(|d| (d, c.course_fee_or_zero())))
        .collect();

    let by_delivery_method = group_by_delivery(courses)
        .into_iter()
        .filter_map(|(method, group)| {
            stats::box_stats(group.iter().map(|c| c.duration_hours))
                .map(|stats| MethodDistribution { method, stats })
        })
        .collect();

    DurationInsight {
        summary: stats::describe(durations.iter().copied()),
        per_course: courses
            .iter()
            .map(|c| CourseValue {
                name: c.name.clone(),
                value: c.duration_hours,
            })
            .collect(),
        distribution: stats::box_stats(durations),
        trend: stats::linear_fit(&fee_points),
        fee_points,
        by_delivery_method,
    }
}

pub fn delivery(courses: &[CourseRecord]) -> DeliveryInsight {
    let counts = stats::value_counts(courses.iter().filter_map(|c| c.delivery_method.as_deref()));
    let total: usize = counts.iter().map(|c| c.count).sum();

    let methods = counts
        .into_iter()
        .map(|count| {
            let average_fee = stats::mean(
                courses
                    .iter()
                    .filter(|c| c.delivery_method.as_deref() == Some(count.label.as_str()))
                    .map(|c| Some(c.course_fee_or_zero())),
            );
            DeliveryMethodSummary {
                share_percent: 100.0 * count.count as f64 / total as f64,
                courses: count.count,
                method: count.label,
                average_fee,
            }
        })
        .collect();

    DeliveryInsight { methods }
}

pub fn payment(courses: &[CourseRecord]) -> PaymentInsight {
    PaymentInsight {
        methods: stats::value_counts(courses.iter().filter_map(|c| c.payment_method.as_deref())),
    }
}

pub fn competitor(courses: &[CourseRecord], settings: &AnalysisSettings) -> CompetitorComparison {
    let own_rate = stats::mean(courses.iter().map(CourseRecord::filled_hourly_rate));

    CompetitorComparison {
        entries: vec![
            RateComparison {
                label: OWN_COURSES_LABEL.to_string(),
                average_hourly_rate: own_rate,
            },
            RateComparison {
                label: settings.competitor.name.clone(),
                average_hourly_rate: Some(settings.competitor.hourly_rate()),
            },
        ],
    }
}

/// Courses grouped by delivery method, groups in first-seen order.
fn group_by_delivery(courses: &[CourseRecord]) -> Vec<(String, Vec<&CourseRecord>)> {
    let mut groups: Vec<(String, Vec<&CourseRecord>)> = Vec::new();
    for course in courses {
        let Some(method) = course.delivery_method.as_deref() else {
            continue;
        };
        match groups.iter_mut().find(|(name, _)| name == method) {
            Some((_, group)) => group.push(course),
            None => groups.push((method.to_string(), vec![course])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AgeRange;

    fn course(
        number: usize,
        age: Option<(u32, Option<u32>)>,
        features: &[&str],
        duration: Option<f64>,
        registration: Option<f64>,
        fee: Option<f64>,
        payment: Option<&str>,
        delivery: Option<&str>,
    ) -> CourseRecord {
        CourseRecord {
            number,
            name: format!("Course {}", number),
            age_group: age.map(|(min, max)| AgeRange { min, max }),
            features: features.iter().map(|f| f.to_string()).collect(),
            duration_hours: duration,
            registration_fee: registration,
            course_fee: fee,
            payment_method: payment.map(str::to_string),
            delivery_method: delivery.map(str::to_string),
        }
    }

    fn sample() -> Vec<CourseRecord> {
        vec![
            course(1, Some((8, Some(12))), &["Certificate", "Projects"], Some(40.0), Some(2000.0), Some(20000.0), Some("Full payment"), Some("Online")),
            course(2, Some((12, None)), &["Certificate", "Mentoring"], Some(20.0), None, Some(15000.0), Some("Monthly"), Some("Physical")),
            course(3, Some((8, Some(14))), &["Certificate", "Projects", "Robotics kit"], None, Some(3000.0), Some(30000.0), Some("Monthly"), Some("Online")),
            course(4, None, &[], Some(10.0), None, None, None, Some("Online")),
        ]
    }

    #[test]
    fn test_demographics() {
        let insight = demographics(&sample());
        assert_eq!(insight.min_age.count, 3);
        assert_eq!(insight.most_common_min, Some(8.0));
        // Open range 12+ contributes 12 as its max.
        assert_eq!(insight.max_age.min, Some(12.0));
        assert_eq!(insight.most_common_max, Some(12.0));
        assert_eq!(insight.ranges.len(), 4);
        assert_eq!(insight.ranges[3].min_age, None);
    }

    #[test]
    fn test_features_top_and_unique() {
        let insight = features(&sample(), 2);
        assert_eq!(insight.counts[0].label, "Certificate");
        assert_eq!(insight.counts[0].count, 3);
        assert_eq!(insight.counts[1].label, "Projects");
        assert_eq!(insight.top.len(), 2);
        assert_eq!(insight.unique, vec!["Mentoring", "Robotics kit"]);
    }

    #[test]
    fn test_pricing() {
        let insight = pricing(&sample(), 5);
        let rates: Vec<Option<f64>> = insight.hourly_rates.iter().map(|r| r.value).collect();
        assert_eq!(rates, vec![Some(500.0), Some(750.0), None, None]);
        assert_eq!(insight.average_hourly_rate, Some(625.0));

        // Zero-filled fees feed the histograms, zeros included.
        let histogram_total: usize = insight.registration_fee_histogram.iter().map(|b| b.count).sum();
        assert_eq!(histogram_total, 4);

        assert_eq!(insight.registration_fees.min, Some(2000.0));
        assert_eq!(insight.registration_fees.max, Some(3000.0));
        assert_eq!(insight.course_fees.common_range.as_deref(), Some("17,500 - 25,000"));
    }

    #[test]
    fn test_courses_sharing_a_name_stay_separate() {
        let mut courses = sample();
        courses[1].name = courses[0].name.clone();

        let per_course = duration(&courses).per_course;
        assert_eq!(per_course.len(), 4);
        assert_eq!(per_course[0].name, per_course[1].name);
        assert_eq!(per_course[0].value, Some(40.0));
        assert_eq!(per_course[1].value, Some(20.0));

        assert_eq!(pricing(&courses, 30).hourly_rates.len(), 4);
    }

    #[test]
    fn test_fee_summary_ignores_zero_fees() {
        let summary = fee_summary(&[0.0, 1000.0, 0.0, 2000.0, 3000.0, 4000.0]);
        assert_eq!(summary.min, Some(1000.0));
        assert_eq!(summary.max, Some(4000.0));
        assert_eq!(summary.q1, Some(1750.0));
        assert_eq!(summary.q3, Some(3250.0));
        assert_eq!(summary.common_range.as_deref(), Some("1,750 - 3,250"));
    }

    #[test]
    fn test_fee_summary_without_fees() {
        let summary = fee_summary(&[0.0, 0.0]);
        assert_eq!(summary.max, None);
        assert_eq!(summary.common_range, None);
    }

    #[test]
    fn test_duration() {
        let insight = duration(&sample());
        assert_eq!(insight.summary.count, 3);
        assert_eq!(insight.summary.median, Some(20.0));
        assert_eq!(insight.fee_points, vec![(40.0, 20000.0), (20.0, 15000.0), (10.0, 0.0)]);
        assert!(insight.trend.is_some());

        let methods: Vec<&str> = insight
            .by_delivery_method
            .iter()
            .map(|m| m.method.as_str())
            .collect();
        assert_eq!(methods, vec!["Online", "Physical"]);
        assert_eq!(insight.by_delivery_method[0].stats.median, 25.0);
    }

    #[test]
    fn test_delivery() {
        let insight = delivery(&sample());
        assert_eq!(insight.methods.len(), 2);
        let online = &insight.methods[0];
        assert_eq!(online.method, "Online");
        assert_eq!(online.courses, 3);
        assert!((online.share_percent - 75.0).abs() < 1e-9);
        // (20000 + 30000 + 0) / 3
        assert!((online.average_fee.unwrap() - 16666.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_payment() {
        let insight = payment(&sample());
        assert_eq!(insight.methods[0].label, "Monthly");
        assert_eq!(insight.methods[0].count, 2);
        assert_eq!(insight.methods[1].label, "Full payment");
    }

    #[test]
    fn test_competitor_comparison() {
        let comparison = competitor(&sample(), &AnalysisSettings::default());
        assert_eq!(comparison.entries[0].label, OWN_COURSES_LABEL);
        // 500, 750 and 0 (missing fee over 10 hours).
        assert_eq!(comparison.entries[0].average_hourly_rate, Some(1250.0 / 3.0));
        assert_eq!(comparison.entries[1].label, "Competitor A");
        assert_eq!(comparison.entries[1].average_hourly_rate, Some(1250.0));
    }

    #[test]
    fn test_report_on_empty_table() {
        let report = InsightReport::build("empty.csv", 3, &[], &AnalysisSettings::default());
        assert_eq!(report.rows_analyzed, 0);
        assert!(report.features.counts.is_empty());
        assert!(report.delivery.methods.is_empty());
        assert_eq!(report.pricing.average_hourly_rate, None);
        assert_eq!(report.competitor.entries[0].average_hourly_rate, None);
    }
}

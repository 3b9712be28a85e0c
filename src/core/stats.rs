//! Descriptive statistics over columns with missing values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Count, mean, spread and quartiles of the present values of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

fn present<I: IntoIterator<Item = Option<f64>>>(values: I) -> Vec<f64> {
    values.into_iter().flatten().collect()
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

pub fn describe<I: IntoIterator<Item = Option<f64>>>(values: I) -> Summary {
    let values = sorted(present(values));
    let count = values.len();
    let mean = mean(values.iter().copied().map(Some));

    let std = match (mean, count) {
        (Some(mean), n) if n >= 2 => {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            Some((sum_sq / (n - 1) as f64).sqrt())
        }
        _ => None,
    };

    Summary {
        count,
        mean,
        std,
        min: values.first().copied(),
        q1: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q3: quantile_sorted(&values, 0.75),
        max: values.last().copied(),
    }
}

pub fn mean<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Quantile with linear interpolation between the closest ranks.
pub fn quantile<I: IntoIterator<Item = Option<f64>>>(values: I, q: f64) -> Option<f64> {
    quantile_sorted(&sorted(present(values)), q)
}

fn quantile_sorted(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(values[lower] + (values[upper] - values[lower]) * fraction)
}

/// Most frequent value; ties go to the smallest.
pub fn mode<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let values = sorted(present(values));
    let mut best: Option<(f64, usize)> = None;
    let mut index = 0;
    while index < values.len() {
        let value = values[index];
        let run = values[index..].iter().take_while(|v| **v == value).count();
        if best.map_or(true, |(_, count)| run > count) {
            best = Some((value, run));
        }
        index += run;
    }
    best.map(|(value, _)| value)
}

/// Occurrences per label, most frequent first; ties keep first-seen order.
pub fn value_counts<'a, I: IntoIterator<Item = &'a str>>(items: I) -> Vec<CategoryCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        let count = counts.entry(item).or_insert(0);
        if *count == 0 {
            order.push(item);
        }
        *count += 1;
    }

    let mut result: Vec<CategoryCount> = order
        .into_iter()
        .map(|label| CategoryCount {
            label: label.to_string(),
            count: counts[label],
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Equal-width bins over `[min, max]`; the last bin includes `max`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }
    let width = (high - low) / bins as f64;

    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: low + width * i as f64,
            end: if i + 1 == bins {
                high
            } else {
                low + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values {
        let index = (((value - low) / width) as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

/// Quartiles with 1.5·IQR whiskers clipped to the data.
pub fn box_stats<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<BoxStats> {
    let values = sorted(present(values));
    let q1 = quantile_sorted(&values, 0.25)?;
    let median = quantile_sorted(&values, 0.5)?;
    let q3 = quantile_sorted(&values, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();
    let outliers = values
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}

/// Ordinary least squares through `(x, y)` points.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// `12500.4` → `"12,500"`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_describe_skips_missing() {
        let mut values = some(&[1.0, 2.0, 3.0, 4.0]);
        values.push(None);
        let summary = describe(values);

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, Some(2.5));
        assert!((summary.std.unwrap() - 1.2909944).abs() < 1e-6);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.q1, Some(1.75));
        assert_eq!(summary.median, Some(2.5));
        assert_eq!(summary.q3, Some(3.25));
        assert_eq!(summary.max, Some(4.0));
    }

    #[test]
    fn test_describe_small_inputs() {
        let empty = describe(Vec::<Option<f64>>::new());
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.median, None);

        let single = describe(some(&[7.0]));
        assert_eq!(single.std, None);
        assert_eq!(single.median, Some(7.0));
    }

    #[test]
    fn test_quantile_interpolates_and_skips_missing() {
        let values = vec![Some(40.0), None, Some(10.0), Some(30.0), Some(20.0)];
        assert_eq!(quantile(values.clone(), 0.25), Some(17.5));
        assert_eq!(quantile(values.clone(), 0.5), Some(25.0));
        assert_eq!(quantile(values, 1.5), Some(40.0));
        assert_eq!(quantile(vec![None], 0.5), None);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_eq!(mode(some(&[8.0, 12.0, 8.0, 12.0, 16.0])), Some(8.0));
        assert_eq!(mode(some(&[12.0, 8.0, 12.0])), Some(12.0));
        assert_eq!(mode(vec![None]), None);
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(["Online", "Physical", "Hybrid", "Physical", "Online", "Online"]);
        let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Online", "Physical", "Hybrid"]);
        assert_eq!(counts[0].count, 3);

        let tied = value_counts(["b", "a", "c"]);
        let labels: Vec<&str> = tied.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_histogram_includes_max_in_last_bin() {
        let bins = histogram(&[0.0, 0.0, 5000.0, 10000.0], 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 2);
        assert_eq!(bins[1].end, 10000.0);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram(&[3.0, 3.0], 4);
        assert_eq!(bins.first().unwrap().start, 2.5);
        assert_eq!(bins.last().unwrap().end, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(histogram(&[], 4).is_empty());
    }

    #[test]
    fn test_box_stats_flags_outliers() {
        let stats = box_stats(some(&[10.0, 12.0, 12.0, 14.0, 16.0, 100.0])).unwrap();
        assert_eq!(stats.median, 13.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.upper_whisker, 16.0);
        assert_eq!(stats.lower_whisker, 10.0);
        assert!(box_stats(vec![None]).is_none());
    }

    #[test]
    fn test_linear_fit() {
        let fit = linear_fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert_eq!(fit.at(3.0), 7.0);

        assert!(linear_fit(&[(1.0, 1.0)]).is_none());
        assert!(linear_fit(&[(1.0, 1.0), (1.0, 2.0)]).is_none());
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(12500.4), "12,500");
        assert_eq!(format_thousands(999.6), "1,000");
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(-4500.0), "-4,500");
    }
}

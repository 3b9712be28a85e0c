//! SVG rendering of the insight charts.

use crate::core::insights::{
    CompetitorComparison, CourseValue, DeliveryInsight, DemographicInsight, DurationInsight,
    FeatureInsight, InsightReport, MethodDistribution,
};
use crate::core::stats::{self, BoxStats, CategoryCount, HistogramBin};
use crate::utils::error::{AnalysisError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use serde::Serialize;

const FONT: &str = "sans-serif";
const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
const STEEL_BLUE: RGBColor = RGBColor(49, 130, 189);
const DARK_GREEN: RGBColor = RGBColor(0, 100, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);

#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    pub file_name: String,
    #[serde(skip)]
    pub svg: String,
}

/// Render every chart of the report, in a fixed order.
pub fn render_all(report: &InsightReport) -> Result<Vec<ChartArtifact>> {
    let pricing = &report.pricing;
    let duration = &report.duration;

    let charts = vec![
        render_svg("age_distribution.svg", (1000, 600), |root| {
            draw_age_distribution(root, &report.demographics)
        })?,
        render_svg("top_features.svg", (1000, 800), |root| {
            draw_top_features(root, &report.features)
        })?,
        render_svg("hourly_rate.svg", (1200, 800), |root| {
            draw_course_columns(
                root,
                "Hourly Rate per Course",
                "Course Name",
                "Hourly Rate (LKR)",
                &pricing.hourly_rates,
            )
        })?,
        render_svg("registration_fee_histogram.svg", (1000, 600), |root| {
            draw_histogram(
                root,
                "Distribution of Registration Fees",
                "Registration Fee (LKR)",
                &pricing.registration_fee_histogram,
                SKY_BLUE,
            )
        })?,
        render_svg("course_fee_histogram.svg", (1000, 600), |root| {
            draw_histogram(
                root,
                "Distribution of Course Fees",
                "Course Fee (LKR)",
                &pricing.course_fee_histogram,
                LIGHT_GREEN,
            )
        })?,
        render_svg("duration_by_course.svg", (1200, 800), |root| {
            draw_duration_by_course(root, &duration.per_course)
        })?,
        render_svg("duration_distribution.svg", (1000, 600), |root| {
            draw_duration_distribution(root, duration)
        })?,
        render_svg("duration_vs_fee.svg", (1000, 600), |root| {
            draw_duration_vs_fee(root, duration)
        })?,
        render_svg("duration_by_delivery.svg", (1200, 800), |root| {
            draw_duration_by_delivery(root, &duration.by_delivery_method)
        })?,
        render_svg("delivery_share.svg", (800, 800), |root| {
            draw_delivery_share(root, &report.delivery)
        })?,
        render_svg("delivery_courses_fees.svg", (1200, 800), |root| {
            draw_delivery_courses_fees(root, &report.delivery)
        })?,
        render_svg("payment_methods.svg", (1000, 600), |root| {
            draw_payment_methods(root, &report.payment.methods)
        })?,
        render_svg("competitor_comparison.svg", (1000, 600), |root| {
            draw_competitor_comparison(root, &report.competitor)
        })?,
    ];

    tracing::debug!("Rendered {} charts", charts.len());
    Ok(charts)
}

fn render_svg<F>(file_name: &str, size: (u32, u32), draw: F) -> Result<ChartArtifact>
where
    F: for<'b> FnOnce(&DrawingArea<SVGBackend<'b>, Shift>) -> anyhow::Result<()>,
{
    let mut svg = String::new();
    let outcome = {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        paint(&root, draw)
    };
    outcome.map_err(|source| AnalysisError::ChartError {
        chart: file_name.to_string(),
        source,
    })?;

    Ok(ChartArtifact {
        file_name: file_name.to_string(),
        svg,
    })
}

fn paint<DB, F>(root: &DrawingArea<DB, Shift>, draw: F) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    F: FnOnce(&DrawingArea<DB, Shift>) -> anyhow::Result<()>,
{
    root.fill(&WHITE)?;
    draw(root)?;
    root.present()?;
    Ok(())
}

fn upper_bound<I: IntoIterator<Item = f64>>(values: I, headroom: f64) -> f64 {
    let max = values.into_iter().fold(0.0, f64::max);
    if max > 0.0 && max.is_finite() {
        max * headroom
    } else {
        1.0
    }
}

/// Label of the category sitting at integer position `value`.
fn category_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

fn rotated_labels() -> TextStyle<'static> {
    (FONT, 12).into_font().transform(FontTransform::Rotate90).into()
}

fn bar_label(size: u32) -> TextStyle<'static> {
    (FONT, size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom))
}

/// `1250` → `"1,250.00"`.
fn format_rate(value: f64) -> String {
    let cents = (value * 100.0).round();
    let sign = if cents < 0.0 { "-" } else { "" };
    let whole = (cents.abs() / 100.0).trunc();
    let fraction = (cents.abs() % 100.0) as u64;
    format!("{}{}.{:02}", sign, stats::format_thousands(whole), fraction)
}

fn draw_age_distribution<DB>(root: &DrawingArea<DB, Shift>, insight: &DemographicInsight) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = insight.ranges.len() as f64;
    let y_max = upper_bound(insight.ranges.iter().filter_map(|r| r.max_age), 1.1);

    let mut chart = ChartBuilder::on(root)
        .caption("Age Distribution of Coding Courses", (FONT, 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..n + 2.0, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Course Number")
        .y_desc("Age Range")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    if let (Some(low), Some(high)) = (insight.most_common_min, insight.most_common_max) {
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(0.0, low), (n + 1.0, high)],
                LIGHT_BLUE.mix(0.4).filled(),
            )))?
            .label("Most Common Age Range")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], LIGHT_BLUE.filled()));

        for (value, label) in [(low, "Min"), (high, "Max")] {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(0.0, value), (n + 2.0, value)],
                BLACK.mix(0.6).stroke_width(1),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("{}: {}", label, value),
                (n + 0.6, value),
                (FONT, 13).into_font().color(&PURPLE),
            )))?;
        }
    }

    let spans: Vec<(f64, f64, f64)> = insight
        .ranges
        .iter()
        .filter_map(|r| Some((r.number as f64, r.min_age?, r.max_age?)))
        .collect();

    chart.draw_series(spans.iter().map(|&(x, low, high)| {
        PathElement::new(vec![(x, low), (x, high)], BLUE.stroke_width(2))
    }))?;
    chart
        .draw_series(spans.iter().map(|&(x, low, _)| Circle::new((x, low), 5, GREEN.filled())))?
        .label("Min Age")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, GREEN.filled()));
    chart
        .draw_series(spans.iter().map(|&(x, _, high)| Circle::new((x, high), 5, RED.filled())))?
        .label("Max Age")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// Horizontal bars, first entry on top, with the value written past each bar.
fn draw_horizontal_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, Option<f64>)],
    value_label: impl Fn(f64) -> String,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = bars.len().max(1);
    let x_max = upper_bound(bars.iter().filter_map(|(_, v)| *v), 1.15);
    // Row 0 is drawn at the top.
    let labels: Vec<String> = bars.iter().rev().map(|(label, _)| label.clone()).collect();
    let row = |i: usize| (bars.len() - 1 - i) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(240)
        .build_cartesian_2d(0.0..x_max, -0.5..n as f64 - 0.5)?;

    let y_fmt = |v: &f64| category_label(&labels, *v);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .y_labels(n)
        .y_label_formatter(&y_fmt)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().filter_map(|(i, (_, value))| {
        let value = (*value)?;
        Some(Rectangle::new(
            [(0.0, row(i) - 0.4), (value, row(i) + 0.4)],
            STEEL_BLUE.filled(),
        ))
    }))?;
    chart.draw_series(bars.iter().enumerate().filter_map(|(i, (_, value))| {
        let value = (*value)?;
        Some(Text::new(
            value_label(value),
            (value, row(i)),
            (FONT, 12)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))
    }))?;
    Ok(())
}

fn draw_top_features<DB>(root: &DrawingArea<DB, Shift>, insight: &FeatureInsight) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let bars: Vec<(String, Option<f64>)> = insight
        .top
        .iter()
        .map(|c| (c.label.clone(), Some(c.count as f64)))
        .collect();
    let title = format!("Top {} Most Common Features in Coding Courses", insight.top.len());
    draw_horizontal_bars(root, &title, "Count", "Features", &bars, |v| {
        format!(" {:.0}", v)
    })
}

fn draw_duration_by_course<DB>(root: &DrawingArea<DB, Shift>, per_course: &[CourseValue]) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let bars: Vec<(String, Option<f64>)> = per_course
        .iter()
        .map(|c| (c.name.clone(), c.value))
        .collect();
    draw_horizontal_bars(
        root,
        "Course Duration for Each Course",
        "Duration (hours)",
        "Course Name",
        &bars,
        |v| format!(" {}", v),
    )
}

/// Vertical bars, one per category, with optional text above each bar.
fn draw_columns<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    columns: &[(String, Option<f64>)],
    annotations: &[String],
    rotate_labels: bool,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = columns.len().max(1);
    let y_max = upper_bound(columns.iter().filter_map(|(_, v)| *v), 1.2);
    let labels: Vec<String> = columns.iter().map(|(label, _)| label.clone()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 22))
        .margin(20)
        .x_label_area_size(if rotate_labels { 220 } else { 50 })
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..n as f64 - 0.5, 0.0..y_max)?;

    let x_fmt = |v: &f64| category_label(&labels, *v);
    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(n)
        .x_label_formatter(&x_fmt);
    if rotate_labels {
        mesh.x_label_style(rotated_labels());
    }
    mesh.draw()?;

    chart.draw_series(columns.iter().enumerate().filter_map(|(i, (_, value))| {
        let value = (*value)?;
        let x = i as f64;
        Some(Rectangle::new(
            [(x - 0.4, 0.0), (x + 0.4, value)],
            Palette99::pick(i).filled(),
        ))
    }))?;

    chart.draw_series(
        columns
            .iter()
            .zip(annotations)
            .enumerate()
            .map(|(i, ((_, value), text))| {
                Text::new(text.clone(), (i as f64, value.unwrap_or(0.0)), bar_label(13))
            }),
    )?;
    Ok(())
}

fn draw_course_columns<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    values: &[CourseValue],
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let columns: Vec<(String, Option<f64>)> =
        values.iter().map(|c| (c.name.clone(), c.value)).collect();
    draw_columns(root, title, x_desc, y_desc, &columns, &[], true)
}

fn draw_histogram<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    bins: &[HistogramBin],
    color: RGBColor,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_min, x_max) = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => (0.0, 1.0),
    };
    let y_max = upper_bound(bins.iter().map(|b| b.count as f64), 1.1);

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Count")
        .x_label_formatter(&|v| stats::format_thousands(*v))
        .draw()?;

    chart.draw_series(
        bins.iter()
            .map(|b| Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], color.filled())),
    )?;
    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLACK.stroke_width(1))
    }))?;
    Ok(())
}

/// One box at `center` along the category axis; `vertical` puts values on y.
fn box_elements(
    stats: &BoxStats,
    center: f64,
    vertical: bool,
    color: RGBColor,
) -> (Vec<Rectangle<(f64, f64)>>, Vec<PathElement<(f64, f64)>>, Vec<Circle<(f64, f64), i32>>) {
    let at = |value: f64, offset: f64| {
        if vertical {
            (center + offset, value)
        } else {
            (value, center + offset)
        }
    };
    let half = 0.3;

    let boxes = vec![
        Rectangle::new([at(stats.q1, -half), at(stats.q3, half)], color.filled()),
        Rectangle::new([at(stats.q1, -half), at(stats.q3, half)], BLACK.stroke_width(1)),
    ];
    let lines = vec![
        PathElement::new(vec![at(stats.median, -half), at(stats.median, half)], BLACK.stroke_width(2)),
        PathElement::new(vec![at(stats.lower_whisker, 0.0), at(stats.q1, 0.0)], BLACK.stroke_width(1)),
        PathElement::new(vec![at(stats.q3, 0.0), at(stats.upper_whisker, 0.0)], BLACK.stroke_width(1)),
        PathElement::new(
            vec![at(stats.lower_whisker, -half / 2.0), at(stats.lower_whisker, half / 2.0)],
            BLACK.stroke_width(1),
        ),
        PathElement::new(
            vec![at(stats.upper_whisker, -half / 2.0), at(stats.upper_whisker, half / 2.0)],
            BLACK.stroke_width(1),
        ),
    ];
    let outliers = stats
        .outliers
        .iter()
        .map(|&v| Circle::new(at(v, 0.0), 4, BLACK.stroke_width(1)))
        .collect();
    (boxes, lines, outliers)
}

fn box_extent<'a, I: IntoIterator<Item = &'a BoxStats>>(boxes: I) -> (f64, f64) {
    let (low, high) = boxes.into_iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
        let lo = b.outliers.iter().copied().fold(lo.min(b.lower_whisker), f64::min);
        let hi = b.outliers.iter().copied().fold(hi.max(b.upper_whisker), f64::max);
        (lo, hi)
    });
    if !low.is_finite() || !high.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((high - low) * 0.1).max(1.0);
    (low - pad, high + pad)
}

fn draw_duration_distribution<DB>(root: &DrawingArea<DB, Shift>, insight: &DurationInsight) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_min, x_max) = box_extent(insight.distribution.iter());

    let mut chart = ChartBuilder::on(root)
        .caption("Distribution of Course Durations", (FONT, 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(20)
        .build_cartesian_2d(x_min..x_max, -1.0..1.0)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_desc("Duration (hours)")
        .draw()?;

    if let Some(stats) = &insight.distribution {
        let (boxes, lines, outliers) = box_elements(stats, 0.0, false, LIGHT_BLUE);
        chart.draw_series(boxes)?;
        chart.draw_series(lines)?;
        chart.draw_series(outliers)?;
    }
    Ok(())
}

fn draw_duration_vs_fee<DB>(root: &DrawingArea<DB, Shift>, insight: &DurationInsight) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_max = upper_bound(insight.fee_points.iter().map(|(x, _)| *x), 1.1);
    let y_max = upper_bound(insight.fee_points.iter().map(|(_, y)| *y), 1.1);

    let mut chart = ChartBuilder::on(root)
        .caption("Course Duration vs Course Fee", (FONT, 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Duration (hours)")
        .y_desc("Course Fee (LKR)")
        .y_label_formatter(&|v| stats::format_thousands(*v))
        .draw()?;

    chart.draw_series(
        insight
            .fee_points
            .iter()
            .map(|&point| Circle::new(point, 5, DARK_GREEN.filled())),
    )?;

    if let Some(trend) = insight.trend {
        let x_low = insight.fee_points.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
        let x_high = insight
            .fee_points
            .iter()
            .map(|(x, _)| *x)
            .fold(f64::NEG_INFINITY, f64::max);
        chart.draw_series(LineSeries::new(
            [(x_low, trend.at(x_low)), (x_high, trend.at(x_high))],
            RED.stroke_width(2),
        ))?;
    }
    Ok(())
}

fn draw_duration_by_delivery<DB>(
    root: &DrawingArea<DB, Shift>,
    methods: &[MethodDistribution],
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = methods.len().max(1);
    let (y_min, y_max) = box_extent(methods.iter().map(|m| &m.stats));
    let labels: Vec<String> = methods.iter().map(|m| m.method.clone()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption("Course Duration by Delivery Method", (FONT, 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5..n as f64 - 0.5, y_min.min(0.0)..y_max)?;

    let x_fmt = |v: &f64| category_label(&labels, *v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Delivery Method")
        .y_desc("Duration (hours)")
        .x_labels(n)
        .x_label_formatter(&x_fmt)
        .draw()?;

    for (i, method) in methods.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let (boxes, lines, outliers) =
            box_elements(&method.stats, i as f64, true, RGBColor(color.0, color.1, color.2));
        chart.draw_series(boxes)?;
        chart.draw_series(lines)?;
        chart.draw_series(outliers)?;
    }
    Ok(())
}

fn draw_delivery_share<DB>(root: &DrawingArea<DB, Shift>, insight: &DeliveryInsight) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(root)
        .caption("Distribution of Delivery Methods", (FONT, 22))
        .margin(20)
        .build_cartesian_2d(-1.5..1.5, -1.5..1.5)?;

    let mut start = 0.0f64;
    for (i, method) in insight.methods.iter().enumerate() {
        let sweep = method.share_percent / 100.0 * std::f64::consts::TAU;
        let steps = ((sweep / 0.05).ceil() as usize).max(1);
        let mut points = vec![(0.0, 0.0)];
        points.extend((0..=steps).map(|s| {
            let angle = start + sweep * s as f64 / steps as f64;
            (angle.cos(), angle.sin())
        }));

        chart.draw_series(std::iter::once(Polygon::new(points, Palette99::pick(i).filled())))?;

        let middle = start + sweep / 2.0;
        let centered = |size: u32| {
            (FONT, size)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center))
        };
        chart.draw_series([
            Text::new(
                format!("{:.1}%", method.share_percent),
                (0.6 * middle.cos(), 0.6 * middle.sin()),
                centered(14),
            ),
            Text::new(
                method.method.clone(),
                (1.2 * middle.cos(), 1.2 * middle.sin()),
                centered(16),
            ),
        ])?;
        start += sweep;
    }
    Ok(())
}

fn draw_delivery_courses_fees<DB>(root: &DrawingArea<DB, Shift>, insight: &DeliveryInsight) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let columns: Vec<(String, Option<f64>)> = insight
        .methods
        .iter()
        .map(|m| (m.method.clone(), Some(m.courses as f64)))
        .collect();
    let annotations: Vec<String> = insight
        .methods
        .iter()
        .map(|m| match m.average_fee {
            Some(fee) => format!("Avg Fee: {}", stats::format_thousands(fee)),
            None => "Avg Fee: n/a".to_string(),
        })
        .collect();
    draw_columns(
        root,
        "Number of Courses and Average Fee by Delivery Method",
        "Delivery Method",
        "Number of Courses",
        &columns,
        &annotations,
        false,
    )
}

fn draw_payment_methods<DB>(root: &DrawingArea<DB, Shift>, methods: &[CategoryCount]) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let columns: Vec<(String, Option<f64>)> = methods
        .iter()
        .map(|m| (m.label.clone(), Some(m.count as f64)))
        .collect();
    let annotations: Vec<String> = methods.iter().map(|m| m.count.to_string()).collect();
    draw_columns(
        root,
        "Distribution of Payment Methods for Course Fees",
        "Payment Method",
        "Count",
        &columns,
        &annotations,
        true,
    )
}

fn draw_competitor_comparison<DB>(
    root: &DrawingArea<DB, Shift>,
    comparison: &CompetitorComparison,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let columns: Vec<(String, Option<f64>)> = comparison
        .entries
        .iter()
        .map(|e| (e.label.clone(), e.average_hourly_rate))
        .collect();
    let annotations: Vec<String> = comparison
        .entries
        .iter()
        .map(|e| e.average_hourly_rate.map(format_rate).unwrap_or_else(|| "n/a".to_string()))
        .collect();
    draw_columns(
        root,
        "Comparison of Average Hourly Rates",
        "Competitor",
        "Average Hourly Rate (LKR/hour)",
        &columns,
        &annotations,
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AnalysisSettings;
    use crate::domain::model::{AgeRange, CourseRecord};

    fn courses() -> Vec<CourseRecord> {
        let rows = [
            ("Scratch Junior", (6, Some(9)), "Games, Certificate", 12.0, Some(12000.0), "Online", "Monthly"),
            ("Python Starter", (10, Some(14)), "Projects, Certificate", 24.0, Some(24000.0), "Physical", "Full payment"),
            ("Web Builders", (12, None), "Projects, Mentoring", 30.0, None, "Online", "Monthly"),
            ("Robotics Lab", (8, Some(12)), "Robotics kit, Certificate", 40.0, Some(52000.0), "Hybrid", "Installments"),
        ];
        rows.iter()
            .enumerate()
            .map(|(i, (name, (min, max), features, duration, fee, delivery, payment))| CourseRecord {
                number: i + 1,
                name: name.to_string(),
                age_group: Some(AgeRange { min: *min, max: *max }),
                features: features.split(", ").map(str::to_string).collect(),
                duration_hours: Some(*duration),
                registration_fee: Some(1500.0),
                course_fee: *fee,
                payment_method: Some(payment.to_string()),
                delivery_method: Some(delivery.to_string()),
            })
            .collect()
    }

    #[test]
    fn test_render_all_produces_every_chart() {
        let report = InsightReport::build("fixture.csv", 4, &courses(), &AnalysisSettings::default());
        let charts = render_all(&report).unwrap();

        let names: Vec<&str> = charts.iter().map(|c| c.file_name.as_str()).collect();
        assert_eq!(names.len(), 13);
        assert!(names.contains(&"age_distribution.svg"));
        assert!(names.contains(&"delivery_share.svg"));
        assert!(names.contains(&"competitor_comparison.svg"));
        for chart in &charts {
            assert!(chart.svg.contains("<svg"), "{} is not an SVG", chart.file_name);
        }

        let top_features = charts.iter().find(|c| c.file_name == "top_features.svg").unwrap();
        assert!(top_features.svg.contains("Certificate"));

        let competitor = charts
            .iter()
            .find(|c| c.file_name == "competitor_comparison.svg")
            .unwrap();
        assert!(competitor.svg.contains("1,250.00"));
    }

    #[test]
    fn test_render_all_with_no_courses() {
        let report = InsightReport::build("empty.csv", 0, &[], &AnalysisSettings::default());
        let charts = render_all(&report).unwrap();
        assert_eq!(charts.len(), 13);
        assert!(charts.iter().all(|c| c.svg.contains("<svg")));
    }

    #[test]
    fn test_category_label() {
        let labels = vec!["Online".to_string(), "Physical".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Online");
        assert_eq!(category_label(&labels, 1.0000000001), "Physical");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1250.0), "1,250.00");
        assert_eq!(format_rate(416.666_666), "416.67");
        assert_eq!(format_rate(0.0), "0.00");
    }

    #[test]
    fn test_format_rate_keeps_sign_below_one() {
        assert_eq!(format_rate(-0.5), "-0.50");
        assert_eq!(format_rate(-1250.25), "-1,250.25");
        assert_eq!(format_rate(-0.001), "0.00");
    }
}

//! View selection: map (chart kind, indicator selection, annual series) to a
//! renderable chart specification.
//!
//! The `ChartSpec` is the hand-off contract to the renderers (TUI widget,
//! ASCII plotter, JSON export): series of (x, y) pairs, axis labels, and
//! fixed annotations. All "can this chart be drawn?" policy lives here —
//! renderers never decide, they only draw what they are given. When a chart's
//! minimum indicator count is unmet the chart degrades to an informational
//! placeholder instead of an error.

use serde::{Deserialize, Serialize};

use crate::analytics::{correlation_matrix, percent_change, rolling_std};
use crate::domain::{AnnualSeries, ChartKind, Indicator};

/// Replacement-level total fertility rate.
pub const REPLACEMENT_FERTILITY: f64 = 2.1;

/// Zero-growth reference line for growth-rate charts.
pub const ZERO_GROWTH: f64 = 0.0;

/// Debt service (% of exports) level conventionally flagged as a warning.
pub const DEBT_SERVICE_WARNING: f64 = 5.0;

/// Fixed historical event markers drawn on time-axis charts.
pub const EVENT_MARKERS: [(i32, &str); 4] = [
    (1977, "economy liberalized"),
    (2004, "Indian Ocean tsunami"),
    (2009, "civil war ends"),
    (2022, "sovereign default"),
];

/// Which y-scale a series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Primary,
    Secondary,
}

/// One named series of (x, y) points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub axis: AxisSide,
    pub points: Vec<(f64, f64)>,
}

/// A fixed overlay annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Annotation {
    /// Horizontal reference line at a fixed y value.
    Threshold { value: f64, label: String },
    /// Vertical marker at a fixed year.
    Event { year: i32, label: String },
}

/// Payload of a chart: drawable series, a correlation matrix, or an
/// informational placeholder explaining why nothing can be drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartData {
    Series { series: Vec<ChartSeries> },
    Matrix { labels: Vec<String>, values: Vec<Vec<Option<f64>>> },
    Placeholder { message: String },
}

/// A fully assembled chart, ready for any renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Label of the secondary scale, when a series uses `AxisSide::Secondary`.
    pub y2_label: Option<String>,
    pub data: ChartData,
    pub annotations: Vec<Annotation>,
}

impl ChartSpec {
    pub fn placeholder(chart: ChartKind, message: impl Into<String>) -> Self {
        Self {
            chart,
            title: chart.display_name().to_string(),
            x_label: String::new(),
            y_label: String::new(),
            y2_label: None,
            data: ChartData::Placeholder {
                message: message.into(),
            },
            annotations: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.data, ChartData::Placeholder { .. })
    }
}

/// Assemble the chart specification for the current selection.
///
/// `selection` must already be restricted to indicators available in the
/// dataset (the pipeline handles `MissingIndicator` reporting); this function
/// only enforces per-chart minimum counts.
pub fn build_chart(
    chart: ChartKind,
    selection: &[Indicator],
    series: &AnnualSeries,
    window: usize,
) -> ChartSpec {
    if selection.len() < chart.min_indicators() {
        return ChartSpec::placeholder(
            chart,
            format!(
                "{} needs at least {} indicator{} selected ({} currently).",
                chart.display_name(),
                chart.min_indicators(),
                if chart.min_indicators() == 1 { "" } else { "s" },
                selection.len()
            ),
        );
    }
    if series.is_empty() {
        return ChartSpec::placeholder(chart, "No records in the selected year range.");
    }

    match chart {
        ChartKind::Trend => build_trend(selection, series),
        ChartKind::Scatter => build_scatter(selection, series),
        ChartKind::Correlation => build_correlation(selection, series),
        ChartKind::Volatility => build_volatility(selection[0], series, window),
        ChartKind::DualAxis => build_dual_axis(selection, series),
    }
}

fn build_trend(selection: &[Indicator], series: &AnnualSeries) -> ChartSpec {
    let chart_series: Vec<ChartSeries> = selection
        .iter()
        .map(|&ind| ChartSeries {
            name: ind.label().to_string(),
            axis: AxisSide::Primary,
            points: series.points(ind),
        })
        .collect();

    let title = if selection.len() == 1 {
        format!("{} over time", selection[0].label())
    } else {
        "Indicator trends over time".to_string()
    };
    let y_label = if selection.len() == 1 {
        selection[0].short_label().to_string()
    } else {
        "value".to_string()
    };

    ChartSpec {
        chart: ChartKind::Trend,
        title,
        x_label: "year".to_string(),
        y_label,
        y2_label: None,
        annotations: time_axis_annotations(selection, series),
        data: ChartData::Series {
            series: chart_series,
        },
    }
}

fn build_scatter(selection: &[Indicator], series: &AnnualSeries) -> ChartSpec {
    // Pairwise chart: first two selected indicators, extras ignored.
    let (x_ind, y_ind) = (selection[0], selection[1]);

    let points: Vec<(f64, f64)> = series
        .years
        .iter()
        .enumerate()
        .filter_map(|(i, _)| {
            let x = series.column(x_ind)[i]?;
            let y = series.column(y_ind)[i]?;
            Some((x, y))
        })
        .collect();

    ChartSpec {
        chart: ChartKind::Scatter,
        title: format!("{} vs {}", x_ind.short_label(), y_ind.short_label()),
        x_label: x_ind.label().to_string(),
        y_label: y_ind.short_label().to_string(),
        y2_label: None,
        annotations: Vec::new(),
        data: ChartData::Series {
            series: vec![ChartSeries {
                name: "annual observations".to_string(),
                axis: AxisSide::Primary,
                points,
            }],
        },
    }
}

fn build_correlation(selection: &[Indicator], series: &AnnualSeries) -> ChartSpec {
    let matrix = correlation_matrix(series, selection);
    ChartSpec {
        chart: ChartKind::Correlation,
        title: "Correlation between indicators".to_string(),
        x_label: String::new(),
        y_label: String::new(),
        y2_label: None,
        annotations: Vec::new(),
        data: ChartData::Matrix {
            labels: matrix
                .indicators
                .iter()
                .map(|i| i.short_label().to_string())
                .collect(),
            values: matrix.values,
        },
    }
}

fn build_volatility(indicator: Indicator, series: &AnnualSeries, window: usize) -> ChartSpec {
    let growth = percent_change(series.column(indicator));
    let vol = rolling_std(&growth, window);

    let to_points = |col: &[Option<f64>]| -> Vec<(f64, f64)> {
        series
            .years
            .iter()
            .zip(col.iter())
            .filter_map(|(&year, v)| v.map(|v| (year as f64, v)))
            .collect()
    };

    let growth_points = to_points(&growth);
    if growth_points.is_empty() {
        return ChartSpec::placeholder(
            ChartKind::Volatility,
            format!(
                "Not enough {} history to compute year-over-year growth.",
                indicator.short_label()
            ),
        );
    }

    let mut annotations = vec![Annotation::Threshold {
        value: ZERO_GROWTH,
        label: "zero growth".to_string(),
    }];
    annotations.extend(event_annotations(series));

    ChartSpec {
        chart: ChartKind::Volatility,
        title: format!("{} growth and rolling volatility", indicator.short_label()),
        x_label: "year".to_string(),
        y_label: "YoY growth (%)".to_string(),
        y2_label: None,
        annotations,
        data: ChartData::Series {
            series: vec![
                ChartSeries {
                    name: "YoY growth (%)".to_string(),
                    axis: AxisSide::Primary,
                    points: growth_points,
                },
                ChartSeries {
                    name: format!("rolling std ({window}y)"),
                    axis: AxisSide::Primary,
                    points: to_points(&vol),
                },
            ],
        },
    }
}

fn build_dual_axis(selection: &[Indicator], series: &AnnualSeries) -> ChartSpec {
    let (a, b) = (selection[0], selection[1]);

    let annotations = time_axis_annotations(&[a, b], series);

    ChartSpec {
        chart: ChartKind::DualAxis,
        title: format!("{} and {}", a.short_label(), b.short_label()),
        x_label: "year".to_string(),
        y_label: a.short_label().to_string(),
        y2_label: Some(b.short_label().to_string()),
        annotations,
        data: ChartData::Series {
            series: vec![
                ChartSeries {
                    name: a.label().to_string(),
                    axis: AxisSide::Primary,
                    points: series.points(a),
                },
                ChartSeries {
                    name: b.label().to_string(),
                    axis: AxisSide::Secondary,
                    points: series.points(b),
                },
            ],
        },
    }
}

/// Threshold + event annotations relevant to a time-axis chart.
fn time_axis_annotations(selection: &[Indicator], series: &AnnualSeries) -> Vec<Annotation> {
    let mut out = Vec::new();
    for &ind in selection {
        match ind {
            Indicator::FertilityRate => out.push(Annotation::Threshold {
                value: REPLACEMENT_FERTILITY,
                label: "replacement fertility".to_string(),
            }),
            Indicator::PopulationGrowth => out.push(Annotation::Threshold {
                value: ZERO_GROWTH,
                label: "zero growth".to_string(),
            }),
            Indicator::DebtService => out.push(Annotation::Threshold {
                value: DEBT_SERVICE_WARNING,
                label: "debt-service warning".to_string(),
            }),
            _ => {}
        }
    }
    out.extend(event_annotations(series));
    out
}

/// Event markers restricted to years inside the aggregated range.
fn event_annotations(series: &AnnualSeries) -> Vec<Annotation> {
    let (Some(&lo), Some(&hi)) = (series.years.first(), series.years.last()) else {
        return Vec::new();
    };
    EVENT_MARKERS
        .iter()
        .filter(|(year, _)| lo <= *year && *year <= hi)
        .map(|&(year, label)| Annotation::Event {
            year,
            label: label.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnnualSeries;

    fn sample_series() -> AnnualSeries {
        let years: Vec<i32> = (2000..2010).collect();
        let mut columns = vec![vec![None; years.len()]; Indicator::COUNT];
        columns[Indicator::Gdp.index()] =
            (0..10).map(|i| Some(100.0 + 10.0 * i as f64)).collect();
        columns[Indicator::LifeExpectancy.index()] =
            (0..10).map(|i| Some(70.0 + 0.1 * i as f64)).collect();
        columns[Indicator::FertilityRate.index()] = (0..10).map(|_| Some(2.0)).collect();
        AnnualSeries::new(years, columns)
    }

    #[test]
    fn correlation_with_one_indicator_is_placeholder() {
        let spec = build_chart(
            ChartKind::Correlation,
            &[Indicator::Gdp],
            &sample_series(),
            5,
        );
        assert!(spec.is_placeholder());
    }

    #[test]
    fn scatter_with_two_indicators_pairs_by_year() {
        let spec = build_chart(
            ChartKind::Scatter,
            &[Indicator::Gdp, Indicator::LifeExpectancy],
            &sample_series(),
            5,
        );
        let ChartData::Series { series } = &spec.data else {
            panic!("expected series data");
        };
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].points.len(), 10);
        assert_eq!(series[0].points[0], (100.0, 70.0));
    }

    #[test]
    fn empty_range_degrades_to_placeholder() {
        let empty = AnnualSeries::default();
        let spec = build_chart(ChartKind::Trend, &[Indicator::Gdp], &empty, 5);
        assert!(spec.is_placeholder());
    }

    #[test]
    fn fertility_trend_carries_replacement_threshold() {
        let spec = build_chart(
            ChartKind::Trend,
            &[Indicator::FertilityRate],
            &sample_series(),
            5,
        );
        assert!(spec.annotations.iter().any(|a| matches!(
            a,
            Annotation::Threshold { value, .. } if *value == REPLACEMENT_FERTILITY
        )));
    }

    #[test]
    fn event_markers_outside_range_are_dropped() {
        // Sample range is 2000..=2009: only the 2004 and 2009 markers apply.
        let spec = build_chart(ChartKind::Trend, &[Indicator::Gdp], &sample_series(), 5);
        let events: Vec<i32> = spec
            .annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Event { year, .. } => Some(*year),
                _ => None,
            })
            .collect();
        assert_eq!(events, vec![2004, 2009]);
    }

    #[test]
    fn volatility_overlay_has_growth_and_std_series() {
        let spec = build_chart(ChartKind::Volatility, &[Indicator::Gdp], &sample_series(), 5);
        let ChartData::Series { series } = &spec.data else {
            panic!("expected series data");
        };
        assert_eq!(series.len(), 2);
        // Growth defined from the 2nd year, rolling std from the 6th
        // (5 growth values needed).
        assert_eq!(series[0].points.len(), 9);
        assert_eq!(series[1].points.len(), 5);
    }

    #[test]
    fn dual_axis_marks_secondary_scale() {
        let spec = build_chart(
            ChartKind::DualAxis,
            &[Indicator::Gdp, Indicator::LifeExpectancy],
            &sample_series(),
            5,
        );
        assert_eq!(spec.y2_label.as_deref(), Some("Life exp."));
        let ChartData::Series { series } = &spec.data else {
            panic!("expected series data");
        };
        assert_eq!(series[1].axis, AxisSide::Secondary);
    }
}

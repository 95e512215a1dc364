//! Shared view pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! filter -> aggregate -> derive -> chart selection
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::analytics::{aggregate_annual, filter_years};
use crate::data::Dataset;
use crate::domain::{AnnualSeries, Indicator, ViewConfig, YearRange};
use crate::view::{ChartSpec, build_chart};

/// All computed outputs of a single view request.
#[derive(Debug, Clone)]
pub struct ViewOutput {
    /// Effective year range after clamping to the dataset's span.
    pub range: YearRange,
    /// Selected indicators actually present in the dataset, selection order.
    pub selection: Vec<Indicator>,
    pub annual: AnnualSeries,
    pub chart: ChartSpec,
    /// Non-fatal conditions worth telling the user about (e.g. an indicator
    /// that had to be omitted because its column is missing).
    pub notes: Vec<String>,
    /// Number of period records inside the range, pre-aggregation.
    pub filtered_rows: usize,
}

/// Execute the full pipeline for one view request.
///
/// Infallible by design: every non-fatal condition (empty range, missing
/// indicator, insufficient selection) degrades into placeholder content and a
/// note, never an error. The dataset itself was validated at load.
pub fn build_view(dataset: &Dataset, config: &ViewConfig) -> ViewOutput {
    let bounds = dataset
        .year_bounds()
        .unwrap_or_else(|| YearRange::new(0, -1));

    // An explicitly inverted request stays empty; a valid one is clamped into
    // the dataset's span.
    let range = match config.years {
        Some(r) if r.is_empty() => r,
        Some(r) => r.clamped_to(bounds),
        None => bounds,
    };

    let mut notes = Vec::new();
    let mut selection = Vec::new();
    for &indicator in &config.indicators {
        if dataset.is_available(indicator) {
            selection.push(indicator);
        } else {
            notes.push(format!(
                "{} omitted: column `{}` is not in the dataset.",
                indicator.label(),
                indicator.code()
            ));
        }
    }

    let filtered = filter_years(&dataset.records, range);
    let filtered_rows = filtered.len();
    let annual: AnnualSeries = aggregate_annual(&filtered);

    let chart = build_chart(config.chart, &selection, &annual, config.window);

    ViewOutput {
        range,
        selection,
        annual,
        chart,
        notes,
        filtered_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::read_dataset;
    use crate::domain::ChartKind;

    fn dataset() -> Dataset {
        // Indicator A scenario from the pipeline contract: 2018=100, 2019=200,
        // 2020 missing.
        let csv = "time_period,ny.gdp.mktp.cd\n\
            2018-Q1,100\n\
            2019-Q1,200\n\
            2020-Q1,\n";
        read_dataset(csv.as_bytes()).unwrap()
    }

    #[test]
    fn end_to_end_aggregate_and_growth() {
        let config = ViewConfig {
            years: Some(YearRange::new(2018, 2019)),
            indicators: vec![Indicator::Gdp],
            chart: ChartKind::Trend,
            window: 5,
        };
        let out = build_view(&dataset(), &config);

        assert_eq!(out.annual.years, vec![2018, 2019]);
        assert_eq!(out.annual.column(Indicator::Gdp), &[Some(100.0), Some(200.0)]);

        let growth = crate::analytics::percent_change(out.annual.column(Indicator::Gdp));
        assert_eq!(growth, vec![None, Some(100.0)]);
    }

    #[test]
    fn requested_range_is_clamped_to_dataset_span() {
        let config = ViewConfig {
            years: Some(YearRange::new(1900, 2100)),
            indicators: vec![Indicator::Gdp],
            chart: ChartKind::Trend,
            window: 5,
        };
        let out = build_view(&dataset(), &config);
        assert_eq!(out.range, YearRange::new(2018, 2020));
    }

    #[test]
    fn missing_indicator_is_noted_not_fatal() {
        let config = ViewConfig {
            years: None,
            indicators: vec![Indicator::Gdp, Indicator::DebtService],
            chart: ChartKind::Trend,
            window: 5,
        };
        let out = build_view(&dataset(), &config);
        assert_eq!(out.selection, vec![Indicator::Gdp]);
        assert_eq!(out.notes.len(), 1);
        assert!(out.notes[0].contains("dt.tds.dect.ex.zs"));
    }

    #[test]
    fn insufficient_selection_yields_placeholder_chart() {
        let config = ViewConfig {
            years: None,
            indicators: vec![Indicator::Gdp],
            chart: ChartKind::Correlation,
            window: 5,
        };
        let out = build_view(&dataset(), &config);
        assert!(out.chart.is_placeholder());
    }

    #[test]
    fn inverted_range_produces_empty_view() {
        let config = ViewConfig {
            years: Some(YearRange::new(2020, 2018)),
            indicators: vec![Indicator::Gdp],
            chart: ChartKind::Trend,
            window: 5,
        };
        let out = build_view(&dataset(), &config);
        assert_eq!(out.filtered_rows, 0);
        assert!(out.annual.is_empty());
        assert!(out.chart.is_placeholder());
    }
}

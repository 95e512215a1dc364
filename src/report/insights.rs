//! Narrative insight lines derived from the computed series.
//!
//! Each insight is a short sentence computed from already-aggregated columns.
//! Indicators that are missing or lack enough history simply contribute no
//! line; the list never errors.

use crate::analytics::{complement, percent_change, rolling_std};
use crate::app::pipeline::ViewOutput;
use crate::domain::{AnnualSeries, Indicator};
use crate::view::{DEBT_SERVICE_WARNING, REPLACEMENT_FERTILITY};

/// Build insight lines for the selected indicators.
pub fn build_insights(out: &ViewOutput, window: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for &indicator in &out.selection {
        match indicator {
            Indicator::Gdp => {
                lines.extend(growth_insight(&out.annual, indicator, "GDP"));
                lines.extend(volatility_insight(&out.annual, indicator, "GDP", window));
            }
            Indicator::LifeExpectancy => {
                lines.extend(span_change_insight(&out.annual, indicator));
            }
            Indicator::PopulationGrowth => {
                lines.extend(latest_insight(&out.annual, indicator));
            }
            Indicator::FertilityRate => {
                lines.extend(fertility_insight(&out.annual));
            }
            Indicator::RuralPopulation => {
                lines.extend(urbanization_insight(&out.annual));
            }
            Indicator::DebtService => {
                lines.extend(debt_service_insight(&out.annual));
            }
        }
    }
    lines
}

fn growth_insight(series: &AnnualSeries, indicator: Indicator, name: &str) -> Option<String> {
    let growth = percent_change(series.column(indicator));
    let defined: Vec<(i32, f64)> = series
        .years
        .iter()
        .zip(growth.iter())
        .filter_map(|(&y, g)| g.map(|g| (y, g)))
        .collect();
    if defined.is_empty() {
        return None;
    }

    let avg = defined.iter().map(|(_, g)| g).sum::<f64>() / defined.len() as f64;
    let (best_year, best) = defined
        .iter()
        .copied()
        .max_by(|a, b| a.1.total_cmp(&b.1))?;

    Some(format!(
        "{name} changed {avg:+.1}% per year on average over {} (best: {best_year}, {best:+.1}%).",
        range_label(series)
    ))
}

fn volatility_insight(
    series: &AnnualSeries,
    indicator: Indicator,
    name: &str,
    window: usize,
) -> Option<String> {
    let growth = percent_change(series.column(indicator));
    let vol = rolling_std(&growth, window);
    let defined: Vec<f64> = vol.iter().flatten().copied().collect();
    let (first, last) = (defined.first()?, defined.last()?);
    if defined.len() < 2 {
        return None;
    }

    let direction = if last > first { "rising" } else { "easing" };
    Some(format!(
        "{name} growth volatility ({window}y rolling std) is {direction}: {first:.1} → {last:.1}."
    ))
}

fn span_change_insight(series: &AnnualSeries, indicator: Indicator) -> Option<String> {
    let points = series.points(indicator);
    let (first_year, first) = points.first().copied()?;
    let (last_year, last) = points.last().copied()?;
    if first_year == last_year {
        return None;
    }

    Some(format!(
        "{} moved from {} ({}) to {} ({}).",
        indicator.short_label(),
        indicator.format_value(first),
        first_year as i32,
        indicator.format_value(last),
        last_year as i32,
    ))
}

fn latest_insight(series: &AnnualSeries, indicator: Indicator) -> Option<String> {
    let (year, value) = series.latest(indicator)?;
    Some(format!(
        "{}: {} as of {year}.",
        indicator.short_label(),
        indicator.format_value(value)
    ))
}

fn fertility_insight(series: &AnnualSeries) -> Option<String> {
    let points = series.points(Indicator::FertilityRate);
    let (_, latest) = points.last().copied()?;

    if latest < REPLACEMENT_FERTILITY {
        let since = points
            .iter()
            .find(|(_, v)| *v < REPLACEMENT_FERTILITY)
            .map(|(y, _)| *y as i32)?;
        Some(format!(
            "Fertility is below the replacement level ({REPLACEMENT_FERTILITY}) — first dipped under in {since}."
        ))
    } else {
        Some(format!(
            "Fertility ({latest:.2}) remains at or above the replacement level ({REPLACEMENT_FERTILITY})."
        ))
    }
}

fn urbanization_insight(series: &AnnualSeries) -> Option<String> {
    let urban = complement(series.column(Indicator::RuralPopulation));
    let (year, share) = series
        .years
        .iter()
        .zip(urban.iter())
        .rev()
        .find_map(|(&y, v)| v.map(|v| (y, v)))?;
    Some(format!(
        "Urban share of population: {share:.1}% as of {year}."
    ))
}

fn debt_service_insight(series: &AnnualSeries) -> Option<String> {
    let (year, value) = series.latest(Indicator::DebtService)?;
    if value > DEBT_SERVICE_WARNING {
        Some(format!(
            "Debt service at {value:.1}% of exports ({year}) — above the {DEBT_SERVICE_WARNING}% warning level."
        ))
    } else {
        Some(format!(
            "Debt service at {value:.1}% of exports ({year}), under the {DEBT_SERVICE_WARNING}% warning level."
        ))
    }
}

fn range_label(series: &AnnualSeries) -> String {
    match (series.years.first(), series.years.last()) {
        (Some(lo), Some(hi)) if lo != hi => format!("{lo}–{hi}"),
        (Some(lo), _) => format!("{lo}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::build_view;
    use crate::data::read_dataset;
    use crate::domain::{ChartKind, ViewConfig};

    fn out_for(csv: &str, indicators: Vec<Indicator>) -> ViewOutput {
        let dataset = read_dataset(csv.as_bytes()).unwrap();
        build_view(
            &dataset,
            &ViewConfig {
                years: None,
                indicators,
                chart: ChartKind::Trend,
                window: 5,
            },
        )
    }

    #[test]
    fn growth_insight_reports_average_and_best_year() {
        let csv = "time_period,ny.gdp.mktp.cd\n\
            2018,100\n2019,110\n2020,121\n";
        let out = out_for(csv, vec![Indicator::Gdp]);
        let lines = build_insights(&out, 5);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("+10.0% per year"));
    }

    #[test]
    fn fertility_below_replacement_names_first_year() {
        let csv = "time_period,sp.dyn.tfrt.in\n\
            1990,2.5\n1995,2.2\n2000,2.0\n2005,1.9\n";
        let out = out_for(csv, vec![Indicator::FertilityRate]);
        let lines = build_insights(&out, 5);
        assert!(lines[0].contains("2000"));
        assert!(lines[0].contains("below"));
    }

    #[test]
    fn urbanization_is_complement_of_rural_share() {
        let csv = "time_period,sp.rur.totl.zs\n2020,81.6\n";
        let out = out_for(csv, vec![Indicator::RuralPopulation]);
        let lines = build_insights(&out, 5);
        assert!(lines[0].contains("18.4%"));
    }

    #[test]
    fn missing_history_contributes_no_lines() {
        let csv = "time_period,ny.gdp.mktp.cd\n2020,100\n";
        let out = out_for(csv, vec![Indicator::Gdp]);
        // One year: no growth baseline, no volatility.
        assert!(build_insights(&out, 5).is_empty());
    }
}

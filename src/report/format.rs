//! Formatted terminal output: overview header, data table, correlation text.

use crate::app::pipeline::ViewOutput;
use crate::data::Dataset;
use crate::domain::Indicator;
use crate::view::ChartData;

/// Format the run overview: range, latest metrics, notes, load summary.
pub fn format_overview(dataset: &Dataset, out: &ViewOutput) -> String {
    let mut text = String::new();

    text.push_str("=== econ-dash — economic & demographic indicators ===\n");
    text.push_str(&format!(
        "Years: {} | records in range: {}\n",
        out.range, out.filtered_rows
    ));
    text.push_str(&format!("Load: {}\n", dataset.summary_line()));

    if !out.selection.is_empty() {
        text.push_str("\nLatest values in range:\n");
        for &indicator in &out.selection {
            match out.annual.latest(indicator) {
                Some((year, value)) => text.push_str(&format!(
                    "- {:<34} {} ({year})\n",
                    indicator.label(),
                    indicator.format_value(value)
                )),
                None => text.push_str(&format!(
                    "- {:<34} n/a\n",
                    indicator.label()
                )),
            }
        }
    }

    for note in &out.notes {
        text.push_str(&format!("note: {note}\n"));
    }

    text
}

/// Format the annual data table, most recent year first.
pub fn format_table(out: &ViewOutput) -> String {
    let mut text = String::new();

    if out.selection.is_empty() {
        text.push_str("Select indicators to display data.\n");
        return text;
    }

    text.push_str(&format!("{:<6}", "year"));
    for &indicator in &out.selection {
        text.push_str(&format!(" {:>16}", indicator.short_label()));
    }
    text.push('\n');

    text.push_str(&format!("{:-<6}", ""));
    for _ in &out.selection {
        text.push_str(&format!(" {:->16}", ""));
    }
    text.push('\n');

    for idx in (0..out.annual.len()).rev() {
        text.push_str(&format!("{:<6}", out.annual.years[idx]));
        for &indicator in &out.selection {
            match out.annual.column(indicator)[idx] {
                Some(v) => text.push_str(&format!(" {:>16}", indicator.format_value(v))),
                None => text.push_str(&format!(" {:>16}", "n/a")),
            }
        }
        text.push('\n');
    }

    text
}

/// Format a correlation matrix as aligned text.
pub fn format_correlation(labels: &[String], values: &[Vec<Option<f64>>]) -> String {
    let mut text = String::new();

    text.push_str(&format!("{:<14}", ""));
    for label in labels {
        text.push_str(&format!(" {:>12}", truncate(label, 12)));
    }
    text.push('\n');

    for (i, label) in labels.iter().enumerate() {
        text.push_str(&format!("{:<14}", truncate(label, 14)));
        for j in 0..labels.len() {
            match values[i][j] {
                Some(r) => text.push_str(&format!(" {r:>12.3}")),
                None => text.push_str(&format!(" {:>12}", "n/a")),
            }
        }
        text.push('\n');
    }

    text
}

/// Format non-series chart payloads (matrix, placeholder) for plain output.
pub fn format_chart_text(data: &ChartData) -> Option<String> {
    match data {
        ChartData::Matrix { labels, values } => Some(format_correlation(labels, values)),
        ChartData::Placeholder { message } => Some(format!("[info] {message}\n")),
        ChartData::Series { .. } => None,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

/// Default export columns: the selected indicators, falling back to all
/// available ones.
pub fn export_columns(dataset: &Dataset, out: &ViewOutput) -> Vec<Indicator> {
    if out.selection.is_empty() {
        dataset.available.clone()
    } else {
        out.selection.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::build_view;
    use crate::data::read_dataset;
    use crate::domain::{ChartKind, ViewConfig};

    fn view() -> (Dataset, ViewOutput) {
        let csv = "time_period,ny.gdp.mktp.cd,sp.dyn.le00.in\n\
            2018-Q1,1000000000,70.0\n\
            2018-Q2,3000000000,71.0\n\
            2019-Q1,2000000000,\n";
        let dataset = read_dataset(csv.as_bytes()).unwrap();
        let config = ViewConfig {
            years: None,
            indicators: vec![Indicator::Gdp, Indicator::LifeExpectancy],
            chart: ChartKind::Trend,
            window: 5,
        };
        let out = build_view(&dataset, &config);
        (dataset, out)
    }

    #[test]
    fn table_is_sorted_year_descending() {
        let (_, out) = view();
        let table = format_table(&out);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].starts_with("2019"));
        assert!(lines[3].starts_with("2018"));
    }

    #[test]
    fn table_shows_missing_as_na() {
        let (_, out) = view();
        let table = format_table(&out);
        let row_2019 = table.lines().nth(2).unwrap();
        assert!(row_2019.contains("n/a"));
    }

    #[test]
    fn overview_reports_latest_present_values() {
        let (dataset, out) = view();
        let text = format_overview(&dataset, &out);
        // Life expectancy is missing in 2019; the latest present value is 2018.
        assert!(text.contains("70.5 yrs (2018)"));
        assert!(text.contains("$2.00B (2019)"));
    }

    #[test]
    fn correlation_text_handles_undefined_cells() {
        let labels = vec!["GDP".to_string(), "Life exp.".to_string()];
        let values = vec![vec![Some(1.0), None], vec![None, Some(1.0)]];
        let text = format_correlation(&labels, &values);
        assert!(text.contains("n/a"));
        assert!(text.contains("1.000"));
    }
}

//! Export the filtered annual table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per year (most recent first, matching the on-screen
//! table), one column per exported indicator, empty cells for missing means.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::ViewOutput;
use crate::domain::Indicator;
use crate::error::AppError;

/// Write the annual table for `columns` to a CSV file.
pub fn write_table_csv(
    path: &Path,
    out: &ViewOutput,
    columns: &[Indicator],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;
    write_table(file, out, columns).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to write export CSV '{}': {e}", path.display()),
        )
    })
}

fn write_table(
    mut w: impl Write,
    out: &ViewOutput,
    columns: &[Indicator],
) -> std::io::Result<()> {
    let mut header = String::from("year");
    for indicator in columns {
        header.push(',');
        header.push_str(indicator.code());
    }
    writeln!(w, "{header}")?;

    for idx in (0..out.annual.len()).rev() {
        let mut row = out.annual.years[idx].to_string();
        for &indicator in columns {
            row.push(',');
            if let Some(v) = out.annual.column(indicator)[idx] {
                row.push_str(&format!("{v:.6}"));
            }
        }
        writeln!(w, "{row}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::build_view;
    use crate::data::read_dataset;
    use crate::domain::{ChartKind, ViewConfig};

    fn view_output() -> ViewOutput {
        let csv = "time_period,ny.gdp.mktp.cd,sp.dyn.le00.in\n\
            2018-Q1,1000000000,70.0\n\
            2018-Q2,3000000000,71.0\n\
            2019-Q1,2000000000,\n";
        let dataset = read_dataset(csv.as_bytes()).unwrap();
        build_view(
            &dataset,
            &ViewConfig {
                years: None,
                indicators: vec![Indicator::Gdp, Indicator::LifeExpectancy],
                chart: ChartKind::Trend,
                window: 5,
            },
        )
    }

    #[test]
    fn header_is_year_plus_indicator_codes() {
        let out = view_output();
        let mut buf = Vec::new();
        write_table(&mut buf, &out, &out.selection).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "year,ny.gdp.mktp.cd,sp.dyn.le00.in"
        );
    }

    #[test]
    fn rows_are_most_recent_year_first_with_blank_missing_cells() {
        let out = view_output();
        let mut buf = Vec::new();
        write_table(&mut buf, &out, &out.selection).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // 2019 first; its life-expectancy mean is missing, so the cell is
        // empty rather than zero.
        assert!(lines[1].starts_with("2019,2000000000.000000,"));
        assert!(lines[1].ends_with(','));
        // 2018 averages the two quarterly records.
        assert_eq!(lines[2], "2018,2000000000.000000,70.500000");
    }
}

//! Read/write chart spec JSON files.
//!
//! Chart JSON is the portable form of an assembled view: the chart kind,
//! its series/annotations, and the request metadata that produced it. A saved
//! spec can be re-rendered later (`edash plot`) without reloading the dataset.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::YearRange;
use crate::error::AppError;
use crate::view::ChartSpec;

/// A saved chart file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartFile {
    pub tool: String,
    /// RFC 3339 timestamp of when the spec was written.
    pub generated: String,
    pub years: YearRange,
    pub window: usize,
    pub spec: ChartSpec,
}

/// Write a chart JSON file.
pub fn write_chart_json(
    path: &Path,
    spec: &ChartSpec,
    years: YearRange,
    window: usize,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create chart JSON '{}': {e}", path.display()),
        )
    })?;

    let chart = ChartFile {
        tool: "edash".to_string(),
        generated: chrono::Local::now().to_rfc3339(),
        years,
        window,
        spec: spec.clone(),
    };

    serde_json::to_writer_pretty(file, &chart)
        .map_err(|e| AppError::new(4, format!("Failed to write chart JSON: {e}")))?;

    Ok(())
}

/// Read a chart JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open chart JSON '{}': {e}", path.display()),
        )
    })?;
    let chart: ChartFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid chart JSON: {e}")))?;
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChartKind;
    use crate::view::{AxisSide, ChartData, ChartSeries};

    fn sample_spec() -> ChartSpec {
        ChartSpec {
            chart: ChartKind::Trend,
            title: "GDP (current US$) over time".to_string(),
            x_label: "year".to_string(),
            y_label: "GDP".to_string(),
            y2_label: None,
            annotations: Vec::new(),
            data: ChartData::Series {
                series: vec![ChartSeries {
                    name: "GDP (current US$)".to_string(),
                    axis: AxisSide::Primary,
                    points: vec![(2018.0, 1.0e9), (2019.0, 2.0e9)],
                }],
            },
        }
    }

    #[test]
    fn chart_json_round_trips() {
        let path = std::env::temp_dir().join(format!("edash_chart_{}.json", std::process::id()));
        write_chart_json(&path, &sample_spec(), YearRange::new(2018, 2019), 5).unwrap();

        let chart = read_chart_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(chart.tool, "edash");
        assert_eq!(chart.years, YearRange::new(2018, 2019));
        assert_eq!(chart.window, 5);
        assert_eq!(chart.spec.chart, ChartKind::Trend);
        let ChartData::Series { series } = &chart.spec.data else {
            panic!("expected series data");
        };
        assert_eq!(series[0].points, vec![(2018.0, 1.0e9), (2019.0, 2.0e9)]);
        assert_eq!(series[0].axis, AxisSide::Primary);
    }

    #[test]
    fn missing_chart_json_is_a_load_error() {
        let path = std::env::temp_dir().join("edash_chart_does_not_exist.json");
        let err = read_chart_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

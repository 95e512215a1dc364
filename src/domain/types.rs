//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while assembling views
//! - exported to JSON/CSV
//! - reloaded later for comparisons

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The tracked indicators.
///
/// This is a closed, typed catalog rather than a stringly-keyed column lookup:
/// the set is validated against the dataset header once at load time, and
/// downstream code can index columns without re-checking names. Codes are the
/// lowercased World Bank series codes used by the source CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    /// GDP in current US dollars (`ny.gdp.mktp.cd`).
    Gdp,
    /// Life expectancy at birth, years (`sp.dyn.le00.in`).
    LifeExpectancy,
    /// Annual population growth, percent (`sp.pop.grow`).
    PopulationGrowth,
    /// Total fertility rate, births per woman (`sp.dyn.tfrt.in`).
    FertilityRate,
    /// Rural population as a share of total, percent (`sp.rur.totl.zs`).
    RuralPopulation,
    /// Total debt service as a share of exports, percent (`dt.tds.dect.ex.zs`).
    DebtService,
}

impl Indicator {
    pub const ALL: [Indicator; 6] = [
        Indicator::Gdp,
        Indicator::LifeExpectancy,
        Indicator::PopulationGrowth,
        Indicator::FertilityRate,
        Indicator::RuralPopulation,
        Indicator::DebtService,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Column name in the source CSV (already lowercased by the loader).
    pub fn code(self) -> &'static str {
        match self {
            Indicator::Gdp => "ny.gdp.mktp.cd",
            Indicator::LifeExpectancy => "sp.dyn.le00.in",
            Indicator::PopulationGrowth => "sp.pop.grow",
            Indicator::FertilityRate => "sp.dyn.tfrt.in",
            Indicator::RuralPopulation => "sp.rur.totl.zs",
            Indicator::DebtService => "dt.tds.dect.ex.zs",
        }
    }

    /// Human-readable label for titles and table headers.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Gdp => "GDP (current US$)",
            Indicator::LifeExpectancy => "Life expectancy (years)",
            Indicator::PopulationGrowth => "Population growth (%)",
            Indicator::FertilityRate => "Fertility rate (births per woman)",
            Indicator::RuralPopulation => "Rural population (% of total)",
            Indicator::DebtService => "Debt service (% of exports)",
        }
    }

    /// Compact label for axis descriptions and settings lists.
    pub fn short_label(self) -> &'static str {
        match self {
            Indicator::Gdp => "GDP",
            Indicator::LifeExpectancy => "Life exp.",
            Indicator::PopulationGrowth => "Pop. growth",
            Indicator::FertilityRate => "Fertility",
            Indicator::RuralPopulation => "Rural pop.",
            Indicator::DebtService => "Debt service",
        }
    }

    /// Stable column index for `Record` / `AnnualSeries` storage.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Format a value with the indicator's unit conventions.
    pub fn format_value(self, v: f64) -> String {
        match self {
            Indicator::Gdp => {
                if v.abs() >= 1e9 {
                    format!("${:.2}B", v / 1e9)
                } else if v.abs() >= 1e6 {
                    format!("${:.1}M", v / 1e6)
                } else {
                    format!("${v:.0}")
                }
            }
            Indicator::LifeExpectancy => format!("{v:.1} yrs"),
            Indicator::PopulationGrowth | Indicator::RuralPopulation | Indicator::DebtService => {
                format!("{v:.2}%")
            }
            Indicator::FertilityRate => format!("{v:.2}"),
        }
    }
}

/// Closed year interval `[lo, hi]`.
///
/// An inverted range (`lo > hi`) is treated as empty by the range filter
/// rather than as an error, so a half-edited selection never crashes a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub lo: i32,
    pub hi: i32,
}

impl YearRange {
    pub fn new(lo: i32, hi: i32) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lo <= year && year <= self.hi
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// Clamp both endpoints into `bounds`, preserving emptiness.
    pub fn clamped_to(&self, bounds: YearRange) -> YearRange {
        YearRange {
            lo: self.lo.clamp(bounds.lo, bounds.hi),
            hi: self.hi.clamp(bounds.lo, bounds.hi),
        }
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi)
    }
}

/// One observation row: a period label, its derived year, and indicator values.
///
/// Values are stored positionally (indexed by `Indicator::index`) so lookups
/// stay allocation-free; a `None` slot means the CSV cell was empty or not a
/// finite number.
#[derive(Debug, Clone)]
pub struct Record {
    /// Original period label, e.g. `1970-Q1` or `1970`.
    pub period: String,
    /// Year derived from the period label by the period normalizer.
    pub year: i32,
    values: Vec<Option<f64>>,
}

impl Record {
    pub fn new(period: impl Into<String>, year: i32) -> Self {
        Self {
            period: period.into(),
            year,
            values: vec![None; Indicator::COUNT],
        }
    }

    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        self.values[indicator.index()]
    }

    pub fn set_value(&mut self, indicator: Indicator, value: Option<f64>) {
        self.values[indicator.index()] = value.filter(|v| v.is_finite());
    }
}

/// One aggregated row per calendar year, values averaged across sub-year records.
///
/// Invariants:
/// - `years` is strictly ascending and matches the distinct years of the
///   filtered input
/// - every column has exactly `years.len()` entries
/// - a missing mean is `None`, never coerced to zero
#[derive(Debug, Clone, Default)]
pub struct AnnualSeries {
    pub years: Vec<i32>,
    columns: Vec<Vec<Option<f64>>>,
}

impl AnnualSeries {
    pub fn new(years: Vec<i32>, columns: Vec<Vec<Option<f64>>>) -> Self {
        debug_assert_eq!(columns.len(), Indicator::COUNT);
        debug_assert!(columns.iter().all(|c| c.len() == years.len()));
        Self { years, columns }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn column(&self, indicator: Indicator) -> &[Option<f64>] {
        &self.columns[indicator.index()]
    }

    /// The most recent (year, value) pair where the indicator is present.
    pub fn latest(&self, indicator: Indicator) -> Option<(i32, f64)> {
        let col = self.column(indicator);
        self.years
            .iter()
            .zip(col.iter())
            .rev()
            .find_map(|(&year, v)| v.map(|v| (year, v)))
    }

    /// All (year, value) pairs where the indicator is present, ascending.
    pub fn points(&self, indicator: Indicator) -> Vec<(f64, f64)> {
        self.years
            .iter()
            .zip(self.column(indicator).iter())
            .filter_map(|(&year, v)| v.map(|v| (year as f64, v)))
            .collect()
    }
}

/// Which chart the view selector should assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// One line per selected indicator over the year range.
    Trend,
    /// Two indicators plotted against each other, one point per year.
    Scatter,
    /// Pairwise-complete Pearson correlation over the selected indicators.
    Correlation,
    /// Year-over-year growth with its rolling volatility overlay.
    Volatility,
    /// Two indicators over time on independent y-scales.
    DualAxis,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Trend,
        ChartKind::Scatter,
        ChartKind::Correlation,
        ChartKind::Volatility,
        ChartKind::DualAxis,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Trend => "Trend",
            ChartKind::Scatter => "Scatter",
            ChartKind::Correlation => "Correlation",
            ChartKind::Volatility => "Volatility",
            ChartKind::DualAxis => "Dual axis",
        }
    }

    /// Minimum number of selected indicators required to render.
    pub fn min_indicators(self) -> usize {
        match self {
            ChartKind::Trend | ChartKind::Volatility => 1,
            ChartKind::Scatter | ChartKind::Correlation | ChartKind::DualAxis => 2,
        }
    }

    /// Whether the chart uses exactly two indicators (extras are ignored).
    pub fn is_pairwise(self) -> bool {
        matches!(self, ChartKind::Scatter | ChartKind::DualAxis)
    }
}

/// Trailing window length (in years) for rolling statistics.
pub const DEFAULT_ROLLING_WINDOW: usize = 5;

/// A single view request: everything the pipeline needs beyond the dataset.
///
/// Re-created per user interaction; the aggregated series and derived columns
/// are recomputed from scratch whenever this changes.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Inclusive year filter. `None` means the dataset's full span.
    pub years: Option<YearRange>,
    /// Selected indicators, in selection order.
    pub indicators: Vec<Indicator>,
    pub chart: ChartKind,
    /// Window for rolling mean/std derived metrics.
    pub window: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            years: None,
            indicators: vec![Indicator::Gdp, Indicator::LifeExpectancy],
            chart: ChartKind::Trend,
            window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_range_inverted_is_empty() {
        let r = YearRange::new(2000, 1990);
        assert!(r.is_empty());
        assert!(!r.contains(1995));
    }

    #[test]
    fn record_rejects_non_finite_values() {
        let mut rec = Record::new("1970-Q1", 1970);
        rec.set_value(Indicator::Gdp, Some(f64::NAN));
        assert_eq!(rec.value(Indicator::Gdp), None);
        rec.set_value(Indicator::Gdp, Some(1.25e9));
        assert_eq!(rec.value(Indicator::Gdp), Some(1.25e9));
    }

    #[test]
    fn annual_series_latest_skips_missing_tail() {
        let mut columns = vec![vec![None; 3]; Indicator::COUNT];
        columns[Indicator::Gdp.index()] = vec![Some(1.0), Some(2.0), None];
        let series = AnnualSeries::new(vec![2018, 2019, 2020], columns);
        assert_eq!(series.latest(Indicator::Gdp), Some((2019, 2.0)));
        assert_eq!(series.latest(Indicator::DebtService), None);
    }
}

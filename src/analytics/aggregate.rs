//! Annual aggregation of sub-year records.

use std::collections::BTreeMap;

use crate::domain::{AnnualSeries, Indicator, Record};

/// Group records by year and average each indicator over its non-missing
/// values.
///
/// The output has exactly one row per distinct year of the input, ascending.
/// A year in which an indicator never appears yields `None` for that cell,
/// never zero. Means are computed as sum/count, so the result is independent
/// of record order up to floating-point associativity.
pub fn aggregate_annual(records: &[&Record]) -> AnnualSeries {
    // year -> per-indicator (sum, count)
    let mut groups: BTreeMap<i32, Vec<(f64, usize)>> = BTreeMap::new();

    for record in records {
        let slots = groups
            .entry(record.year)
            .or_insert_with(|| vec![(0.0, 0); Indicator::COUNT]);
        for indicator in Indicator::ALL {
            if let Some(v) = record.value(indicator) {
                let slot = &mut slots[indicator.index()];
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }

    let years: Vec<i32> = groups.keys().copied().collect();
    let mut columns = vec![Vec::with_capacity(years.len()); Indicator::COUNT];
    for slots in groups.values() {
        for indicator in Indicator::ALL {
            let (sum, count) = slots[indicator.index()];
            let mean = if count > 0 {
                Some(sum / count as f64)
            } else {
                None
            };
            columns[indicator.index()].push(mean);
        }
    }

    AnnualSeries::new(years, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, quarter: u8, gdp: Option<f64>, le: Option<f64>) -> Record {
        let mut r = Record::new(format!("{year}-Q{quarter}"), year);
        r.set_value(Indicator::Gdp, gdp);
        r.set_value(Indicator::LifeExpectancy, le);
        r
    }

    #[test]
    fn means_are_per_year_over_present_values() {
        let rows = vec![
            record(2018, 1, Some(100.0), Some(70.0)),
            record(2018, 2, Some(300.0), None),
            record(2019, 1, Some(50.0), Some(71.0)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let series = aggregate_annual(&refs);

        assert_eq!(series.years, vec![2018, 2019]);
        assert_eq!(series.column(Indicator::Gdp), &[Some(200.0), Some(50.0)]);
        // 2018 life expectancy averages over the single present value.
        assert_eq!(
            series.column(Indicator::LifeExpectancy),
            &[Some(70.0), Some(71.0)]
        );
    }

    #[test]
    fn fully_missing_year_stays_missing() {
        let rows = vec![
            record(2018, 1, Some(100.0), None),
            record(2018, 2, Some(100.0), None),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let series = aggregate_annual(&refs);
        assert_eq!(series.column(Indicator::LifeExpectancy), &[None]);
    }

    #[test]
    fn years_are_distinct_and_ascending() {
        let rows = vec![
            record(2020, 1, Some(1.0), None),
            record(2018, 1, Some(1.0), None),
            record(2020, 2, Some(3.0), None),
            record(2019, 1, Some(1.0), None),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let series = aggregate_annual(&refs);
        assert_eq!(series.years, vec![2018, 2019, 2020]);
        assert_eq!(series.column(Indicator::Gdp)[2], Some(2.0));
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = aggregate_annual(&[]);
        assert!(series.is_empty());
    }
}

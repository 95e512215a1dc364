//! Pairwise-complete Pearson correlation over annual series columns.

use crate::domain::{AnnualSeries, Indicator};

/// A square correlation matrix over a set of indicators.
///
/// `values[i][j]` is the Pearson correlation of indicators `i` and `j`,
/// computed over the years where both are present (pairwise deletion), or
/// `None` when fewer than two such years exist or a column is constant.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub indicators: Vec<Indicator>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Build the correlation matrix for the selected indicator columns.
pub fn correlation_matrix(series: &AnnualSeries, indicators: &[Indicator]) -> CorrelationMatrix {
    let n = indicators.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = pearson(series.column(indicators[i]), series.column(indicators[j]));
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        indicators: indicators.to_vec(),
        values,
    }
}

/// Pearson correlation over positions where both columns are present.
///
/// Returns `None` with fewer than two complete pairs or when either column is
/// constant over the complete pairs (zero variance).
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some((x.as_ref().copied()?, y.as_ref().copied()?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    // Floating-point can nudge |r| just past 1.
    Some(r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnnualSeries;

    fn series(gdp: Vec<Option<f64>>, le: Vec<Option<f64>>) -> AnnualSeries {
        let years: Vec<i32> = (0..gdp.len() as i32).map(|i| 2000 + i).collect();
        let mut columns = vec![vec![None; gdp.len()]; Indicator::COUNT];
        columns[Indicator::Gdp.index()] = gdp;
        columns[Indicator::LifeExpectancy.index()] = le;
        AnnualSeries::new(years, columns)
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let s = series(
            vec![Some(1.0), Some(2.0), Some(3.0), Some(5.0)],
            vec![Some(2.0), Some(1.0), Some(4.0), Some(3.0)],
        );
        let sel = [Indicator::Gdp, Indicator::LifeExpectancy];
        let m = correlation_matrix(&s, &sel);

        for i in 0..2 {
            assert!((m.values[i][i].unwrap() - 1.0).abs() < 1e-12);
            for j in 0..2 {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        let s = series(
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![Some(10.0), Some(20.0), Some(30.0)],
        );
        let r = pearson(s.column(Indicator::Gdp), s.column(Indicator::LifeExpectancy));
        assert!((r.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pairwise_deletion_skips_incomplete_rows() {
        // The (None, 99.0) row must not contribute.
        let a = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let b = vec![Some(2.0), Some(99.0), Some(4.0), Some(6.0)];
        let r = pearson(&a, &b).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_has_no_correlation() {
        let a = vec![Some(1.0), Some(1.0), Some(1.0)];
        let b = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(pearson(&a, &b), None);
        // Self-correlation of a constant column is likewise undefined.
        assert_eq!(pearson(&a, &a), None);
    }

    #[test]
    fn fewer_than_two_pairs_is_undefined() {
        let a = vec![Some(1.0), None];
        let b = vec![Some(2.0), Some(3.0)];
        assert_eq!(pearson(&a, &b), None);
    }
}

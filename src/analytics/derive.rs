//! Derived metrics over an annual series column.
//!
//! Each transform is a pure function from one `Option<f64>` column to another
//! of the same length. Missing history is represented as `None` and must stay
//! `None` downstream; none of these functions can fail.

/// Year-over-year percent change: `(v[t] − v[t−1]) / v[t−1] × 100`.
///
/// The first position is always missing (no prior-year baseline). A missing
/// or zero baseline yields missing, not an error.
pub fn percent_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    for t in 1..values.len() {
        out[t] = match (values[t - 1], values[t]) {
            (Some(prev), Some(cur)) if prev != 0.0 => {
                let v = (cur - prev) / prev * 100.0;
                v.is_finite().then_some(v)
            }
            _ => None,
        };
    }
    out
}

/// Trailing rolling mean over a window of `window` consecutive values.
///
/// Undefined (`None`) until `window` values are available; any missing input
/// inside the window propagates a missing output (no partial-window
/// imputation).
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |chunk| {
        chunk.iter().sum::<f64>() / chunk.len() as f64
    })
}

/// Trailing rolling sample standard deviation over `window` values.
///
/// Same missing-propagation rules as `rolling_mean`. Windows shorter than 2
/// have no sample deviation and always yield missing.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(values, window, |chunk| {
        let n = chunk.len() as f64;
        let mean = chunk.iter().sum::<f64>() / n;
        let var = chunk.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    })
}

/// Complement percentage: `100 − v` wherever `v` is defined.
pub fn complement(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(|v| 100.0 - v)).collect()
}

fn rolling(
    values: &[Option<f64>],
    window: usize,
    stat: impl Fn(&[f64]) -> f64,
) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let mut chunk = Vec::with_capacity(window);
    for t in (window - 1)..values.len() {
        chunk.clear();
        for v in &values[t + 1 - window..=t] {
            match v {
                Some(v) => chunk.push(*v),
                None => break,
            }
        }
        if chunk.len() == window {
            out[t] = Some(stat(&chunk));
        }
    }
    out
}

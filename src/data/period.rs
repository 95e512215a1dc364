//! Period-label normalization.
//!
//! Source rows are labeled either with a bare year (`1970`) or a composite
//! sub-year period (`1970-Q1`, `1970Q1`, `1970-03`). The pipeline only works
//! in calendar years, so each label is reduced to the integer prefix before
//! the first non-digit character. This runs once, immediately after load,
//! before any filtering.

/// Derive the calendar year from a period label.
///
/// The year is the longest digit prefix of the trimmed label, so both bare
/// years and quarter/month suffixes parse the same way. Fails when the label
/// has no digit prefix or the prefix overflows an `i32`.
pub fn year_from_period(label: &str) -> Result<i32, String> {
    let trimmed = label.trim();
    let digits: &str = {
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };

    if digits.is_empty() {
        return Err(format!("Period '{label}' has no leading year digits."));
    }

    digits
        .parse::<i32>()
        .map_err(|_| format!("Period '{label}' year prefix is out of range."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarterly_label() {
        assert_eq!(year_from_period("1970-Q1"), Ok(1970));
        assert_eq!(year_from_period("2004Q4"), Ok(2004));
    }

    #[test]
    fn bare_year() {
        assert_eq!(year_from_period("1970"), Ok(1970));
        assert_eq!(year_from_period(" 2022 "), Ok(2022));
    }

    #[test]
    fn monthly_label() {
        assert_eq!(year_from_period("1995-03"), Ok(1995));
    }

    #[test]
    fn rejects_non_numeric_prefix() {
        assert!(year_from_period("Q1-1970").is_err());
        assert!(year_from_period("").is_err());
        assert!(year_from_period("n/a").is_err());
    }

    #[test]
    fn rejects_overflowing_prefix() {
        assert!(year_from_period("99999999999-Q1").is_err());
    }
}

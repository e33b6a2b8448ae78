//! Dashboard aggregates over all submissions.

use serde::Serialize;
use utoipa::ToSchema;

/// Currency suffixes accepted on `amount_donated`.
const CURRENCIES: [&str; 4] = ["ETB", "BIRR", "USD", "EUR"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    /// All submissions.
    pub total: i64,
    /// Submissions an admin has verified.
    pub verified: i64,
    /// `total - verified`.
    pub pending: i64,
    /// Sum of verified amounts, rounded to cents.
    pub total_amount: f64,
}

impl DashboardStats {
    /// Build aggregates from the submission count and the raw amount strings
    /// of the verified submissions. Amounts that do not parse are skipped.
    pub fn tally<S: AsRef<str>>(total: i64, verified_amounts: &[S]) -> Self {
        let verified = verified_amounts.len() as i64;
        let sum: f64 = verified_amounts
            .iter()
            .filter_map(|a| parse_amount(a.as_ref()))
            .sum();

        Self {
            total,
            verified,
            pending: total - verified,
            total_amount: (sum * 100.0).round() / 100.0,
        }
    }
}

/// Parse a stored amount such as `"1,000.50 ETB"` into a number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let upper = raw.trim().to_ascii_uppercase();
    let number = CURRENCIES
        .iter()
        .find_map(|c| upper.strip_suffix(c))
        .unwrap_or(&upper)
        .trim_end();
    number
        .replace(',', "")
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_handles_separators_and_currency() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount("1,000 ETB"), Some(1000.0));
        assert_eq!(parse_amount("100.50birr"), Some(100.5));
        assert_eq!(parse_amount(" 12,345.67 usd "), Some(12345.67));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("a lot"), None);
        assert_eq!(parse_amount("ETB"), None);
    }

    #[test]
    fn tally_sums_only_parseable_amounts() {
        let stats = DashboardStats::tally(5, &["100 ETB", "1,000.25", "n/a"]);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.verified, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.total_amount, 1100.25);
    }

    #[test]
    fn tally_rounds_to_cents() {
        let stats = DashboardStats::tally(2, &["0.1", "0.2"]);
        assert_eq!(stats.total_amount, 0.3);
    }

    #[test]
    fn tally_of_nothing_is_zero() {
        let stats = DashboardStats::tally::<&str>(0, &[]);
        assert_eq!(stats, DashboardStats { total: 0, verified: 0, pending: 0, total_amount: 0.0 });
    }
}

//! Monetary types for rental prices.
//!
//! All money is carried as integer minor currency units (pence) so that
//! cross-provider comparisons never accumulate float drift. Percentage
//! arithmetic goes through [`rust_decimal::Decimal`] and only at the edges.

use rust_decimal::Decimal;

/// A price in minor currency units (pence).
pub type Pence = i64;

/// Percentage of `part` relative to `whole`, as a Decimal.
///
/// Returns zero when `whole` is zero; the caller decides whether that is a
/// data issue.
pub fn percent_of(part: Pence, whole: Pence) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)
}

/// Format pence as a pounds string for operator-facing output, e.g. `£349.50`.
pub fn format_pounds(pence: Pence) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let abs = pence.unsigned_abs();
    format!("{sign}\u{a3}{}.{:02}", abs / 100, abs % 100)
}

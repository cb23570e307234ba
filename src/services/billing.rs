//! Billing computation
//!
//! One pure function shared by the three billable moments: booking creation,
//! extension (over the added span only) and sensor-triggered completion.
//! Identical inputs produce identical results at every call site.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Result of pricing one time span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub duration_minutes: i64,
    pub billable_hours: i64,
    pub amount: Decimal,
}

/// Price the span `(start, end)` at `hourly_rate`.
///
/// Duration truncates to whole minutes; any started hour bills in full
/// (no free minutes, no tiered pricing). The amount carries 2 decimal
/// places with half-up rounding.
pub fn quote(start: DateTime<Utc>, end: DateTime<Utc>, hourly_rate: Decimal) -> Quote {
    let seconds = (end - start).num_seconds().max(0);
    let duration_minutes = seconds / 60;
    let billable_hours = (duration_minutes + 59) / 60;
    let amount = (Decimal::from(billable_hours) * hourly_rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Quote {
        duration_minutes,
        billable_hours,
        amount,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn rate() -> Decimal {
        Decimal::new(1000, 2) // 10.00 per hour
    }

    fn span(minutes: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        (start, start + Duration::minutes(minutes))
    }

    #[test]
    fn test_round_up_to_started_hour() {
        for (minutes, hours) in [(60, 1), (61, 2), (119, 2), (120, 2), (121, 3)] {
            let (start, end) = span(minutes);
            let q = quote(start, end, rate());
            assert_eq!(q.duration_minutes, minutes);
            assert_eq!(q.billable_hours, hours, "{} minutes", minutes);
            assert_eq!(q.amount, Decimal::from(hours) * rate());
        }
    }

    #[test]
    fn test_duration_truncates_seconds() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let end = start + Duration::minutes(61) + Duration::seconds(59);
        let q = quote(start, end, rate());
        assert_eq!(q.duration_minutes, 61);
        assert_eq!(q.billable_hours, 2);
    }

    #[test]
    fn test_identical_inputs_identical_results() {
        let (start, end) = span(95);
        let first = quote(start, end, rate());
        let second = quote(start, end, rate());
        let third = quote(start, end, rate());
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_rate_is_not_hardcoded() {
        let (start, end) = span(90);
        let q = quote(start, end, Decimal::new(2550, 2)); // 25.50 per hour
        assert_eq!(q.billable_hours, 2);
        assert_eq!(q.amount, Decimal::new(5100, 2));
    }

    #[test]
    fn test_amount_is_two_decimal_places() {
        let (start, end) = span(61);
        let q = quote(start, end, Decimal::new(333, 2)); // 3.33 per hour
        assert_eq!(q.amount, Decimal::new(666, 2));
        assert_eq!(q.amount.scale(), 2);
    }
}

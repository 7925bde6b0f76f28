//! Date token resolution.
//!
//! Accepted inputs, in priority order: the literal keywords `Today` and
//! `Yesterday`, `DD/MM` (year taken from the reference date), `DD/MM/YYYY`,
//! and ISO `YYYY-MM-DD`. Month values outside 1-12 and days invalid for the
//! month (leap-year February included) are rejected, never clamped.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};

/// Resolves a date token against a reference date (normally today).
pub fn resolve(token: &str, reference: NaiveDate) -> Result<NaiveDate> {
    let trimmed = token.trim();

    if trimmed.eq_ignore_ascii_case("today") {
        return Ok(reference);
    }
    if trimmed.eq_ignore_ascii_case("yesterday") {
        return reference.pred_opt().ok_or_else(|| invalid(trimmed));
    }

    if trimmed.contains('/') {
        return resolve_slashed(trimmed, reference);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid(trimmed))
}

/// `DD/MM` and `DD/MM/YYYY` forms. Years must be 4 digits; month and day
/// ranges are checked by the calendar itself via `from_ymd_opt`.
fn resolve_slashed(token: &str, reference: NaiveDate) -> Result<NaiveDate> {
    let parts: Vec<&str> = token.split('/').collect();
    let (day_text, month_text, year) = match parts.as_slice() {
        [day, month] => (*day, *month, reference.year()),
        [day, month, year] => {
            if year.len() != 4 {
                return Err(invalid(token));
            }
            let year: i32 = year.parse().map_err(|_| invalid(token))?;
            (*day, *month, year)
        }
        _ => return Err(invalid(token)),
    };

    let day: u32 = day_text.parse().map_err(|_| invalid(token))?;
    let month: u32 = month_text.parse().map_err(|_| invalid(token))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(token))
}

fn invalid(token: &str) -> Error {
    Error::InvalidDate {
        input: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 22).unwrap()
    }

    #[test]
    fn keywords_resolve_relative_to_reference() {
        assert_eq!(resolve("Today", reference()).unwrap(), reference());
        assert_eq!(resolve("today", reference()).unwrap(), reference());
        assert_eq!(
            resolve("Yesterday", reference()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 21).unwrap()
        );
    }

    #[test]
    fn day_month_takes_year_from_reference() {
        assert_eq!(
            resolve("22/02", reference()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 22).unwrap()
        );
    }

    #[test]
    fn explicit_forms_round_trip_to_the_same_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 22).unwrap();
        assert_eq!(resolve("22/02/2025", reference()).unwrap(), expected);
        assert_eq!(resolve("2025-02-22", reference()).unwrap(), expected);
    }

    #[test]
    fn invalid_months_and_days_are_rejected_not_clamped() {
        assert!(resolve("01/13", reference()).is_err());
        assert!(resolve("32/01", reference()).is_err());
        assert!(resolve("31/04/2025", reference()).is_err());
        assert!(resolve("00/05", reference()).is_err());
    }

    #[test]
    fn february_follows_leap_year_rules() {
        assert!(resolve("29/02/2024", reference()).is_ok());
        assert!(resolve("29/02/2025", reference()).is_err());
        assert!(resolve("2024-02-29", reference()).is_ok());
        assert!(resolve("2025-02-29", reference()).is_err());
        // 1900 is not a leap year, 2000 is
        assert!(resolve("29/02/1900", reference()).is_err());
        assert!(resolve("29/02/2000", reference()).is_ok());
    }

    #[test]
    fn two_digit_years_are_rejected() {
        assert!(resolve("22/02/25", reference()).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        for bad in ["", "someday", "11-22", "22/02/2025/1", "a/b", "2025-2"] {
            assert!(resolve(bad, reference()).is_err(), "accepted {bad:?}");
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster period calendar.
//!
//! Fleet scheduling runs on fixed 28-day roster periods, 13 per roster
//! year, numbered `RP01/2025` through `RP13/2025` and continuing into the
//! next year. Periods are contiguous and non-overlapping.
//!
//! ## Invariants
//!
//! - Every period spans exactly 28 days (`end - start == 27 days`)
//! - Period N's end date is the day before period N+1's start date
//! - The calendar is bounded: dates outside the configured horizon have
//!   no period, which the planning engine reports as infeasibility
//!   rather than treating as an error

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Duration};
use time::macros::date;

/// Days per roster period (inclusive of both boundary dates).
pub const PERIOD_DAYS: i64 = 28;

/// Roster periods per roster year.
pub const PERIODS_PER_YEAR: i64 = 13;

/// A single 28-day roster period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPeriod {
    /// The period code (e.g. "RP12/2025").
    pub code: String,
    /// First date of the period.
    pub start: Date,
    /// Last date of the period (27 days after `start`).
    pub end: Date,
}

impl RosterPeriod {
    /// Returns true if the date falls within this period.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Generates and maps roster periods from an anchored epoch.
///
/// The epoch is the first day of the first registered period; the
/// horizon bounds how many consecutive periods the calendar covers.
/// Both are explicit injected configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterCalendar {
    /// First day of the first registered period.
    epoch: Date,
    /// Number of consecutive 28-day periods the calendar covers.
    horizon_periods: u32,
    /// Last date covered by the calendar.
    last: Date,
}

impl RosterCalendar {
    /// Creates a calendar anchored at `epoch` covering `horizon_periods`
    /// consecutive periods.
    ///
    /// # Arguments
    ///
    /// * `epoch` - First day of the first period (also the start of
    ///   period RP01 of the epoch's year)
    /// * `horizon_periods` - How many consecutive periods to register
    ///
    /// # Errors
    ///
    /// Returns an error if `horizon_periods` is 0 or the horizon
    /// overflows the date range.
    pub fn new(epoch: Date, horizon_periods: u32) -> Result<Self, DomainError> {
        if horizon_periods == 0 {
            return Err(DomainError::InvalidCalendarHorizon {
                periods: horizon_periods,
            });
        }
        let span_days: i64 = i64::from(horizon_periods) * PERIOD_DAYS - 1;
        let last: Date = epoch.checked_add(Duration::days(span_days)).ok_or_else(|| {
            DomainError::DateArithmeticOverflow {
                operation: String::from("computing calendar horizon end"),
            }
        })?;
        Ok(Self {
            epoch,
            horizon_periods,
            last,
        })
    }

    /// Returns the first date covered by the calendar.
    #[must_use]
    pub const fn first_date(&self) -> Date {
        self.epoch
    }

    /// Returns the last date covered by the calendar.
    #[must_use]
    pub const fn last_date(&self) -> Date {
        self.last
    }

    /// Returns the number of registered periods.
    #[must_use]
    pub const fn horizon_periods(&self) -> u32 {
        self.horizon_periods
    }

    /// Maps a date to the 28-day period containing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the date falls outside the calendar's
    /// registered range.
    pub fn period_containing(&self, date: Date) -> Result<RosterPeriod, DomainError> {
        if date < self.epoch || date > self.last {
            return Err(DomainError::DateOutsideCalendar {
                date,
                first: self.epoch,
                last: self.last,
            });
        }
        let index: i64 = (date - self.epoch).whole_days() / PERIOD_DAYS;
        self.period_at(index)
    }

    /// Enumerates the periods overlapping `[start, end]`, in
    /// chronological order, de-duplicated by period code.
    ///
    /// The walk advances in fixed 28-day increments from `start`; the
    /// period containing `end` is always appended before de-duplication,
    /// since the final increment can step past a period that begins
    /// inside the last 27 days of the range.
    ///
    /// Returns an empty sequence when `start > end` or when no
    /// registered period overlaps the span.
    #[must_use]
    pub fn periods_overlapping(&self, start: Date, end: Date) -> Vec<RosterPeriod> {
        let mut periods: Vec<RosterPeriod> = Vec::new();
        if start > end {
            return periods;
        }

        let mut cursor: Date = start;
        while cursor <= end {
            if let Ok(period) = self.period_containing(cursor) {
                push_unique(&mut periods, period);
            }
            match cursor.checked_add(Duration::days(PERIOD_DAYS)) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        if let Ok(period) = self.period_containing(end) {
            push_unique(&mut periods, period);
        }

        periods
    }

    /// Builds the period at a 0-based index from the epoch.
    fn period_at(&self, index: i64) -> Result<RosterPeriod, DomainError> {
        let start: Date = self
            .epoch
            .checked_add(Duration::days(index * PERIOD_DAYS))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("computing start of period index {index}"),
            })?;
        let end: Date = start.checked_add(Duration::days(PERIOD_DAYS - 1)).ok_or_else(|| {
            DomainError::DateArithmeticOverflow {
                operation: format!("computing end of period index {index}"),
            }
        })?;

        let number: i64 = index.rem_euclid(PERIODS_PER_YEAR) + 1;
        let year: i64 = i64::from(self.epoch.year()) + index.div_euclid(PERIODS_PER_YEAR);

        Ok(RosterPeriod {
            code: format!("RP{number:02}/{year}"),
            start,
            end,
        })
    }
}

impl Default for RosterCalendar {
    /// The standard calendar: anchored at 2025-01-04 (start of
    /// RP01/2025), covering three roster years of periods.
    fn default() -> Self {
        Self {
            epoch: date!(2025 - 01 - 04),
            horizon_periods: 39,
            last: date!(2027 - 12 - 31),
        }
    }
}

/// Appends a period unless one with the same code is already present.
fn push_unique(periods: &mut Vec<RosterPeriod>, period: RosterPeriod) {
    if periods.iter().all(|p| p.code != period.code) {
        periods.push(period);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn calendar() -> RosterCalendar {
        RosterCalendar::default()
    }

    #[test]
    fn test_default_matches_explicit_construction() {
        let explicit: RosterCalendar = RosterCalendar::new(date!(2025 - 01 - 04), 39).unwrap();
        assert_eq!(explicit, RosterCalendar::default());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let result = RosterCalendar::new(date!(2025 - 01 - 04), 0);
        assert_eq!(
            result,
            Err(DomainError::InvalidCalendarHorizon { periods: 0 })
        );
    }

    #[test]
    fn test_first_period_code_and_bounds() {
        let period: RosterPeriod = calendar().period_containing(date!(2025 - 01 - 04)).unwrap();
        assert_eq!(period.code, "RP01/2025");
        assert_eq!(period.start, date!(2025 - 01 - 04));
        assert_eq!(period.end, date!(2025 - 01 - 31));
    }

    #[test]
    fn test_period_spans_28_days() {
        let period: RosterPeriod = calendar().period_containing(date!(2026 - 03 - 15)).unwrap();
        assert_eq!((period.end - period.start).whole_days(), 27);
    }

    #[test]
    fn test_periods_are_contiguous() {
        let cal: RosterCalendar = calendar();
        let first: RosterPeriod = cal.period_containing(date!(2025 - 01 - 04)).unwrap();
        let next: RosterPeriod = cal
            .period_containing(first.end.next_day().unwrap())
            .unwrap();
        assert_eq!(next.start, first.end.next_day().unwrap());
        assert_ne!(next.code, first.code);
    }

    #[test]
    fn test_boundary_dates_map_to_same_period() {
        let cal: RosterCalendar = calendar();
        let period: RosterPeriod = cal.period_containing(date!(2025 - 02 - 01)).unwrap();
        assert_eq!(
            cal.period_containing(period.start).unwrap().code,
            period.code
        );
        assert_eq!(cal.period_containing(period.end).unwrap().code, period.code);
    }

    #[test]
    fn test_period_numbering_wraps_into_next_year() {
        let cal: RosterCalendar = calendar();
        // Period index 12 is RP13/2025; index 13 rolls to RP01/2026.
        let last_of_year: RosterPeriod = cal
            .period_containing(date!(2025 - 01 - 04) + Duration::days(12 * PERIOD_DAYS))
            .unwrap();
        assert_eq!(last_of_year.code, "RP13/2025");
        let first_of_next: RosterPeriod = cal
            .period_containing(last_of_year.end.next_day().unwrap())
            .unwrap();
        assert_eq!(first_of_next.code, "RP01/2026");
    }

    #[test]
    fn test_date_before_epoch_is_outside_calendar() {
        let result = calendar().period_containing(date!(2025 - 01 - 03));
        assert!(matches!(
            result,
            Err(DomainError::DateOutsideCalendar { .. })
        ));
    }

    #[test]
    fn test_date_past_horizon_is_outside_calendar() {
        let result = calendar().period_containing(date!(2028 - 01 - 01));
        assert!(matches!(
            result,
            Err(DomainError::DateOutsideCalendar { .. })
        ));
    }

    #[test]
    fn test_single_day_range_returns_one_period() {
        let periods: Vec<RosterPeriod> =
            calendar().periods_overlapping(date!(2026 - 01 - 10), date!(2026 - 01 - 10));
        assert_eq!(periods.len(), 1);
        assert!(periods[0].contains(date!(2026 - 01 - 10)));
    }

    #[test]
    fn test_short_range_straddling_boundary_returns_both_periods() {
        let cal: RosterCalendar = calendar();
        let first: RosterPeriod = cal.period_containing(date!(2025 - 06 - 01)).unwrap();
        // Two-day range: last day of one period, first day of the next.
        // The fixed-increment walk alone would step past the second.
        let start: Date = first.end;
        let end: Date = first.end.next_day().unwrap();
        let periods: Vec<RosterPeriod> = cal.periods_overlapping(start, end);
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].code, first.code);
        assert!(periods[1].contains(end));
    }

    #[test]
    fn test_no_duplicate_codes_over_long_range() {
        let periods: Vec<RosterPeriod> =
            calendar().periods_overlapping(date!(2025 - 02 - 01), date!(2026 - 02 - 01));
        let mut codes: Vec<&str> = periods.iter().map(|p| p.code.as_str()).collect();
        let total: usize = codes.len();
        codes.dedup();
        assert_eq!(codes.len(), total);
        assert!(total >= 13);
    }

    #[test]
    fn test_inverted_range_returns_empty() {
        let periods: Vec<RosterPeriod> =
            calendar().periods_overlapping(date!(2026 - 02 - 01), date!(2026 - 01 - 01));
        assert!(periods.is_empty());
    }

    #[test]
    fn test_range_beyond_horizon_returns_empty() {
        let periods: Vec<RosterPeriod> =
            calendar().periods_overlapping(date!(2030 - 01 - 01), date!(2030 - 03 - 01));
        assert!(periods.is_empty());
    }

    #[test]
    fn test_range_partially_before_epoch_returns_registered_periods_only() {
        let periods: Vec<RosterPeriod> =
            calendar().periods_overlapping(date!(2024 - 12 - 01), date!(2025 - 01 - 10));
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].code, "RP01/2025");
    }

    #[test]
    fn test_ninety_day_range_is_chronological() {
        let periods: Vec<RosterPeriod> =
            calendar().periods_overlapping(date!(2025 - 12 - 15), date!(2026 - 03 - 15));
        assert!(periods.len() >= 4);
        for pair in periods.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }
}

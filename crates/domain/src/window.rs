// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Renewal window calculation.
//!
//! A certification may be renewed during its grace period: the window
//! `[expiry - grace_days, expiry]`. A zero grace period yields a
//! single-day window on the expiry date itself.

use crate::error::DomainError;
use crate::grace::GracePeriodTable;
use crate::types::CertCategory;
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

/// The feasible date range for renewing one certification.
///
/// Invariant: `start <= end`, with `end` equal to the expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalWindow {
    /// Earliest eligible renewal date.
    pub start: Date,
    /// Latest eligible renewal date (the expiry date).
    pub end: Date,
}

impl RenewalWindow {
    /// Returns true if the date falls within the window.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && date <= self.end
    }

    /// Clamps a date into the window.
    ///
    /// Dates before `start` snap to `start`; dates after `end` snap to
    /// `end`; dates already inside are returned unchanged.
    #[must_use]
    pub fn clamp(&self, date: Date) -> Date {
        if date < self.start {
            self.start
        } else if date > self.end {
            self.end
        } else {
            date
        }
    }
}

/// Computes the renewal window for a certification.
///
/// # Arguments
///
/// * `expiry_date` - The certification's current expiry date
/// * `category` - The certification category
/// * `grace_periods` - The grace period configuration
///
/// # Errors
///
/// Returns an error only if subtracting the grace period overflows the
/// representable date range.
pub fn compute_renewal_window(
    expiry_date: Date,
    category: &CertCategory,
    grace_periods: &GracePeriodTable,
) -> Result<RenewalWindow, DomainError> {
    let grace_days: u16 = grace_periods.grace_days(category);
    let start: Date = expiry_date
        .checked_sub(Duration::days(i64::from(grace_days)))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("subtracting {grace_days} grace days from {expiry_date}"),
        })?;
    Ok(RenewalWindow {
        start,
        end: expiry_date,
    })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod calendar;
mod error;
mod grace;
mod priority;
mod types;
mod window;

pub use calendar::{PERIOD_DAYS, PERIODS_PER_YEAR, RosterCalendar, RosterPeriod};
pub use error::DomainError;
pub use grace::GracePeriodTable;
pub use priority::priority_score;
pub use types::{CertCategory, CertificationDue, PilotId, PlanStatus, RenewalPlanEntry};
pub use window::{RenewalWindow, compute_renewal_window};

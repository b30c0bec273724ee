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

mod allocate;
mod error;
mod state;
mod summary;

#[cfg(test)]
mod tests;

pub use allocate::{Allocator, PlanOutcome, SkipReason, SkippedCertification};
pub use error::CoreError;
pub use state::{AllocationState, CapacityDirectory};
pub use summary::{
    CategoryUtilization, PeriodCapacitySummary, PlanSummary, period_capacity_summary,
    summarize_plan,
};

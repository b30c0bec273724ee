// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Allocator, CapacityDirectory};
use fleet_cert_domain::{
    CertCategory, CertificationDue, GracePeriodTable, PilotId, RosterCalendar,
};
use time::Date;
use time::macros::date;

/// The reference "today" for urgency scoring in tests.
pub const TODAY: Date = date!(2025 - 11 - 01);

pub fn make_allocator() -> Allocator {
    Allocator::new(GracePeriodTable::default(), RosterCalendar::default(), TODAY)
}

pub fn make_due(pilot: &str, category: CertCategory, expiry: Date) -> CertificationDue {
    CertificationDue::new(PilotId::new(pilot), category, expiry)
}

/// Builds a directory granting `max_count` capacity for `category` in
/// each listed period.
pub fn capacity_for(codes: &[&str], category: &CertCategory, max_count: u32) -> CapacityDirectory {
    let mut directory: CapacityDirectory = CapacityDirectory::new();
    for code in codes {
        directory.set(code, category.clone(), max_count);
    }
    directory
}

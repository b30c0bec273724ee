// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Grace period configuration.
//!
//! Each certification category has a grace period: the number of days
//! before expiry during which renewal may occur without being considered
//! early. The table is explicit injected configuration, never ambient
//! state, so alternate schemes can be supplied in tests and per operator.

use crate::types::CertCategory;
use std::collections::HashMap;

/// Mapping from certification category to grace period days.
///
/// Lookups are total: an unconfigured category yields 0 days (a single-day
/// renewal window on the expiry date itself). Callers that need to surface
/// configuration gaps check `is_configured` and report the category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GracePeriodTable {
    entries: HashMap<CertCategory, u16>,
}

impl GracePeriodTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Sets the grace period for a category, replacing any existing entry.
    pub fn set(&mut self, category: CertCategory, days: u16) {
        self.entries.insert(category, days);
    }

    /// Returns the grace period in days for a category.
    ///
    /// Returns 0 for unconfigured categories.
    #[must_use]
    pub fn grace_days(&self, category: &CertCategory) -> u16 {
        self.entries.get(category).copied().unwrap_or(0)
    }

    /// Returns true if the category has an explicit entry.
    #[must_use]
    pub fn is_configured(&self, category: &CertCategory) -> bool {
        self.entries.contains_key(category)
    }

    /// Returns the number of configured categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no categories are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GracePeriodTable {
    /// The production grace period table.
    ///
    /// Flight checks carry a 90-day grace period, recurrent ground
    /// training 60 days. Documents have no grace period: they are
    /// renewable only on the expiry date itself.
    fn default() -> Self {
        let mut table: Self = Self::new();
        table.set(CertCategory::ProficiencyCheck, 90);
        table.set(CertCategory::LineCheck, 90);
        table.set(CertCategory::InstrumentRating, 90);
        table.set(CertCategory::Medical, 60);
        table.set(CertCategory::DangerousGoods, 60);
        table.set(CertCategory::CrewResourceManagement, 60);
        table.set(CertCategory::SecurityAwareness, 60);
        table.set(CertCategory::IdCard, 0);
        table.set(CertCategory::TravelDocument, 0);
        table
    }
}

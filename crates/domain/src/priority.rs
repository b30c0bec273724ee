// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Urgency scoring for due certifications.

use time::Date;

/// Scores a certification's urgency on a 0-10 scale from days until
/// expiry.
///
/// Already-expired certifications score 10. Within 30 days scores 9,
/// within 60 scores 7, within 90 scores 5. Beyond 90 days the score
/// tapers as `max(1, floor(10 - days/30))`, bottoming out at 1 for
/// distant expiries.
///
/// Pure and total: identical arguments always produce identical scores.
#[must_use]
pub fn priority_score(expiry_date: Date, today: Date) -> u8 {
    let days_until: i64 = (expiry_date - today).whole_days();
    if days_until < 0 {
        10
    } else if days_until <= 30 {
        9
    } else if days_until <= 60 {
        7
    } else if days_until <= 90 {
        5
    } else {
        // floor(10 - days/30) for days > 90, clamped to at least 1.
        let tapered: i64 = 10 - (days_until as u64).div_ceil(30) as i64;
        u8::try_from(tapered.max(1)).unwrap_or(1)
    }
}

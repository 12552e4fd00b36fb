//! Slot generation: turning an admin-supplied window into hourly candidates.
//!
//! The planning step here is pure; persistence and the conflict check
//! against existing slots happen in the engine, which owns the repository.

use crate::error::{BookingError, Result};
use chrono::{DateTime, Duration, Timelike, Utc};

/// Generation policy: every offered slot is exactly one hour.
#[must_use]
pub fn slot_duration() -> Duration {
    Duration::hours(1)
}

/// A planned (not yet persisted) slot interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCandidate {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end, always `start + slot_duration()`.
    pub end: DateTime<Utc>,
}

/// Round a timestamp up to the next full hour boundary.
///
/// A timestamp already on the boundary is returned unchanged.
fn round_up_to_hour(t: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0 {
        return Ok(t);
    }
    let secs = t.timestamp();
    let past_boundary = secs.rem_euclid(3600);
    DateTime::from_timestamp(secs - past_boundary + 3600, 0)
        .ok_or_else(|| BookingError::Validation("window start out of range".to_string()))
}

/// Plan the hourly candidates for `[window_start, window_end)`.
///
/// The start is rounded up to the next full hour; candidates are emitted in
/// fixed one-hour increments and none extends past `window_end`.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] if `window_start >= window_end` or
/// the window yields zero candidates (shorter than one full hour after
/// rounding).
pub fn plan_window(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Vec<SlotCandidate>> {
    if window_start >= window_end {
        return Err(BookingError::Validation(
            "window start must be before window end".to_string(),
        ));
    }

    let mut candidates = Vec::new();
    let mut cursor = round_up_to_hour(window_start)?;
    while cursor + slot_duration() <= window_end {
        candidates.push(SlotCandidate {
            start: cursor,
            end: cursor + slot_duration(),
        });
        cursor += slot_duration();
    }

    if candidates.is_empty() {
        return Err(BookingError::Validation(format!(
            "window {window_start} to {window_end} is shorter than one full hour after rounding"
        )));
    }

    Ok(candidates)
}

/// Pairwise interval-overlap test between an existing slot and a candidate.
///
/// Covers the three arrangements: existing straddles the candidate's start,
/// existing straddles the candidate's end, existing fully inside.
#[must_use]
pub fn intervals_overlap(
    existing_start: DateTime<Utc>,
    existing_end: DateTime<Utc>,
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
) -> bool {
    (existing_start <= candidate_start && existing_end > candidate_start)
        || (existing_start < candidate_end && existing_end >= candidate_end)
        || (existing_start >= candidate_start && existing_end <= candidate_end)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn rounds_partial_start_up_and_drops_the_remainder() {
        // 09:15 window start is never offered; the first slot is [10:00, 11:00)
        let candidates =
            plan_window(at(2025, 6, 1, 9, 15, 0), at(2025, 6, 1, 11, 0, 0)).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start, at(2025, 6, 1, 10, 0, 0));
        assert_eq!(candidates[0].end, at(2025, 6, 1, 11, 0, 0));
    }

    #[test]
    fn aligned_start_is_kept() {
        let candidates =
            plan_window(at(2025, 6, 1, 9, 0, 0), at(2025, 6, 1, 12, 0, 0)).unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].start, at(2025, 6, 1, 9, 0, 0));
    }

    #[test]
    fn window_shorter_than_an_hour_is_rejected() {
        let err = plan_window(at(2025, 6, 1, 9, 15, 0), at(2025, 6, 1, 10, 30, 0)).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = plan_window(at(2025, 6, 1, 11, 0, 0), at(2025, 6, 1, 9, 0, 0)).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn overlap_test_covers_all_arrangements() {
        let c_start = at(2025, 6, 1, 10, 0, 0);
        let c_end = at(2025, 6, 1, 11, 0, 0);
        // straddles start
        assert!(intervals_overlap(at(2025, 6, 1, 9, 30, 0), at(2025, 6, 1, 10, 30, 0), c_start, c_end));
        // straddles end
        assert!(intervals_overlap(at(2025, 6, 1, 10, 30, 0), at(2025, 6, 1, 11, 30, 0), c_start, c_end));
        // fully inside
        assert!(intervals_overlap(at(2025, 6, 1, 10, 15, 0), at(2025, 6, 1, 10, 45, 0), c_start, c_end));
        // identical
        assert!(intervals_overlap(c_start, c_end, c_start, c_end));
        // touching edges is not overlap
        assert!(!intervals_overlap(at(2025, 6, 1, 9, 0, 0), c_start, c_start, c_end));
        assert!(!intervals_overlap(c_end, at(2025, 6, 1, 12, 0, 0), c_start, c_end));
    }

    proptest! {
        #[test]
        fn planned_slots_are_hourly_contiguous_and_sorted(
            start_offset_mins in 0i64..10_000,
            window_mins in 0i64..10_000,
        ) {
            let base = at(2025, 1, 1, 0, 0, 0);
            let window_start = base + Duration::minutes(start_offset_mins);
            let window_end = window_start + Duration::minutes(window_mins);

            match plan_window(window_start, window_end) {
                Ok(candidates) => {
                    for pair in candidates.windows(2) {
                        prop_assert_eq!(pair[0].end, pair[1].start);
                    }
                    for c in &candidates {
                        prop_assert_eq!(c.end - c.start, slot_duration());
                        prop_assert!(c.start >= window_start);
                        prop_assert!(c.end <= window_end);
                        prop_assert_eq!(c.start.minute(), 0);
                        prop_assert_eq!(c.start.second(), 0);
                    }
                }
                Err(err) => {
                    // Only short or inverted windows may fail
                    prop_assert!(matches!(err, BookingError::Validation(_)));
                    prop_assert!(window_mins < 120);
                }
            }
        }
    }
}

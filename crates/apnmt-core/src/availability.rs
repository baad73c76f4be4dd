use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Appointment;

/// Whether the half-open slot [candidate_start, candidate_end) is free of
/// conflicts among the given appointments. An appointment whose id equals
/// `exclude_id` is skipped so an update never collides with itself.
///
/// Two half-open intervals conflict iff
/// `existing.start_at < candidate_end && existing.end_at > candidate_start`;
/// back-to-back slots share a boundary and do not conflict.
pub fn is_slot_available(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    existing: &[Appointment],
    exclude_id: Option<Uuid>,
) -> bool {
    existing
        .iter()
        .filter(|appointment| exclude_id != Some(appointment.id))
        .all(|appointment| {
            appointment.start_at >= candidate_end || appointment.end_at <= candidate_start
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 12, 24, hour, minute, 0).unwrap()
    }

    fn appointment(start: DateTime<Utc>, end: DateTime<Utc>) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            start_at: start,
            end_at: end,
            organization_id: 1,
            employee_id: 1,
            customer_id: None,
        }
    }

    #[test]
    fn empty_calendar_is_always_available() {
        assert!(is_slot_available(at(10, 0), at(11, 0), &[], None));
    }

    #[test]
    fn candidate_after_existing_is_available() {
        let existing = [appointment(at(10, 0), at(11, 0))];
        assert!(is_slot_available(at(11, 0), at(12, 0), &existing, None));
    }

    #[test]
    fn candidate_before_existing_is_available() {
        let existing = [appointment(at(10, 0), at(11, 0))];
        assert!(is_slot_available(at(9, 0), at(10, 0), &existing, None));
    }

    #[test]
    fn contained_candidate_conflicts() {
        let existing = [appointment(at(10, 0), at(11, 0))];
        assert!(!is_slot_available(at(10, 30), at(10, 45), &existing, None));
    }

    #[test]
    fn candidate_overlapping_start_conflicts() {
        let existing = [appointment(at(10, 0), at(11, 0))];
        assert!(!is_slot_available(at(9, 30), at(10, 30), &existing, None));
    }

    #[test]
    fn candidate_overlapping_end_conflicts() {
        let existing = [appointment(at(10, 0), at(11, 0))];
        assert!(!is_slot_available(at(10, 30), at(11, 30), &existing, None));
    }

    #[test]
    fn candidate_spanning_existing_conflicts() {
        let existing = [appointment(at(10, 0), at(11, 0))];
        assert!(!is_slot_available(at(9, 30), at(11, 30), &existing, None));
    }

    #[test]
    fn exact_match_conflicts() {
        let existing = [appointment(at(10, 0), at(11, 0))];
        assert!(!is_slot_available(at(10, 0), at(11, 0), &existing, None));
    }

    #[test]
    fn excluded_appointment_is_ignored() {
        let booked = appointment(at(10, 0), at(11, 0));
        let id = booked.id;
        let existing = [booked];

        assert!(is_slot_available(at(10, 0), at(11, 0), &existing, Some(id)));
        assert!(is_slot_available(at(10, 30), at(11, 30), &existing, Some(id)));
    }

    #[test]
    fn exclusion_does_not_hide_other_appointments() {
        let first = appointment(at(10, 0), at(11, 0));
        let second = appointment(at(11, 0), at(12, 0));
        let exclude = first.id;
        let existing = [first, second];

        assert!(!is_slot_available(at(11, 30), at(12, 30), &existing, Some(exclude)));
    }
}

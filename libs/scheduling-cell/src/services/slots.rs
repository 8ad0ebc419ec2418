use chrono::{Duration, NaiveDate, NaiveTime};

use crate::models::WeeklySchedule;

/// The fixed universe of bookable time-of-day points: a 30-minute grid from
/// 07:00 to 19:30 inclusive, shared by every doctor.
pub struct SlotGrid;

impl SlotGrid {
    pub const FIRST_SLOT: (u32, u32) = (7, 0);
    pub const LAST_SLOT: (u32, u32) = (19, 30);
    pub const CADENCE_MINUTES: i64 = 30;

    /// All grid points, in chronological order.
    pub fn all_slots() -> Vec<NaiveTime> {
        let first = NaiveTime::from_hms_opt(Self::FIRST_SLOT.0, Self::FIRST_SLOT.1, 0).unwrap();
        let last = NaiveTime::from_hms_opt(Self::LAST_SLOT.0, Self::LAST_SLOT.1, 0).unwrap();

        let mut slots = Vec::new();
        let mut current = first;
        while current <= last {
            slots.push(current);
            current = current + Duration::minutes(Self::CADENCE_MINUTES);
        }
        slots
    }

    /// A doctor's working slots on a calendar date: empty when the weekday is
    /// not in the schedule's working days (not an error), otherwise the grid
    /// intersected with `[start, end)`. Deterministic for a given
    /// (schedule, date).
    pub fn working_slots(schedule: &WeeklySchedule, date: NaiveDate) -> Vec<NaiveTime> {
        if !schedule.works_on(date) {
            return Vec::new();
        }
        Self::all_slots()
            .into_iter()
            .filter(|slot| schedule.contains(*slot))
            .collect()
    }
}

mod common;

use chrono::Duration;
use scheduling_cell::models::WeeklySchedule;
use scheduling_cell::services::{ScheduleCatalog, SlotGrid};

use common::*;

#[test]
fn all_slots_cover_the_grid_in_order() {
    let slots = SlotGrid::all_slots();

    assert_eq!(slots.len(), 26);
    assert_eq!(slots[0], time(7, 0));
    assert_eq!(*slots.last().unwrap(), time(19, 30));
    for pair in slots.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::minutes(30));
    }
}

#[test]
fn working_slots_are_a_subset_of_the_grid() {
    let catalog = ScheduleCatalog::hospital_default();
    let grid = SlotGrid::all_slots();
    let doctors = ["Dr. Harsh Sharma", "Dr. Rajesh Kumar", "Dr. Nisha Patel"];

    // A couple of weeks' worth of dates covers every weekday.
    for doctor in doctors {
        let schedule = catalog.schedule_for(doctor);
        for offset in 0..14 {
            let day = date(TODAY) + Duration::days(offset);
            for slot in SlotGrid::working_slots(&schedule, day) {
                assert!(grid.contains(&slot));
                assert!(schedule.contains(slot));
            }
        }
    }
}

#[test]
fn working_slots_empty_on_non_working_day() {
    let catalog = ScheduleCatalog::hospital_default();
    // Dr. Priyanka Sharma works Wednesday and Friday only.
    let schedule = catalog.schedule_for("Dr. Priyanka Sharma");

    assert!(SlotGrid::working_slots(&schedule, date(TODAY)).is_empty()); // Monday
    assert!(!SlotGrid::working_slots(&schedule, date("2026-03-04")).is_empty()); // Wednesday
}

#[test]
fn unknown_doctor_falls_back_to_default_schedule() {
    let catalog = ScheduleCatalog::hospital_default();
    let schedule = catalog.schedule_for("Dr. Nobody");

    let slots = SlotGrid::working_slots(&schedule, date(NEXT_MONDAY));
    assert_eq!(slots.first(), Some(&time(9, 0)));
    assert_eq!(slots.last(), Some(&time(16, 30)));
}

#[tokio::test]
async fn monday_with_no_bookings_returns_the_full_working_grid() {
    let env = service_at_morning();

    let slots = env
        .service
        .available_slots(date(NEXT_MONDAY), "Cardiology", "Dr. Harsh Sharma")
        .await;

    // 09:00 through 16:30 on the 30-minute grid.
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0], time(9, 0));
    assert_eq!(*slots.last().unwrap(), time(16, 30));
}

#[tokio::test]
async fn past_dates_have_no_available_slots() {
    let env = service_at_morning();

    let slots = env
        .service
        .available_slots(date("2026-02-23"), "Cardiology", "Dr. Harsh Sharma")
        .await;
    assert!(slots.is_empty());
}

#[tokio::test]
async fn booking_consumes_the_slot() {
    let env = service_at_morning();

    env.service
        .book(cardiology_request("user-1", NEXT_MONDAY, 10, 0))
        .await
        .expect("booking succeeds");

    let slots = env
        .service
        .available_slots(date(NEXT_MONDAY), "Cardiology", "Dr. Harsh Sharma")
        .await;
    assert!(!slots.contains(&time(10, 0)));
    assert_eq!(slots.len(), 15);
}

#[tokio::test]
async fn cancelled_slot_becomes_bookable_again() {
    let env = service_at_morning();

    let confirmation = env
        .service
        .book(cardiology_request("user-1", NEXT_MONDAY, 10, 0))
        .await
        .expect("booking succeeds");
    env.service
        .cancel(&confirmation.appointment.id, "user-1")
        .await
        .expect("cancel succeeds");

    let slots = env
        .service
        .available_slots(date(NEXT_MONDAY), "Cardiology", "Dr. Harsh Sharma")
        .await;
    assert!(slots.contains(&time(10, 0)));
}

#[tokio::test]
async fn todays_slots_at_or_before_now_are_stripped() {
    // Monday 12:15: the 12:00 slot is gone, 12:30 is the first one offered.
    let env = service_at(instant(TODAY, 12, 15));

    let slots = env
        .service
        .available_slots(date(TODAY), "Cardiology", "Dr. Harsh Sharma")
        .await;
    assert_eq!(slots.first(), Some(&time(12, 30)));
}

#[test]
fn schedule_rejects_inverted_time_range() {
    assert!(WeeklySchedule::new(vec![0, 1], time(17, 0), time(9, 0)).is_err());
    assert!(WeeklySchedule::new(vec![0, 1], time(9, 0), time(9, 0)).is_err());
}

#[test]
fn schedule_rejects_invalid_weekday() {
    assert!(WeeklySchedule::new(vec![7], time(9, 0), time(17, 0)).is_err());
}

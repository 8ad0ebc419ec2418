use chrono::NaiveDate;

use crate::models::{AppointmentStatus, BookAppointmentRequest, SchedulerError, StoreSnapshot};
use crate::services::catalog::ScheduleCatalog;
use crate::services::slots::SlotGrid;

/// Checks a proposed booking against the catalog, the slot grid and the
/// current snapshot. Pure: same inputs, same outcome. The check order is
/// fixed - cheap structural checks first, store-dependent conflict checks
/// last - so rejections carry the most specific reason available.
///
/// Note on gender: the request carries a typed `Gender`, so the "one of the
/// accepted values" check happens at the deserialization boundary; an invalid
/// value never reaches this function.
pub fn validate_booking(
    request: &BookAppointmentRequest,
    catalog: &ScheduleCatalog,
    snapshot: &StoreSnapshot,
    today: NaiveDate,
) -> Result<(), SchedulerError> {
    // 1. Department exists.
    if !catalog.department_exists(&request.department) {
        return Err(SchedulerError::Validation(format!(
            "Invalid department: {}",
            request.department
        )));
    }

    // 2. Doctor belongs to that department.
    if !catalog.doctor_in_department(&request.department, &request.doctor) {
        return Err(SchedulerError::Validation(format!(
            "{} is not part of {}",
            request.doctor, request.department
        )));
    }

    // 3. The doctor works that date at all.
    let schedule = catalog.schedule_for(&request.doctor);
    let working_slots = SlotGrid::working_slots(&schedule, request.date);
    if working_slots.is_empty() {
        return Err(SchedulerError::Validation(format!(
            "{} is not available on {}",
            request.doctor, request.date
        )));
    }

    // 4. The requested time is one of the doctor's working slots.
    if !working_slots.contains(&request.time) {
        return Err(SchedulerError::Validation(format!(
            "Invalid time - {} works {} to {}",
            request.doctor,
            schedule.start.format("%H:%M"),
            schedule.end.format("%H:%M")
        )));
    }

    // 5. No retroactive booking.
    if request.date < today {
        return Err(SchedulerError::Validation(
            "Cannot book in the past".to_string(),
        ));
    }

    // 6. Patient name.
    if request.patient_name.trim().len() < 2 {
        return Err(SchedulerError::Validation(
            "Invalid patient name".to_string(),
        ));
    }

    // 7. Patient age (lower bound is enforced by the unsigned type).
    if request.patient_age > 150 {
        return Err(SchedulerError::Validation("Invalid age".to_string()));
    }

    let confirmed = snapshot
        .appointments
        .values()
        .filter(|apt| apt.status == AppointmentStatus::Confirmed);

    // 9. Doctor-slot conflict: first come, first served.
    if confirmed.clone().any(|apt| {
        apt.doctor == request.doctor && apt.date == request.date && apt.time == request.time
    }) {
        return Err(SchedulerError::Conflict(format!(
            "{} already has an appointment at {} on {}. Please choose a different time.",
            request.doctor,
            request.time.format("%H:%M"),
            request.date
        )));
    }

    // 10. User-time conflict: the user cannot be with two doctors at once.
    if let Some(existing) = confirmed.clone().find(|apt| {
        apt.user_id == request.user_id && apt.date == request.date && apt.time == request.time
    }) {
        return Err(SchedulerError::Conflict(format!(
            "You already have an appointment with {} at {} on {}. Please choose a different time.",
            existing.doctor,
            existing.time.format("%H:%M"),
            existing.date
        )));
    }

    // 11. User-doctor-day conflict: one booking per doctor per day per user.
    //     Bookings with *different* doctors on the same day stay allowed.
    if let Some(existing) = confirmed.clone().find(|apt| {
        apt.user_id == request.user_id && apt.doctor == request.doctor && apt.date == request.date
    }) {
        return Err(SchedulerError::Conflict(format!(
            "You already have an appointment with {} at {} on {}. \
             You can only book one appointment per doctor per day.",
            request.doctor,
            existing.time.format("%H:%M"),
            request.date
        )));
    }

    Ok(())
}

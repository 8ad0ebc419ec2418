#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use scheduling_cell::models::{Appointment, AppointmentStatus, BookAppointmentRequest, Gender};
use scheduling_cell::services::clock::Clock;
use scheduling_cell::services::{AppointmentBookingService, AppointmentStore, ScheduleCatalog};

/// Deterministic clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2026-03-02 is a Monday; most tests anchor "today" here.
pub const TODAY: &str = "2026-03-02";
/// The following Monday, used as a safely-future booking date.
pub const NEXT_MONDAY: &str = "2026-03-09";

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("test date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("test time")
}

pub fn instant(day: &str, h: u32, m: u32) -> DateTime<Utc> {
    date(day).and_hms_opt(h, m, 0).expect("test instant").and_utc()
}

pub struct TestEnv {
    pub service: AppointmentBookingService,
    /// Second handle on the same data file, for seeding and for inspecting
    /// what actually got persisted.
    pub store: AppointmentStore,
    _dir: TempDir,
}

/// Service over the real hospital roster, a temp data file, and a fixed
/// clock.
pub fn service_at(now: DateTime<Utc>) -> TestEnv {
    let dir = TempDir::new().expect("temp dir");
    let data_file = dir.path().join("appointments.json");
    let service = AppointmentBookingService::with_parts(
        ScheduleCatalog::hospital_default(),
        AppointmentStore::with_path(&data_file),
        Arc::new(FixedClock(now)),
    );
    TestEnv {
        service,
        store: AppointmentStore::with_path(&data_file),
        _dir: dir,
    }
}

pub fn service_at_morning() -> TestEnv {
    service_at(instant(TODAY, 8, 0))
}

pub fn cardiology_request(user_id: &str, day: &str, h: u32, m: u32) -> BookAppointmentRequest {
    BookAppointmentRequest {
        user_id: user_id.to_string(),
        patient_name: "Ravi Patel".to_string(),
        patient_age: 34,
        patient_gender: Gender::Male,
        department: "Cardiology".to_string(),
        doctor: "Dr. Harsh Sharma".to_string(),
        date: date(day),
        time: time(h, m),
    }
}

pub fn psychiatry_request(user_id: &str, day: &str, h: u32, m: u32) -> BookAppointmentRequest {
    BookAppointmentRequest {
        user_id: user_id.to_string(),
        patient_name: "Ravi Patel".to_string(),
        patient_age: 34,
        patient_gender: Gender::Male,
        department: "Psychiatry".to_string(),
        doctor: "Dr. Shalini Gupta".to_string(),
        date: date(day),
        time: time(h, m),
    }
}

/// Hand-built record for seeding the store directly (e.g. past appointments
/// that the booking path would reject).
pub fn seeded_appointment(
    id: &str,
    user_id: &str,
    doctor: &str,
    department: &str,
    day: &str,
    h: u32,
    m: u32,
) -> Appointment {
    Appointment {
        id: id.to_string(),
        user_id: user_id.to_string(),
        patient_name: "Ravi Patel".to_string(),
        patient_age: 34,
        patient_gender: Gender::Male,
        department: department.to_string(),
        doctor: doctor.to_string(),
        date: date(day),
        time: time(h, m),
        status: AppointmentStatus::Confirmed,
        created_at: instant("2026-01-01", 9, 0),
    }
}

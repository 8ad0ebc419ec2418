// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    #[serde(default = "default_patient_name")]
    pub patient_name: String,
    #[serde(default)]
    pub patient_age: u8,
    #[serde(default)]
    pub patient_gender: Gender,
    pub department: String,
    pub doctor: String,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

// Legacy records on disk predate the patient fields; they load with these
// defaults instead of failing deserialization.
fn default_patient_name() -> String {
    "Unknown".to_string()
}

impl Appointment {
    /// The calendar instant this appointment is scheduled for.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Copy of this record with the derived view status applied.
    pub fn resolved(&self, now: DateTime<Utc>) -> Appointment {
        let mut view = self.clone();
        view.status = resolve_view_status(self, now);
        view
    }
}

/// Derived, read-time status resolution. A `confirmed` appointment whose
/// scheduled instant is strictly in the past reads as `expired`; the persisted
/// record is never rewritten. Every read path goes through this one function.
pub fn resolve_view_status(record: &Appointment, now: DateTime<Utc>) -> AppointmentStatus {
    if record.status == AppointmentStatus::Confirmed && record.scheduled_at() < now.naive_utc() {
        AppointmentStatus::Expired
    } else {
        record.status.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
    CancelledByDoctor,
    /// View-only status computed at read time; never written to storage.
    Expired,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::CancelledByDoctor => write!(f, "cancelled_by_doctor"),
            AppointmentStatus::Expired => write!(f, "expired"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

// ==============================================================================
// SCHEDULE MODELS
// ==============================================================================

/// A doctor's weekly availability template. Working days are encoded
/// 0=Monday..6=Sunday; slots fall in `[start, end)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub days: Vec<u8>,
    #[serde(with = "time_hm")]
    pub start: NaiveTime,
    #[serde(with = "time_hm")]
    pub end: NaiveTime,
}

impl WeeklySchedule {
    pub fn new(days: Vec<u8>, start: NaiveTime, end: NaiveTime) -> Result<Self, SchedulerError> {
        if start >= end {
            return Err(SchedulerError::Validation(format!(
                "Schedule start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        if let Some(day) = days.iter().find(|d| **d > 6) {
            return Err(SchedulerError::Validation(format!(
                "Invalid working day {} - must be 0 (Monday) to 6 (Sunday)",
                day
            )));
        }
        Ok(Self { days, start, end })
    }

    pub fn works_on(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        let day = date.weekday().num_days_from_monday() as u8;
        self.days.contains(&day)
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }
}

impl Default for WeeklySchedule {
    /// Fallback for doctors missing from the schedule registry: weekdays,
    /// 09:00-17:00.
    fn default() -> Self {
        Self {
            days: vec![0, 1, 2, 3, 4],
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub user_id: String,
    pub patient_name: String,
    pub patient_age: u8,
    pub patient_gender: Gender,
    pub department: String,
    pub doctor: String,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub appointment: Appointment,
    pub message: String,
    /// Other confirmed appointments the user already holds on the same date.
    /// Informational only; never blocks the booking.
    pub other_same_day: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationReceipt {
    pub appointment_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCancellation {
    pub appointment_id: String,
    pub message: String,
    /// User id of the affected patient, so a notification collaborator can
    /// inform them.
    pub patient_user_id: String,
}

// ==============================================================================
// PERSISTED SNAPSHOT
// ==============================================================================

/// The full persisted unit: appointment map, id counter and last-updated
/// timestamp are always written together so the counter never regresses
/// relative to the recorded appointments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub appointments: BTreeMap<String, Appointment>,
    #[serde(default)]
    pub counter: u64,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SchedulerError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Appointment not found")]
    NotFound,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Cannot cancel - appointment is already {0}")]
    InvalidStatus(AppointmentStatus),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ==============================================================================
// WIRE FORMATS
// ==============================================================================

/// Times cross the boundary and land on disk as "HH:MM" (24-hour), matching
/// the slot grid's textual format. Older files with seconds still load.
pub mod time_hm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

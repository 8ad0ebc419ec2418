// libs/scheduling-cell/src/services/booking.rs
use chrono::{Duration, NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingConfirmation,
    CancellationReceipt, DoctorCancellation, SchedulerError,
};
use crate::services::catalog::ScheduleCatalog;
use crate::services::clock::{Clock, SystemClock};
use crate::services::slots::SlotGrid;
use crate::services::store::AppointmentStore;
use crate::services::validator;

/// The scheduling facade: composes the catalog, slot grid, validator and
/// store to implement slot discovery, booking, cancellation and the staff
/// queries. External collaborators (chat, voice, HTTP) call only this.
///
/// Every mutating operation holds `write_lock` across its whole
/// reload -> validate -> commit sequence. Without it, two near-simultaneous
/// bookings could both reload the same stale snapshot, both pass validation
/// and both commit, one overwriting the other's appointment. The lock
/// serializes mutations within this process; the deployment assumption is a
/// single service instance owning the data file.
pub struct AppointmentBookingService {
    catalog: ScheduleCatalog,
    store: AppointmentStore,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_parts(
            ScheduleCatalog::hospital_default(),
            AppointmentStore::new(config),
            Arc::new(SystemClock),
        )
    }

    /// Explicit wiring for tests and alternate deployments.
    pub fn with_parts(
        catalog: ScheduleCatalog,
        store: AppointmentStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Department -> doctors mapping, straight from the catalog.
    pub fn departments(&self) -> BTreeMap<String, Vec<String>> {
        self.catalog.departments()
    }

    /// Open slots for a doctor on a date: the doctor's working slots minus
    /// those consumed by confirmed appointments for that doctor, date and
    /// department. Past dates yield nothing; for today, slots at or before
    /// the current time are stripped. Chronological order.
    pub async fn available_slots(
        &self,
        date: NaiveDate,
        department: &str,
        doctor: &str,
    ) -> Vec<NaiveTime> {
        let now = self.clock.now();
        let today = now.date_naive();
        if date < today {
            return Vec::new();
        }

        let schedule = self.catalog.schedule_for(doctor);
        let working = SlotGrid::working_slots(&schedule, date);
        if working.is_empty() {
            debug!("{} does not work on {}", doctor, date);
            return Vec::new();
        }

        let snapshot = self.store.reload().await;
        let booked: Vec<NaiveTime> = snapshot
            .appointments
            .values()
            .filter(|apt| {
                apt.status == AppointmentStatus::Confirmed
                    && apt.date == date
                    && apt.department == department
                    && apt.doctor == doctor
            })
            .map(|apt| apt.time)
            .collect();

        working
            .into_iter()
            .filter(|slot| !booked.contains(slot))
            .filter(|slot| date != today || *slot > now.time())
            .collect()
    }

    /// Book an appointment. On acceptance the record is created with status
    /// `confirmed` and committed; the confirmation message also lists any
    /// other appointments the user already holds that day (informational
    /// only).
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookingConfirmation, SchedulerError> {
        let _guard = self.write_lock.lock().await;

        let now = self.clock.now();
        let today = now.date_naive();
        let mut snapshot = self.store.reload().await;

        validator::validate_booking(&request, &self.catalog, &snapshot, today)?;

        let id = self.store.next_id(&mut snapshot, today);
        let appointment = Appointment {
            id: id.clone(),
            user_id: request.user_id.clone(),
            patient_name: request.patient_name.trim().to_string(),
            patient_age: request.patient_age,
            patient_gender: request.patient_gender.clone(),
            department: request.department.clone(),
            doctor: request.doctor.clone(),
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Confirmed,
            created_at: now,
        };
        snapshot.appointments.insert(id.clone(), appointment.clone());

        let other_same_day: Vec<Appointment> = snapshot
            .appointments
            .values()
            .filter(|apt| {
                apt.user_id == request.user_id
                    && apt.date == request.date
                    && apt.id != id
                    && apt.status == AppointmentStatus::Confirmed
            })
            .cloned()
            .collect();

        self.store.commit(&mut snapshot).await?;

        let mut message = format!(
            "Booked {} with {} on {} at {}",
            appointment.patient_name,
            appointment.doctor,
            appointment.date,
            appointment.time.format("%H:%M")
        );
        if !other_same_day.is_empty() {
            let existing: Vec<String> = other_same_day
                .iter()
                .map(|apt| format!("{} at {}", apt.doctor, apt.time.format("%H:%M")))
                .collect();
            message.push_str(&format!(
                ". Note: You also have appointment(s) on this date with {}",
                existing.join(", ")
            ));
        }

        info!(
            "Appointment {} booked for user {} with {} on {} at {}",
            id,
            appointment.user_id,
            appointment.doctor,
            appointment.date,
            appointment.time.format("%H:%M")
        );

        Ok(BookingConfirmation {
            appointment,
            message,
            other_same_day,
        })
    }

    /// Patient-initiated cancellation. Only the owning user may cancel.
    /// Idempotent by design: cancelling a record that already left
    /// `confirmed` succeeds without touching storage, so a patient retry can
    /// never clobber a doctor-initiated cancellation.
    pub async fn cancel(
        &self,
        appointment_id: &str,
        user_id: &str,
    ) -> Result<CancellationReceipt, SchedulerError> {
        let _guard = self.write_lock.lock().await;

        let mut snapshot = self.store.reload().await;
        let appointment = snapshot
            .appointments
            .get_mut(appointment_id)
            .ok_or(SchedulerError::NotFound)?;

        if appointment.user_id != user_id {
            warn!(
                "User {} attempted to cancel appointment {} owned by another user",
                user_id, appointment_id
            );
            return Err(SchedulerError::Unauthorized(
                "this appointment was booked by a different user".to_string(),
            ));
        }

        if appointment.status != AppointmentStatus::Confirmed {
            let status = appointment.status.clone();
            return Ok(CancellationReceipt {
                appointment_id: appointment_id.to_string(),
                message: format!("Appointment {} is already {}", appointment_id, status),
            });
        }

        appointment.status = AppointmentStatus::Cancelled;
        self.store.commit(&mut snapshot).await?;

        info!("Appointment {} cancelled by user {}", appointment_id, user_id);
        Ok(CancellationReceipt {
            appointment_id: appointment_id.to_string(),
            message: format!("Appointment {} cancelled", appointment_id),
        })
    }

    /// Staff-initiated cancellation. Requires the record to belong to the
    /// named doctor and to still be `confirmed`; unlike the patient path this
    /// rejects already-cancelled records, since staff act on a live schedule.
    /// Returns the affected patient's user id so a notification collaborator
    /// can inform them.
    pub async fn cancel_by_doctor(
        &self,
        appointment_id: &str,
        doctor_name: &str,
        reason: Option<&str>,
    ) -> Result<DoctorCancellation, SchedulerError> {
        let _guard = self.write_lock.lock().await;

        let mut snapshot = self.store.reload().await;
        let appointment = snapshot
            .appointments
            .get_mut(appointment_id)
            .ok_or(SchedulerError::NotFound)?;

        if appointment.doctor != doctor_name {
            return Err(SchedulerError::Unauthorized(
                "this appointment is not with you".to_string(),
            ));
        }
        if appointment.status != AppointmentStatus::Confirmed {
            return Err(SchedulerError::InvalidStatus(appointment.status.clone()));
        }

        appointment.status = AppointmentStatus::CancelledByDoctor;
        let patient_user_id = appointment.user_id.clone();
        let mut message = format!(
            "Appointment {} with {} on {} at {} has been cancelled",
            appointment_id,
            appointment.patient_name,
            appointment.date,
            appointment.time.format("%H:%M")
        );
        if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
            message.push_str(&format!(". Reason: {}", reason));
        }

        self.store.commit(&mut snapshot).await?;

        info!(
            "Appointment {} cancelled by doctor {}",
            appointment_id, doctor_name
        );
        Ok(DoctorCancellation {
            appointment_id: appointment_id.to_string(),
            message,
            patient_user_id,
        })
    }

    /// All of a user's confirmed appointments with the derived view status
    /// resolved, sorted by (date, time) ascending.
    pub async fn appointments_for_user(&self, user_id: &str) -> Vec<Appointment> {
        let now = self.clock.now();
        let snapshot = self.store.reload().await;

        let mut appointments: Vec<Appointment> = snapshot
            .appointments
            .values()
            .filter(|apt| apt.user_id == user_id && apt.status == AppointmentStatus::Confirmed)
            .map(|apt| apt.resolved(now))
            .collect();
        appointments.sort_by_key(|apt| (apt.date, apt.time));
        appointments
    }

    /// A user's confirmed appointments on one date, sorted by time.
    pub async fn appointments_for_user_on_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Vec<Appointment> {
        let snapshot = self.store.reload().await;

        let mut appointments: Vec<Appointment> = snapshot
            .appointments
            .values()
            .filter(|apt| {
                apt.user_id == user_id
                    && apt.date == date
                    && apt.status == AppointmentStatus::Confirmed
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|apt| apt.time);
        appointments
    }

    /// Today's schedule for a doctor, view status resolved, sorted by time.
    pub async fn appointments_for_doctor_today(&self, doctor_name: &str) -> Vec<Appointment> {
        let now = self.clock.now();
        let today = now.date_naive();
        let snapshot = self.store.reload().await;

        let mut appointments: Vec<Appointment> = snapshot
            .appointments
            .values()
            .filter(|apt| {
                apt.doctor == doctor_name
                    && apt.date == today
                    && apt.status == AppointmentStatus::Confirmed
            })
            .map(|apt| apt.resolved(now))
            .collect();
        appointments.sort_by_key(|apt| apt.time);
        appointments
    }

    /// All future confirmed appointments for a doctor, from today onward,
    /// sorted by (date, time) ascending.
    pub async fn appointments_for_doctor_all(&self, doctor_name: &str) -> Vec<Appointment> {
        let today = self.clock.now().date_naive();
        let snapshot = self.store.reload().await;

        let mut appointments: Vec<Appointment> = snapshot
            .appointments
            .values()
            .filter(|apt| {
                apt.doctor == doctor_name
                    && apt.date >= today
                    && apt.status == AppointmentStatus::Confirmed
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|apt| (apt.date, apt.time));
        appointments
    }

    /// A doctor's appointments over the trailing seven days including today,
    /// view status resolved. A retrospective report, so most recent first.
    pub async fn appointments_for_doctor_past_week(&self, doctor_name: &str) -> Vec<Appointment> {
        let now = self.clock.now();
        let today = now.date_naive();
        let week_ago = today - Duration::days(7);
        let snapshot = self.store.reload().await;

        let mut appointments: Vec<Appointment> = snapshot
            .appointments
            .values()
            .filter(|apt| {
                apt.doctor == doctor_name
                    && apt.date >= week_ago
                    && apt.date <= today
                    && apt.status == AppointmentStatus::Confirmed
            })
            .map(|apt| apt.resolved(now))
            .collect();
        appointments.sort_by_key(|apt| std::cmp::Reverse((apt.date, apt.time)));
        appointments
    }

    /// Every confirmed appointment on the books, sorted by (date, time).
    pub async fn all_confirmed_appointments(&self) -> Vec<Appointment> {
        let snapshot = self.store.reload().await;

        let mut appointments: Vec<Appointment> = snapshot
            .appointments
            .values()
            .filter(|apt| apt.status == AppointmentStatus::Confirmed)
            .cloned()
            .collect();
        appointments.sort_by_key(|apt| (apt.date, apt.time));
        appointments
    }
}

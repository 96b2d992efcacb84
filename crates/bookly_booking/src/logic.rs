// --- File: crates/bookly_booking/src/logic.rs ---
//! The booking operations: availability maintenance, slot listing, booking and
//! cancellation, plus the service catalogue around them.
//!
//! Nothing is cached between calls. Every read goes to the store, and every
//! check-then-write runs inside a locked [`BookingTx`].

use crate::error::BookingError;
use crate::models::{
    CreateServiceRequest, MyAppointment, ProviderSchedule, ServiceSchedule, SlotsResponse,
    UpdateServiceRequest,
};
use bookly_common::{
    weekday_index, Appointment, AppointmentStatus, AvailabilityWindow, Clock, Role, Service,
    ServiceType,
};
use bookly_db::{
    AppointmentRepository, AvailabilityRepository, BookingTx, DbClient, LockScope,
    ServiceRepository, SqlAppointmentRepository, SqlAvailabilityRepository, SqlServiceRepository,
};
use bookly_slots::{
    availability::validate_window, generate_slots, is_slot_available, is_valid_duration,
    slot_end_time, starts_at_or_before, SlotId, TimeRange, WeeklyAvailability,
};
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Attempts for a booking transaction that lost a serialization race.
const MAX_BOOKING_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct BookingService {
    db: DbClient,
    services: SqlServiceRepository,
    availability: SqlAvailabilityRepository,
    appointments: SqlAppointmentRepository,
    clock: Arc<dyn Clock>,
    allowed_durations: Vec<i64>,
}

impl BookingService {
    pub fn new(db: DbClient, clock: Arc<dyn Clock>, allowed_durations: Vec<i64>) -> Self {
        Self {
            services: SqlServiceRepository::new(db.clone()),
            availability: SqlAvailabilityRepository::new(db.clone()),
            appointments: SqlAppointmentRepository::new(db.clone()),
            db,
            clock,
            allowed_durations,
        }
    }

    pub fn db(&self) -> &DbClient {
        &self.db
    }

    fn check_duration(&self, minutes: i64) -> Result<(), BookingError> {
        if is_valid_duration(minutes) && self.allowed_durations.contains(&minutes) {
            Ok(())
        } else {
            Err(BookingError::InvalidInput(format!(
                "durationMinutes must be one of {:?}, got {}",
                self.allowed_durations, minutes
            )))
        }
    }

    async fn owned_service(&self, service_id: &str, provider_id: &str) -> Result<Service, BookingError> {
        let service = self
            .services
            .find_by_id(service_id)
            .await?
            .ok_or_else(|| BookingError::ServiceNotFound(service_id.to_string()))?;
        ensure_owner(&service, provider_id)?;
        Ok(service)
    }

    // --- Availability ---

    /// Appends one window after re-checking it against the stored windows of the
    /// same weekday, under the service's availability lock.
    ///
    /// Returns the full window set after the change.
    pub async fn set_availability(
        &self,
        service_id: &str,
        provider_id: &str,
        window: AvailabilityWindow,
    ) -> Result<Vec<AvailabilityWindow>, BookingError> {
        validate_window(&window)?;

        let mut tx = BookingTx::begin(&self.db, LockScope::availability(service_id)).await?;
        let service = tx
            .service(service_id)
            .await?
            .ok_or_else(|| BookingError::ServiceNotFound(service_id.to_string()))?;
        ensure_owner(&service, provider_id)?;

        let mut weekly: WeeklyAvailability = tx.windows(service_id).await?.into_iter().collect();
        weekly.add_window(window)?;
        tx.insert_window(service_id, &window).await?;
        tx.commit().await?;

        info!(
            "Added availability {}-{} on day {} to service {}",
            window.start_time, window.end_time, window.day_of_week, service_id
        );
        Ok(weekly.into_windows())
    }

    /// Replaces the whole window set. Nothing is written unless the batch is
    /// non-empty and free of same-day overlaps.
    pub async fn replace_availability(
        &self,
        service_id: &str,
        provider_id: &str,
        windows: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, BookingError> {
        let weekly = WeeklyAvailability::try_from_batch(windows)?;
        self.owned_service(service_id, provider_id).await?;

        let windows = weekly.into_windows();
        self.availability.replace_all(service_id, &windows).await?;

        info!(
            "Replaced availability of service {} with {} windows",
            service_id,
            windows.len()
        );
        Ok(windows)
    }

    /// Stored windows ordered by weekday, then start time.
    pub async fn list_availability(
        &self,
        service_id: &str,
        provider_id: &str,
    ) -> Result<Vec<AvailabilityWindow>, BookingError> {
        self.owned_service(service_id, provider_id).await?;
        Ok(self.availability.list_for_service(service_id).await?)
    }

    // --- Slots and bookings ---

    pub async fn get_slots(&self, service_id: &str, date: NaiveDate) -> Result<SlotsResponse, BookingError> {
        let service = self
            .services
            .find_by_id(service_id)
            .await?
            .ok_or_else(|| BookingError::ServiceNotFound(service_id.to_string()))?;

        if date < self.clock.today() {
            return Err(BookingError::PastDate(date));
        }

        let weekly: WeeklyAvailability = self
            .availability
            .list_for_service(service_id)
            .await?
            .into_iter()
            .collect();
        let booked: Vec<TimeRange> = self
            .appointments
            .booked_for_date(service_id, date)
            .await?
            .iter()
            .map(TimeRange::from)
            .collect();

        // A stored duration that cannot be walked yields no slots.
        let duration = u32::try_from(service.duration_minutes).unwrap_or(0);
        let windows = weekly.windows_for(weekday_index(date));
        let slots = generate_slots(service_id, duration, date, windows, &booked);

        debug!("{} slots for service {} on {}", slots.len(), service_id, date);
        Ok(SlotsResponse {
            service_id: service_id.to_string(),
            date,
            slots,
        })
    }

    /// Books the slot named by `slot_id` for `user_id`.
    ///
    /// All validation that does not need the lock happens first. The lock for
    /// `(service, date)` is then taken and windows and bookings are read fresh
    /// before the insert. A transaction that loses a serialization race is retried.
    pub async fn book_slot(&self, slot_id: &str, user_id: &str) -> Result<Appointment, BookingError> {
        let slot: SlotId = slot_id.parse()?;

        let service = self
            .services
            .find_by_id(&slot.service_id)
            .await?
            .ok_or_else(|| BookingError::ServiceNotFound(slot.service_id.clone()))?;

        if service.provider_id == user_id {
            return Err(BookingError::SelfBookingForbidden);
        }

        if !is_valid_duration(service.duration_minutes) {
            return Err(BookingError::InvalidServiceDuration(service.duration_minutes));
        }
        let duration = u32::try_from(service.duration_minutes)
            .map_err(|_| BookingError::InvalidServiceDuration(service.duration_minutes))?;
        // Midnight wrap is unsupported: no window can contain such a slot.
        let end_time = slot_end_time(slot.start_time, duration)
            .ok_or_else(|| BookingError::SlotUnavailable(slot_id.to_string()))?;

        let now = self.clock.now();
        if slot.date < now.date() || starts_at_or_before(slot.date, slot.start_time, now) {
            return Err(BookingError::PastDateTime(slot.date, slot.start_time.to_string()));
        }

        let candidate = TimeRange::new(slot.start_time, end_time);
        let mut attempt = 1;
        loop {
            match self.try_commit_booking(&slot, candidate, user_id).await {
                Err(BookingError::Storage(err))
                    if err.is_retryable() && attempt < MAX_BOOKING_ATTEMPTS =>
                {
                    warn!(
                        "Booking of {} lost a serialization race (attempt {}): {}",
                        slot, attempt, err
                    );
                    attempt += 1;
                }
                Err(BookingError::Storage(err)) if err.is_retryable() => {
                    return Err(BookingError::SlotUnavailable(slot.to_string()));
                }
                other => return other,
            }
        }
    }

    async fn try_commit_booking(
        &self,
        slot: &SlotId,
        candidate: TimeRange,
        user_id: &str,
    ) -> Result<Appointment, BookingError> {
        let mut tx = BookingTx::begin(&self.db, LockScope::slot_date(&slot.service_id, slot.date)).await?;

        let weekly: WeeklyAvailability = tx.windows(&slot.service_id).await?.into_iter().collect();
        let booked: Vec<TimeRange> = tx
            .booked_on(&slot.service_id, slot.date)
            .await?
            .iter()
            .map(TimeRange::from)
            .collect();

        let windows = weekly.windows_for(weekday_index(slot.date));
        if !is_slot_available(slot.date, candidate, windows, &booked) {
            debug!("Slot {} failed re-validation", slot);
            tx.rollback().await?;
            return Err(BookingError::SlotUnavailable(slot.to_string()));
        }

        let appointment = Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            service_id: slot.service_id.clone(),
            date: slot.date,
            start_time: candidate.start,
            end_time: candidate.end,
            status: AppointmentStatus::Booked,
            slot_id: slot.to_string(),
            created_at: stored_now(),
        };
        tx.insert_appointment(&appointment).await?;
        tx.commit().await?;

        info!(
            "Appointment {} booked: slot {} for user {}",
            appointment.id, appointment.slot_id, user_id
        );
        Ok(appointment)
    }

    /// Cancels a `BOOKED` appointment on behalf of its user or of the provider
    /// owning its service. A second cancellation is a conflict.
    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
        user_id: &str,
        role: Role,
    ) -> Result<Appointment, BookingError> {
        let mut appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))?;

        if appointment.user_id != user_id {
            let owns_service = role == Role::ServiceProvider
                && self
                    .services
                    .find_by_id(&appointment.service_id)
                    .await?
                    .is_some_and(|service| service.provider_id == user_id);
            if !owns_service {
                return Err(BookingError::Forbidden(
                    "Only the booking user or the service provider may cancel".to_string(),
                ));
            }
        }

        if appointment.status == AppointmentStatus::Cancelled
            || !self.appointments.cancel(appointment_id).await?
        {
            return Err(BookingError::AlreadyCancelled(appointment_id.to_string()));
        }

        appointment.status = AppointmentStatus::Cancelled;
        info!("Appointment {} cancelled by {} ({})", appointment_id, user_id, role);
        Ok(appointment)
    }

    // --- Service catalogue ---

    pub async fn create_service(
        &self,
        provider_id: &str,
        request: CreateServiceRequest,
    ) -> Result<Service, BookingError> {
        let name = validate_name(&request.name)?;
        self.check_duration(request.duration_minutes)?;

        let service = Service {
            id: uuid::Uuid::new_v4().to_string(),
            provider_id: provider_id.to_string(),
            name,
            service_type: request.service_type,
            duration_minutes: request.duration_minutes,
            created_at: stored_now(),
        };
        Ok(self.services.create(service).await?)
    }

    pub async fn update_service(
        &self,
        service_id: &str,
        provider_id: &str,
        request: UpdateServiceRequest,
    ) -> Result<Service, BookingError> {
        if request.is_empty() {
            return Err(BookingError::InvalidInput(
                "At least one field is required".to_string(),
            ));
        }
        let name = request.name.as_deref().map(validate_name).transpose()?;
        if let Some(minutes) = request.duration_minutes {
            self.check_duration(minutes)?;
        }

        let mut service = self.owned_service(service_id, provider_id).await?;
        if let Some(name) = name {
            service.name = name;
        }
        if let Some(service_type) = request.service_type {
            service.service_type = service_type;
        }
        if let Some(minutes) = request.duration_minutes {
            service.duration_minutes = minutes;
        }

        if !self.services.update(&service).await? {
            return Err(BookingError::ServiceNotFound(service_id.to_string()));
        }
        info!("Service {} updated", service_id);
        Ok(service)
    }

    /// All services, optionally filtered by a type name such as `MEDICAL`.
    pub async fn list_services(&self, service_type: Option<&str>) -> Result<Vec<Service>, BookingError> {
        let service_type = service_type
            .map(|raw| {
                ServiceType::from_str(raw)
                    .map_err(|_| BookingError::InvalidInput("Invalid service type".to_string()))
            })
            .transpose()?;
        Ok(self.services.list(service_type).await?)
    }

    pub async fn list_provider_services(&self, provider_id: &str) -> Result<Vec<Service>, BookingError> {
        Ok(self.services.list_by_provider(provider_id).await?)
    }

    pub async fn my_appointments(&self, user_id: &str) -> Result<Vec<MyAppointment>, BookingError> {
        let rows = self.appointments.find_by_user(user_id).await?;
        Ok(rows
            .into_iter()
            .map(|row| MyAppointment {
                id: row.appointment.id,
                service_id: row.appointment.service_id,
                service_name: row.service_name,
                service_type: row.service_type,
                date: row.appointment.date,
                start_time: row.appointment.start_time,
                end_time: row.appointment.end_time,
                status: row.appointment.status,
                slot_id: row.appointment.slot_id,
            })
            .collect())
    }

    /// Each of the provider's services with its `BOOKED` appointments on `date`.
    pub async fn provider_schedule(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<ProviderSchedule, BookingError> {
        let services = self.services.list_by_provider(provider_id).await?;
        let mut by_service: HashMap<String, Vec<Appointment>> = HashMap::new();
        for appointment in self.appointments.booked_for_provider(provider_id, date).await? {
            by_service
                .entry(appointment.service_id.clone())
                .or_default()
                .push(appointment);
        }

        let services = services
            .into_iter()
            .map(|service| ServiceSchedule {
                appointments: by_service
                    .remove(&service.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                service_id: service.id,
                service_name: service.name,
            })
            .collect();

        Ok(ProviderSchedule { date, services })
    }

    pub async fn is_healthy(&self) -> bool {
        self.db.is_healthy().await
    }
}

/// Current UTC time at the precision the store keeps.
fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn ensure_owner(service: &Service, provider_id: &str) -> Result<(), BookingError> {
    if service.provider_id == provider_id {
        Ok(())
    } else {
        Err(BookingError::Forbidden(
            "Service does not belong to provider".to_string(),
        ))
    }
}

pub(crate) fn validate_name(name: &str) -> Result<String, BookingError> {
    let name = name.trim();
    if name.is_empty() {
        Err(BookingError::InvalidInput("name must not be empty".to_string()))
    } else {
        Ok(name.to_string())
    }
}


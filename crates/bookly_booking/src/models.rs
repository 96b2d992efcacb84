// --- File: crates/bookly_booking/src/models.rs ---
//! Request and response bodies of the booking API.

use bookly_common::{Appointment, AppointmentStatus, AvailabilityWindow, ServiceType, TimeOfDay};
use bookly_slots::Slot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

impl UpdateServiceRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.service_type.is_none() && self.duration_minutes.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServicesQuery {
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

/// `?date=YYYY-MM-DD`, kept as text so that shape errors become `InvalidInput`.
#[derive(Debug, Clone, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotRequest {
    pub slot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub service_id: String,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub service_id: String,
    pub windows: Vec<AvailabilityWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyAppointment {
    pub id: String,
    pub service_id: String,
    pub service_name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: AppointmentStatus,
    pub slot_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAppointment {
    pub appointment_id: String,
    pub user_id: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: AppointmentStatus,
}

impl From<Appointment> for ScheduledAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            appointment_id: appointment.id,
            user_id: appointment.user_id,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: appointment.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSchedule {
    pub service_id: String,
    pub service_name: String,
    pub appointments: Vec<ScheduledAppointment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSchedule {
    pub date: NaiveDate,
    pub services: Vec<ServiceSchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
}

// --- File: crates/bookly_common/src/models.rs ---

// Domain entities shared by the slot engine, the storage layer and the API.
// Slots are not here: they are derived values and live with the engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{invalid_input, BooklyError};
use crate::time::TimeOfDay;

/// Role resolved by the authentication layer for every authenticated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    ServiceProvider,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::ServiceProvider => "SERVICE_PROVIDER",
        }
    }
}

impl FromStr for Role {
    type Err = BooklyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "SERVICE_PROVIDER" => Ok(Role::ServiceProvider),
            other => Err(invalid_input(format!("unknown role: {other}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Medical,
    HouseHelp,
    Beauty,
    Fitness,
    Education,
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 6] = [
        ServiceType::Medical,
        ServiceType::HouseHelp,
        ServiceType::Beauty,
        ServiceType::Fitness,
        ServiceType::Education,
        ServiceType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Medical => "MEDICAL",
            ServiceType::HouseHelp => "HOUSE_HELP",
            ServiceType::Beauty => "BEAUTY",
            ServiceType::Fitness => "FITNESS",
            ServiceType::Education => "EDUCATION",
            ServiceType::Other => "OTHER",
        }
    }
}

impl FromStr for ServiceType {
    type Err = BooklyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| invalid_input(format!("Invalid service type: {s}")))
    }
}

/// A bookable offering owned by one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Opaque identifier; never contains `_`, which separates slot id segments.
    pub id: String,
    pub provider_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
}

/// One recurring weekly open interval of a service.
///
/// `day_of_week` is 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub day_of_week: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Booked,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "BOOKED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = BooklyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOKED" => Ok(AppointmentStatus::Booked),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            other => Err(invalid_input(format!("unknown appointment status: {other}"))),
        }
    }
}

/// A concrete booking. Never deleted; `Booked` may only move to `Cancelled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: AppointmentStatus,
    pub slot_id: String,
    pub created_at: DateTime<Utc>,
}

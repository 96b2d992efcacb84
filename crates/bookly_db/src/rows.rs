//! Conversions between stored rows and domain values.

use crate::error::DbError;
use bookly_common::{
    parse_date, Appointment, AppointmentStatus, AvailabilityWindow, Service, ServiceType,
    TimeOfDay,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use std::str::FromStr;

pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn text(row: &AnyRow, column: &str) -> Result<String, DbError> {
    row.try_get::<String, _>(column)
        .map_err(|e| DbError::DecodeError(format!("column {}: {}", column, e)))
}

fn int(row: &AnyRow, column: &str) -> Result<i64, DbError> {
    row.try_get::<i64, _>(column)
        .map_err(|e| DbError::DecodeError(format!("column {}: {}", column, e)))
}

fn parsed<T, E>(row: &AnyRow, column: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> Result<T, DbError>
where
    E: std::fmt::Display,
{
    let raw = text(row, column)?;
    parse(&raw).map_err(|e| DbError::DecodeError(format!("column {} = {:?}: {}", column, raw, e)))
}

fn timestamp(row: &AnyRow, column: &str) -> Result<DateTime<Utc>, DbError> {
    parsed(row, column, |s| {
        DateTime::parse_from_rfc3339(s).map(|at| at.with_timezone(&Utc))
    })
}

pub(crate) fn service_from_row(row: &AnyRow) -> Result<Service, DbError> {
    Ok(Service {
        id: text(row, "id")?,
        provider_id: text(row, "provider_id")?,
        name: text(row, "name")?,
        service_type: parsed(row, "service_type", ServiceType::from_str)?,
        duration_minutes: int(row, "duration_minutes")?,
        created_at: timestamp(row, "created_at")?,
    })
}

pub(crate) fn window_from_row(row: &AnyRow) -> Result<AvailabilityWindow, DbError> {
    let day = int(row, "day_of_week")?;
    let day_of_week = u8::try_from(day)
        .map_err(|_| DbError::DecodeError(format!("day_of_week out of range: {}", day)))?;
    Ok(AvailabilityWindow {
        day_of_week,
        start_time: parsed(row, "start_time", TimeOfDay::parse)?,
        end_time: parsed(row, "end_time", TimeOfDay::parse)?,
    })
}

pub(crate) fn appointment_from_row(row: &AnyRow) -> Result<Appointment, DbError> {
    Ok(Appointment {
        id: text(row, "id")?,
        user_id: text(row, "user_id")?,
        service_id: text(row, "service_id")?,
        date: parsed(row, "date", parse_date)?,
        start_time: parsed(row, "start_time", TimeOfDay::parse)?,
        end_time: parsed(row, "end_time", TimeOfDay::parse)?,
        status: parsed(row, "status", AppointmentStatus::from_str)?,
        slot_id: text(row, "slot_id")?,
        created_at: timestamp(row, "created_at")?,
    })
}

pub(crate) fn collect<T>(
    rows: &[AnyRow],
    map: impl Fn(&AnyRow) -> Result<T, DbError>,
) -> Result<Vec<T>, DbError> {
    rows.iter().map(map).collect()
}

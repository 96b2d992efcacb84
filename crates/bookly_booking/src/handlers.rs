// --- File: crates/bookly_booking/src/handlers.rs ---
use crate::logic::BookingService;
use crate::models::{
    AvailabilityResponse, BookSlotRequest, CreateServiceRequest, DateQuery, HealthResponse,
    MyAppointment, ProviderSchedule, ServicesQuery, SlotsResponse, UpdateServiceRequest,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use bookly_common::{
    handle_json_result, invalid_input, parse_date, Appointment, AvailabilityWindow, BooklyError,
    Identity, Role, Service,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

// Shared state needed by the booking handlers
#[derive(Debug, Clone)]
pub struct BookingState {
    pub service: BookingService,
}

type HandlerResult<T> = Result<Json<T>, BooklyError>;
type CreatedResult<T> = Result<(StatusCode, Json<T>), BooklyError>;

// Body and query rejections are client input errors, not 422s.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BooklyError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| invalid_input(rejection.body_text()))
}

fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, BooklyError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| invalid_input(rejection.body_text()))
}

fn date_param(query: DateQuery) -> Result<NaiveDate, BooklyError> {
    parse_date(&query.date)
        .map_err(|_| invalid_input("Date must be in YYYY-MM-DD format"))
}

// --- Services ---

#[axum::debug_handler]
pub async fn create_service_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
    payload: Result<Json<CreateServiceRequest>, JsonRejection>,
) -> CreatedResult<Service> {
    identity.require_role(Role::ServiceProvider)?;
    let request = body(payload)?;
    let service = state.service.create_service(&identity.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

#[axum::debug_handler]
pub async fn update_service_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
    Path(service_id): Path<String>,
    payload: Result<Json<UpdateServiceRequest>, JsonRejection>,
) -> HandlerResult<Service> {
    identity.require_role(Role::ServiceProvider)?;
    let request = body(payload)?;
    handle_json_result(
        state
            .service
            .update_service(&service_id, &identity.user_id, request)
            .await,
    )
}

#[axum::debug_handler]
pub async fn list_services_handler(
    State(state): State<Arc<BookingState>>,
    params: Result<Query<ServicesQuery>, QueryRejection>,
) -> HandlerResult<Vec<Service>> {
    let params = query(params)?;
    handle_json_result(
        state
            .service
            .list_services(params.service_type.as_deref())
            .await,
    )
}

#[axum::debug_handler]
pub async fn get_slots_handler(
    State(state): State<Arc<BookingState>>,
    Path(service_id): Path<String>,
    params: Result<Query<DateQuery>, QueryRejection>,
) -> HandlerResult<SlotsResponse> {
    let date = date_param(query(params)?)?;
    debug!("Slot request for service {} on {}", service_id, date);
    handle_json_result(state.service.get_slots(&service_id, date).await)
}

// --- Availability ---

#[axum::debug_handler]
pub async fn set_availability_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
    Path(service_id): Path<String>,
    payload: Result<Json<AvailabilityWindow>, JsonRejection>,
) -> CreatedResult<AvailabilityResponse> {
    identity.require_role(Role::ServiceProvider)?;
    let window = body(payload)?;
    let windows = state
        .service
        .set_availability(&service_id, &identity.user_id, window)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AvailabilityResponse { service_id, windows }),
    ))
}

#[axum::debug_handler]
pub async fn replace_availability_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
    Path(service_id): Path<String>,
    payload: Result<Json<Vec<AvailabilityWindow>>, JsonRejection>,
) -> HandlerResult<AvailabilityResponse> {
    identity.require_role(Role::ServiceProvider)?;
    let windows = body(payload)?;
    let windows = state
        .service
        .replace_availability(&service_id, &identity.user_id, windows)
        .await?;
    Ok(Json(AvailabilityResponse { service_id, windows }))
}

#[axum::debug_handler]
pub async fn list_availability_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
    Path(service_id): Path<String>,
) -> HandlerResult<AvailabilityResponse> {
    identity.require_role(Role::ServiceProvider)?;
    let windows = state
        .service
        .list_availability(&service_id, &identity.user_id)
        .await?;
    Ok(Json(AvailabilityResponse { service_id, windows }))
}

// --- Appointments ---

#[axum::debug_handler]
pub async fn book_slot_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
    payload: Result<Json<BookSlotRequest>, JsonRejection>,
) -> CreatedResult<Appointment> {
    identity.require_role(Role::User)?;
    let request = body(payload)?;
    let appointment = state
        .service
        .book_slot(&request.slot_id, &identity.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn my_appointments_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
) -> HandlerResult<Vec<MyAppointment>> {
    handle_json_result(state.service.my_appointments(&identity.user_id).await)
}

#[axum::debug_handler]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
    Path(appointment_id): Path<String>,
) -> HandlerResult<Appointment> {
    handle_json_result(
        state
            .service
            .cancel_appointment(&appointment_id, &identity.user_id, identity.role)
            .await,
    )
}

// --- Provider views ---

#[axum::debug_handler]
pub async fn provider_services_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
) -> HandlerResult<Vec<Service>> {
    identity.require_role(Role::ServiceProvider)?;
    handle_json_result(state.service.list_provider_services(&identity.user_id).await)
}

#[axum::debug_handler]
pub async fn provider_schedule_handler(
    State(state): State<Arc<BookingState>>,
    identity: Identity,
    params: Result<Query<DateQuery>, QueryRejection>,
) -> HandlerResult<ProviderSchedule> {
    identity.require_role(Role::ServiceProvider)?;
    let date = date_param(query(params)?)?;
    handle_json_result(state.service.provider_schedule(&identity.user_id, date).await)
}

#[axum::debug_handler]
pub async fn health_handler(State(state): State<Arc<BookingState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.service.is_healthy().await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            status: if database { "ok" } else { "degraded" }.to_string(),
            database,
        }),
    )
}

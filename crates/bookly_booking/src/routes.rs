// --- File: crates/bookly_booking/src/routes.rs ---
use crate::handlers::{
    book_slot_handler, cancel_appointment_handler, create_service_handler, get_slots_handler,
    health_handler, list_availability_handler, list_services_handler, my_appointments_handler,
    provider_schedule_handler, provider_services_handler, replace_availability_handler,
    set_availability_handler, update_service_handler, BookingState,
};
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all booking routes, relative to the API prefix.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/services",
            post(create_service_handler).get(list_services_handler),
        )
        .route("/services/{service_id}", patch(update_service_handler))
        .route("/services/{service_id}/slots", get(get_slots_handler))
        .route(
            "/services/{service_id}/availability",
            post(set_availability_handler)
                .get(list_availability_handler)
                .put(replace_availability_handler),
        )
        .route("/appointments", post(book_slot_handler))
        .route("/appointments/me", get(my_appointments_handler))
        .route(
            "/appointments/{appointment_id}/cancel",
            patch(cancel_appointment_handler),
        )
        .route("/providers/me/services", get(provider_services_handler))
        .route("/providers/me/schedule", get(provider_schedule_handler))
        .with_state(state)
}

// --- File: crates/bookly_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{BooklyError, HttpStatusCode};

/// Renders the error as `{"error": {"message", "code", "kind"}}` with the matching status.
impl IntoResponse for BooklyError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
                "kind": self.kind(),
            }
        }));

        (status_code, body).into_response()
    }
}

/// Converts a `Result<T, E>` into a JSON handler result, mapping the error through `BooklyError`.
pub fn handle_json_result<T, E>(result: Result<T, E>) -> Result<Json<T>, BooklyError>
where
    T: serde::Serialize,
    E: Into<BooklyError>,
{
    result.map(Json).map_err(Into::into)
}

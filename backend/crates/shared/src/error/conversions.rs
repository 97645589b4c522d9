//! Error conversions
//!
//! Renders [`AppError`] as the `{ success: false, error }` envelope.

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for super::app_error::AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = crate::response::ApiResponse::<()>::failure(self.message().to_string());

        (status, Json(body)).into_response()
    }
}

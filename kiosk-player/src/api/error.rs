//! API error responses
//!
//! Client-input errors render as 400 with their message; everything else is
//! logged and rendered as a bare 500 so internal detail never reaches the
//! response body.

use crate::error::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kiosk_common::api::types::ErrorResponse;
use tracing::{error, warn};

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = if self.0.is_client_error() {
            warn!("Bad request: {}", self.0);
            (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_status(StatusCode::BAD_REQUEST.as_u16(), &self.0),
            )
        } else {
            // Emitted inside the request's trace span, which carries method and URI
            error!("Request failed: {}", self.0);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_status(
                    StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    "internal server error",
                ),
            )
        };

        (status, Json(body)).into_response()
    }
}

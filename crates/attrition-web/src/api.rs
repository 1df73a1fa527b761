//! JSON front-end: `GET /` and `POST /predict`.

use attrition_ai::{AssessError, assess};
use attrition_core::{EmployeeProfile, PredictionResult};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, info};

use crate::AppState;

pub const HOME_MESSAGE: &str = "Attrition Prediction Model is running!";

#[derive(Debug, Serialize)]
pub(crate) struct HomeResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Why a `/predict` call produced no verdict. Rendered as `{"error": ...}`.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// The body was not a well-formed profile.
    Malformed(JsonRejection),
    /// The profile parsed but the pipeline refused or failed it.
    Assess(AssessError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Malformed(rejection) => (rejection.status(), rejection.body_text()),
            Self::Assess(err) => (status_for(err), err.to_string()),
        };
        (status, Json(ErrorBody { error: &message })).into_response()
    }
}

impl From<AssessError> for ApiError {
    fn from(err: AssessError) -> Self {
        Self::Assess(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        info!(status = %rejection.status(), "rejected malformed request body");
        Self::Malformed(rejection)
    }
}

/// HTTP status for a failed assessment, logging it on the way.
pub(crate) fn status_for(err: &AssessError) -> StatusCode {
    match err {
        AssessError::Encoding(e) => {
            info!(error = ?e, "rejected unknown category");
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessError::Validation(e) => {
            info!(error = %e, "rejected out-of-range field");
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessError::Model(e) => {
            error!(error = %e, "inference failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: HOME_MESSAGE,
    })
}

pub(crate) async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeProfile>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(profile) = payload?;
    let result = assess(&state.model, &profile)?;
    Ok(Json(result))
}

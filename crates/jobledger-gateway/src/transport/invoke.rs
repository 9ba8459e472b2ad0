//! Invocation endpoint.
//!
//! `POST /v1/invoke` takes the invocation event as its JSON body. Failures
//! come back as `{"errorType": CODE, "errorMessage": text}` with a status
//! derived from the error's client code.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use jobledger_core::error::{ClientCode, LedgerError};

use crate::app_state::AppState;

pub async fn invoke(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let event = match payload {
        Ok(Json(event)) => event,
        Err(rejection) => {
            return error_response(&LedgerError::BadRequest(rejection.body_text()));
        }
    };

    match state.updater().invoke(&event).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "message": format!("Welcome to {}", state.cfg().app_name) }))
}

pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::MissingJobIdentifier | ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::NoMetricsAvailable => StatusCode::UNPROCESSABLE_ENTITY,
        ClientCode::MalformedLedger => StatusCode::CONFLICT,
        ClientCode::Storage | ClientCode::Upstream => StatusCode::BAD_GATEWAY,
        ClientCode::UnsupportedVersion | ClientCode::Config | ClientCode::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn error_response(e: &LedgerError) -> Response {
    let code = e.client_code();
    let status = status_for(code);
    if status.is_server_error() {
        tracing::error!(code = code.as_str(), error = %e, "invocation failed");
    } else {
        tracing::warn!(code = code.as_str(), error = %e, "invocation rejected");
    }
    (
        status,
        Json(json!({ "errorType": code.as_str(), "errorMessage": e.to_string() })),
    )
        .into_response()
}

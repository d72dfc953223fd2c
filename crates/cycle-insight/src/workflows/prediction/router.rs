use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::client::{HttpPredictionClient, PredictionError, PredictionService};
use super::fields::{FieldSpec, FIELD_SPECS};
use super::form::FormState;
use super::presenter::ResultView;
use super::service::{PredictionWorkflow, ResultId, SubmissionError};

/// Router exposing the prediction form, submission, and result endpoints.
pub fn prediction_router<S>(workflow: Arc<PredictionWorkflow<S>>) -> Router
where
    S: PredictionService + 'static,
{
    Router::new()
        .route("/api/v1/prediction/form", get(form_handler))
        .route("/api/v1/prediction", post(submit_handler::<S>))
        .route("/api/v1/prediction/result", get(missing_result_handler))
        .route("/api/v1/prediction/result/:id", get(result_handler::<S>))
        .with_state(workflow)
}

/// Adds the backend reconfiguration endpoint, which only exists when the
/// workflow talks to the HTTP client.
pub fn backend_router(workflow: Arc<PredictionWorkflow<HttpPredictionClient>>) -> Router {
    prediction_router(workflow.clone()).merge(
        Router::new()
            .route("/api/v1/prediction/backend", put(backend_handler))
            .with_state(workflow),
    )
}

#[derive(Debug, Serialize)]
pub struct FormSchema {
    pub fields: &'static [FieldSpec],
    pub defaults: FormState,
}

pub(crate) async fn form_handler() -> Json<FormSchema> {
    Json(FormSchema {
        fields: &FIELD_SPECS,
        defaults: FormState::new(),
    })
}

pub(crate) async fn submit_handler<S>(
    State(workflow): State<Arc<PredictionWorkflow<S>>>,
    Json(values): Json<BTreeMap<String, Value>>,
) -> Response
where
    S: PredictionService + 'static,
{
    let mut raw = Vec::with_capacity(values.len());
    for (name, value) in values {
        match raw_form_value(value) {
            Some(text) => raw.push((name, text)),
            None => {
                let payload = json!({ "error": format!("field '{name}' must be a string or number") });
                return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
            }
        }
    }

    let form = match FormState::from_pairs(raw) {
        Ok(form) => form,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match workflow.submit(&form).await {
        Ok(submitted) => (StatusCode::OK, Json(submitted)).into_response(),
        Err(SubmissionError::Invalid(errors)) => {
            let payload = json!({ "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(SubmissionError::Prediction(error)) => prediction_error_response(&error),
    }
}

/// Inputs arrive as the text a user typed; numbers are accepted as their
/// literal text and `null` as an empty input.
fn raw_form_value(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

pub(crate) fn prediction_error_response(error: &PredictionError) -> Response {
    let status = match error {
        PredictionError::ServerRejected { .. } => StatusCode::BAD_GATEWAY,
        PredictionError::Unreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PredictionError::ClientFault { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
        "kind": error.kind(),
    });
    (status, Json(payload)).into_response()
}

/// Results view reached without a submission handle.
pub(crate) async fn missing_result_handler() -> Json<ResultView> {
    Json(ResultView::missing())
}

/// Malformed and unknown handles both show the missing-result state.
pub(crate) async fn result_handler<S>(
    State(workflow): State<Arc<PredictionWorkflow<S>>>,
    Path(id): Path<String>,
) -> Json<ResultView>
where
    S: PredictionService + 'static,
{
    let view = match id.parse::<ResultId>() {
        Ok(id) => workflow.result(&id),
        Err(_) => ResultView::missing(),
    };
    Json(view)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BackendUpdate {
    pub(crate) base_url: String,
}

pub(crate) async fn backend_handler(
    State(workflow): State<Arc<PredictionWorkflow<HttpPredictionClient>>>,
    Json(update): Json<BackendUpdate>,
) -> Response {
    let client = workflow.service();
    match client.update_base_address(&update.base_url) {
        Ok(()) => {
            let payload = json!({ "base_url": client.base_url() });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(PredictionError::ClientFault { detail }) => {
            let payload = json!({ "error": detail, "kind": "client_fault" });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => prediction_error_response(&other),
    }
}

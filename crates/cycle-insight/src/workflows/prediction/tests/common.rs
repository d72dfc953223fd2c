use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::prediction::{
    CycleClassification, FieldName, FormState, PredictionError, PredictionRequest,
    PredictionResponse, PredictionService, PredictionWorkflow,
};

/// Every field filled with a valid value.
pub(super) fn valid_form() -> FormState {
    FormState::from_pairs(valid_pairs()).expect("known fields")
}

pub(super) fn valid_pairs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("age", "28"),
        ("bmi", "22.5"),
        ("life_stage", "reproductive"),
        ("tracking_duration_months", "12"),
        ("pain_score", "5"),
        ("avg_cycle_length", "28"),
        ("cycle_length_variation", "3"),
        ("avg_bleeding_days", "5"),
        ("bleeding_volume_score", "3"),
        ("intermenstrual_episodes", "0"),
        ("cycle_variation_coeff", "0.15"),
        ("pattern_disruption_score", "2.5"),
    ]
}

pub(super) fn form_with(field: FieldName, value: &str) -> FormState {
    let mut form = valid_form();
    form.set_value(field, value);
    form
}

pub(super) fn response(prediction: u8, probability: f64, types: &[&str]) -> PredictionResponse {
    PredictionResponse {
        prediction: if prediction == 1 {
            CycleClassification::Irregular
        } else {
            CycleClassification::Regular
        },
        probability,
        irregularity_types: types.iter().map(|value| value.to_string()).collect(),
    }
}

/// Scripted double that replays queued outcomes and records requests.
#[derive(Default)]
pub(super) struct ScriptedService {
    outcomes: Mutex<VecDeque<Result<PredictionResponse, PredictionError>>>,
    requests: Mutex<Vec<PredictionRequest>>,
}

impl ScriptedService {
    pub(super) fn answering(outcome: Result<PredictionResponse, PredictionError>) -> Self {
        let service = Self::default();
        service.push(outcome);
        service
    }

    pub(super) fn push(&self, outcome: Result<PredictionResponse, PredictionError>) {
        self.outcomes
            .lock()
            .expect("outcome mutex poisoned")
            .push_back(outcome);
    }

    pub(super) fn requests(&self) -> Vec<PredictionRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }
}

impl PredictionService for ScriptedService {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request.clone());
        self.outcomes
            .lock()
            .expect("outcome mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(PredictionError::Unreachable {
                    detail: "no scripted outcome".to_string(),
                })
            })
    }
}

pub(super) fn workflow(
    service: ScriptedService,
) -> (Arc<PredictionWorkflow<ScriptedService>>, Arc<ScriptedService>) {
    let service = Arc::new(service);
    let workflow = Arc::new(PredictionWorkflow::new(service.clone()));
    (workflow, service)
}

pub(super) fn unreachable() -> PredictionError {
    PredictionError::Unreachable {
        detail: "connection refused".to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

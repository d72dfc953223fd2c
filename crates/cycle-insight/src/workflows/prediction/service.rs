use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::client::{PredictionError, PredictionService};
use super::domain::{PredictionRequest, PredictionResponse};
use super::form::FormState;
use super::presenter::{ResultSummary, ResultView};
use super::validation::FieldErrors;

/// Oldest results are dropped once this many are held.
const RETAINED_RESULTS: usize = 1024;

/// Handle to one stored result. Only the caller that submitted the form
/// receives it, so a result is never shown to anyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(Uuid);

impl ResultId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ResultId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// A completed submission: the summary plus the handle to fetch it again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedResult {
    pub result_id: ResultId,
    #[serde(flatten)]
    pub summary: ResultSummary,
}

#[derive(Debug, Default)]
struct ResultStore {
    entries: HashMap<ResultId, PredictionResponse>,
    order: VecDeque<ResultId>,
}

impl ResultStore {
    fn insert(&mut self, id: ResultId, response: PredictionResponse) {
        if self.order.len() == RETAINED_RESULTS {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(id);
        self.entries.insert(id, response);
    }
}

/// Service composing the validator, request builder, prediction client, and
/// result presenter.
pub struct PredictionWorkflow<S> {
    service: Arc<S>,
    results: Mutex<ResultStore>,
}

impl<S> PredictionWorkflow<S>
where
    S: PredictionService + 'static,
{
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            results: Mutex::new(ResultStore::default()),
        }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Validate, build, call, and present. Validation finishes before the
    /// single outbound call starts; invalid forms never reach the service.
    pub async fn submit(&self, form: &FormState) -> Result<SubmittedResult, SubmissionError> {
        let response = self.request_prediction(form).await?;
        let summary = ResultSummary::from_response(&response);
        let result_id = ResultId::generate();
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(result_id, response);
        Ok(SubmittedResult { result_id, summary })
    }

    /// Raw service response for a form. Nothing is stored.
    pub async fn request_prediction(
        &self,
        form: &FormState,
    ) -> Result<PredictionResponse, SubmissionError> {
        let request = match PredictionRequest::from_form(form) {
            Ok(request) => request,
            Err(errors) => {
                info!(
                    failing_fields = errors.len(),
                    "prediction form rejected by validation"
                );
                return Err(SubmissionError::Invalid(errors));
            }
        };

        self.dispatch(&request)
            .await
            .map_err(SubmissionError::Prediction)
    }

    /// Send an already built request to the service.
    pub async fn dispatch(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        match self.service.predict(request).await {
            Ok(response) => {
                info!(
                    prediction = u8::from(response.prediction),
                    probability = response.probability,
                    "prediction completed"
                );
                Ok(response)
            }
            Err(error) => {
                warn!(kind = error.kind(), %error, "prediction failed");
                Err(error)
            }
        }
    }

    /// Result view for a handle returned by [`submit`](Self::submit).
    /// Unknown or evicted handles show the missing-result state.
    pub fn result(&self, id: &ResultId) -> ResultView {
        let guard = self.results.lock().unwrap_or_else(PoisonError::into_inner);
        ResultView::from_response(guard.entries.get(id))
    }
}

/// Error raised when a submission does not produce a result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("form has invalid fields: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use cycle_insight::workflows::prediction::{
    HttpPredictionClient, PredictionError, PredictionWorkflow,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type HttpWorkflow = PredictionWorkflow<HttpPredictionClient>;

/// Workflow backed by the HTTP client pointed at `base_url`.
pub(crate) fn http_workflow(base_url: &str) -> Result<Arc<HttpWorkflow>, PredictionError> {
    let client = Arc::new(HttpPredictionClient::new(base_url)?);
    Ok(Arc::new(PredictionWorkflow::new(client)))
}

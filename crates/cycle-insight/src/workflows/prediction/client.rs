use std::future::Future;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use super::domain::{PredictionRequest, PredictionResponse, ServiceErrorBody};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const PREDICT_PATH: &str = "predict";

pub const UNREACHABLE_MESSAGE: &str =
    "Unable to connect to the prediction server. Please ensure the backend is running.";
pub const REJECTED_FALLBACK_MESSAGE: &str = "Prediction failed.";
pub const CLIENT_FAULT_MESSAGE: &str = "An error occurred while making the prediction.";

/// Uniform failure of a prediction call. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    /// The service answered with a non-success status or an unusable body.
    #[error("{message}")]
    ServerRejected { status: u16, message: String },
    /// No response arrived: connection failure or timeout.
    #[error("{}", UNREACHABLE_MESSAGE)]
    Unreachable { detail: String },
    /// The request never left the client.
    #[error("{}", CLIENT_FAULT_MESSAGE)]
    ClientFault { detail: String },
}

impl PredictionError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::ServerRejected { .. } => "server_rejected",
            PredictionError::Unreachable { .. } => "unreachable",
            PredictionError::ClientFault { .. } => "client_fault",
        }
    }

    fn rejected(status: u16, message: Option<String>) -> Self {
        let message = message
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_string());
        PredictionError::ServerRejected { status, message }
    }
}

/// Outbound seam to the prediction model so workflows can run against doubles.
pub trait PredictionService: Send + Sync {
    fn predict(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionResponse, PredictionError>> + Send;
}

/// HTTP/JSON client for `POST {base}/predict`.
///
/// The base address is read once when a call starts, so
/// [`update_base_address`](Self::update_base_address) only affects later calls.
#[derive(Debug)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    base_url: RwLock<String>,
}

impl HttpPredictionClient {
    pub fn new(base_url: &str) -> Result<Self, PredictionError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, PredictionError> {
        let base_url = parse_base_address(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PredictionError::ClientFault {
                detail: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self {
            http,
            base_url: RwLock::new(base_url),
        })
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Point subsequent calls at a different service. Calls already in
    /// flight keep the address they started with.
    pub fn update_base_address(&self, new_url: &str) -> Result<(), PredictionError> {
        let normalized = parse_base_address(new_url)?;
        let mut guard = self
            .base_url
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(previous = %guard.as_str(), next = %normalized, "prediction base address updated");
        *guard = normalized;
        Ok(())
    }

    fn endpoint(&self) -> Result<Url, PredictionError> {
        let base = self.base_url();
        Url::parse(&format!("{base}/{PREDICT_PATH}")).map_err(|err| PredictionError::ClientFault {
            detail: format!("invalid prediction endpoint: {err}"),
        })
    }
}

impl PredictionService for HttpPredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        let endpoint = self.endpoint()?;
        debug!(%endpoint, "dispatching prediction request");

        let response = self
            .http
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .json::<ServiceErrorBody>()
                .await
                .unwrap_or_default();
            warn!(status = status.as_u16(), "prediction service rejected request");
            return Err(PredictionError::rejected(status.as_u16(), body.message));
        }

        response
            .json::<PredictionResponse>()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    PredictionError::Unreachable {
                        detail: err.to_string(),
                    }
                } else {
                    warn!(error = %err, "prediction response violated the wire contract");
                    PredictionError::rejected(status.as_u16(), None)
                }
            })
    }
}

fn classify_transport_error(err: reqwest::Error) -> PredictionError {
    if err.is_builder() {
        PredictionError::ClientFault {
            detail: err.to_string(),
        }
    } else {
        PredictionError::Unreachable {
            detail: err.to_string(),
        }
    }
}

/// Validate an `http`/`https` base address and strip trailing slashes.
pub fn parse_base_address(raw: &str) -> Result<String, PredictionError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|err| PredictionError::ClientFault {
        detail: format!("invalid prediction base address '{raw}': {err}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(PredictionError::ClientFault {
            detail: format!("unsupported scheme '{other}' for prediction base address"),
        }),
    }
}

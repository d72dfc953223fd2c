//! Integration tests for the HTTP prediction client.
//!
//! Each scenario runs a stand-in prediction service on a loopback port so the
//! client's classification of transport, status, and body failures is
//! exercised over a real socket.

mod common {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;
    use tokio::net::TcpListener;

    use cycle_insight::workflows::prediction::{LifeStage, PredictionRequest};

    /// Canned reply of the stand-in service.
    #[derive(Clone)]
    pub(super) struct Reply {
        pub(super) status: StatusCode,
        pub(super) body: String,
        pub(super) delay: Option<Duration>,
    }

    impl Reply {
        pub(super) fn json(status: StatusCode, body: Value) -> Self {
            Self {
                status,
                body: body.to_string(),
                delay: None,
            }
        }

        pub(super) fn raw(status: StatusCode, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                delay: None,
            }
        }

        pub(super) fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[derive(Clone)]
    struct MockState {
        reply: Reply,
        received: Arc<Mutex<Vec<Value>>>,
    }

    pub(super) struct MockBackend {
        pub(super) base_url: String,
        received: Arc<Mutex<Vec<Value>>>,
    }

    impl MockBackend {
        pub(super) fn received(&self) -> Vec<Value> {
            self.received.lock().expect("received mutex poisoned").clone()
        }
    }

    async fn predict_handler(
        State(state): State<MockState>,
        Json(body): Json<Value>,
    ) -> (StatusCode, [(&'static str, &'static str); 1], String) {
        state
            .received
            .lock()
            .expect("received mutex poisoned")
            .push(body);
        if let Some(delay) = state.reply.delay {
            tokio::time::sleep(delay).await;
        }
        (
            state.reply.status,
            [("content-type", "application/json")],
            state.reply.body.clone(),
        )
    }

    pub(super) async fn spawn_backend(reply: Reply) -> MockBackend {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            received: received.clone(),
        };
        let app = Router::new()
            .route("/predict", post(predict_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend serves");
        });

        MockBackend {
            base_url: format!("http://{addr}"),
            received,
        }
    }

    /// Address that was bound once and then released, so nothing listens.
    pub(super) async fn closed_address() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        addr
    }

    pub(super) fn request() -> PredictionRequest {
        PredictionRequest {
            age: 28.0,
            bmi: 22.5,
            life_stage: LifeStage::Reproductive,
            tracking_duration_months: 12,
            pain_score: 5.0,
            avg_cycle_length: 28.0,
            cycle_length_variation: 3.0,
            avg_bleeding_days: 5.0,
            bleeding_volume_score: 3.0,
            intermenstrual_episodes: 0,
            cycle_variation_coeff: 0.15,
            pattern_disruption_score: 2.5,
        }
    }
}

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::{closed_address, request, spawn_backend, Reply};
use cycle_insight::workflows::prediction::{
    CycleClassification, HttpPredictionClient, PredictionError, PredictionService,
    REJECTED_FALLBACK_MESSAGE, UNREACHABLE_MESSAGE,
};

#[tokio::test]
async fn successful_call_returns_parsed_response() {
    let backend = spawn_backend(Reply::json(
        StatusCode::OK,
        json!({
            "prediction": 1,
            "probability": 0.85,
            "irregularity_types": ["Oligomenorrhea"]
        }),
    ))
    .await;
    let client = HttpPredictionClient::new(&backend.base_url).expect("client builds");

    let response = client.predict(&request()).await.expect("prediction succeeds");

    assert_eq!(response.prediction, CycleClassification::Irregular);
    assert_eq!(response.probability, 0.85);
    assert_eq!(response.irregularity_types, vec!["Oligomenorrhea"]);

    let received = backend.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["life_stage"], "reproductive");
    assert_eq!(received[0]["tracking_duration_months"], 12);
    assert_eq!(received[0]["cycle_variation_coeff"], 0.15);
}

#[tokio::test]
async fn missing_irregularity_types_defaults_to_empty() {
    let backend = spawn_backend(Reply::json(
        StatusCode::OK,
        json!({ "prediction": 0, "probability": 0.12 }),
    ))
    .await;
    let client = HttpPredictionClient::new(&backend.base_url).expect("client builds");

    let response = client.predict(&request()).await.expect("prediction succeeds");

    assert_eq!(response.prediction, CycleClassification::Regular);
    assert!(response.irregularity_types.is_empty());
}

#[tokio::test]
async fn rejection_passes_service_message_through() {
    let backend = spawn_backend(Reply::json(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "message": "Invalid input" }),
    ))
    .await;
    let client = HttpPredictionClient::new(&backend.base_url).expect("client builds");

    let error = client.predict(&request()).await.expect_err("service rejects");

    assert_eq!(
        error,
        PredictionError::ServerRejected {
            status: 422,
            message: "Invalid input".to_string(),
        }
    );
    assert_eq!(error.to_string(), "Invalid input");
}

#[tokio::test]
async fn rejection_without_message_uses_fallback() {
    let backend = spawn_backend(Reply::json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": "traceback" }),
    ))
    .await;
    let client = HttpPredictionClient::new(&backend.base_url).expect("client builds");

    let error = client.predict(&request()).await.expect_err("service fails");

    assert_eq!(error.to_string(), REJECTED_FALLBACK_MESSAGE);
    assert!(matches!(
        error,
        PredictionError::ServerRejected { status: 500, .. }
    ));
}

#[tokio::test]
async fn rejection_with_non_json_body_uses_fallback() {
    let backend = spawn_backend(Reply::raw(StatusCode::BAD_GATEWAY, "<html>oops</html>")).await;
    let client = HttpPredictionClient::new(&backend.base_url).expect("client builds");

    let error = client.predict(&request()).await.expect_err("service fails");

    assert_eq!(error.to_string(), REJECTED_FALLBACK_MESSAGE);
}

#[tokio::test]
async fn malformed_success_body_is_a_rejection() {
    let backend = spawn_backend(Reply::json(
        StatusCode::OK,
        json!({ "prediction": 2, "probability": 0.5 }),
    ))
    .await;
    let client = HttpPredictionClient::new(&backend.base_url).expect("client builds");

    let error = client.predict(&request()).await.expect_err("body is invalid");

    assert_eq!(
        error,
        PredictionError::ServerRejected {
            status: 200,
            message: REJECTED_FALLBACK_MESSAGE.to_string(),
        }
    );
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let addr = closed_address().await;
    let client = HttpPredictionClient::new(&format!("http://{addr}")).expect("client builds");

    let error = client.predict(&request()).await.expect_err("nothing listens");

    assert!(matches!(error, PredictionError::Unreachable { .. }));
    assert_eq!(error.to_string(), UNREACHABLE_MESSAGE);
}

#[tokio::test]
async fn slow_service_times_out_as_unreachable() {
    let backend = spawn_backend(
        Reply::json(StatusCode::OK, json!({ "prediction": 0, "probability": 0.1 }))
            .delayed(Duration::from_secs(2)),
    )
    .await;
    let client = HttpPredictionClient::with_timeout(&backend.base_url, Duration::from_millis(200))
        .expect("client builds");

    let error = client.predict(&request()).await.expect_err("call times out");

    assert!(matches!(error, PredictionError::Unreachable { .. }));
}

#[tokio::test]
async fn base_address_update_applies_to_next_call() {
    let regular = spawn_backend(Reply::json(
        StatusCode::OK,
        json!({ "prediction": 0, "probability": 0.12 }),
    ))
    .await;
    let irregular = spawn_backend(Reply::json(
        StatusCode::OK,
        json!({ "prediction": 1, "probability": 0.9, "irregularity_types": [] }),
    ))
    .await;
    let client = HttpPredictionClient::new(&regular.base_url).expect("client builds");

    let first = client.predict(&request()).await.expect("first call");
    assert!(!first.is_irregular());

    client
        .update_base_address(&format!("{}/", irregular.base_url))
        .expect("valid address");
    assert_eq!(client.base_url(), irregular.base_url);

    let second = client.predict(&request()).await.expect("second call");
    assert!(second.is_irregular());
    assert_eq!(regular.received().len(), 1);
    assert_eq!(irregular.received().len(), 1);
}

#[tokio::test]
async fn invalid_base_address_keeps_previous_one() {
    let backend = spawn_backend(Reply::json(
        StatusCode::OK,
        json!({ "prediction": 0, "probability": 0.2 }),
    ))
    .await;
    let client = HttpPredictionClient::new(&backend.base_url).expect("client builds");

    let error = client
        .update_base_address("ftp://models.internal")
        .expect_err("scheme is unsupported");

    assert!(matches!(error, PredictionError::ClientFault { .. }));
    assert_eq!(client.base_url(), backend.base_url);
    client.predict(&request()).await.expect("old address still used");
}

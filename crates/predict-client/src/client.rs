use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use protocol::{ErrorBody, FormInput, HealthResponse, PredictResponse, HEALTH_PATH, PREDICT_PATH};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::TransportError;
use crate::Predictor;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// HTTP client for the prediction service.
///
/// Every call is a single attempt with no client-side timeout; a service that
/// never answers keeps the future pending.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    http: Client,
    predict_url: String,
    health_url: String,
}

impl PredictionClient {
    pub fn new(endpoint: &str) -> Result<Self, TransportError> {
        let predict_url = join_base_path(endpoint, PREDICT_PATH)?;
        let health_url = join_base_path(endpoint, HEALTH_PATH)?;
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            predict_url,
            health_url,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    pub async fn predict(&self, input: &FormInput) -> Result<PredictResponse, TransportError> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            event = "predict.request",
            request_id,
            url = %self.predict_url,
            "sending prediction request"
        );
        let response = self
            .http
            .post(&self.predict_url)
            .header(CONTENT_TYPE, "application/json")
            .json(input)
            .send()
            .await
            .map_err(|err| log_failure(request_id, err.into()))?;
        let decoded: PredictResponse = read_json(response)
            .await
            .map_err(|err| log_failure(request_id, err))?;
        tracing::info!(
            event = "predict.response",
            request_id,
            prediction = %decoded.prediction,
            probability = ?decoded.probability,
            "prediction received"
        );
        if let Some(features) = &decoded.used_features {
            tracing::debug!(
                event = "predict.used_features",
                request_id,
                features = ?features,
            );
        }
        Ok(decoded)
    }

    pub async fn health(&self) -> Result<HealthResponse, TransportError> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        tracing::info!(event = "health.request", request_id, url = %self.health_url);
        let response = self
            .http
            .get(&self.health_url)
            .send()
            .await
            .map_err(|err| log_failure(request_id, err.into()))?;
        read_json(response)
            .await
            .map_err(|err| log_failure(request_id, err))
    }
}

#[async_trait]
impl Predictor for PredictionClient {
    async fn predict(&self, input: &FormInput) -> Result<PredictResponse, TransportError> {
        PredictionClient::predict(self, input).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|body| body.error);
        return Err(TransportError::Status {
            status: status.as_u16(),
            detail,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

fn log_failure(request_id: u64, err: TransportError) -> TransportError {
    tracing::warn!(
        event = "http.transport_error",
        request_id,
        kind = err.kind(),
        error = %err,
        "exchange with prediction service failed"
    );
    err
}

fn join_base_path(base: &str, path: &str) -> Result<String, TransportError> {
    let trimmed = base.trim();
    if trimmed.is_empty() {
        return Err(TransportError::InvalidEndpoint {
            endpoint: base.to_string(),
            reason: "endpoint is empty".to_string(),
        });
    }
    let joined = format!("{}{}", trimmed.trim_end_matches('/'), path);
    reqwest::Url::parse(&joined).map_err(|err| TransportError::InvalidEndpoint {
        endpoint: base.to_string(),
        reason: err.to_string(),
    })?;
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use protocol::Field;
    use serde_json::{json, Value};
    use std::collections::BTreeSet;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    struct Seen {
        bodies: Arc<Mutex<Vec<Value>>>,
        content_types: Arc<Mutex<Vec<String>>>,
        accept_headers: Arc<Mutex<Vec<String>>>,
    }

    async fn spawn_stub(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    fn recording_router(seen: Seen, reply: Value) -> Router {
        Router::new()
            .route(
                "/predict",
                post(
                    move |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let content_type = headers
                                .get("content-type")
                                .and_then(|value| value.to_str().ok())
                                .unwrap_or_default()
                                .to_string();
                            seen.content_types.lock().unwrap().push(content_type);
                            if let Some(accept) = headers.get("accept") {
                                let accept = accept.to_str().unwrap_or_default().to_string();
                                seen.accept_headers.lock().unwrap().push(accept);
                            }
                            seen.bodies.lock().unwrap().push(body);
                            Json(reply)
                        }
                    },
                ),
            )
            .with_state(seen)
    }

    #[test]
    fn join_base_path_normalizes_slashes() {
        assert_eq!(
            join_base_path("http://localhost:5000/", "/predict").unwrap(),
            "http://localhost:5000/predict"
        );
        assert_eq!(
            join_base_path("http://10.0.0.2:8080/api", "/predict").unwrap(),
            "http://10.0.0.2:8080/api/predict"
        );
        assert!(join_base_path("  ", "/predict").is_err());
        assert!(join_base_path("not a url", "/predict").is_err());
    }

    #[tokio::test]
    async fn predict_posts_exactly_the_schema_once() {
        let seen = Seen::default();
        let base = spawn_stub(recording_router(
            seen.clone(),
            json!({"prediction": "YES", "probability": 0.87}),
        ))
        .await;
        let client = PredictionClient::new(&base).unwrap();

        let response = client.predict(&FormInput::default()).await.unwrap();
        assert_eq!(response, PredictResponse::new("YES", Some(0.87)));

        let bodies = seen.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        let body = bodies[0].as_object().expect("json object");
        let keys: BTreeSet<&str> = body.keys().map(String::as_str).collect();
        let schema: BTreeSet<&str> = Field::ALL.iter().map(|field| field.name()).collect();
        assert_eq!(keys, schema);
        assert!(body.values().all(Value::is_string));
        assert_eq!(
            seen.content_types.lock().unwrap().as_slice(),
            ["application/json".to_string()]
        );
        assert!(seen.accept_headers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn edited_field_is_the_only_change_in_body() {
        let seen = Seen::default();
        let base = spawn_stub(recording_router(
            seen.clone(),
            json!({"prediction": "NO", "probability": 0.12}),
        ))
        .await;
        let client = PredictionClient::new(&base).unwrap();

        let mut input = FormInput::default();
        client.predict(&input).await.unwrap();
        input.set(Field::AnnualPremium, "25000");
        client.predict(&input).await.unwrap();

        let bodies = seen.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        for field in Field::ALL {
            let first = &bodies[0][field.name()];
            let second = &bodies[1][field.name()];
            if field == Field::AnnualPremium {
                assert_eq!(first, "40000");
                assert_eq!(second, "25000");
            } else {
                assert_eq!(first, second, "{field} changed");
            }
        }
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = PredictionClient::new(&format!("http://{addr}")).unwrap();

        let err = client.predict(&FormInput::default()).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)), "{err:?}");
    }

    #[tokio::test]
    async fn non_success_status_keeps_service_detail() {
        let router = Router::new().route(
            "/predict",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Processing error: could not convert"})),
                )
            }),
        );
        let client = PredictionClient::new(&spawn_stub(router).await).unwrap();

        let err = client.predict(&FormInput::default()).await.unwrap_err();
        match err {
            TransportError::Status { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail.as_deref(), Some("Processing error: could not convert"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    fn counting_router(hits: Arc<AtomicUsize>, status: StatusCode, body: &'static str) -> Router {
        Router::new().route(
            "/predict",
            post(move || {
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (status, body)
                }
            }),
        )
    }

    #[tokio::test]
    async fn server_error_is_attempted_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = counting_router(Arc::clone(&hits), StatusCode::INTERNAL_SERVER_ERROR, "");
        let client = PredictionClient::new(&spawn_stub(router).await).unwrap();

        let err = client.predict(&FormInput::default()).await.unwrap_err();
        assert!(
            matches!(err, TransportError::Status { status: 500, .. }),
            "{err:?}"
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn undecodable_body_is_attempted_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = counting_router(Arc::clone(&hits), StatusCode::OK, "<html>oops</html>");
        let client = PredictionClient::new(&spawn_stub(router).await).unwrap();

        let err = client.predict(&FormInput::default()).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)), "{err:?}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let router = Router::new().route("/predict", post(|| async { "<html>oops</html>" }));
        let client = PredictionClient::new(&spawn_stub(router).await).unwrap();

        let err = client.predict(&FormInput::default()).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn missing_label_is_a_decode_error() {
        let router = Router::new().route(
            "/predict",
            post(|| async { Json(json!({"probability": 0.4})) }),
        );
        let client = PredictionClient::new(&spawn_stub(router).await).unwrap();

        let err = client.predict(&FormInput::default()).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn health_reads_expected_features() {
        let router = Router::new().route(
            "/health",
            get(|| async {
                Json(json!({
                    "status": "ok",
                    "features_expected": ["Gender_Male", "Vintage"]
                }))
            }),
        );
        let client = PredictionClient::new(&spawn_stub(router).await).unwrap();

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.features_expected, vec!["Gender_Male", "Vintage"]);
    }
}

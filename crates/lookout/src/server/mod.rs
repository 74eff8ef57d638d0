//! HTTP boundary: JSON routes over the core pipeline.
//!
//! - `GET  /health`
//! - `POST /ai/question`: `{detections, question}` → `{answer}`
//! - `POST /detections/normalize`: `{boxes}` → `{detections, dropped}`

mod error;
mod handlers;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use lookout_core::Lookout;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub lookout: Arc<Lookout>,
}

/// Build the router. `frontend_origin` is the single browser origin CORS allows.
pub fn router(lookout: Lookout, frontend_origin: &str) -> Router {
    let state = AppState {
        lookout: Arc::new(lookout),
    };

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/ai/question", post(handlers::ask_question))
        .route("/detections/normalize", post(handlers::normalize_detections))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        ),
        Err(_) => {
            tracing::warn!("Invalid frontend origin {frontend_origin:?}; CORS disabled");
            app
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(
    lookout: Lookout,
    addr: SocketAddr,
    frontend_origin: &str,
) -> anyhow::Result<()> {
    let app = router(lookout, frontend_origin);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Lookout listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use lookout_core::{
        Answer, AnswerFailure, AnswerProvider, AskOptions, ClassTable, DetectionSet, Normalizer,
        QaService, Question,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Provider double returning a fixed answer and recording what it was asked.
    struct FixedProvider {
        answer: Answer,
        call_count: Arc<AtomicU32>,
        seen: Arc<Mutex<Vec<DetectionSet>>>,
    }

    #[async_trait]
    impl AnswerProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-v1"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn answer(&self, detections: &DetectionSet, _question: &Question) -> Answer {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(detections.clone());
            self.answer.clone()
        }
    }

    struct Harness {
        app: Router,
        call_count: Arc<AtomicU32>,
        seen: Arc<Mutex<Vec<DetectionSet>>>,
    }

    fn harness(answer: Answer) -> Harness {
        let call_count = Arc::new(AtomicU32::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = FixedProvider {
            answer,
            call_count: call_count.clone(),
            seen: seen.clone(),
        };
        let lookout = Lookout::from_parts(
            Normalizer::new(ClassTable::coco()),
            QaService::new(Box::new(provider), AskOptions::default()),
        );
        Harness {
            app: router(lookout, "http://localhost:3000"),
            call_count,
            seen,
        }
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(Answer::success("unused"));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = h.app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "fixed");
    }

    #[tokio::test]
    async fn test_question_success() {
        let h = harness(Answer::success("A cat."));
        let (status, body) = post_json(
            h.app,
            "/ai/question",
            json!({
                "detections": [{"class": "cat", "confidence": 0.92, "bbox": [10, 10, 50, 50]}],
                "question": "What animal is this?"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"answer": "A cat."}));
        assert_eq!(h.call_count.load(Ordering::SeqCst), 1);
        let seen = h.seen.lock().unwrap();
        assert_eq!(seen[0].as_slice()[0].label(), "cat");
    }

    #[tokio::test]
    async fn test_question_normalizes_raw_boxes_before_asking() {
        let h = harness(Answer::success("ok"));
        let (status, _) = post_json(
            h.app,
            "/ai/question",
            json!({
                "detections": [
                    {"cls": 16, "conf": 1.3, "xyxy": [[50, 50, 10, 10]]},
                    {"conf": 0.4, "xyxy": [0, 0, 1, 1]}
                ],
                "question": "Is there a dog?"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let seen = h.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 1);
        let dog = &seen[0].as_slice()[0];
        assert_eq!(dog.label(), "dog");
        assert_eq!(dog.confidence(), 1.0);
        assert_eq!(dog.bounding_box(), [10.0, 10.0, 50.0, 50.0]);
    }

    #[tokio::test]
    async fn test_empty_question_rejected_before_provider() {
        let h = harness(Answer::success("unused"));
        let (status, body) = post_json(
            h.app,
            "/ai/question",
            json!({"detections": [], "question": "  "}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_request");
        assert_eq!(h.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_detections_rejected() {
        let h = harness(Answer::success("unused"));
        let (status, body) =
            post_json(h.app, "/ai/question", json!({"question": "Is there a dog?"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("detections"));
        assert_eq!(h.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_detections_still_answered() {
        let h = harness(Answer::success("No dog."));
        let (status, body) = post_json(
            h.app,
            "/ai/question",
            json!({"detections": [], "question": "Is there a dog?"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "No dog.");
        assert!(h.seen.lock().unwrap()[0].is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_is_200_with_message() {
        let h = harness(Answer::Failure(AnswerFailure::Unconfigured {
            provider: "openai".to_string(),
            message: "OpenAI API key not configured. Set OPENAI_API_KEY in env.".to_string(),
        }));
        let (status, body) = post_json(
            h.app,
            "/ai/question",
            json!({"detections": [], "question": "Anything?"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["answer"].as_str().unwrap().contains("OPENAI_API_KEY"));
        assert_eq!(body["error"], "provider_unconfigured");
    }

    #[tokio::test]
    async fn test_malformed_is_200_with_raw_payload() {
        let h = harness(Answer::Failure(AnswerFailure::MalformedResponse {
            provider: "openai".to_string(),
            raw: r#"{"choices":[]}"#.to_string(),
        }));
        let (status, body) = post_json(
            h.app,
            "/ai/question",
            json!({"detections": [], "question": "Anything?"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], r#"{"choices":[]}"#);
        assert_eq!(body["error"], "provider_malformed_response");
    }

    #[tokio::test]
    async fn test_unavailable_is_502_with_upstream_detail() {
        let h = harness(Answer::Failure(AnswerFailure::Unavailable {
            provider: "openai".to_string(),
            status_code: Some(500),
            body: "internal meltdown".to_string(),
        }));
        let (status, body) = post_json(
            h.app,
            "/ai/question",
            json!({"detections": [], "question": "Anything?"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "provider_unavailable");
        assert_eq!(body["upstream_status"], 500);
        assert_eq!(body["upstream_body"], "internal meltdown");
        assert!(body.get("answer").is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let h = harness(Answer::success("unused"));
        let (status, body) = post_json(h.app, "/ai/question", json!({"question": 5})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_request");
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert_eq!(h.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_normalize_rejects_non_json_body() {
        let h = harness(Answer::success("unused"));
        let request = Request::builder()
            .method("POST")
            .uri("/detections/normalize")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = h.app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "invalid_request");
    }

    #[tokio::test]
    async fn test_normalize_endpoint_reports_drops() {
        let h = harness(Answer::success("unused"));
        let (status, body) = post_json(
            h.app,
            "/detections/normalize",
            json!({"boxes": [
                {"class": 0, "confidence": 0.8, "bbox": [1, 2, 3, 4]},
                {"class": 0, "confidence": 0.8}
            ]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dropped"], 1);
        assert_eq!(body["detections"][0]["label"], "person");
        assert_eq!(body["detections"][0]["bbox"], json!([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(h.call_count.load(Ordering::SeqCst), 0);
    }
}

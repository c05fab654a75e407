pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::responses::handlers as responses;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route(
            "/api/generate-interview-questions",
            post(generation::handle_generate_questions),
        )
        .route(
            "/api/generate-analytics",
            post(generation::handle_generate_analytics),
        )
        // Responses API
        .route("/api/get-call", post(responses::handle_get_call))
        .route(
            "/api/responses/:call_id",
            get(responses::handle_get_response).delete(responses::handle_delete_response),
        )
        .route(
            "/api/responses/:call_id/status",
            patch(responses::handle_update_status),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Environment;
    use crate::generation::generator::StructuredGenerator;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::ModelInvocationConfig;
    use crate::store::memory::fixtures::{interview, response};
    use crate::store::{MemoryStore, ResponseStore};

    const ANALYTICS_REPLY: &str = r#"{
        "overallScore": 64,
        "overallFeedback": "Reasonable answers.",
        "communication": {"score": 6, "feedback": "Rambling at times."},
        "questionSummaries": []
    }"#;

    struct Harness {
        client: Arc<ScriptedGenerator>,
        store: Arc<MemoryStore>,
        router: Router,
    }

    fn harness(client: ScriptedGenerator, api_key: Option<&str>, env: Environment) -> Harness {
        let client = Arc::new(client);
        let store = Arc::new(MemoryStore::default());
        store.insert_response(response("call_1", "int_1"));
        store.insert_interview(interview("int_1", &["Explain ownership."]));

        let state = AppState {
            generator: StructuredGenerator::new(
                client.clone(),
                api_key.map(String::from),
                ModelInvocationConfig::json("gemini-2.0-flash"),
                env,
            ),
            responses: store.clone(),
            interviews: store.clone(),
        };
        Harness {
            client,
            store,
            router: build_router(state),
        }
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(b) => Body::from(b.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(ScriptedGenerator::default(), None, Environment::Production);
        let (status, body) = send(&h.router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_generate_questions_returns_question_objects() {
        let h = harness(
            ScriptedGenerator::replying([r#"["Q1","Q2","Q3","Q4","Q5"]"#]),
            Some("key"),
            Environment::Production,
        );
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/generate-interview-questions",
            Some(json!({"jobTitle": "Backend Engineer", "description": "...", "questionCount": 5})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let questions = body["response"].as_array().unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0], json!({"question": "Q1"}));
    }

    #[tokio::test]
    async fn test_generate_questions_with_prose_reply_is_generic_500() {
        let h = harness(
            ScriptedGenerator::replying([r#"Sure! Here's your JSON: {"questions": []}"#]),
            Some("key"),
            Environment::Development,
        );
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/generate-interview-questions",
            Some(json!({"jobTitle": "Backend Engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Invalid response format from AI");
        assert!(!body.to_string().contains("Sure!"));
    }

    #[tokio::test]
    async fn test_prose_reply_is_logged_but_not_returned() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let h = harness(
            ScriptedGenerator::replying([r#"Sure! Here's your JSON: {"questions": []}"#]),
            Some("key"),
            Environment::Production,
        );
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/generate-interview-questions",
            Some(json!({"jobTitle": "Backend Engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("Sure! Here's your JSON"));
        let logged = logs.contents();
        assert!(logged.contains("Invalid JSON response from model"));
        assert!(logged.contains("Sure! Here's your JSON"));
    }

    #[tokio::test]
    async fn test_generate_questions_keeps_wrapped_description() {
        let h = harness(
            ScriptedGenerator::replying([
                r#"{"questions": [{"question": "Q1"}], "description": "Screening for backend"}"#,
            ]),
            Some("key"),
            Environment::Production,
        );
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/generate-interview-questions",
            Some(json!({"jobTitle": "Backend Engineer", "questionCount": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["response"],
            json!({"questions": [{"question": "Q1"}], "description": "Screening for backend"})
        );
    }

    #[tokio::test]
    async fn test_generate_questions_without_key_is_500_and_no_model_call() {
        let h = harness(
            ScriptedGenerator::replying([r#"["Q1"]"#]),
            None,
            Environment::Production,
        );
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/generate-interview-questions",
            Some(json!({"jobTitle": "Backend Engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "GEMINI_API_KEY is not configured");
        assert_eq!(h.client.calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_details_only_outside_production() {
        for (env, expect_details) in [(Environment::Development, true), (Environment::Production, false)] {
            let h = harness(
                ScriptedGenerator::failing(crate::llm_client::LlmError::Api {
                    status: 503,
                    message: "The model is overloaded.".to_string(),
                }),
                Some("key"),
                env,
            );
            let (status, body) = send(
                &h.router,
                "POST",
                "/api/generate-interview-questions",
                Some(json!({"jobTitle": "SRE"})),
            )
            .await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], "The model is overloaded.");
            assert_eq!(body.get("details").is_some(), expect_details);
        }
    }

    #[tokio::test]
    async fn test_analytics_computed_once_then_served_from_store() {
        let h = harness(
            ScriptedGenerator::replying([ANALYTICS_REPLY]),
            Some("key"),
            Environment::Production,
        );
        let request = json!({"callId": "call_1", "interviewId": "int_1", "transcript": "Agent: Hi\nUser: Hello"});

        let (status, first) = send(&h.router, "POST", "/api/generate-analytics", Some(request.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["status"], 200);
        assert_eq!(first["analytics"]["mainInterviewQuestions"], json!(["Explain ownership."]));

        let (status, second) = send(&h.router, "POST", "/api/generate-analytics", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["analytics"], first["analytics"]);
        assert_eq!(h.client.calls(), 1);
    }

    #[tokio::test]
    async fn test_analytics_reply_is_returned_as_sent() {
        let h = harness(
            ScriptedGenerator::replying([
                r#"{"overallScore": 70, "problemSolving": {"score": 6}, "questionSummaries": []}"#,
            ]),
            Some("key"),
            Environment::Production,
        );
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/generate-analytics",
            Some(json!({"callId": "call_1", "interviewId": "int_1", "transcript": "hi"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analytics"]["overallScore"], json!(70));
        assert!(body["analytics"]["overallScore"].is_u64());
        assert_eq!(body["analytics"]["problemSolving"], json!({"score": 6}));
        assert!(body["analytics"].get("communication").is_none());

        let row = h.store.get_by_call_id("call_1").await.unwrap().unwrap();
        assert_eq!(row.analytics, Some(body["analytics"].clone()));
    }

    #[tokio::test]
    async fn test_analytics_for_unknown_call_reports_status_500() {
        let h = harness(
            ScriptedGenerator::replying([ANALYTICS_REPLY]),
            Some("key"),
            Environment::Production,
        );
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/generate-analytics",
            Some(json!({"callId": "nope", "interviewId": "int_1", "transcript": "hi"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert!(body["error"].as_str().unwrap().contains("nope"));
        assert_eq!(h.client.calls(), 0);
    }

    #[tokio::test]
    async fn test_analytics_failure_reports_status_500() {
        let h = harness(
            ScriptedGenerator::replying(["not json"]),
            Some("key"),
            Environment::Production,
        );
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/generate-analytics",
            Some(json!({"callId": "call_1", "interviewId": "int_1", "transcript": "hi"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert!(body["error"].is_string());
        let row = h.store.get_by_call_id("call_1").await.unwrap().unwrap();
        assert!(row.analytics.is_none());
    }

    #[tokio::test]
    async fn test_get_call_returns_details_and_memoized_analytics() {
        let h = harness(ScriptedGenerator::default(), None, Environment::Production);
        h.store
            .save_analytics("call_1", &json!({"overallScore": 88}))
            .await
            .unwrap();

        let (status, body) = send(&h.router, "POST", "/api/get-call", Some(json!({"id": "call_1"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analytics"], json!({"overallScore": 88}));
        assert_eq!(body["callResponse"]["recording_url"], "https://example.com/rec.wav");
        assert_eq!(h.client.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_call_returns_details_when_analytics_fail() {
        let h = harness(ScriptedGenerator::default(), None, Environment::Production);

        let (status, body) = send(&h.router, "POST", "/api/get-call", Some(json!({"id": "call_1"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["callResponse"]["recording_url"], "https://example.com/rec.wav");
        assert!(body["analytics"].is_null());
        assert_eq!(h.client.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_call_for_unknown_id_is_404() {
        let h = harness(ScriptedGenerator::default(), None, Environment::Production);
        let (status, body) = send(&h.router, "POST", "/api/get-call", Some(json!({"id": "nope"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_status_update_get_and_delete() {
        let h = harness(ScriptedGenerator::default(), None, Environment::Production);

        let (status, _) = send(
            &h.router,
            "PATCH",
            "/api/responses/call_1/status",
            Some(json!({"candidateStatus": "POTENTIAL"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&h.router, "GET", "/api/responses/call_1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidateStatus"], "POTENTIAL");
        assert_eq!(body["interviewId"], "int_1");

        let (status, _) = send(&h.router, "DELETE", "/api/responses/call_1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&h.router, "DELETE", "/api/responses/call_1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::learning::handlers as learning;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/roles", get(learning::handle_list_roles))
        // Profile API
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        .route(
            "/api/v1/profile/extract-skills",
            post(profile::handle_extract_skills),
        )
        // Learning API
        .route("/api/v1/gaps", get(learning::handle_get_gaps))
        .route(
            "/api/v1/recommendations",
            get(learning::handle_get_recommendations),
        )
        .route(
            "/api/v1/modules/complete",
            post(learning::handle_complete_module),
        )
        .route("/api/v1/leaderboard", get(learning::handle_leaderboard))
        // Assessment API
        .route("/api/v1/assessments", post(assessment::handle_generate_quiz))
        .route(
            "/api/v1/assessments/:id/submit",
            post(assessment::handle_submit_quiz),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::assessment::generator::MockQuestionGenerator;
    use crate::config::Config;
    use crate::profile::memory::InMemoryProfileStore;
    use crate::skills::benchmark::BenchmarkCatalog;

    fn test_app() -> Router {
        build_router(AppState {
            store: Arc::new(InMemoryProfileStore::new()),
            question_generator: Arc::new(MockQuestionGenerator),
            catalog: Arc::new(BenchmarkCatalog::default()),
            llm: None,
            config: Config::default(),
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn put_frontend_profile(app: &Router, user_id: Uuid) {
        let (status, _) = send(
            app,
            Method::PUT,
            "/api/v1/profile",
            Some(json!({
                "user_id": user_id,
                "email": "dev@example.com",
                "target_role": "Frontend Developer",
                "skills": [
                    {"name": "HTML", "level": 5},
                    {"name": "CSS", "level": 5},
                    {"name": "JavaScript", "level": 5},
                    {"name": "React", "level": 4},
                    {"name": "Tailwind CSS", "level": 3},
                    {"name": "Node.js", "level": 1}
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&test_app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "maverick-api");
    }

    #[tokio::test]
    async fn test_roles_lists_catalog() {
        let (status, body) = send(&test_app(), Method::GET, "/api/v1/roles", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["role"], "Frontend Developer");
    }

    #[tokio::test]
    async fn test_missing_profile_uses_error_envelope() {
        let uri = format!("/api/v1/profile?user_id={}", Uuid::new_v4());
        let (status, body) = send(&test_app(), Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_profile_gaps_and_recommendations() {
        let app = test_app();
        let user_id = Uuid::new_v4();
        put_frontend_profile(&app, user_id).await;

        let (status, profile) =
            send(&app, Method::GET, &format!("/api/v1/profile?user_id={user_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["workflow"]["stage"], "assessment_pending");
        assert_eq!(profile["workflow"]["progress_percent"], 25);

        let (status, gaps) =
            send(&app, Method::GET, &format!("/api/v1/gaps?user_id={user_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(gaps["gaps"].as_array().unwrap().len(), 7);
        assert_eq!(gaps["gaps"][5]["skill"], "Node.js");
        assert_eq!(gaps["gaps"][5]["gap_percent"], 50.0);

        let (status, recs) = send(
            &app,
            Method::GET,
            &format!("/api/v1/recommendations?user_id={user_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let modules = recs["modules"].as_array().unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0]["module_name"], "Databases Fundamentals");
        assert_eq!(modules[1]["module_name"], "Node.js Fundamentals");
    }

    #[tokio::test]
    async fn test_comma_separated_skills_accepted() {
        let app = test_app();
        let user_id = Uuid::new_v4();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/profile",
            Some(json!({"user_id": user_id, "skills": "Python, SQL", "target_role": "Data Scientist"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"].as_array().unwrap().len(), 2);
        assert_eq!(body["skills"][0]["level"], 3);
    }

    #[tokio::test]
    async fn test_gaps_without_target_role_is_validation_error() {
        let app = test_app();
        let user_id = Uuid::new_v4();
        send(
            &app,
            Method::PUT,
            "/api/v1/profile",
            Some(json!({"user_id": user_id, "skills": "Go"})),
        )
        .await;
        let (status, body) =
            send(&app, Method::GET, &format!("/api/v1/gaps?user_id={user_id}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_module_completion_and_leaderboard() {
        let app = test_app();
        let user_id = Uuid::new_v4();
        put_frontend_profile(&app, user_id).await;

        let request = json!({"user_id": user_id, "module_name": "Node.js Fundamentals"});
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/modules/complete",
            Some(request.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "awarded");
        assert_eq!(body["total_points"], 50);

        let (_, again) =
            send(&app, Method::POST, "/api/v1/modules/complete", Some(request)).await;
        assert_eq!(again["outcome"], "already_completed");
        assert_eq!(again["total_points"], 50);

        let (status, board) = send(&app, Method::GET, "/api/v1/leaderboard?limit=5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(board[0]["user_id"], user_id.to_string());
        assert_eq!(board[0]["points"], 50);
        assert_eq!(board[0]["rank"], 1);
    }

    #[tokio::test]
    async fn test_leaderboard_rejects_zero_limit() {
        let (status, _) = send(&test_app(), Method::GET, "/api/v1/leaderboard?limit=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_quiz_generate_and_submit() {
        let app = test_app();
        let user_id = Uuid::new_v4();
        put_frontend_profile(&app, user_id).await;

        let (status, quiz) = send(
            &app,
            Method::POST,
            "/api/v1/assessments",
            Some(json!({"user_id": user_id, "skill": "Node.js", "kind": "mcq", "count": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quiz["generator_backend"], "mock");
        let questions = quiz["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions[0].get("correct_answer").is_none());

        let quiz_id = quiz["quiz_id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/assessments/{quiz_id}/submit");
        let answers = json!({"user_id": user_id, "answers": {"0": "Paris", "1": "Paris"}});
        let (status, result) = send(&app, Method::POST, &uri, Some(answers.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["passed"], true);
        assert_eq!(result["level_change"]["previous"], 1);
        assert_eq!(result["level_change"]["current"], 2);

        let (status, body) = send(&app, Method::POST, &uri, Some(answers)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_malformed_requests_use_error_envelope() {
        let app = test_app();
        let user_id = Uuid::new_v4();

        let cases = [
            (
                Method::PUT,
                "/api/v1/profile".to_string(),
                Some(json!({"user_id": user_id, "skills": [{"name": "Go", "level": -1}]})),
            ),
            (Method::GET, "/api/v1/gaps?user_id=not-a-uuid".to_string(), None),
            (Method::GET, "/api/v1/leaderboard?limit=lots".to_string(), None),
            (
                Method::POST,
                "/api/v1/assessments/not-a-uuid/submit".to_string(),
                Some(json!({"user_id": user_id, "answers": {}})),
            ),
            (
                Method::POST,
                format!("/api/v1/assessments/{}/submit", Uuid::new_v4()),
                Some(json!({"user_id": user_id, "answers": {"0": 42}})),
            ),
        ];

        for (method, uri, body) in cases {
            let (status, body) = send(&app, method, &uri, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_missing_json_content_type_uses_error_envelope() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/modules/complete")
            .body(Body::from("{}"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extract_skills_unavailable_without_llm() {
        let boundary = "maverick-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n%PDF-1.4\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/profile/extract-skills")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

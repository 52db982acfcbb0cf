//! HTTP API 통합 테스트
//!
//! 인메모리 SQLite 위에 실제 라우터를 만들고 `oneshot`으로 요청을 한 건씩 보냅니다.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use kursora::{db, AppState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    pool: SqlitePool,
}

impl TestApp {
    async fn new() -> Self {
        let pool = db::connect_in_memory().await.unwrap();
        let state = AppState {
            pool: pool.clone(),
            jwt_secret: "test-secret".to_string(),
        };
        let router = kursora::app(state, "target/test-media");
        Self { router, pool }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// 회원가입 후 (user_id, access_token)
    async fn register(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "correct-horse",
                    "password_confirm": "correct-horse",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        (
            body["user"]["id"].as_str().unwrap().to_string(),
            body["access_token"].as_str().unwrap().to_string(),
        )
    }

    async fn register_admin(&self, username: &str) -> String {
        let (user_id, token) = self.register(username).await;
        assert!(db::users::set_staff(&self.pool, &user_id, true).await.unwrap());
        token
    }

    /// 관리자 API로 공개 강의를 만들고 ID를 반환합니다.
    async fn published_course(&self, admin: &str, title: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/admin/courses",
                Some(admin),
                json!({
                    "title": title,
                    "description": "About it",
                    "price": 49.999,
                    "status": "published",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    async fn add_lesson(&self, admin: &str, course_id: &str, order: i64, seconds: i64) -> Value {
        let (status, body) = self
            .post(
                &format!("/api/v1/admin/courses/{}/lessons", course_id),
                Some(admin),
                json!({
                    "title": format!("Lesson {}", order),
                    "description": "",
                    "order": order,
                    "content": "secret content",
                    "duration_seconds": seconds,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn register_login_and_me() {
    let app = TestApp::new().await;
    app.register("jasur").await;

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "username": "jasur", "password": "correct-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "jasur");
    assert!(me.get("password_hash").is_none());

    let (status, _) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "username": "jasur", "password": "wrong-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_mismatched_passwords_and_duplicates() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "username": "kamron",
                "email": "kamron@example.com",
                "password": "correct-horse",
                "password_confirm": "different-horse",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    app.register("kamron").await;
    let (status, _) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "username": "kamron",
                "email": "other@example.com",
                "password": "correct-horse",
                "password_confirm": "correct-horse",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_api_requires_staff() {
    let app = TestApp::new().await;
    let (_, student) = app.register("student").await;

    let (status, _) = app.get("/api/v1/admin/courses", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/v1/admin/courses", Some(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");
}

#[tokio::test]
async fn lesson_changes_update_course_stats() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let course_id = app.published_course(&admin, "Rust Web").await;

    app.add_lesson(&admin, &course_id, 1, 3600).await;
    let second = app.add_lesson(&admin, &course_id, 2, 1800).await;

    let uri = format!("/api/v1/admin/courses/{}", course_id);
    let (_, body) = app.get(&uri, Some(&admin)).await;
    assert_eq!(body["course"]["total_hours"], json!(1.5));
    assert_eq!(body["course"]["lessons_count"], json!(2));
    assert_eq!(body["course"]["price"], json!(50.0));
    assert_eq!(body["course"]["total_duration_formatted"], "1 hour 30 minutes");

    let lesson_uri = format!("/api/v1/admin/lessons/{}", second["id"].as_str().unwrap());
    let (status, _) = app
        .patch(&lesson_uri, Some(&admin), json!({ "duration_seconds": 5400 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&uri, Some(&admin)).await;
    assert_eq!(body["course"]["total_hours"], json!(2.5));

    let (status, _) = app.delete(&lesson_uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = app.get(&uri, Some(&admin)).await;
    assert_eq!(body["course"]["total_hours"], json!(1.0));
    assert_eq!(body["course"]["lessons_count"], json!(1));
}

#[tokio::test]
async fn duplicate_lesson_order_is_a_conflict() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let course_id = app.published_course(&admin, "Dup").await;
    app.add_lesson(&admin, &course_id, 1, 60).await;

    let (status, body) = app
        .post(
            &format!("/api/v1/admin/courses/{}/lessons", course_id),
            Some(&admin),
            json!({ "title": "Again", "description": "", "order": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn enrolling_twice_keeps_one_enrollment() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let (_, student) = app.register("shoira").await;
    let course_id = app.published_course(&admin, "Tokio").await;
    let first = app.add_lesson(&admin, &course_id, 1, 600).await;

    let uri = format!("/api/v1/courses/{}/enroll", course_id);
    let (status, body) = app.post(&uri, Some(&student), json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], json!(true));
    assert_eq!(body["first_lesson_id"], first["id"]);

    let (status, again) = app.post(&uri, Some(&student), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["created"], json!(false));
    assert_eq!(again["enrollment"]["id"], body["enrollment"]["id"]);

    let (_, list) = app
        .get(&format!("/api/v1/admin/courses/{}/enrollments", course_id), Some(&admin))
        .await;
    assert_eq!(list["enrollments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn draft_course_cannot_be_enrolled() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let (_, student) = app.register("ulugbek").await;
    let (_, draft) = app
        .post(
            "/api/v1/admin/courses",
            Some(&admin),
            json!({ "title": "Draft", "description": "wip" }),
        )
        .await;

    let uri = format!("/api/v1/courses/{}/enroll", draft["id"].as_str().unwrap());
    let (status, _) = app.post(&uri, Some(&student), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn premium_lessons_are_locked_until_enrolled() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let (_, student) = app.register("zarina").await;
    let course_id = app.published_course(&admin, "Async").await;
    let mut lessons = Vec::new();
    for order in 1..=4 {
        lessons.push(app.add_lesson(&admin, &course_id, order, 300).await);
    }

    let premium_uri = format!(
        "/api/v1/courses/{}/lessons/{}",
        course_id,
        lessons[3]["id"].as_str().unwrap()
    );
    let (status, body) = app.get(&premium_uri, Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lesson"]["locked"], json!(true));
    assert_eq!(body["lesson"]["is_free"], json!(false));
    assert_eq!(body["lesson"]["content"], "");

    let free_uri = format!(
        "/api/v1/courses/{}/lessons/{}",
        course_id,
        lessons[2]["id"].as_str().unwrap()
    );
    let (_, body) = app.get(&free_uri, Some(&student)).await;
    assert_eq!(body["lesson"]["locked"], json!(false));
    assert_eq!(body["lesson"]["content"], "secret content");

    app.post(&format!("/api/v1/courses/{}/enroll", course_id), Some(&student), json!({}))
        .await;
    let (_, body) = app.get(&premium_uri, Some(&student)).await;
    assert_eq!(body["lesson"]["locked"], json!(false));
    assert_eq!(body["is_enrolled"], json!(true));
    assert_eq!(body["lessons"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn progress_out_of_range_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let (_, student) = app.register("bekzod").await;
    let course_id = app.published_course(&admin, "Progress").await;
    let (_, enrolled) = app
        .post(&format!("/api/v1/courses/{}/enroll", course_id), Some(&student), json!({}))
        .await;
    let uri = format!(
        "/api/v1/admin/enrollments/{}",
        enrolled["enrollment"]["id"].as_str().unwrap()
    );

    let (status, _) = app.patch(&uri, Some(&admin), json!({ "progress": 120.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .patch(&uri, Some(&admin), json!({ "progress": 100.0, "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert!(body["completed_at"].is_string());

    let (_, profile) = app.get("/api/v1/profile", Some(&student)).await;
    assert_eq!(profile["completed_courses_count"], json!(1));
    assert_eq!(profile["certificates_count"], json!(1));
    assert_eq!(profile["enrolled_courses_count"], json!(0));
}

#[tokio::test]
async fn deleting_category_keeps_course() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let (status, category) = app
        .post("/api/v1/admin/categories", Some(&admin), json!({ "name": "Backend" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_str().unwrap();

    let (_, course) = app
        .post(
            "/api/v1/admin/courses",
            Some(&admin),
            json!({
                "title": "Axum",
                "description": "Web",
                "category_id": category_id,
                "status": "published",
            }),
        )
        .await;

    let (_, listed) = app
        .get(&format!("/api/v1/courses?category={}", category_id), None)
        .await;
    assert_eq!(listed["courses"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .delete(&format!("/api/v1/admin/categories/{}", category_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app
        .get(&format!("/api/v1/admin/courses/{}", course["id"].as_str().unwrap()), Some(&admin))
        .await;
    assert_eq!(body["course"]["category_id"], Value::Null);
}

#[tokio::test]
async fn portfolio_pages_and_counts() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let (_, category) = app
        .post(
            "/api/v1/admin/portfolio-categories",
            Some(&admin),
            json!({ "title": "Web Apps", "icon": "fas fa-globe" }),
        )
        .await;
    assert_eq!(category["slug"], "web-apps");
    let category_id = category["id"].as_str().unwrap();

    for i in 0..14 {
        let (status, _) = app
            .post(
                "/api/v1/admin/portfolios",
                Some(&admin),
                json!({
                    "title": format!("Project {}", i),
                    "description": "Demo",
                    "category_id": category_id,
                    "technologies": "Rust, Axum",
                    "is_featured": i == 0,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, first) = app.get("/api/v1/portfolio", None).await;
    assert_eq!(first["portfolios"].as_array().unwrap().len(), 12);
    assert_eq!(first["portfolios"][0]["title"], "Project 0");
    assert_eq!(first["portfolios"][0]["technologies_list"], json!(["Rust", "Axum"]));
    assert_eq!(first["total_count"], json!(14));
    assert_eq!(first["categories"][0]["count"], json!(14));

    let (_, last) = app.get("/api/v1/portfolio?page=99", None).await;
    assert_eq!(last["page"]["number"], json!(2));
    assert_eq!(last["portfolios"].as_array().unwrap().len(), 2);

    let (_, fallback) = app.get("/api/v1/portfolio?page=abc", None).await;
    assert_eq!(fallback["page"]["number"], json!(1));

    let (_, below_range) = app.get("/api/v1/portfolio?page=0", None).await;
    assert_eq!(below_range["page"]["number"], json!(2));

    let (_, other) = app
        .post(
            "/api/v1/admin/portfolio-categories",
            Some(&admin),
            json!({ "title": "CLI Tools", "icon": "fas fa-terminal" }),
        )
        .await;
    let other_id = other["id"].as_str().unwrap();
    let (status, _) = app
        .post(
            "/api/v1/admin/portfolios",
            Some(&admin),
            json!({
                "title": "Terminal app",
                "description": "Demo",
                "category_id": other_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, filtered) = app
        .get(&format!("/api/v1/portfolio?category={}", other_id), None)
        .await;
    assert_eq!(filtered["portfolios"].as_array().unwrap().len(), 1);
    assert_eq!(filtered["total_count"], json!(1));
    assert_eq!(filtered["page"]["num_pages"], json!(1));

    let (status, _) = app
        .delete(&format!("/api/v1/admin/portfolio-categories/{}", category_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, home) = app.get("/api/v1/home", None).await;
    assert_eq!(home["featured_portfolios"].as_array().unwrap().len(), 3);
    assert_eq!(home["total_portfolios"], json!(15));
}

//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 인증 관련 (회원가입, 로그인, 토큰 갱신, 로그아웃)
//! - `courses`: 공개 강의 카탈로그, 레슨 보기, 수강 신청
//! - `admin`: 관리자 전용 카탈로그 관리 (카테고리, 강의, 레슨, 수강 신청)
//! - `admin_portfolio`: 관리자 전용 포트폴리오 관리
//! - `portfolio`: 공개 포트폴리오 갤러리
//! - `profile`: 내 프로필과 학습 통계
//! - `home`: 홈 화면 요약
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod admin;
pub mod admin_portfolio;
pub mod auth;
pub mod courses;
pub mod health;
pub mod home;
pub mod portfolio;
pub mod profile;

use axum::{
    routing::{get, patch, post},
    Router,
};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
}

/// `/api/v1` 아래에 붙는 API 라우터
pub fn api_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let public_routes = Router::new()
        .route("/home", get(home::home))
        .route("/courses", get(courses::list_courses))
        .route("/courses/{id}", get(courses::get_course))
        .route("/courses/{id}/lessons/{lesson_id}", get(courses::view_lesson))
        .route("/courses/{id}/enroll", post(courses::enroll))
        .route("/portfolio", get(portfolio::list_portfolio))
        .route("/profile", get(profile::get_profile).patch(profile::update_profile))
        .route("/health", get(health::health_check));

    // 모든 핸들러가 AdminUser extractor로 관리자 권한을 확인합니다.
    let admin_routes = Router::new()
        .route("/categories", get(admin::list_categories).post(admin::create_category))
        .route(
            "/categories/{id}",
            patch(admin::update_category).delete(admin::delete_category),
        )
        .route("/courses", get(admin::list_courses).post(admin::create_course))
        .route(
            "/courses/{id}",
            get(admin::get_course)
                .patch(admin::update_course)
                .delete(admin::delete_course),
        )
        .route(
            "/courses/{id}/lessons",
            get(admin::list_lessons).post(admin::create_lesson),
        )
        .route(
            "/lessons/{id}",
            patch(admin::update_lesson).delete(admin::delete_lesson),
        )
        .route("/courses/{id}/enrollments", get(admin::list_enrollments))
        .route("/enrollments/{id}", patch(admin::update_enrollment))
        .route(
            "/portfolio-categories",
            get(admin_portfolio::list_categories).post(admin_portfolio::create_category),
        )
        .route(
            "/portfolio-categories/{id}",
            patch(admin_portfolio::update_category).delete(admin_portfolio::delete_category),
        )
        .route(
            "/portfolios",
            get(admin_portfolio::list_portfolios).post(admin_portfolio::create_portfolio),
        )
        .route(
            "/portfolios/{id}",
            get(admin_portfolio::get_portfolio)
                .patch(admin_portfolio::update_portfolio)
                .delete(admin_portfolio::delete_portfolio),
        );

    Router::new()
        .merge(auth_routes)
        .merge(public_routes)
        .nest("/admin", admin_routes)
        .with_state(state)
}

/// 빈 문자열이나 공백만 있는 필수 텍스트 필드를 거부합니다.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), crate::error::AppError> {
    if value.trim().is_empty() {
        return Err(crate::error::AppError::BadRequest(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

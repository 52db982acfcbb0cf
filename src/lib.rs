//! # Kursora
//!
//! 강의 카탈로그, 수강 신청, 포트폴리오 갤러리를 제공하는 axum + SQLite 백엔드입니다.
//! 바이너리(`main.rs`)와 통합 테스트(`tests/`)가 같은 라우터를 사용하도록
//! 라우터 조립은 이 라이브러리에 둡니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use routes::AppState;

/// 전체 애플리케이션 라우터
///
/// - `/api/v1/...`: JSON API
/// - `/media/...`: 업로드된 강의 이미지, 레슨 영상, 아바타 등 정적 파일
pub fn app(state: AppState, media_path: &str) -> Router {
    // 개발 편의를 위해 모든 출처를 허용합니다. 운영에서는 도메인을 지정해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", routes::api_router(state))
        .nest_service("/media", ServeDir::new(media_path))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

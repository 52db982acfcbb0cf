//! # Kursora 웹 서버 진입점
//!
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성과 마이그레이션
//! 4. 미디어 디렉토리 생성
//! 5. 라우터 설정과 HTTP 서버 시작

use anyhow::Result;
use kursora::{config::Config, db, AppState};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 kursora, tower_http, axum 모듈을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kursora=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting Kursora server on {}:{}", config.host, config.port);

    // 연결 5개, 마이그레이션은 connect 안에서 실행됩니다.
    let pool = db::connect(&config.database_url, 5).await?;

    let media_path = Path::new(&config.media_path);
    if !media_path.exists() {
        tokio::fs::create_dir_all(media_path).await?;
        tracing::info!("Created media directory: {}", config.media_path);
    }

    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
    };
    let app = kursora::app(state, &config.media_path);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

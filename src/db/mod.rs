//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `categories`: 강의 카테고리 CRUD
//! - `courses`: 강의 CRUD (삭제 시 레슨/수강 신청 CASCADE)
//! - `lessons`: 레슨 CRUD와 강의 통계 재계산(`record_lesson_change`)
//! - `enrollments`: 수강 신청 get-or-create와 상태/진도 관리
//! - `portfolio`: 포트폴리오 카테고리와 프로젝트
//! - `stats`: 홈 화면 집계
//! - `users`: 사용자 인증과 프로필

pub mod categories;
pub mod courses;
pub mod enrollments;
pub mod lessons;
pub mod portfolio;
pub mod stats;
pub mod users;

pub use categories::*;
pub use courses::*;
pub use enrollments::*;
pub use lessons::*;
pub use portfolio::*;
pub use stats::*;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// SQLite 연결 풀을 만들고 마이그레이션을 실행합니다.
///
/// sqlx는 SQLite 연결마다 `PRAGMA foreign_keys = ON`을 켜므로
/// ON DELETE CASCADE / SET NULL / RESTRICT 규칙이 그대로 적용됩니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// `./migrations` 폴더의 SQL 파일 중 아직 실행되지 않은 것만 순서대로 실행합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// 테스트용 인메모리 DB.
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 연결을 1개로 고정하고,
/// 유휴 연결이 닫히면서 DB가 사라지지 않도록 타임아웃을 끕니다.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//! - `AppError::from_constraint`: SQLite 제약조건 위반을 409 Conflict로 분류

use axum::{
    http::StatusCode,                     // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response},   // Axum의 응답 변환 트레이트
    Json,                                 // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    /// 범위를 벗어난 진도율, 비밀번호 불일치 등 검증 실패에 사용합니다.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환.
    /// 제약조건 위반은 `from_constraint`를 거쳐 Conflict로 바뀝니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 없음 (HTTP 403) - 로그인은 했지만 관리자가 아닌 경우
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 리소스 충돌 (HTTP 409)
    /// 같은 강의 안의 레슨 순서 중복, 이름 중복 등 제약조건 위반
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// sqlx 에러 중 UNIQUE / FOREIGN KEY 제약조건 위반을 `Conflict`로 변환합니다.
    ///
    /// 그 외의 에러는 그대로 `Database`로 감쌉니다.
    /// `message`는 클라이언트에 그대로 노출되므로 내부 정보를 담지 않아야 합니다.
    ///
    /// ```ignore
    /// sqlx::query("INSERT ...")
    ///     .execute(pool)
    ///     .await
    ///     .map_err(|e| AppError::from_constraint(e, "Lesson order already used"))?;
    /// ```
    pub fn from_constraint(err: sqlx::Error, message: &str) -> Self {
        // as_database_error(): 드라이버가 보고한 DB 에러일 때만 Some
        let violated = err
            .as_database_error()
            .map(|db_err| db_err.is_unique_violation() || db_err.is_foreign_key_violation())
            .unwrap_or(false);

        if violated {
            tracing::debug!("Constraint violation: {}", err);
            AppError::Conflict(message.to_string())
        } else {
            AppError::Database(err)
        }
    }

    /// 부모 행을 참조하는 INSERT용: FOREIGN KEY 위반은 `NotFound`,
    /// UNIQUE 위반은 `Conflict(message)`, 그 외는 `Database`.
    pub fn from_child_insert(err: sqlx::Error, message: &str) -> Self {
        let missing_parent = err
            .as_database_error()
            .map(|db_err| db_err.is_foreign_key_violation())
            .unwrap_or(false);

        if missing_parent {
            tracing::debug!("Referenced row is missing: {}", err);
            AppError::NotFound
        } else {
            AppError::from_constraint(err, message)
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, IO, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                )
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Conflict(ref msg) => {
                (StatusCode::CONFLICT, "conflict", msg.clone())
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

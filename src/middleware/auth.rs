//! # JWT 인증 extractor
//!
//! - `AuthUser`: `Authorization: Bearer <access token>` 헤더를 검증합니다.
//!   학생용 API(강의 상세, 레슨 보기, 수강 신청, 프로필)에 사용합니다.
//! - `AdminUser`: `AuthUser` 검증 후 DB에서 `is_staff`를 확인합니다.
//!   `/admin` 아래 모든 API에 사용하며, 관리자가 아니면 403입니다.
//!
//! 액세스 토큰은 15분, 리프레시 토큰은 7일간 유효합니다.
//! 리프레시 토큰은 DB에 SHA-256 해시로만 저장합니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::{db::users as db_users, error::AppError, routes::AppState};

/// 액세스 토큰 유효 시간
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
/// 리프레시 토큰 유효 시간
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = verify_token(token, &state.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// 관리자(staff) 사용자
///
/// 토큰 검증 실패는 `AuthError`(401), 관리자가 아니면 `AppError::Forbidden`(403).
/// 토큰 발급 뒤 계정이 삭제된 경우도 401로 처리합니다.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
            .await
            .map_err(IntoResponse::into_response)?
            .ok_or_else(|| {
                AppError::Unauthorized("User no longer exists".to_string()).into_response()
            })?;

        if !user.is_staff {
            tracing::debug!("User {} tried to access admin API", user.username);
            return Err(
                AppError::Forbidden("Staff privileges are required".to_string()).into_response(),
            );
        }

        Ok(AdminUser { user_id: user.id })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn issue_token(
    user_id: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_access_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(user_id, secret, Duration::minutes(ACCESS_TOKEN_TTL_MINUTES))
}

pub fn create_refresh_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(user_id, secret, Duration::days(REFRESH_TOKEN_TTL_DAYS))
}

/// 서명과 만료 시간을 검증합니다. 액세스/리프레시 토큰 모두 같은 형식입니다.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let token = create_access_token("user-1", "secret").unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL_MINUTES * 60);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = create_refresh_token("user-1", "secret").unwrap();
        assert!(matches!(verify_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let token = issue_token("user-1", "secret", Duration::minutes(-10)).unwrap();
        assert!(matches!(verify_token(&token, "secret"), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn token_hash_is_hex_sha256() {
        let hash = hash_token("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("abc"));
    }
}

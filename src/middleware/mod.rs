//! 요청 전처리 계층. 현재는 JWT 인증 extractor만 있습니다.

pub mod auth;

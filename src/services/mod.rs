//! # 서비스 모듈
//!
//! DB나 HTTP에 의존하지 않는 도메인 로직을 모아둔 모듈입니다.
//! - `duration`: 재생 시간 표시 문자열과 `total_hours` 계산

pub mod duration;

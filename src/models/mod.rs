//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `course`: 강의(Course)와 카테고리(Category)
//! - `lesson`: 레슨(Lesson)과 무료 레슨 규칙
//! - `enrollment`: 수강 신청(Enrollment)
//! - `portfolio`: 포트폴리오 갤러리
//! - `stats`: 홈 화면과 프로필 집계
//! - `user`: 사용자(User)와 프로필
//!
//! `pub use X::*;`로 재공개하므로 `crate::models::Course`처럼 짧게 접근할 수 있습니다.

pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod portfolio;
pub mod stats;
pub mod user;

pub use course::*;
pub use enrollment::*;
pub use lesson::*;
pub use portfolio::*;
pub use stats::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// PATCH 요청에서 "필드 누락"과 "null"을 구분하기 위한 역직렬화 함수
///
/// `#[serde(default, deserialize_with = "double_option")]`와 함께 사용합니다.
/// - 필드 누락 → `None` (변경 안 함)
/// - `null` → `Some(None)` (값 비우기)
/// - 값 → `Some(Some(v))`
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

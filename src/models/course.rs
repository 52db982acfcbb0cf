//! # 강의(Course)와 카테고리(Category) 모델
//!
//! - `Category`: 강의를 묶는 이름 있는 분류 (중첩 없음)
//! - `Course`: 판매 단위가 되는 강의. `total_hours`, `lessons_count`는
//!   레슨에서 계산되는 **파생 필드**이므로 요청 구조체에는 존재하지 않습니다.

use serde::{Deserialize, Serialize};

use super::double_option;
use crate::services::duration;

/// 강의 카테고리: DB의 `categories` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// 관리자 목록용: 카테고리 + 소속 강의 수
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub courses_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

/// 강의 난이도
///
/// `sqlx::Type`: SQLite에는 TEXT로 저장됩니다 ("beginner" 등).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// 강의 공개 상태. `Published`인 강의만 목록에 노출되고 수강 신청이 가능합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// 강의 엔티티: DB의 `courses` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    /// 카테고리가 삭제되면 None이 됩니다 (ON DELETE SET NULL)
    pub category_id: Option<String>,
    pub price: f64,
    pub level: CourseLevel,
    pub status: CourseStatus,
    /// MEDIA_PATH 기준 상대 경로
    pub image: Option<String>,
    /// 파생 필드: round(레슨 길이 합 / 3600, 2)
    pub total_hours: f64,
    /// 파생 필드: 레슨 개수
    pub lessons_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Course {
    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    /// 저장된 `total_hours`를 "H hours M minutes" 형태로 표시합니다.
    pub fn total_duration_formatted(&self) -> String {
        duration::format_hours(self.total_hours)
    }
}

/// 응답용 강의 표현: 원본 필드 + 표시용 총 시간 문자열
#[derive(Debug, Clone, Serialize)]
pub struct CourseView {
    #[serde(flatten)]
    pub course: Course,
    pub total_duration_formatted: String,
}

impl From<Course> for CourseView {
    fn from(course: Course) -> Self {
        let total_duration_formatted = course.total_duration_formatted();
        Self {
            course,
            total_duration_formatted,
        }
    }
}

/// 강의 생성 요청 (관리자)
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    pub category_id: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub level: CourseLevel,
    #[serde(default)]
    pub status: CourseStatus,
    pub image: Option<String>,
}

/// 강의 수정 요청 (부분 업데이트)
///
/// `category_id`, `image`: 필드 누락 = 변경 안 함, `null` = 비우기
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<String>>,
    pub price: Option<f64>,
    pub level: Option<CourseLevel>,
    pub status: Option<CourseStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
}

/// `GET /courses?category=...` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct CourseListQuery {
    pub category: Option<String>,
}

/// 가격 검증: 음수 불가, 소수점 둘째 자리까지 반올림
pub fn normalize_price(price: f64) -> Option<f64> {
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    Some((price * 100.0).round() / 100.0)
}

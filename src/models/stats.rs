//! 집계 응답 구조체 (홈 화면, 학생 학습 통계)

use serde::Serialize;

use super::{CourseView, PortfolioView};

/// 사이트 전체 카운터
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteTotals {
    /// 수강 신청한 적이 있는 학생 수 (중복 제거)
    pub total_students: i64,
    /// 공개 강의 수
    pub total_courses: i64,
    /// 활성 포트폴리오 수
    pub total_portfolios: i64,
}

/// `GET /home` 응답
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub latest_courses: Vec<CourseView>,
    pub featured_portfolios: Vec<PortfolioView>,
    #[serde(flatten)]
    pub totals: SiteTotals,
}

/// 한 학생의 진행 중 강의 합계
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, sqlx::FromRow)]
pub struct LearningTotals {
    pub total_lessons: i64,
    pub total_hours: f64,
}

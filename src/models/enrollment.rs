//! # 수강 신청(Enrollment) 모델
//!
//! 학생과 강의의 연결 레코드입니다. (student_id, course_id) 쌍은 유일하며,
//! 상태 전이(active → completed / cancelled)는 외부에서 요청으로만 일어납니다.

use serde::{Deserialize, Serialize};

use super::Course;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
    /// 진도율 (0 ~ 100)
    pub progress: f64,
    pub enrolled_at: String,
    pub completed_at: Option<String>,
}

/// `POST /courses/{id}/enroll` 응답
#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    pub enrollment: Enrollment,
    /// 이번 요청으로 새로 생성되었으면 true, 이미 신청되어 있었으면 false
    pub created: bool,
    /// 새로 신청한 경우 바로 이동할 첫 레슨
    pub first_lesson_id: Option<String>,
}

/// 프로필 화면용: 수강 신청 + 강의 정보
#[derive(Debug, Serialize)]
pub struct EnrolledCourse {
    pub enrollment: Enrollment,
    pub course: Course,
}

/// 관리자의 수강 상태/진도 수정 요청
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEnrollmentRequest {
    pub status: Option<EnrollmentStatus>,
    pub progress: Option<f64>,
}

/// 진도율은 저장 전에 [0, 100] 범위인지 검사합니다.
pub fn validate_progress(progress: f64) -> Result<f64, String> {
    if progress.is_finite() && (0.0..=100.0).contains(&progress) {
        Ok(progress)
    } else {
        Err(format!("Progress must be between 0 and 100, got {}", progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bounds_are_inclusive() {
        assert_eq!(validate_progress(0.0), Ok(0.0));
        assert_eq!(validate_progress(100.0), Ok(100.0));
        assert_eq!(validate_progress(42.5), Ok(42.5));
    }

    #[test]
    fn progress_outside_range_is_rejected() {
        assert!(validate_progress(-0.1).is_err());
        assert!(validate_progress(100.5).is_err());
        assert!(validate_progress(f64::INFINITY).is_err());
    }
}

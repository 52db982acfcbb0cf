//! # 집계 쿼리
//!
//! 홈 화면 카운터와 프로필의 학습 통계를 계산합니다.
//! 강의별 합계는 이미 `courses`에 저장된 파생 필드를 그대로 더합니다.

use crate::db::{count_distinct_students, count_published_courses};
use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 홈 화면 카운터 3종
pub async fn site_totals(pool: &SqlitePool) -> Result<SiteTotals, AppError> {
    let total_students = count_distinct_students(pool).await?;
    let total_courses = count_published_courses(pool).await?;
    let total_portfolios = crate::db::count_active_portfolios(pool, None).await?;

    Ok(SiteTotals {
        total_students,
        total_courses,
        total_portfolios,
    })
}

/// 학생의 진행 중(active) 수강 강의들의 레슨 수와 총 시간 합계
pub async fn active_learning_totals(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<LearningTotals, AppError> {
    let totals = sqlx::query_as::<_, LearningTotals>(
        r#"
        SELECT COALESCE(SUM(c.lessons_count), 0) AS total_lessons,
               COALESCE(SUM(c.total_hours), 0.0) AS total_hours
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        WHERE e.student_id = ? AND e.status = 'active'
        "#,
    )
    .bind(student_id)
    .fetch_one(pool)
    .await?;

    Ok(LearningTotals {
        total_lessons: totals.total_lessons,
        total_hours: (totals.total_hours * 100.0).round() / 100.0,
    })
}

/// 수강 신청과 강의를 한 번에 읽기 위한 JOIN 행
#[derive(sqlx::FromRow)]
struct EnrolledCourseRow {
    #[sqlx(flatten)]
    course: Course,
    enrollment_id: String,
    student_id: String,
    enrollment_status: EnrollmentStatus,
    progress: f64,
    enrolled_at: String,
    completed_at: Option<String>,
}

impl From<EnrolledCourseRow> for EnrolledCourse {
    fn from(row: EnrolledCourseRow) -> Self {
        Self {
            enrollment: Enrollment {
                id: row.enrollment_id,
                student_id: row.student_id,
                course_id: row.course.id.clone(),
                status: row.enrollment_status,
                progress: row.progress,
                enrolled_at: row.enrolled_at,
                completed_at: row.completed_at,
            },
            course: row.course,
        }
    }
}

/// 특정 상태의 수강 신청을 강의 정보와 함께 조회합니다 (최신 신청순).
pub async fn list_enrolled_courses(
    pool: &SqlitePool,
    student_id: &str,
    status: EnrollmentStatus,
) -> Result<Vec<EnrolledCourse>, AppError> {
    let rows = sqlx::query_as::<_, EnrolledCourseRow>(
        r#"
        SELECT c.id, c.title, c.description, c.short_description, c.category_id,
               c.price, c.level, c.status, c.image, c.total_hours, c.lessons_count,
               c.created_at, c.updated_at,
               e.id AS enrollment_id, e.student_id, e.status AS enrollment_status,
               e.progress, e.enrolled_at, e.completed_at
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        WHERE e.student_id = ? AND e.status = ?
        ORDER BY e.enrolled_at DESC, e.id DESC
        "#,
    )
    .bind(student_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(EnrolledCourse::from).collect())
}

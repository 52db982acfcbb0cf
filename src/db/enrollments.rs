//! # 수강 신청 쿼리 모듈
//!
//! (student_id, course_id) 유일성은 스키마의 UNIQUE 제약조건이 보장합니다.
//! `enroll`은 "조회 후 삽입" 대신 `INSERT ... ON CONFLICT DO NOTHING`을 사용하므로
//! 같은 요청이 동시에 두 번 들어와도 행은 하나만 생깁니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 학생을 강의에 등록합니다 (get-or-create).
///
/// 반환값 `(Enrollment, created)`:
/// - 새로 만들었으면 `created = true`
/// - 이미 있었으면 기존 레코드와 `created = false`
///
/// 강의가 공개 상태인지는 호출하는 쪽에서 확인합니다.
/// 학생이나 강의가 존재하지 않으면 `NotFound`.
pub async fn enroll(
    pool: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<(Enrollment, bool), AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO enrollments (id, student_id, course_id)
        VALUES (?, ?, ?)
        ON CONFLICT (student_id, course_id) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(student_id)
    .bind(course_id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_child_insert(e, "Already enrolled"))?;

    let created = result.rows_affected() > 0;

    let enrollment = find_enrollment(pool, student_id, course_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve enrollment".to_string()))?;

    if created {
        tracing::info!("Student {} enrolled in course {}", student_id, course_id);
    } else {
        tracing::debug!("Student {} already enrolled in course {}", student_id, course_id);
    }

    Ok((enrollment, created))
}

pub async fn find_enrollment(
    pool: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, AppError> {
    let enrollment = sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_id, status, progress, enrolled_at, completed_at
        FROM enrollments
        WHERE student_id = ? AND course_id = ?
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await?;

    Ok(enrollment)
}

pub async fn get_enrollment(pool: &SqlitePool, id: &str) -> Result<Option<Enrollment>, AppError> {
    let enrollment = sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_id, status, progress, enrolled_at, completed_at
        FROM enrollments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(enrollment)
}

/// 수강 신청 여부 (상태와 무관)
pub async fn is_enrolled(
    pool: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<bool, AppError> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM enrollments WHERE student_id = ? AND course_id = ?")
            .bind(student_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}

/// 관리자용: 강의의 수강 신청 목록 (최신순)
pub async fn list_course_enrollments(
    pool: &SqlitePool,
    course_id: &str,
) -> Result<Vec<Enrollment>, AppError> {
    let enrollments = sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_id, status, progress, enrolled_at, completed_at
        FROM enrollments
        WHERE course_id = ?
        ORDER BY enrolled_at DESC, id DESC
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(enrollments)
}

pub async fn count_student_enrollments(
    pool: &SqlitePool,
    student_id: &str,
    status: EnrollmentStatus,
) -> Result<i64, AppError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE student_id = ? AND status = ?")
            .bind(student_id)
            .bind(status)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// 수강 상태와 진도율을 부분 업데이트합니다.
///
/// 진도율 범위 검사는 호출하기 전에 끝나 있어야 합니다 (`validate_progress`).
/// `completed`로 바뀌면 `completed_at`을 기록하고, 다른 상태로 바뀌면 비웁니다.
/// 상태가 그대로면 `completed_at`도 그대로 둡니다.
/// 두 필드는 한 트랜잭션 안의 UPDATE 한 번으로 함께 저장되거나 함께 실패합니다.
pub async fn update_enrollment(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateEnrollmentRequest,
) -> Result<Option<Enrollment>, AppError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_id, course_id, status, progress, enrolled_at, completed_at
        FROM enrollments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        return Ok(None);
    };

    let progress = req.progress.unwrap_or(current.progress);
    let status = req.status.unwrap_or(current.status);
    let status_changed = status != current.status;

    sqlx::query(
        r#"
        UPDATE enrollments
        SET progress = ?1,
            status = ?2,
            completed_at = CASE
                WHEN ?3 = 0 THEN completed_at
                WHEN ?2 = 'completed' THEN strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                ELSE NULL
            END
        WHERE id = ?4
        "#,
    )
    .bind(progress)
    .bind(status)
    .bind(status_changed)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    if status_changed {
        tracing::info!("Enrollment {} status {:?} -> {:?}", id, current.status, status);
    }

    get_enrollment(pool, id).await
}

/// 한 번이라도 수강 신청한 학생 수 (중복 제거)
pub async fn count_distinct_students(pool: &SqlitePool) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT student_id) FROM enrollments")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn enrolling_twice_returns_existing_row() {
        let pool = test_support::pool().await;
        let course = test_support::published_course(&pool, "Rust").await;
        let student = test_support::student(&pool, "aziz").await;

        let (first, created) = enroll(&pool, &student.id, &course.id).await.unwrap();
        assert!(created);
        assert_eq!(first.status, EnrollmentStatus::Active);
        assert_eq!(first.progress, 0.0);

        let (second, created) = enroll(&pool, &student.id, &course.id).await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);

        let rows = list_course_enrollments(&pool, &course.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(is_enrolled(&pool, &student.id, &course.id).await.unwrap());
    }

    #[tokio::test]
    async fn enrolling_in_missing_course_is_not_found() {
        let pool = test_support::pool().await;
        let student = test_support::student(&pool, "bobur").await;

        let err = enroll(&pool, &student.id, "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn completing_stamps_completed_at() {
        let pool = test_support::pool().await;
        let course = test_support::published_course(&pool, "Go").await;
        let student = test_support::student(&pool, "dilnoza").await;
        let (enrollment, _) = enroll(&pool, &student.id, &course.id).await.unwrap();

        let req = UpdateEnrollmentRequest {
            status: Some(EnrollmentStatus::Completed),
            progress: Some(100.0),
        };
        let done = update_enrollment(&pool, &enrollment.id, &req).await.unwrap().unwrap();
        assert_eq!(done.status, EnrollmentStatus::Completed);
        assert_eq!(done.progress, 100.0);
        assert!(done.completed_at.is_some());

        let req = UpdateEnrollmentRequest {
            status: Some(EnrollmentStatus::Cancelled),
            progress: None,
        };
        let cancelled = update_enrollment(&pool, &enrollment.id, &req).await.unwrap().unwrap();
        assert_eq!(cancelled.completed_at, None);
        assert_eq!(cancelled.progress, 100.0);
    }

    #[tokio::test]
    async fn progress_outside_range_is_rejected_by_schema() {
        let pool = test_support::pool().await;
        let course = test_support::published_course(&pool, "C").await;
        let student = test_support::student(&pool, "erkin").await;
        let (enrollment, _) = enroll(&pool, &student.id, &course.id).await.unwrap();

        let req = UpdateEnrollmentRequest {
            status: None,
            progress: Some(150.0),
        };
        assert!(update_enrollment(&pool, &enrollment.id, &req).await.is_err());
    }

    #[tokio::test]
    async fn rejected_update_leaves_status_and_progress_untouched() {
        let pool = test_support::pool().await;
        let course = test_support::published_course(&pool, "Rust").await;
        let student = test_support::student(&pool, "hamid").await;
        let (enrollment, _) = enroll(&pool, &student.id, &course.id).await.unwrap();

        let req = UpdateEnrollmentRequest {
            status: Some(EnrollmentStatus::Completed),
            progress: Some(150.0),
        };
        assert!(update_enrollment(&pool, &enrollment.id, &req).await.is_err());

        let unchanged = get_enrollment(&pool, &enrollment.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, EnrollmentStatus::Active);
        assert_eq!(unchanged.progress, 0.0);
        assert_eq!(unchanged.completed_at, None);
    }

    #[tokio::test]
    async fn same_status_keeps_completed_at() {
        let pool = test_support::pool().await;
        let course = test_support::published_course(&pool, "Zig").await;
        let student = test_support::student(&pool, "iroda").await;
        let (enrollment, _) = enroll(&pool, &student.id, &course.id).await.unwrap();

        let complete = UpdateEnrollmentRequest {
            status: Some(EnrollmentStatus::Completed),
            progress: None,
        };
        let done = update_enrollment(&pool, &enrollment.id, &complete).await.unwrap().unwrap();

        let again = UpdateEnrollmentRequest {
            status: Some(EnrollmentStatus::Completed),
            progress: Some(90.0),
        };
        let after = update_enrollment(&pool, &enrollment.id, &again).await.unwrap().unwrap();
        assert_eq!(after.completed_at, done.completed_at);
        assert_eq!(after.progress, 90.0);
    }

    #[tokio::test]
    async fn student_counts_are_per_status() {
        let pool = test_support::pool().await;
        let student = test_support::student(&pool, "farrux").await;
        let other = test_support::student(&pool, "gulnora").await;
        let a = test_support::published_course(&pool, "A").await;
        let b = test_support::published_course(&pool, "B").await;

        enroll(&pool, &student.id, &a.id).await.unwrap();
        let (done, _) = enroll(&pool, &student.id, &b.id).await.unwrap();
        enroll(&pool, &other.id, &a.id).await.unwrap();

        let req = UpdateEnrollmentRequest {
            status: Some(EnrollmentStatus::Completed),
            progress: None,
        };
        update_enrollment(&pool, &done.id, &req).await.unwrap();

        let active = EnrollmentStatus::Active;
        let completed = EnrollmentStatus::Completed;
        assert_eq!(count_student_enrollments(&pool, &student.id, active).await.unwrap(), 1);
        assert_eq!(count_student_enrollments(&pool, &student.id, completed).await.unwrap(), 1);
        assert_eq!(count_distinct_students(&pool).await.unwrap(), 2);
    }
}

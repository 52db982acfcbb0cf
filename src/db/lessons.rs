//! # 레슨 쿼리 모듈과 강의 통계 재계산
//!
//! 레슨의 생성/수정/삭제는 모두 같은 흐름을 따릅니다:
//!
//! ```text
//! BEGIN
//!   INSERT / UPDATE / DELETE lessons ...
//!   record_lesson_change(course_id)   -- courses.total_hours, lessons_count 재계산
//! COMMIT
//! ```
//!
//! 재계산은 증감(+1/-1)이 아니라 레슨 테이블 전체를 다시 집계하므로
//! 몇 번을 다시 실행해도 결과가 같습니다. 동시에 두 요청이 같은 강의의 레슨을
//! 바꾸면 마지막으로 실행된 재계산 값이 남고, 다음 변경 때 다시 맞춰집니다.

use crate::error::AppError;
use crate::models::*;
use crate::services::duration;
use sqlx::{SqliteConnection, SqlitePool};

/// 강의의 파생 통계를 현재 레슨 집합으로부터 다시 계산합니다.
///
/// - `total_hours = round(SUM(duration_seconds) / 3600, 2)` (레슨이 없으면 0)
/// - `lessons_count = COUNT(*)`
///
/// 두 컬럼만 부분 UPDATE 하므로 다른 강의 필드의 동시 수정과 충돌하지 않습니다.
/// 강의가 이미 삭제된 경우에는 아무것도 하지 않고 `Ok(())`를 반환합니다.
///
/// 레슨을 바꾼 트랜잭션 안에서 호출해야 커밋 시점의 레슨 집합과 일치합니다.
pub async fn record_lesson_change(
    conn: &mut SqliteConnection,
    course_id: &str,
) -> Result<(), AppError> {
    let (total_seconds, count): (i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(duration_seconds), 0), COUNT(*) FROM lessons WHERE course_id = ?",
    )
    .bind(course_id)
    .fetch_one(&mut *conn)
    .await?;

    let total_hours = duration::seconds_to_hours(total_seconds);

    let result = sqlx::query("UPDATE courses SET total_hours = ?, lessons_count = ? WHERE id = ?")
        .bind(total_hours)
        .bind(count)
        .bind(course_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        tracing::debug!("Course {} no longer exists, skipping stats refresh", course_id);
    } else {
        tracing::debug!(
            "Course {} stats: {} lessons, {} hours",
            course_id,
            count,
            total_hours
        );
    }

    Ok(())
}

/// 강의의 레슨 목록을 `order` 순으로 조회합니다.
pub async fn list_lessons(pool: &SqlitePool, course_id: &str) -> Result<Vec<Lesson>, AppError> {
    let lessons = sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, course_id, title, description, sort_order, content, video_file,
               duration_seconds, thumbnail, created_at, updated_at
        FROM lessons
        WHERE course_id = ?
        ORDER BY sort_order
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(lessons)
}

pub async fn get_lesson(pool: &SqlitePool, id: &str) -> Result<Option<Lesson>, AppError> {
    let lesson = sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, course_id, title, description, sort_order, content, video_file,
               duration_seconds, thumbnail, created_at, updated_at
        FROM lessons
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(lesson)
}

/// 강의의 첫 레슨 (수강 신청 직후 이동할 곳)
pub async fn first_lesson(pool: &SqlitePool, course_id: &str) -> Result<Option<Lesson>, AppError> {
    let lesson = sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, course_id, title, description, sort_order, content, video_file,
               duration_seconds, thumbnail, created_at, updated_at
        FROM lessons
        WHERE course_id = ?
        ORDER BY sort_order
        LIMIT 1
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await?;

    Ok(lesson)
}

fn order_conflict(order: i64) -> String {
    format!("Lesson order {} is already used in this course", order)
}

/// 레슨을 생성하고 강의 통계를 갱신합니다.
///
/// 같은 강의에 같은 `order`가 있으면 `Conflict`를 반환하고 아무것도 저장하지 않습니다.
pub async fn create_lesson(
    pool: &SqlitePool,
    course_id: &str,
    req: &CreateLessonRequest,
) -> Result<Lesson, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO lessons (id, course_id, title, description, sort_order, content,
                             video_file, duration_seconds, thumbnail)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(course_id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(req.order)
    .bind(&req.content)
    .bind(&req.video_file)
    .bind(req.duration_seconds)
    .bind(&req.thumbnail)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::from_child_insert(e, &order_conflict(req.order)))?;

    record_lesson_change(&mut tx, course_id).await?;
    tx.commit().await?;

    tracing::info!("Created lesson {} (order {}) in course {}", id, req.order, course_id);

    get_lesson(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created lesson".to_string()))
}

/// 레슨을 부분 업데이트하고 강의 통계를 갱신합니다.
///
/// 반환값:
/// - `Ok(Some(Lesson))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 레슨이 없음
pub async fn update_lesson(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateLessonRequest,
) -> Result<Option<Lesson>, AppError> {
    let Some(mut lesson) = get_lesson(pool, id).await? else {
        return Ok(None);
    };

    if let Some(title) = &req.title {
        lesson.title = title.clone();
    }
    if let Some(description) = &req.description {
        lesson.description = description.clone();
    }
    if let Some(order) = req.order {
        lesson.order = order;
    }
    if let Some(content) = &req.content {
        lesson.content = content.clone();
    }
    if let Some(video_file) = &req.video_file {
        lesson.video_file = video_file.clone();
    }
    if let Some(duration_seconds) = req.duration_seconds {
        lesson.duration_seconds = duration_seconds;
    }
    if let Some(thumbnail) = &req.thumbnail {
        lesson.thumbnail = thumbnail.clone();
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE lessons
        SET title = ?, description = ?, sort_order = ?, content = ?, video_file = ?,
            duration_seconds = ?, thumbnail = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&lesson.title)
    .bind(&lesson.description)
    .bind(lesson.order)
    .bind(&lesson.content)
    .bind(&lesson.video_file)
    .bind(lesson.duration_seconds)
    .bind(&lesson.thumbnail)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::from_constraint(e, &order_conflict(lesson.order)))?;

    record_lesson_change(&mut tx, &lesson.course_id).await?;
    tx.commit().await?;

    get_lesson(pool, id).await
}

/// 레슨을 삭제하고 강의 통계를 갱신합니다.
///
/// 삭제된 레슨이 없으면 `Ok(false)`.
pub async fn delete_lesson(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    // RETURNING: 삭제한 행의 course_id를 같은 문장에서 돌려받습니다.
    let course_id: Option<String> =
        sqlx::query_scalar("DELETE FROM lessons WHERE id = ? RETURNING course_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some(course_id) = course_id else {
        return Ok(false);
    };

    record_lesson_change(&mut tx, &course_id).await?;
    tx.commit().await?;

    tracing::info!("Deleted lesson {} from course {}", id, course_id);
    Ok(true)
}

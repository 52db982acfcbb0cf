//! # 강의 쿼리 모듈
//!
//! `courses` 테이블 CRUD입니다.
//!
//! `total_hours`, `lessons_count`는 이 모듈에서 쓰지 않습니다.
//! 두 파생 필드는 오직 `db::lessons::record_lesson_change`만 갱신합니다.

use crate::db::lessons::record_lesson_change;
use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 공개(published) 강의 목록을 최신순으로 조회합니다.
///
/// `category_id`가 주어지면 해당 카테고리의 강의만 반환합니다.
pub async fn list_published_courses(
    pool: &SqlitePool,
    category_id: Option<&str>,
) -> Result<Vec<Course>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, description, short_description, category_id, price, level,
               status, image, total_hours, lessons_count, created_at, updated_at
        FROM courses
        WHERE status = 'published'
          AND (?1 IS NULL OR category_id = ?1)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

/// 홈 화면용: 최근 공개 강의 `limit`개
pub async fn latest_published_courses(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<Course>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, description, short_description, category_id, price, level,
               status, image, total_hours, lessons_count, created_at, updated_at
        FROM courses
        WHERE status = 'published'
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

/// 관리자용: 상태와 관계없이 모든 강의
pub async fn list_all_courses(pool: &SqlitePool) -> Result<Vec<Course>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, description, short_description, category_id, price, level,
               status, image, total_hours, lessons_count, created_at, updated_at
        FROM courses
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

pub async fn get_course(pool: &SqlitePool, id: &str) -> Result<Option<Course>, AppError> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, description, short_description, category_id, price, level,
               status, image, total_hours, lessons_count, created_at, updated_at
        FROM courses
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(course)
}

/// 공개 상태인 강의만 조회합니다. draft/archived 강의는 None.
pub async fn get_published_course(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Course>, AppError> {
    Ok(get_course(pool, id).await?.filter(Course::is_published))
}

/// 새 강의를 생성합니다. 파생 필드는 DB 기본값(0)으로 시작합니다.
///
/// `price`와 `category_id` 검증은 호출하는 쪽(라우트)에서 끝난 상태여야 합니다.
pub async fn create_course(pool: &SqlitePool, req: &CreateCourseRequest) -> Result<Course, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO courses (id, title, description, short_description, category_id,
                             price, level, status, image)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.short_description)
    .bind(&req.category_id)
    .bind(req.price)
    .bind(req.level)
    .bind(req.status)
    .bind(&req.image)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_constraint(e, "Category does not exist"))?;

    tracing::info!("Created course {} ({})", req.title, id);

    get_course(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created course".to_string()))
}

/// 강의 정보를 부분 업데이트합니다.
///
/// 기존 행을 읽어 요청에 포함된 필드만 덮어쓴 뒤 편집 가능한 컬럼만 저장합니다.
/// 파생 필드(total_hours, lessons_count)는 UPDATE 대상에 없으므로
/// 동시에 실행된 통계 재계산 결과를 덮어쓰지 않습니다.
pub async fn update_course(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateCourseRequest,
) -> Result<Option<Course>, AppError> {
    let Some(mut course) = get_course(pool, id).await? else {
        return Ok(None);
    };

    if let Some(title) = &req.title {
        course.title = title.clone();
    }
    if let Some(description) = &req.description {
        course.description = description.clone();
    }
    if let Some(short_description) = &req.short_description {
        course.short_description = short_description.clone();
    }
    if let Some(category_id) = &req.category_id {
        course.category_id = category_id.clone();
    }
    if let Some(price) = req.price {
        course.price = price;
    }
    if let Some(level) = req.level {
        course.level = level;
    }
    if let Some(status) = req.status {
        course.status = status;
    }
    if let Some(image) = &req.image {
        course.image = image.clone();
    }

    sqlx::query(
        r#"
        UPDATE courses
        SET title = ?, description = ?, short_description = ?, category_id = ?,
            price = ?, level = ?, status = ?, image = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&course.title)
    .bind(&course.description)
    .bind(&course.short_description)
    .bind(&course.category_id)
    .bind(course.price)
    .bind(course.level)
    .bind(course.status)
    .bind(&course.image)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_constraint(e, "Category does not exist"))?;

    get_course(pool, id).await
}

/// 강의를 삭제합니다.
///
/// `ON DELETE CASCADE`로 레슨과 수강 신청이 함께 삭제됩니다.
/// 삭제된 레슨에 대해서도 통계 재계산을 호출하지만, 강의가 이미 없으므로
/// `record_lesson_change`는 아무것도 하지 않습니다.
pub async fn delete_course(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    record_lesson_change(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Deleted course {} with its lessons and enrollments", id);
    Ok(true)
}

pub async fn count_published_courses(pool: &SqlitePool) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE status = 'published'")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, test_support};

    #[tokio::test]
    async fn deleting_course_cascades_to_lessons_and_enrollments() {
        let pool = test_support::pool().await;
        let course = test_support::published_course(&pool, "Axum").await;
        for order in 1..=3 {
            test_support::lesson(&pool, &course.id, order, 600).await;
        }
        for name in ["ali", "vali"] {
            let student = test_support::student(&pool, name).await;
            db::enroll(&pool, &student.id, &course.id).await.unwrap();
        }

        assert!(delete_course(&pool, &course.id).await.unwrap());

        let lessons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE course_id = ?")
            .bind(&course.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        let enrollments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = ?")
                .bind(&course.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(lessons, 0);
        assert_eq!(enrollments, 0);
        assert!(get_course(&pool, &course.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_missing_course_returns_false() {
        let pool = test_support::pool().await;
        assert!(!delete_course(&pool, "missing").await.unwrap());
    }

    #[tokio::test]
    async fn update_does_not_touch_derived_fields() {
        let pool = test_support::pool().await;
        let course = test_support::published_course(&pool, "Tokio").await;
        test_support::lesson(&pool, &course.id, 1, 7200).await;

        let req = UpdateCourseRequest {
            title: Some("Tokio in depth".to_string()),
            status: Some(CourseStatus::Archived),
            ..Default::default()
        };
        let updated = update_course(&pool, &course.id, &req).await.unwrap().unwrap();

        assert_eq!(updated.title, "Tokio in depth");
        assert_eq!(updated.status, CourseStatus::Archived);
        assert_eq!(updated.total_hours, 2.0);
        assert_eq!(updated.lessons_count, 1);
    }

    #[tokio::test]
    async fn only_published_courses_are_listed() {
        let pool = test_support::pool().await;
        test_support::published_course(&pool, "Visible").await;
        test_support::course_in(&pool, "Draft", None).await;

        let courses = list_published_courses(&pool, None).await.unwrap();
        let titles: Vec<_> = courses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Visible"]);
        assert_eq!(count_published_courses(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn published_list_filters_by_category() {
        let pool = test_support::pool().await;
        let web = db::create_category(&pool, "Web").await.unwrap();
        let mut req = test_support::course_request("In web");
        req.category_id = Some(web.id.clone());
        req.status = CourseStatus::Published;
        create_course(&pool, &req).await.unwrap();
        test_support::published_course(&pool, "Elsewhere").await;

        let courses = list_published_courses(&pool, Some(web.id.as_str())).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "In web");
    }

    #[tokio::test]
    async fn unknown_category_is_a_conflict() {
        let pool = test_support::pool().await;
        let mut req = test_support::course_request("Orphan");
        req.category_id = Some("missing".to_string());

        let err = create_course(&pool, &req).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}

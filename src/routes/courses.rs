//! # 공개 강의 카탈로그 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/courses?category=`                 → 공개 강의 목록 + 카테고리
//! - `GET  /api/v1/courses/{id}`                      → 강의 상세 (로그인 필요)
//! - `GET  /api/v1/courses/{id}/lessons/{lesson_id}`  → 레슨 보기 (로그인 필요)
//! - `POST /api/v1/courses/{id}/enroll`               → 수강 신청 (로그인 필요)
//!
//! draft/archived 강의는 이 API들에서 존재하지 않는 것처럼 404를 반환합니다.

use crate::{db, error::AppError, middleware::auth::AuthUser, models::*, routes::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /courses`: 공개 강의를 최신순으로, 필터용 카테고리 목록과 함께 반환합니다.
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<Value>, AppError> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let courses: Vec<CourseView> = db::list_published_courses(&state.pool, category)
        .await?
        .into_iter()
        .map(CourseView::from)
        .collect();
    let categories = db::list_categories(&state.pool).await?;

    Ok(Json(json!({
        "courses": courses,
        "categories": categories,
        "selected_category": category,
    })))
}

/// `GET /courses/{id}`: 레슨 목록(본문 제외)과 수강 여부
pub async fn get_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let course = db::get_published_course(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let lessons: Vec<LessonSummary> = db::list_lessons(&state.pool, &course.id)
        .await?
        .iter()
        .map(LessonSummary::from)
        .collect();
    let is_enrolled = db::is_enrolled(&state.pool, &auth_user.user_id, &course.id).await?;

    Ok(Json(json!({
        "course": CourseView::from(course),
        "lessons": lessons,
        "is_enrolled": is_enrolled,
    })))
}

/// `GET /courses/{id}/lessons/{lesson_id}`: 레슨 보기
///
/// 무료 레슨(order ≤ 3)은 누구나 볼 수 있고, 프리미엄 레슨의 본문과 영상은
/// 수강생에게만 내려갑니다. 다른 강의의 레슨 ID면 404.
pub async fn view_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let course = db::get_published_course(&state.pool, &course_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let lesson = db::get_lesson(&state.pool, &lesson_id)
        .await?
        .filter(|l| l.course_id == course.id)
        .ok_or(AppError::NotFound)?;

    let is_enrolled = db::is_enrolled(&state.pool, &auth_user.user_id, &course.id).await?;
    let lessons: Vec<LessonSummary> = db::list_lessons(&state.pool, &course.id)
        .await?
        .iter()
        .map(LessonSummary::from)
        .collect();

    Ok(Json(json!({
        "course": CourseView::from(course),
        "lesson": LessonView::for_viewer(lesson, is_enrolled),
        "lessons": lessons,
        "is_enrolled": is_enrolled,
    })))
}

/// `POST /courses/{id}/enroll`: 수강 신청 (get-or-create)
///
/// 새로 신청하면 201과 첫 레슨 ID, 이미 신청되어 있으면 200과 기존 레코드를 반환합니다.
pub async fn enroll(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<EnrollResponse>), AppError> {
    let course = db::get_published_course(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let (enrollment, created) = db::enroll(&state.pool, &auth_user.user_id, &course.id).await?;

    let first_lesson_id = if created {
        db::first_lesson(&state.pool, &course.id).await?.map(|l| l.id)
    } else {
        None
    };
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };

    Ok((
        status,
        Json(EnrollResponse {
            enrollment,
            created,
            first_lesson_id,
        }),
    ))
}

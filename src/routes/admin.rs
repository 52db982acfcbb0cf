//! # 관리자 카탈로그 핸들러
//!
//! 모든 핸들러는 `AdminUser` extractor를 받으므로 `is_staff` 사용자만 호출할 수 있습니다.
//!
//! ## 엔드포인트 (`/api/v1/admin` 아래)
//! - `GET/POST          /categories`, `PATCH/DELETE /categories/{id}`
//! - `GET/POST          /courses`, `GET/PATCH/DELETE /courses/{id}`
//! - `GET/POST          /courses/{id}/lessons`, `PATCH/DELETE /lessons/{id}`
//! - `GET               /courses/{id}/enrollments`, `PATCH /enrollments/{id}`
//!
//! 강의의 `total_hours`, `lessons_count`는 요청으로 받지 않습니다.
//! 레슨 생성/수정/삭제 시 db 계층에서 같은 트랜잭션으로 다시 계산됩니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AdminUser,
    models::*,
    routes::{require_text, AppState},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

// ── 카테고리 ──

pub async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let categories = db::list_categories_with_counts(&state.pool).await?;
    Ok(Json(json!({ "categories": categories })))
}

pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    require_text("name", &req.name)?;
    let category = db::create_category(&state.pool, req.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = match &req.name {
        Some(name) => {
            require_text("name", name)?;
            db::rename_category(&state.pool, &id, name.trim()).await?
        }
        None => db::get_category(&state.pool, &id).await?,
    };

    category.map(Json).ok_or(AppError::NotFound)
}

/// 카테고리 삭제. 소속 강의는 남고 카테고리만 비워집니다.
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if db::delete_category(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

// ── 강의 ──

pub async fn list_courses(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let courses: Vec<CourseView> = db::list_all_courses(&state.pool)
        .await?
        .into_iter()
        .map(CourseView::from)
        .collect();
    Ok(Json(json!({ "courses": courses })))
}

pub async fn get_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let course = db::get_course(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let lessons: Vec<LessonView> = db::list_lessons(&state.pool, &course.id)
        .await?
        .into_iter()
        .map(LessonView::unlocked)
        .collect();

    Ok(Json(json!({
        "course": CourseView::from(course),
        "lessons": lessons,
    })))
}

pub async fn create_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(mut req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseView>), AppError> {
    require_text("title", &req.title)?;
    req.price = normalize_price(req.price)
        .ok_or(AppError::BadRequest("Price must be a non-negative number".to_string()))?;

    let course = db::create_course(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

pub async fn update_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(mut req): Json<UpdateCourseRequest>,
) -> Result<Json<CourseView>, AppError> {
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }
    if let Some(price) = req.price {
        req.price = Some(
            normalize_price(price)
                .ok_or(AppError::BadRequest("Price must be a non-negative number".to_string()))?,
        );
    }

    let course = db::update_course(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course.into()))
}

/// 강의 삭제. 레슨과 수강 신청도 함께 삭제됩니다.
pub async fn delete_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if db::delete_course(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

// ── 레슨 ──

fn validate_lesson_numbers(order: Option<i64>, duration_seconds: Option<i64>) -> Result<(), AppError> {
    if order.is_some_and(|o| o < 0) {
        return Err(AppError::BadRequest("Lesson order must not be negative".to_string()));
    }
    if duration_seconds.is_some_and(|d| d < 0) {
        return Err(AppError::BadRequest("Duration must not be negative".to_string()));
    }
    Ok(())
}

pub async fn list_lessons(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_course(&state.pool, &course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let lessons: Vec<LessonView> = db::list_lessons(&state.pool, &course_id)
        .await?
        .into_iter()
        .map(LessonView::unlocked)
        .collect();
    Ok(Json(json!({ "lessons": lessons })))
}

pub async fn create_lesson(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(course_id): Path<String>,
    Json(req): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<LessonView>), AppError> {
    require_text("title", &req.title)?;
    validate_lesson_numbers(Some(req.order), Some(req.duration_seconds))?;

    db::get_course(&state.pool, &course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let lesson = db::create_lesson(&state.pool, &course_id, &req).await?;
    Ok((StatusCode::CREATED, Json(LessonView::unlocked(lesson))))
}

pub async fn update_lesson(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateLessonRequest>,
) -> Result<Json<LessonView>, AppError> {
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }
    validate_lesson_numbers(req.order, req.duration_seconds)?;

    let lesson = db::update_lesson(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(LessonView::unlocked(lesson)))
}

pub async fn delete_lesson(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if db::delete_lesson(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

// ── 수강 신청 ──

pub async fn list_enrollments(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_course(&state.pool, &course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let enrollments = db::list_course_enrollments(&state.pool, &course_id).await?;
    Ok(Json(json!({ "enrollments": enrollments })))
}

/// 수강 상태/진도율 수정. 진도율이 [0, 100] 밖이면 저장하지 않고 400.
pub async fn update_enrollment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateEnrollmentRequest>,
) -> Result<Json<Enrollment>, AppError> {
    if let Some(progress) = req.progress {
        validate_progress(progress).map_err(AppError::BadRequest)?;
    }

    let enrollment = db::update_enrollment(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(enrollment))
}

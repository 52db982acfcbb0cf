//! # 내 프로필 핸들러
//!
//! - `GET   /api/v1/profile` → 계정, 프로필, 진행 중 강의, 학습 통계
//! - `PATCH /api/v1/profile` → 계정(email, 이름)과 프로필 필드 부분 수정

use crate::{
    db::{self, users as db_users},
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
};
use axum::{extract::State, Json};

async fn build_profile(state: &AppState, user: User, profile: UserProfile) -> Result<ProfileResponse, AppError> {
    let enrolled_courses =
        db::list_enrolled_courses(&state.pool, &user.id, EnrollmentStatus::Active).await?;
    let enrolled_courses_count =
        db::count_student_enrollments(&state.pool, &user.id, EnrollmentStatus::Active).await?;
    let completed_courses_count =
        db::count_student_enrollments(&state.pool, &user.id, EnrollmentStatus::Completed).await?;
    let totals = db::active_learning_totals(&state.pool, &user.id).await?;

    Ok(ProfileResponse {
        user: user.into(),
        profile,
        enrolled_courses,
        enrolled_courses_count,
        completed_courses_count,
        total_lessons: totals.total_lessons,
        total_hours: totals.total_hours,
        // 수료증은 완료한 강의마다 하나
        certificates_count: completed_courses_count,
    })
}

pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let profile = db_users::get_profile(&state.pool, &user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(build_profile(&state, user, profile).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    if let Some(email) = &req.email {
        if !email.contains('@') {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
    }

    let (user, profile) = db_users::update_profile(&state.pool, &auth_user.user_id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::debug!("Updated profile of {}", user.username);

    Ok(Json(build_profile(&state, user, profile).await?))
}

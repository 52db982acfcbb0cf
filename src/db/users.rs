//! # 사용자 쿼리 모듈
//!
//! 계정(`users`), 프로필(`user_profiles`), 리프레시 토큰(`refresh_tokens`)을 다룹니다.
//! 프로필은 계정과 같은 트랜잭션에서 생성되므로 모든 사용자는 프로필을 하나 가집니다.

use crate::error::AppError;
use crate::models::user::{UpdateProfileRequest, User, UserProfile};
use sqlx::SqlitePool;

/// 회원가입에 필요한 계정 필드 (비밀번호는 이미 해시된 상태)
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

/// 사용자와 빈 프로필을 함께 생성합니다.
/// username 또는 email이 이미 있으면 `Conflict`.
pub async fn create_user(pool: &SqlitePool, new_user: &NewUser<'_>) -> Result<User, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, first_name, last_name, password_hash)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(new_user.username)
    .bind(new_user.email)
    .bind(new_user.first_name)
    .bind(new_user.last_name)
    .bind(new_user.password_hash)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::from_constraint(e, "Username or email already exists"))?;

    sqlx::query("INSERT INTO user_profiles (user_id) VALUES (?)")
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    find_by_id(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, is_staff,
               created_at, updated_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, is_staff,
               created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, is_staff,
               created_at, updated_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// 관리자 권한 부여/회수. 관리자 계정을 만드는 API는 없으므로
/// 초기 관리자는 DB에서 직접 지정하거나 이 함수로 지정합니다.
pub async fn set_staff(pool: &SqlitePool, id: &str, is_staff: bool) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_staff = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(is_staff)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<UserProfile>, AppError> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT user_id, bio, avatar, phone, location, website, linkedin, github, updated_at
        FROM user_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// 계정 필드(email, 이름)와 프로필 필드를 한 트랜잭션에서 부분 업데이트합니다.
/// 다른 사용자가 쓰는 email이면 `Conflict`.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    req: &UpdateProfileRequest,
) -> Result<Option<(User, UserProfile)>, AppError> {
    let Some(mut user) = find_by_id(pool, user_id).await? else {
        return Ok(None);
    };
    let Some(mut profile) = get_profile(pool, user_id).await? else {
        return Ok(None);
    };

    if let Some(email) = &req.email {
        user.email = email.clone();
    }
    if let Some(first_name) = &req.first_name {
        user.first_name = first_name.clone();
    }
    if let Some(last_name) = &req.last_name {
        user.last_name = last_name.clone();
    }

    if let Some(bio) = &req.bio {
        profile.bio = bio.clone();
    }
    if let Some(avatar) = &req.avatar {
        profile.avatar = avatar.clone();
    }
    if let Some(phone) = &req.phone {
        profile.phone = phone.clone();
    }
    if let Some(location) = &req.location {
        profile.location = location.clone();
    }
    if let Some(website) = &req.website {
        profile.website = website.clone();
    }
    if let Some(linkedin) = &req.linkedin {
        profile.linkedin = linkedin.clone();
    }
    if let Some(github) = &req.github {
        profile.github = github.clone();
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE users
        SET email = ?, first_name = ?, last_name = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::from_constraint(e, "Email is already in use"))?;

    sqlx::query(
        r#"
        UPDATE user_profiles
        SET bio = ?, avatar = ?, phone = ?, location = ?, website = ?, linkedin = ?, github = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE user_id = ?
        "#,
    )
    .bind(&profile.bio)
    .bind(&profile.avatar)
    .bind(&profile.phone)
    .bind(&profile.location)
    .bind(&profile.website)
    .bind(&profile.linkedin)
    .bind(&profile.github)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let user = find_by_id(pool, user_id).await?;
    let profile = get_profile(pool, user_id).await?;
    Ok(user.zip(profile))
}

// ── 리프레시 토큰 ──

pub async fn store_refresh_token(
    pool: &SqlitePool,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 토큰 해시로 (user_id, expires_at)을 조회합니다.
pub async fn find_refresh_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<(String, String)>, AppError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT user_id, expires_at FROM refresh_tokens WHERE token_hash = ?",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_refresh_token(pool: &SqlitePool, token_hash: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_user_refresh_tokens(pool: &SqlitePool, user_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

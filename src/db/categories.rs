//! # 강의 카테고리 쿼리 모듈
//!
//! `categories` 테이블에 대한 CRUD 함수입니다.
//! 카테고리를 삭제해도 강의는 남고, `courses.category_id`만 NULL이 됩니다
//! (스키마의 `ON DELETE SET NULL`).

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 모든 카테고리를 최신순으로 조회합니다.
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM categories ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// 관리자 목록: 각 카테고리에 속한 강의 수를 함께 조회합니다.
///
/// LEFT JOIN이므로 강의가 없는 카테고리도 `courses_count = 0`으로 포함됩니다.
pub async fn list_categories_with_counts(
    pool: &SqlitePool,
) -> Result<Vec<CategoryWithCount>, AppError> {
    let categories = sqlx::query_as::<_, CategoryWithCount>(
        r#"
        SELECT cat.id, cat.name, cat.created_at, COUNT(c.id) AS courses_count
        FROM categories cat
        LEFT JOIN courses c ON c.category_id = cat.id
        GROUP BY cat.id
        ORDER BY cat.created_at DESC, cat.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_category(pool: &SqlitePool, id: &str) -> Result<Option<Category>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// 새 카테고리를 생성합니다. 이름이 이미 있으면 `Conflict`.
pub async fn create_category(pool: &SqlitePool, name: &str) -> Result<Category, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Category name already exists"))?;

    get_category(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created category".to_string()))
}

/// 카테고리 이름을 변경합니다. 없는 ID면 `Ok(None)`.
pub async fn rename_category(
    pool: &SqlitePool,
    id: &str,
    name: &str,
) -> Result<Option<Category>, AppError> {
    let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Category name already exists"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_category(pool, id).await
}

/// 카테고리를 삭제합니다. 소속 강의의 category_id는 NULL이 됩니다.
pub async fn delete_category(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, test_support};

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let pool = test_support::pool().await;
        create_category(&pool, "Backend").await.unwrap();

        let err = create_category(&pool, "Backend").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_category_keeps_its_courses() {
        let pool = test_support::pool().await;
        let category = create_category(&pool, "Rust").await.unwrap();
        let course = test_support::course_in(&pool, "Ownership", Some(category.id.as_str())).await;

        assert!(delete_category(&pool, &category.id).await.unwrap());

        let course = db::get_course(&pool, &course.id).await.unwrap().unwrap();
        assert_eq!(course.category_id, None);
    }

    #[tokio::test]
    async fn counts_include_empty_categories() {
        let pool = test_support::pool().await;
        let rust = create_category(&pool, "Rust").await.unwrap();
        create_category(&pool, "Go").await.unwrap();
        test_support::course_in(&pool, "A", Some(rust.id.as_str())).await;
        test_support::course_in(&pool, "B", Some(rust.id.as_str())).await;

        let counts = list_categories_with_counts(&pool).await.unwrap();
        let by_name = |name: &str| counts.iter().find(|c| c.name == name).unwrap().courses_count;
        assert_eq!(by_name("Rust"), 2);
        assert_eq!(by_name("Go"), 0);
    }

    #[tokio::test]
    async fn rename_missing_category_returns_none() {
        let pool = test_support::pool().await;
        assert!(rename_category(&pool, "missing", "x").await.unwrap().is_none());
    }
}

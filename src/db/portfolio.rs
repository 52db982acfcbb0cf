//! # 포트폴리오 쿼리 모듈
//!
//! - `portfolio_categories`: 제목과 slug 모두 유일
//! - `portfolios`: 카테고리를 `ON DELETE RESTRICT`로 참조하므로
//!   사용 중인 카테고리를 지우려 하면 `Conflict`가 됩니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

// ── 포트폴리오 카테고리 ──

/// 공개 목록의 필터용: 카테고리별 활성 포트폴리오 수 (제목순)
pub async fn list_portfolio_categories_with_counts(
    pool: &SqlitePool,
) -> Result<Vec<PortfolioCategoryWithCount>, AppError> {
    let categories = sqlx::query_as::<_, PortfolioCategoryWithCount>(
        r#"
        SELECT pc.id, pc.title, pc.slug, pc.icon, COUNT(p.id) AS count
        FROM portfolio_categories pc
        LEFT JOIN portfolios p ON p.category_id = pc.id AND p.is_active = 1
        GROUP BY pc.id
        ORDER BY pc.title
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_portfolio_category(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<PortfolioCategory>, AppError> {
    let category = sqlx::query_as::<_, PortfolioCategory>(
        "SELECT id, title, slug, icon, created_at FROM portfolio_categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// 카테고리를 생성합니다. slug는 제목에서 만듭니다 ("Web Apps" → "web-apps").
pub async fn create_portfolio_category(
    pool: &SqlitePool,
    req: &CreatePortfolioCategoryRequest,
) -> Result<PortfolioCategory, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let slug = slug::slugify(&req.title);

    sqlx::query("INSERT INTO portfolio_categories (id, title, slug, icon) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&req.title)
        .bind(&slug)
        .bind(&req.icon)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Portfolio category already exists"))?;

    get_portfolio_category(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created category".to_string()))
}

/// 카테고리 수정. 제목이 바뀌면 slug도 다시 만듭니다.
///
/// 제목, slug, 아이콘은 UPDATE 한 번으로 함께 저장되거나 함께 실패합니다.
pub async fn update_portfolio_category(
    pool: &SqlitePool,
    id: &str,
    req: &UpdatePortfolioCategoryRequest,
) -> Result<Option<PortfolioCategory>, AppError> {
    let Some(mut category) = get_portfolio_category(pool, id).await? else {
        return Ok(None);
    };

    if let Some(title) = &req.title {
        category.slug = slug::slugify(title);
        category.title = title.clone();
    }
    if let Some(icon) = &req.icon {
        category.icon = icon.clone();
    }

    sqlx::query("UPDATE portfolio_categories SET title = ?, slug = ?, icon = ? WHERE id = ?")
        .bind(&category.title)
        .bind(&category.slug)
        .bind(&category.icon)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Portfolio category already exists"))?;

    get_portfolio_category(pool, id).await
}

/// 카테고리 삭제. 포트폴리오가 남아 있으면 `Conflict`.
pub async fn delete_portfolio_category(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM portfolio_categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Category still has portfolio items"))?;

    Ok(result.rows_affected() > 0)
}

// ── 포트폴리오 ──

/// 활성 포트폴리오를 추천(featured) 우선, 최신순으로 한 페이지 조회합니다.
pub async fn list_active_portfolios(
    pool: &SqlitePool,
    category_id: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Portfolio>, AppError> {
    let portfolios = sqlx::query_as::<_, Portfolio>(
        r#"
        SELECT id, title, description, category_id, image, technologies, project_url,
               github_url, demo_url, year, is_featured, is_active, created_at, updated_at
        FROM portfolios
        WHERE is_active = 1
          AND (?1 IS NULL OR category_id = ?1)
        ORDER BY is_featured DESC, created_at DESC, id DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(category_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(portfolios)
}

pub async fn count_active_portfolios(
    pool: &SqlitePool,
    category_id: Option<&str>,
) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM portfolios WHERE is_active = 1 AND (?1 IS NULL OR category_id = ?1)",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// 관리자용: 활성 여부와 관계없이 전체 목록
pub async fn list_all_portfolios(pool: &SqlitePool) -> Result<Vec<Portfolio>, AppError> {
    let portfolios = sqlx::query_as::<_, Portfolio>(
        r#"
        SELECT id, title, description, category_id, image, technologies, project_url,
               github_url, demo_url, year, is_featured, is_active, created_at, updated_at
        FROM portfolios
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(portfolios)
}

pub async fn get_portfolio(pool: &SqlitePool, id: &str) -> Result<Option<Portfolio>, AppError> {
    let portfolio = sqlx::query_as::<_, Portfolio>(
        r#"
        SELECT id, title, description, category_id, image, technologies, project_url,
               github_url, demo_url, year, is_featured, is_active, created_at, updated_at
        FROM portfolios
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(portfolio)
}

pub async fn create_portfolio(
    pool: &SqlitePool,
    req: &CreatePortfolioRequest,
) -> Result<Portfolio, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO portfolios (id, title, description, category_id, image, technologies,
                                project_url, github_url, demo_url, year, is_featured, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.category_id)
    .bind(&req.image)
    .bind(&req.technologies)
    .bind(&req.project_url)
    .bind(&req.github_url)
    .bind(&req.demo_url)
    .bind(req.year)
    .bind(req.is_featured)
    .bind(req.is_active)
    .execute(pool)
    .await
    .map_err(|e| {
        AppError::from_constraint(e, "Portfolio title already exists or category is missing")
    })?;

    get_portfolio(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created portfolio".to_string()))
}

pub async fn update_portfolio(
    pool: &SqlitePool,
    id: &str,
    req: &UpdatePortfolioRequest,
) -> Result<Option<Portfolio>, AppError> {
    let Some(mut portfolio) = get_portfolio(pool, id).await? else {
        return Ok(None);
    };

    if let Some(title) = &req.title {
        portfolio.title = title.clone();
    }
    if let Some(description) = &req.description {
        portfolio.description = description.clone();
    }
    if let Some(category_id) = &req.category_id {
        portfolio.category_id = category_id.clone();
    }
    if let Some(image) = &req.image {
        portfolio.image = image.clone();
    }
    if let Some(technologies) = &req.technologies {
        portfolio.technologies = technologies.clone();
    }
    if let Some(project_url) = &req.project_url {
        portfolio.project_url = project_url.clone();
    }
    if let Some(github_url) = &req.github_url {
        portfolio.github_url = github_url.clone();
    }
    if let Some(demo_url) = &req.demo_url {
        portfolio.demo_url = demo_url.clone();
    }
    if let Some(year) = req.year {
        portfolio.year = year;
    }
    if let Some(is_featured) = req.is_featured {
        portfolio.is_featured = is_featured;
    }
    if let Some(is_active) = req.is_active {
        portfolio.is_active = is_active;
    }

    sqlx::query(
        r#"
        UPDATE portfolios
        SET title = ?, description = ?, category_id = ?, image = ?, technologies = ?,
            project_url = ?, github_url = ?, demo_url = ?, year = ?, is_featured = ?,
            is_active = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&portfolio.title)
    .bind(&portfolio.description)
    .bind(&portfolio.category_id)
    .bind(&portfolio.image)
    .bind(&portfolio.technologies)
    .bind(&portfolio.project_url)
    .bind(&portfolio.github_url)
    .bind(&portfolio.demo_url)
    .bind(portfolio.year)
    .bind(portfolio.is_featured)
    .bind(portfolio.is_active)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| {
        AppError::from_constraint(e, "Portfolio title already exists or category is missing")
    })?;

    get_portfolio(pool, id).await
}

pub async fn delete_portfolio(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM portfolios WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

//! # 관리자 포트폴리오 핸들러
//!
//! ## 엔드포인트 (`/api/v1/admin` 아래)
//! - `GET/POST /portfolio-categories`, `PATCH/DELETE /portfolio-categories/{id}`
//! - `GET/POST /portfolios`, `GET/PATCH/DELETE /portfolios/{id}`
//!
//! 포트폴리오가 남아 있는 카테고리는 삭제할 수 없습니다 (409).

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

pub async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let categories = db::list_portfolio_categories_with_counts(&state.pool).await?;
    Ok(Json(json!({ "categories": categories })))
}

pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreatePortfolioCategoryRequest>,
) -> Result<(StatusCode, Json<PortfolioCategory>), AppError> {
    require_text("title", &req.title)?;
    if slug::slugify(&req.title).is_empty() {
        return Err(AppError::BadRequest("Title must contain letters or digits".to_string()));
    }

    let category = db::create_portfolio_category(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePortfolioCategoryRequest>,
) -> Result<Json<PortfolioCategory>, AppError> {
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }

    db::update_portfolio_category(&state.pool, &id, &req)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if db::delete_portfolio_category(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

/// 활성 여부와 관계없이 전체 목록
pub async fn list_portfolios(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let portfolios: Vec<PortfolioView> = db::list_all_portfolios(&state.pool)
        .await?
        .into_iter()
        .map(PortfolioView::from)
        .collect();
    Ok(Json(json!({ "portfolios": portfolios })))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<PortfolioView>, AppError> {
    db::get_portfolio(&state.pool, &id)
        .await?
        .map(|p| Json(p.into()))
        .ok_or(AppError::NotFound)
}

pub async fn create_portfolio(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreatePortfolioRequest>,
) -> Result<(StatusCode, Json<PortfolioView>), AppError> {
    require_text("title", &req.title)?;

    let portfolio = db::create_portfolio(&state.pool, &req).await?;
    tracing::info!("Created portfolio {} ({})", portfolio.title, portfolio.id);
    Ok((StatusCode::CREATED, Json(portfolio.into())))
}

pub async fn update_portfolio(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePortfolioRequest>,
) -> Result<Json<PortfolioView>, AppError> {
    if let Some(title) = &req.title {
        require_text("title", title)?;
    }

    db::update_portfolio(&state.pool, &id, &req)
        .await?
        .map(|p| Json(p.into()))
        .ok_or(AppError::NotFound)
}

pub async fn delete_portfolio(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if db::delete_portfolio(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

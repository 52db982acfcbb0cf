//! # 공개 포트폴리오 갤러리 핸들러
//!
//! - `GET /api/v1/portfolio?category=&page=`
//!
//! 활성 포트폴리오만 추천 우선, 최신순으로 12개씩 보여줍니다.

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

/// 페이지 번호가 숫자가 아니면 1페이지, 범위를 벗어나면 마지막 페이지를 보여줍니다.
pub async fn list_portfolio(
    State(state): State<AppState>,
    Query(query): Query<PortfolioListQuery>,
) -> Result<Json<Value>, AppError> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());

    let total = db::count_active_portfolios(&state.pool, category).await?;
    let page = PageInfo::resolve(query.page.as_deref(), total, PORTFOLIO_PAGE_SIZE);

    let portfolios: Vec<PortfolioView> = db::list_active_portfolios(
        &state.pool,
        category,
        PORTFOLIO_PAGE_SIZE,
        page.offset(PORTFOLIO_PAGE_SIZE),
    )
    .await?
    .into_iter()
    .map(PortfolioView::from)
    .collect();

    let categories = db::list_portfolio_categories_with_counts(&state.pool).await?;

    Ok(Json(json!({
        "portfolios": portfolios,
        "page": page,
        "categories": categories,
        "selected_category": category,
        "total_count": total,
    })))
}

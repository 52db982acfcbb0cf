//! `GET /api/v1/home`: 최신 강의 3개, 포트폴리오 3개, 사이트 카운터

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{extract::State, Json};

const HOME_ITEMS: i64 = 3;

pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    let latest_courses = db::latest_published_courses(&state.pool, HOME_ITEMS)
        .await?
        .into_iter()
        .map(CourseView::from)
        .collect();
    let featured_portfolios = db::list_active_portfolios(&state.pool, None, HOME_ITEMS, 0)
        .await?
        .into_iter()
        .map(PortfolioView::from)
        .collect();
    let totals = db::site_totals(&state.pool).await?;

    Ok(Json(HomeResponse {
        latest_courses,
        featured_portfolios,
        totals,
    }))
}

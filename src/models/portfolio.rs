//! # 포트폴리오 갤러리 모델
//!
//! 공개 포트폴리오 목록에서 사용하는 카테고리와 프로젝트 구조체입니다.

use serde::{Deserialize, Serialize};

use super::double_option;

/// 한 페이지에 보여주는 포트폴리오 수
pub const PORTFOLIO_PAGE_SIZE: i64 = 12;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PortfolioCategory {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Font Awesome 아이콘 클래스 (예: "fab fa-react")
    pub icon: String,
    pub created_at: String,
}

/// 카테고리 + 포함된 포트폴리오 수 (필터 사이드바)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PortfolioCategoryWithCount {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub icon: String,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePortfolioCategoryRequest {
    pub title: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePortfolioCategoryRequest {
    pub title: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Portfolio {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub image: String,
    /// 쉼표로 구분된 기술 목록 ("Rust, Axum, SQLite")
    pub technologies: String,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub year: Option<i64>,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Portfolio {
    /// "Rust, , Axum " → ["Rust", "Axum"]
    pub fn technologies_list(&self) -> Vec<String> {
        self.technologies
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 데모 링크: demo_url → project_url → "#"
    pub fn demo_link(&self) -> String {
        self.demo_url
            .as_deref()
            .or(self.project_url.as_deref())
            .unwrap_or("#")
            .to_string()
    }

    pub fn github_link(&self) -> String {
        self.github_url.as_deref().unwrap_or("#").to_string()
    }
}

/// 응답용 포트폴리오 표현
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioView {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    pub technologies_list: Vec<String>,
    pub demo_link: String,
    pub github_link: String,
}

impl From<Portfolio> for PortfolioView {
    fn from(portfolio: Portfolio) -> Self {
        Self {
            technologies_list: portfolio.technologies_list(),
            demo_link: portfolio.demo_link(),
            github_link: portfolio.github_link(),
            portfolio,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePortfolioRequest {
    pub title: String,
    pub description: String,
    pub category_id: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub technologies: String,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub year: Option<i64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePortfolioRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub image: Option<String>,
    pub technologies: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub project_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub github_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub demo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub year: Option<Option<i64>>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

/// `GET /portfolio?category=&page=` 쿼리 파라미터
///
/// `page`는 문자열로 받습니다. 숫자가 아니면 1페이지로 처리합니다.
#[derive(Debug, Default, Deserialize)]
pub struct PortfolioListQuery {
    pub category: Option<String>,
    pub page: Option<String>,
}

/// 페이지 정보
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    pub number: i64,
    pub num_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    /// 요청 페이지를 유효 범위로 보정합니다.
    ///
    /// - 없거나 숫자가 아니면 1페이지
    /// - 1보다 작거나 마지막 페이지보다 크면 마지막 페이지
    /// - 항목이 0개여도 페이지 수는 1
    pub fn resolve(requested: Option<&str>, total: i64, page_size: i64) -> Self {
        let num_pages = ((total + page_size - 1) / page_size).max(1);
        let number = match requested.and_then(|p| p.trim().parse::<i64>().ok()) {
            None => 1,
            Some(p) if (1..=num_pages).contains(&p) => p,
            Some(_) => num_pages,
        };

        Self {
            number,
            num_pages,
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }

    pub fn offset(&self, page_size: i64) -> i64 {
        (self.number - 1) * page_size
    }
}

use crate::config::CatalogConfig;
use crate::error::{AppError, AppResult};
use crate::models::ItemType;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Price and ownership snapshot for a live catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub price: i64,
    pub author_id: Option<i64>,
    pub company_id: Option<i64>,
}

/// Catalog lookups live in another service; this engine only needs the
/// current price/ownership of a purchasable record and the active
/// co-authors of a course.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fails NotFound when the id does not resolve to a live record of the
    /// stated type.
    async fn resolve(&self, item_type: ItemType, id: i64) -> AppResult<ResolvedEntity>;

    /// Active, non-deleted co-author user ids for a course. Empty when the
    /// course has none.
    async fn course_co_authors(&self, course_id: i64) -> AppResult<Vec<i64>>;
}

#[derive(Debug, Deserialize)]
struct CatalogEntityRecord {
    price: i64,
    #[serde(rename = "authorId")]
    author_id: Option<i64>,
    #[serde(rename = "companyId")]
    company_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CoAuthorsRecord {
    #[serde(rename = "coAuthorIds")]
    co_author_ids: Vec<i64>,
}

#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    config: CatalogConfig,
}

impl HttpCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn resolve(&self, item_type: ItemType, id: i64) -> AppResult<ResolvedEntity> {
        let url = format!(
            "{}/internal/catalog/{}/{}",
            self.config.base_url, item_type, id
        );

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "No live {item_type} found with id {id}"
            )));
        }
        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Catalog lookup failed for {item_type} {id}: {error_text}");
            return Err(AppError::ExternalApiError(format!(
                "Catalog lookup failed: {error_text}"
            )));
        }

        let record: CatalogEntityRecord = response.json().await?;
        Ok(ResolvedEntity {
            price: record.price,
            author_id: record.author_id,
            company_id: record.company_id,
        })
    }

    async fn course_co_authors(&self, course_id: i64) -> AppResult<Vec<i64>> {
        let url = format!(
            "{}/internal/courses/{}/co-authors",
            self.config.base_url, course_id
        );

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "No live course found with id {course_id}"
            )));
        }
        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Co-author lookup failed for course {course_id}: {error_text}");
            return Err(AppError::ExternalApiError(format!(
                "Co-author lookup failed: {error_text}"
            )));
        }

        let record: CoAuthorsRecord = response.json().await?;
        Ok(record.co_author_ids)
    }
}

use crate::api::types::{
    ArticlePage, ArticleStatus, NewSource, RefreshSummary, Source, StatusChange,
};
use crate::filter::FilterState;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Bounded per-request budget. The backend is local or near-local; anything
/// slower than this should surface as a visible failure, not a hang.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("already exists: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server error: status {0}")]
    HttpStatus(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// True for failures worth a retry affordance in the UI (transport and
    /// backend trouble), false for errors the user has to fix (validation,
    /// duplicates, missing names).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout(_) | ApiError::Network(_) | ApiError::HttpStatus(_)
        )
    }
}

/// Client for the aggregation backend. Cheap to clone via `Arc`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client for the given base URL, e.g. `http://127.0.0.1:8000/api`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        // Normalize away a trailing slash so endpoint() composes cleanly.
        base.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?
            .pop_if_empty();

        let http = reqwest::Client::builder()
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self {
            http,
            base,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /articles` with the filter serialized as query parameters.
    pub async fn articles(&self, filter: &FilterState) -> Result<ArticlePage, ApiError> {
        let mut url = self.endpoint(&["articles"])?;
        url.set_query(Some(&filter.query_string()));
        tracing::debug!(url = %url, "Loading article page");
        let response = self.send(self.http.get(url)).await?;
        Self::json(response).await
    }

    /// `PUT /articles/{id}/status` — change read and/or read-later flags.
    /// Rejects an empty change before touching the network.
    pub async fn update_status(
        &self,
        article_id: &str,
        change: StatusChange,
    ) -> Result<ArticleStatus, ApiError> {
        if change.is_empty() {
            return Err(ApiError::Validation(
                "status update must set read or read_later".to_string(),
            ));
        }
        let mut url = self.endpoint(&["articles", article_id, "status"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(read_later) = change.read_later {
                query.append_pair("read_later", if read_later { "true" } else { "false" });
            }
            if let Some(read) = change.read {
                query.append_pair("read", if read { "true" } else { "false" });
            }
        }
        let response = self.send(self.http.put(url)).await?;
        Self::json(response).await
    }

    /// `GET /sources` — every configured source, active or not.
    pub async fn sources(&self) -> Result<Vec<Source>, ApiError> {
        let url = self.endpoint(&["sources"])?;
        let response = self.send(self.http.get(url)).await?;
        Self::json(response).await
    }

    /// `POST /sources` — register a new feed source. Name and URL must be
    /// non-empty; a duplicate name surfaces as [`ApiError::Conflict`].
    pub async fn add_source(
        &self,
        name: &str,
        feed_url: &str,
        category: &str,
    ) -> Result<Source, ApiError> {
        let name = name.trim();
        let feed_url = feed_url.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("source name is required".to_string()));
        }
        if feed_url.is_empty() {
            return Err(ApiError::Validation("source URL is required".to_string()));
        }
        let body = NewSource {
            name: name.to_string(),
            url: feed_url.to_string(),
            category: category.trim().to_string(),
            active: true,
        };
        let url = self.endpoint(&["sources"])?;
        let response = self.send(self.http.post(url).json(&body)).await?;
        Self::json(response).await
    }

    /// `DELETE /sources/{name}` — permanently remove a source.
    pub async fn delete_source(&self, name: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["sources", name])?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    /// `PATCH /sources/{name}` — flip the active flag without rewriting the
    /// rest of the source.
    pub async fn set_source_active(&self, name: &str, active: bool) -> Result<Source, ApiError> {
        let url = self.endpoint(&["sources", name])?;
        let body = serde_json::json!({ "active": active });
        let response = self.send(self.http.patch(url).json(&body)).await?;
        Self::json(response).await
    }

    /// `POST /refresh` — ask the backend to re-poll all active feeds.
    pub async fn refresh(&self) -> Result<RefreshSummary, ApiError> {
        let url = self.endpoint(&["refresh"])?;
        let response = self.send(self.http.post(url)).await?;
        Self::json(response).await
    }

    /// Join path segments onto the base URL. Segments are percent-encoded,
    /// so source names with spaces or slashes stay single segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .extend(segments);
        Ok(url)
    }

    /// Issue a request under the timeout budget and map non-2xx statuses to
    /// the error taxonomy.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))?
            .map_err(ApiError::Network)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = Self::error_detail(response).await;
        tracing::debug!(status = status.as_u16(), detail = %detail, "Backend returned an error");
        Err(match status.as_u16() {
            400 | 422 => ApiError::Validation(detail),
            404 => ApiError::NotFound(detail),
            409 => ApiError::Conflict(detail),
            code => ApiError::HttpStatus(code),
        })
    }

    /// Best-effort extraction of the backend's `{"detail": "..."}` body.
    async fn error_detail(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
                return detail.to_string();
            }
        }
        format!("HTTP {}", status.as_u16())
    }

    async fn json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

//! HTTP client for the aggregation backend.
//!
//! The backend owns ingestion and storage; everything here is a thin,
//! well-typed wrapper over its REST surface:
//!
//! - `GET    /api/articles`              — paginated, filtered article list
//! - `PUT    /api/articles/{id}/status`  — read / read-later flags
//! - `GET    /api/sources`               — configured feed sources
//! - `POST   /api/sources`               — add a source
//! - `DELETE /api/sources/{name}`        — remove a source
//! - `PATCH  /api/sources/{name}`        — partial update (active flag)
//! - `POST   /api/refresh`               — trigger a backend re-poll

mod client;
mod types;

pub use client::{ApiClient, ApiError, DEFAULT_TIMEOUT};
pub use types::{
    Article, ArticlePage, ArticleStatus, NewSource, RefreshSummary, Source, StatusChange, Tag,
};

//! Wire types for the backend REST API.
//!
//! Field names mirror the backend schema (snake_case JSON). Articles are
//! read-mostly on the client: a page is discarded wholesale on the next
//! reload, never cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A topical label attached to an article during ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Tag {
    pub name: String,
    /// Backend confidence score in [0, 1]; informational only.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

/// A single article as served by `GET /api/articles`.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub link: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Name of the configured source this article came from.
    pub source: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub read_later: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Article {
    pub fn status(&self) -> ArticleStatus {
        ArticleStatus {
            read: self.read,
            read_later: self.read_later,
        }
    }

    pub fn set_status(&mut self, status: ArticleStatus) {
        self.read = status.read;
        self.read_later = status.read_later;
    }
}

/// One page of query results plus the pagination envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl ArticlePage {
    /// Number of pages the current total spans. At least 1.
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        (self.total.div_ceil(size)).max(1) as u32
    }
}

/// A configured feed source.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub category: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Request body for `POST /api/sources`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSource {
    pub name: String,
    pub url: String,
    pub category: String,
    pub active: bool,
}

/// A partial read/read-later update. `None` fields are left untouched by
/// the backend; at least one must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusChange {
    pub read: Option<bool>,
    pub read_later: Option<bool>,
}

impl StatusChange {
    pub fn read(value: bool) -> Self {
        Self {
            read: Some(value),
            read_later: None,
        }
    }

    pub fn read_later(value: bool) -> Self {
        Self {
            read: None,
            read_later: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_none() && self.read_later.is_none()
    }
}

/// Confirmed flags returned by `PUT /api/articles/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ArticleStatus {
    pub read: bool,
    pub read_later: bool,
}

impl ArticleStatus {
    /// The status that results from applying `change` on top of `self`.
    pub fn with(self, change: StatusChange) -> Self {
        Self {
            read: change.read.unwrap_or(self.read),
            read_later: change.read_later.unwrap_or(self.read_later),
        }
    }
}

/// Outcome of `POST /api/refresh`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RefreshSummary {
    #[serde(default)]
    pub sources_count: u64,
    #[serde(default)]
    pub articles_count: u64,
}

//! Pure view models, independent of any widget library.
//!
//! `render_article` and `paginate` are plain functions from state to data so
//! the renderer stays trivial and the interesting logic is testable without
//! a terminal.

use crate::api::Article;
use crate::tags::display_tags;
use chrono::{DateTime, Utc};

/// Everything the renderer needs to draw one article card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub id: String,
    pub title: String,
    pub source: String,
    /// Relative age label ("3h", "2d", or a date for older items).
    pub published: String,
    pub description: String,
    pub link: String,
    pub tags: Vec<String>,
    pub read: bool,
    pub read_later: bool,
    pub has_image: bool,
}

/// Build the card view-model for an article. Tags fall back to client-side
/// extraction when the server supplied none.
pub fn render_article(article: &Article) -> ArticleCard {
    ArticleCard {
        id: article.id.clone(),
        title: article.title.clone(),
        source: article.source.clone(),
        published: format_relative_time(article.pub_date),
        description: article.description.clone(),
        link: article.link.clone(),
        tags: display_tags(article),
        read: article.read,
        read_later: article.read_later,
        has_image: article.image_url.is_some(),
    }
}

/// Format a publication timestamp as a short relative age.
pub fn format_relative_time(published: DateTime<Utc>) -> String {
    let diff = Utc::now().timestamp() - published.timestamp();

    // Future dates (malformed feeds)
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }
    published.format("%b %d").to_string()
}

/// One element of the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Previous { enabled: bool },
    Page { number: u32, current: bool },
    Ellipsis,
    Next { enabled: bool },
}

/// How many pages to show on each side of the current one.
const PAGE_WINDOW: u32 = 2;

/// Build the pagination strip: a window around the current page, the first
/// and last pages when outside the window, ellipses in the gaps, and
/// prev/next arrows. Empty when everything fits on one page.
pub fn paginate(page: u32, page_size: u32, total: u64) -> Vec<PageItem> {
    let total_pages = (total.div_ceil(u64::from(page_size.max(1)))).max(1) as u32;
    if total_pages <= 1 {
        return Vec::new();
    }
    let page = page.clamp(1, total_pages);

    let mut items = vec![PageItem::Previous { enabled: page > 1 }];

    let start = page.saturating_sub(PAGE_WINDOW).max(1);
    let end = (page + PAGE_WINDOW).min(total_pages);

    if start > 1 {
        items.push(PageItem::Page {
            number: 1,
            current: false,
        });
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }

    for number in start..=end {
        items.push(PageItem::Page {
            number,
            current: number == page,
        });
    }

    if end < total_pages {
        if end < total_pages - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page {
            number: total_pages,
            current: false,
        });
    }

    items.push(PageItem::Next {
        enabled: page < total_pages,
    });
    items
}

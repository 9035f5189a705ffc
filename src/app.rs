//! Application state: the filter, the rendered page, and everything the UI
//! needs to draw.
//!
//! All mutation funnels through methods here so the invariants are testable
//! without a terminal: reloads are tagged with a generation counter and stale
//! responses dropped; status toggles are applied optimistically and rolled
//! back on failure; the tag facet list and the local counters are recomputed
//! from each successfully loaded page.

use crate::api::{ApiError, Article, ArticlePage, ArticleStatus, RefreshSummary, Source};
use crate::filter::FilterState;
use crate::tags::display_tags;
use std::borrow::Cow;
use std::time::{Duration, Instant};

/// How long a status-line notification stays visible.
const STATUS_DURATION: Duration = Duration::from_secs(4);

/// Which panel has keyboard focus in the browse view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sources,
    Articles,
}

/// Modal input state layered over the browse view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Typing a search query; committed on Enter.
    Search { input: String },
    /// Filling in the add-source form.
    AddSource { form: SourceForm },
    /// Waiting for a yes/no on a destructive source removal.
    ConfirmDelete { name: String },
}

/// Fields of the add-source form and which one is being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceForm {
    pub name: String,
    pub url: String,
    pub category: String,
    pub field: FormField,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Url,
    Category,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Url,
            FormField::Url => FormField::Category,
            FormField::Category => FormField::Name,
        }
    }
}

impl SourceForm {
    pub fn active_field_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.name,
            FormField::Url => &mut self.url,
            FormField::Category => &mut self.category,
        }
    }
}

/// A tag facet derived from the current page, with its highlight state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFacet {
    pub name: String,
    pub active: bool,
}

/// Events sent back from background tasks.
///
/// Article loads and status updates carry enough context for the receiving
/// side to detect staleness or roll back: the reload generation for loads,
/// the pre-optimistic-flip status for updates.
pub enum AppEvent {
    ArticlesLoaded {
        generation: u64,
        result: Result<ArticlePage, ApiError>,
    },
    SourcesLoaded {
        result: Result<Vec<Source>, ApiError>,
    },
    StatusUpdated {
        article_id: String,
        prior: ArticleStatus,
        status: ArticleStatus,
    },
    StatusUpdateFailed {
        article_id: String,
        prior: ArticleStatus,
        error: String,
    },
    SourceAdded {
        result: Result<Source, ApiError>,
    },
    SourceRemoved {
        name: String,
        result: Result<(), ApiError>,
    },
    SourceToggled {
        name: String,
        result: Result<Source, ApiError>,
    },
    RefreshComplete {
        result: Result<RefreshSummary, ApiError>,
    },
}

/// The whole client-side session state.
pub struct App {
    /// The current article query. Mutations go through [`FilterState`]'s
    /// setters, which enforce the selection-model invariants.
    pub filter: FilterState,

    /// The last successfully loaded page, kept across failed reloads.
    pub articles: Vec<Article>,
    /// Total matching articles on the server for the current filter.
    pub total: u64,
    /// Page size echoed by the last successful response.
    pub loaded_page_size: u32,
    /// Page number echoed by the last successful response.
    pub loaded_page: u32,

    /// A reload is in flight.
    pub loading: bool,
    /// Last reload failure, shown with a retry affordance. Cleared on the
    /// next success.
    pub load_error: Option<String>,
    /// Whether any reload has ever succeeded; before that, a failure shows
    /// an empty error state instead of a stale page.
    pub has_loaded_once: bool,

    /// Page-scoped tag facets, recomputed from each loaded page.
    pub tag_facets: Vec<TagFacet>,

    /// Configured sources, re-fetched after every mutation.
    pub sources: Vec<Source>,

    /// Unread articles on the current page. Adjusted locally on status
    /// changes; may drift from server truth until the next reload, which is
    /// an accepted trade-off to avoid a full reload per click.
    pub unread_count: u64,
    /// Bookmarked articles on the current page. Same drift trade-off.
    pub saved_count: u64,

    pub focus: Focus,
    pub mode: Mode,
    pub selected_article: usize,
    pub selected_source: usize,

    /// Transient status-line notification.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    /// A backend refresh is in flight; the key is ignored meanwhile.
    pub refresh_in_flight: bool,

    /// Monotonic tag for article reloads. Only a response carrying the
    /// current value may be applied (last issued wins).
    reload_generation: u64,
}

impl App {
    pub fn new(filter: FilterState) -> Self {
        let page_size = filter.page_size();
        Self {
            filter,
            articles: Vec::new(),
            total: 0,
            loaded_page_size: page_size,
            loaded_page: 1,
            loading: false,
            load_error: None,
            has_loaded_once: false,
            tag_facets: Vec::new(),
            sources: Vec::new(),
            unread_count: 0,
            saved_count: 0,
            focus: Focus::Articles,
            mode: Mode::Browse,
            selected_article: 0,
            selected_source: 0,
            status_message: None,
            needs_redraw: true,
            refresh_in_flight: false,
            reload_generation: 0,
        }
    }

    // ------------------------------------------------------------------
    // Article reloads
    // ------------------------------------------------------------------

    /// Start a reload: bump the generation and enter the loading state.
    /// The previous page stays rendered until the new one arrives.
    pub fn begin_reload(&mut self) -> u64 {
        self.reload_generation = self.reload_generation.wrapping_add(1);
        self.loading = true;
        tracing::debug!(
            generation = self.reload_generation,
            page = self.filter.page(),
            "Article reload started"
        );
        self.reload_generation
    }

    /// Apply a reload result. Returns false when the result was stale and
    /// dropped without touching the rendered page.
    pub fn apply_articles(
        &mut self,
        generation: u64,
        result: Result<ArticlePage, ApiError>,
    ) -> bool {
        if generation != self.reload_generation {
            tracing::debug!(
                generation,
                current = self.reload_generation,
                "Dropping stale article response"
            );
            return false;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                tracing::debug!(
                    count = page.articles.len(),
                    total = page.total,
                    page = page.page,
                    "Article page loaded"
                );
                self.articles = page.articles;
                self.total = page.total;
                self.loaded_page = page.page;
                self.loaded_page_size = page.page_size.max(1);
                self.load_error = None;
                self.has_loaded_once = true;
                self.recompute_facets();
                self.recompute_counters();
                if self.selected_article >= self.articles.len() {
                    self.selected_article = self.articles.len().saturating_sub(1);
                }
            }
            Err(e) => {
                // Keep the previously rendered page; only the very first
                // load shows an empty error state.
                tracing::warn!(error = %e, "Article reload failed");
                self.load_error = Some(e.to_string());
                self.set_status(format!("Failed to load articles: {}", e));
            }
        }
        true
    }

    /// Number of pages the current total spans. At least 1.
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.loaded_page_size.max(1));
        (self.total.div_ceil(size)).max(1) as u32
    }

    /// Page-scoped facet set: unique display tags of the rendered articles,
    /// in first-occurrence order, with the selected tag highlighted.
    fn recompute_facets(&mut self) {
        let selected = self.filter.tag().map(str::to_string);
        let mut facets: Vec<TagFacet> = Vec::new();
        for article in &self.articles {
            for name in display_tags(article) {
                if !facets.iter().any(|f| f.name == name) {
                    let active = selected.as_deref() == Some(name.as_str());
                    facets.push(TagFacet { name, active });
                }
            }
        }
        self.tag_facets = facets;
    }

    /// Re-sync the tag highlight after a filter mutation without a reload
    /// having landed yet.
    pub fn republish_tag_highlight(&mut self) {
        let selected = self.filter.tag().map(str::to_string);
        for facet in &mut self.tag_facets {
            facet.active = selected.as_deref() == Some(facet.name.as_str());
        }
    }

    fn recompute_counters(&mut self) {
        self.unread_count = self.articles.iter().filter(|a| !a.read).count() as u64;
        self.saved_count = self.articles.iter().filter(|a| a.read_later).count() as u64;
    }

    // ------------------------------------------------------------------
    // Status changes (optimistic)
    // ------------------------------------------------------------------

    /// Flip an article's flags before the network call resolves. Returns the
    /// prior status for the eventual rollback, or None when the article is
    /// not on the current page.
    pub fn apply_status_optimistic(
        &mut self,
        article_id: &str,
        status: ArticleStatus,
    ) -> Option<ArticleStatus> {
        let article = self.articles.iter_mut().find(|a| a.id == article_id)?;
        let prior = article.status();
        article.set_status(status);
        Some(prior)
    }

    /// Server confirmed a status change: reconcile the card with the
    /// confirmed flags and adjust the local counters by the delta.
    pub fn confirm_status(&mut self, article_id: &str, prior: ArticleStatus, status: ArticleStatus) {
        if let Some(article) = self.articles.iter_mut().find(|a| a.id == article_id) {
            article.set_status(status);
        }
        if prior.read != status.read {
            if status.read {
                self.unread_count = self.unread_count.saturating_sub(1);
            } else {
                self.unread_count += 1;
            }
        }
        if prior.read_later != status.read_later {
            if status.read_later {
                self.saved_count += 1;
            } else {
                self.saved_count = self.saved_count.saturating_sub(1);
            }
        }
    }

    /// Server rejected a status change: restore the pre-flip flags and tell
    /// the user.
    pub fn rollback_status(&mut self, article_id: &str, prior: ArticleStatus, error: &str) {
        if let Some(article) = self.articles.iter_mut().find(|a| a.id == article_id) {
            article.set_status(prior);
        }
        tracing::warn!(article_id, error, "Status update failed, rolled back");
        self.set_status(format!("Update failed: {}", error));
    }

    // ------------------------------------------------------------------
    // Sources
    // ------------------------------------------------------------------

    pub fn apply_sources(&mut self, result: Result<Vec<Source>, ApiError>) {
        match result {
            Ok(sources) => {
                self.sources = sources;
                if self.selected_source >= self.sources.len() {
                    self.selected_source = self.sources.len().saturating_sub(1);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Source list load failed");
                self.set_status(format!("Failed to load sources: {}", e));
            }
        }
    }

    pub fn selected_source(&self) -> Option<&Source> {
        self.sources.get(self.selected_source)
    }

    // ------------------------------------------------------------------
    // Selection and notifications
    // ------------------------------------------------------------------

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles.get(self.selected_article)
    }

    pub fn select_next_article(&mut self) {
        if !self.articles.is_empty() {
            self.selected_article = (self.selected_article + 1).min(self.articles.len() - 1);
        }
    }

    pub fn select_prev_article(&mut self) {
        self.selected_article = self.selected_article.saturating_sub(1);
    }

    pub fn select_next_source(&mut self) {
        if !self.sources.is_empty() {
            self.selected_source = (self.selected_source + 1).min(self.sources.len() - 1);
        }
    }

    pub fn select_prev_source(&mut self) {
        self.selected_source = self.selected_source.saturating_sub(1);
    }

    /// Show a transient status-line notification.
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop an expired status message. Returns true when one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, shown_at)) = &self.status_message {
            if shown_at.elapsed() >= STATUS_DURATION {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{StatusChange, Tag};
    use chrono::Utc;

    fn test_article(id: &str, read: bool, read_later: bool) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Article {}", id),
            description: String::new(),
            link: format!("https://example.com/{}", id),
            image_url: None,
            source: "AWS".to_string(),
            pub_date: Utc::now(),
            read,
            read_later,
            tags: vec![Tag {
                name: "Cloud".to_string(),
                confidence: 1.0,
            }],
        }
    }

    fn test_page(articles: Vec<Article>, total: u64) -> ArticlePage {
        ArticlePage {
            articles,
            total,
            page: 1,
            page_size: 20,
        }
    }

    #[test]
    fn test_stale_response_dropped() {
        let mut app = App::new(FilterState::new(20));

        let gen_a = app.begin_reload();
        let gen_b = app.begin_reload();

        // B resolves first and wins.
        assert!(app.apply_articles(gen_b, Ok(test_page(vec![test_article("b", false, false)], 1))));
        assert_eq!(app.articles[0].id, "b");

        // A resolves late and must not overwrite B's render.
        let applied =
            app.apply_articles(gen_a, Ok(test_page(vec![test_article("a", false, false)], 1)));
        assert!(!applied);
        assert_eq!(app.articles[0].id, "b");
    }

    #[test]
    fn test_failed_reload_keeps_previous_page() {
        let mut app = App::new(FilterState::new(20));

        let generation = app.begin_reload();
        app.apply_articles(
            generation,
            Ok(test_page(vec![test_article("a", false, false)], 1)),
        );
        assert!(app.has_loaded_once);

        let generation = app.begin_reload();
        app.apply_articles(generation, Err(ApiError::HttpStatus(500)));

        assert_eq!(app.articles.len(), 1, "previous page must survive");
        assert!(app.load_error.is_some());
        assert!(app.status_message.is_some());
        assert!(!app.loading);
    }

    #[test]
    fn test_first_load_failure_is_empty_error_state() {
        let mut app = App::new(FilterState::new(20));
        let generation = app.begin_reload();
        app.apply_articles(generation, Err(ApiError::HttpStatus(503)));

        assert!(app.articles.is_empty());
        assert!(!app.has_loaded_once);
        assert!(app.load_error.is_some());
    }

    #[test]
    fn test_success_clears_error_and_recomputes() {
        let mut app = App::new(FilterState::new(20));
        let generation = app.begin_reload();
        app.apply_articles(generation, Err(ApiError::HttpStatus(500)));

        let generation = app.begin_reload();
        app.apply_articles(
            generation,
            Ok(test_page(
                vec![
                    test_article("a", false, true),
                    test_article("b", true, false),
                ],
                2,
            )),
        );

        assert!(app.load_error.is_none());
        assert_eq!(app.unread_count, 1);
        assert_eq!(app.saved_count, 1);
        assert_eq!(app.tag_facets.len(), 1); // both articles tagged Cloud
        assert_eq!(app.tag_facets[0].name, "Cloud");
    }

    #[test]
    fn test_facet_highlight_follows_filter() {
        let mut app = App::new(FilterState::new(20));
        app.filter.select_tag("Cloud");

        let generation = app.begin_reload();
        app.apply_articles(
            generation,
            Ok(test_page(vec![test_article("a", false, false)], 1)),
        );
        assert!(app.tag_facets[0].active);

        app.filter.select_tag("Cloud"); // radio toggle off
        app.republish_tag_highlight();
        assert!(!app.tag_facets[0].active);
    }

    #[test]
    fn test_optimistic_flip_and_rollback_restores_state() {
        let mut app = App::new(FilterState::new(20));
        let generation = app.begin_reload();
        app.apply_articles(
            generation,
            Ok(test_page(vec![test_article("42", false, false)], 1)),
        );

        let before = app.articles[0].status();
        let target = before.with(StatusChange::read(true));
        let prior = app.apply_status_optimistic("42", target).unwrap();
        assert_eq!(prior, before);
        assert!(app.articles[0].read);

        app.rollback_status("42", prior, "server error: status 500");
        assert_eq!(app.articles[0].status(), before);
        assert!(app.status_message.is_some(), "one error notification shown");
    }

    #[test]
    fn test_confirm_status_adjusts_counters() {
        let mut app = App::new(FilterState::new(20));
        let generation = app.begin_reload();
        app.apply_articles(
            generation,
            Ok(test_page(
                vec![
                    test_article("a", false, false),
                    test_article("b", false, false),
                ],
                2,
            )),
        );
        assert_eq!(app.unread_count, 2);
        assert_eq!(app.saved_count, 0);

        let prior = app.articles[0].status();
        let confirmed = prior.with(StatusChange::read(true));
        app.apply_status_optimistic("a", confirmed);
        app.confirm_status("a", prior, confirmed);
        assert_eq!(app.unread_count, 1);

        let prior = app.articles[1].status();
        let confirmed = prior.with(StatusChange::read_later(true));
        app.apply_status_optimistic("b", confirmed);
        app.confirm_status("b", prior, confirmed);
        assert_eq!(app.saved_count, 1);
    }

    #[test]
    fn test_optimistic_flip_on_missing_article() {
        let mut app = App::new(FilterState::new(20));
        let result = app.apply_status_optimistic(
            "nope",
            ArticleStatus {
                read: true,
                read_later: false,
            },
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_selection_clamped_after_shorter_page() {
        let mut app = App::new(FilterState::new(20));
        let generation = app.begin_reload();
        app.apply_articles(
            generation,
            Ok(test_page(
                (0..5)
                    .map(|i| test_article(&i.to_string(), false, false))
                    .collect(),
                5,
            )),
        );
        app.selected_article = 4;

        let generation = app.begin_reload();
        app.apply_articles(
            generation,
            Ok(test_page(vec![test_article("x", false, false)], 1)),
        );
        assert_eq!(app.selected_article, 0);
    }

    #[test]
    fn test_status_message_expires() {
        let mut app = App::new(FilterState::new(20));
        app.set_status("hello");
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        // Backdate the message past the expiry window.
        if let Some((_, shown_at)) = &mut app.status_message {
            *shown_at = Instant::now() - STATUS_DURATION - Duration::from_millis(1);
        }
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_total_pages() {
        let mut app = App::new(FilterState::new(20));
        let generation = app.begin_reload();
        app.apply_articles(generation, Ok(test_page(Vec::new(), 57)));
        assert_eq!(app.total_pages(), 3);
    }
}

//! Mutable query descriptor for the article list.
//!
//! A single `FilterState` lives in the application state and describes which
//! page of articles is currently requested: pagination window plus up to one
//! of each filter dimension (source, tag, search text, read-later, read
//! status). The setters enforce the selection model invariants so callers
//! never have to remember them:
//!
//! - every mutation except an explicit page change resets `page` to 1;
//! - `source`, `tag` and `read_later_only` are mutually exclusive —
//!   selecting one clears the other two;
//! - re-selecting the active source or tag clears it (radio semantics).

use std::fmt;

/// Articles per page when neither config nor CLI override it.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Read-status filter dimension.
///
/// A stable identifier rather than UI label text, so filter logic never
/// depends on how the choice is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFilter {
    /// No read-status constraint.
    #[default]
    Either,
    /// Only articles already marked read.
    Read,
    /// Only unread articles.
    Unread,
}

impl ReadFilter {
    /// Cycle Either -> Unread -> Read -> Either (the order the UI exposes).
    pub fn next(self) -> Self {
        match self {
            ReadFilter::Either => ReadFilter::Unread,
            ReadFilter::Unread => ReadFilter::Read,
            ReadFilter::Read => ReadFilter::Either,
        }
    }
}

impl fmt::Display for ReadFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadFilter::Either => write!(f, "all"),
            ReadFilter::Read => write!(f, "read"),
            ReadFilter::Unread => write!(f, "unread"),
        }
    }
}

/// The current article query. One instance per session.
///
/// Fields are private so every mutation goes through a setter that maintains
/// the invariants above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    page: u32,
    page_size: u32,
    source: Option<String>,
    tag: Option<String>,
    search: Option<String>,
    read_later_only: bool,
    read: ReadFilter,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl FilterState {
    /// A fresh filter on page 1 with no dimensions set.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            source: None,
            tag: None,
            search: None,
            read_later_only: false,
            read: ReadFilter::Either,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn read_later_only(&self) -> bool {
        self.read_later_only
    }

    pub fn read(&self) -> ReadFilter {
        self.read
    }

    /// True when no filter dimension is set (pagination aside).
    pub fn is_unfiltered(&self) -> bool {
        self.source.is_none()
            && self.tag.is_none()
            && self.search.is_none()
            && !self.read_later_only
            && self.read == ReadFilter::Either
    }

    /// Select a source filter. Selecting the already-active source clears it.
    /// Clears the tag and read-later dimensions either way.
    pub fn select_source(&mut self, name: &str) {
        if self.source.as_deref() == Some(name) {
            self.source = None;
        } else {
            self.source = Some(name.to_string());
        }
        self.tag = None;
        self.read_later_only = false;
        self.page = 1;
    }

    /// Drop the source filter without touching other dimensions.
    pub fn clear_source(&mut self) {
        if self.source.take().is_some() {
            self.page = 1;
        }
    }

    /// Select a tag filter. Selecting the already-active tag clears it.
    /// Clears the source and read-later dimensions either way.
    pub fn select_tag(&mut self, tag: &str) {
        if self.tag.as_deref() == Some(tag) {
            self.tag = None;
        } else {
            self.tag = Some(tag.to_string());
        }
        self.source = None;
        self.read_later_only = false;
        self.page = 1;
    }

    /// Set or clear the free-text search. An empty or whitespace-only string
    /// clears the filter.
    pub fn set_search(&mut self, query: &str) {
        let trimmed = query.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.page = 1;
    }

    /// Toggle the bookmarked-only view. Enabling it clears source and tag.
    pub fn toggle_read_later(&mut self) {
        self.read_later_only = !self.read_later_only;
        if self.read_later_only {
            self.source = None;
            self.tag = None;
        }
        self.page = 1;
    }

    /// Set the read-status dimension.
    pub fn set_read(&mut self, read: ReadFilter) {
        self.read = read;
        self.page = 1;
    }

    /// Jump to a page. The only mutation that preserves the other fields.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Key/value pairs for the article query, omitting unset dimensions.
    /// Booleans serialize as the literal strings `"true"` / `"false"`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(source) = &self.source {
            pairs.push(("source", source.clone()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("tag", tag.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if self.read_later_only {
            pairs.push(("read_later", "true".to_string()));
        }
        match self.read {
            ReadFilter::Either => {}
            ReadFilter::Read => pairs.push(("read", "true".to_string())),
            ReadFilter::Unread => pairs.push(("read", "false".to_string())),
        }
        pairs
    }

    /// Percent-encoded query string for the article endpoint.
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}

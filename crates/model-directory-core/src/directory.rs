//! Model directory table: filtering, sorting and client-side pagination.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ProcessedModel;

/// Rows per page when paginating client-side.
pub const PAGE_SIZE: usize = 100;

/// A dropdown filter value: `"all"` or one specific value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(s.to_string())
        }
    }
}

impl From<String> for Selection {
    fn from(s: String) -> Self {
        Selection::from(s.as_str())
    }
}

impl From<Selection> for String {
    fn from(s: Selection) -> Self {
        match s {
            Selection::All => "all".to_string(),
            Selection::Only(v) => v,
        }
    }
}

/// Search text plus the provider and mode dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub query: String,
    pub provider: Selection,
    pub mode: Selection,
}

impl Filters {
    /// Any of search, provider or mode narrows the list.
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || !self.provider.is_all() || !self.mode.is_all()
    }

    pub fn matches(&self, m: &ProcessedModel) -> bool {
        matches_query(m, &self.query.trim().to_lowercase())
            && self.provider.accepts(&m.provider)
            && self.mode.accepts(m.mode().as_str())
    }

    pub fn apply<'a>(&self, models: &'a [ProcessedModel]) -> Vec<&'a ProcessedModel> {
        models.iter().filter(|m| self.matches(m)).collect()
    }
}

/// `needle` must already be lowercased. Empty matches everything.
fn matches_query(m: &ProcessedModel, needle: &str) -> bool {
    needle.is_empty()
        || m.display_name.to_lowercase().contains(needle)
        || m.provider.to_lowercase().contains(needle)
        || m.mode().as_str().contains(needle)
        || m.id.to_lowercase().contains(needle)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Provider,
    /// Input price per token. Also accepted as `price`.
    #[serde(alias = "price")]
    Input,
    Output,
}

impl FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "provider" => Ok(Self::Provider),
            "input" | "price" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Column header click: same column flips, a new column starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn compare(&self, a: &ProcessedModel, b: &ProcessedModel) -> Ordering {
        let ord = match self.key {
            SortKey::Name => a
                .display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase()),
            SortKey::Provider => a.provider.to_lowercase().cmp(&b.provider.to_lowercase()),
            SortKey::Input => price(a.data.input_cost_per_token)
                .total_cmp(&price(b.data.input_cost_per_token)),
            SortKey::Output => price(a.data.output_cost_per_token)
                .total_cmp(&price(b.data.output_cost_per_token)),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    /// Stable sort in place.
    pub fn apply(&self, rows: &mut [&ProcessedModel]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

/// Missing prices sort as zero.
fn price(p: Option<f64>) -> f64 {
    p.unwrap_or(0.0)
}

/// Number of pages for `count` rows; never less than one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Rows of 1-based `page`. Out-of-range pages are clamped first.
pub fn page_slice<T>(rows: &[T], page: usize, page_size: usize) -> &[T] {
    let page = clamp_page(page, total_pages(rows.len(), page_size));
    let start = ((page - 1) * page_size).min(rows.len());
    let end = (start + page_size).min(rows.len());
    &rows[start..end]
}

/// Where the rows come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The page of models the server already rendered.
    #[default]
    Page,
    /// The full index, fetched on demand once a filter is active.
    All,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum IndexState {
    #[default]
    NotRequested,
    Loading,
    Loaded(Vec<ProcessedModel>),
    Failed(String),
}

/// A full-index fetch to issue: `GET /api/models[?provider=]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRequest {
    pub provider: Option<String>,
}

impl IndexRequest {
    pub fn path(&self) -> String {
        match &self.provider {
            Some(p) => format!("/api/models?provider={}", urlencoding::encode(p)),
            None => "/api/models".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum EmptyState {
    NoMatches,
    Loading,
    IndexFailed(String),
}

/// What the table renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryView<'a> {
    pub rows: Vec<&'a ProcessedModel>,
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
    pub paginated: bool,
    pub empty: Option<EmptyState>,
}

/// Table state owned by one table instance.
#[derive(Debug, Clone, Default)]
pub struct DirectoryState {
    pub filters: Filters,
    pub sort: SortState,
    pub page: usize,
    pub scope: Scope,
    pub index: IndexState,
}

impl DirectoryState {
    pub fn new(scope: Scope) -> Self {
        Self {
            page: 1,
            scope,
            ..Default::default()
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filters.query = query.into();
        self.page = 1;
    }

    /// The full index is fetched per provider, so a provider change drops it.
    pub fn set_provider(&mut self, provider: Selection) {
        if self.filters.provider != provider {
            self.filters.provider = provider;
            if self.scope == Scope::All {
                self.index = IndexState::NotRequested;
            }
        }
        self.page = 1;
    }

    pub fn set_mode(&mut self, mode: Selection) {
        self.filters.mode = mode;
        self.page = 1;
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page = clamp_page(page, total_pages);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page.saturating_add(1), total_pages);
    }

    pub fn prev_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page.saturating_sub(1), total_pages);
    }

    /// Rows are paginated client-side only over the full index with a filter on.
    pub fn client_paginated(&self) -> bool {
        self.scope == Scope::All && self.filters.is_active()
    }

    /// The fetch the table should start now, if any.
    pub fn index_request(&self) -> Option<IndexRequest> {
        if !self.client_paginated() || self.index != IndexState::NotRequested {
            return None;
        }
        Some(IndexRequest {
            provider: match &self.filters.provider {
                Selection::All => None,
                Selection::Only(p) => Some(p.clone()),
            },
        })
    }

    /// Mark the fetch from [`index_request`](Self::index_request) as in flight.
    pub fn begin_index_fetch(&mut self) -> Option<IndexRequest> {
        let req = self.index_request()?;
        self.index = IndexState::Loading;
        Some(req)
    }

    /// Record a fetch outcome. Whichever result lands last wins.
    pub fn finish_index_fetch(&mut self, result: Result<Vec<ProcessedModel>, String>) {
        self.index = match result {
            Ok(models) => IndexState::Loaded(models),
            Err(e) => {
                tracing::warn!("model index fetch failed: {e}");
                IndexState::Failed(e)
            }
        };
    }

    /// Filter, sort and paginate. `page_models` is the server-rendered page;
    /// it is used whenever the full index is not loaded.
    pub fn view<'a>(&'a self, page_models: &'a [ProcessedModel]) -> DirectoryView<'a> {
        let paginated = self.client_paginated();
        let source: &'a [ProcessedModel] = match (&self.index, paginated) {
            (IndexState::Loaded(index), true) => index,
            _ => page_models,
        };

        let mut rows = self.filters.apply(source);
        self.sort.apply(&mut rows);
        let total_matches = rows.len();

        let (page, total) = if paginated {
            let total = total_pages(total_matches, PAGE_SIZE);
            let page = clamp_page(self.page, total);
            rows = page_slice(&rows, page, PAGE_SIZE).to_vec();
            (page, total)
        } else {
            (1, 1)
        };

        let empty = rows.is_empty().then(|| match (&self.index, paginated) {
            (IndexState::Loading, true) => EmptyState::Loading,
            (IndexState::Failed(msg), true) => EmptyState::IndexFailed(msg.clone()),
            _ => EmptyState::NoMatches,
        });

        DirectoryView {
            rows,
            total_matches,
            page,
            total_pages: total,
            paginated,
            empty,
        }
    }
}

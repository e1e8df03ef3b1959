use tracing::warn;

use super::{LoadState, LoadTicket, VersionClock};
use crate::core::catalog::filter::{category_facets, filter_entries, ALL_CATEGORIES};
use crate::core::catalog::models::WebsiteEntry;
use crate::core::catalog::{CatalogError, CatalogService};
use crate::core::store::DocumentStore;

/// State of the public listing page.
#[derive(Debug, Clone)]
pub struct ListingView {
    state: LoadState,
    search_text: String,
    category: String,
    clock: VersionClock,
}

impl Default for ListingView {
    fn default() -> Self {
        Self {
            state: LoadState::Loading,
            search_text: String::new(),
            category: ALL_CATEGORIES.to_string(),
            clock: VersionClock::default(),
        }
    }
}

impl ListingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        self.search_text = search_text.into();
    }

    /// An empty selection resets to all categories.
    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.category = if category.is_empty() {
            ALL_CATEGORIES.to_string()
        } else {
            category
        };
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.state = LoadState::Loading;
        self.clock.begin()
    }

    /// Applies a load result. Returns `false` when a newer load has started
    /// since `ticket` was issued and the result was discarded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<WebsiteEntry>, CatalogError>,
    ) -> bool {
        if !self.clock.is_current(ticket) {
            return false;
        }
        self.state = match result {
            Ok(entries) => LoadState::Loaded(entries),
            Err(error) => {
                warn!(%error, "error fetching websites");
                LoadState::Failed(error.to_string())
            }
        };
        true
    }

    pub async fn load<S: DocumentStore>(&mut self, catalog: &CatalogService<S>) {
        let ticket = self.begin_load();
        let result = catalog.list_entries().await;
        self.finish_load(ticket, result);
    }

    /// Entries matching the current search text and category.
    pub fn visible_entries(&self) -> Vec<WebsiteEntry> {
        filter_entries(self.state.entries(), &self.search_text, &self.category)
    }

    pub fn facets(&self) -> Vec<String> {
        category_facets(self.state.entries())
    }
}

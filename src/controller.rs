//! Character list state machine
//!
//! The controller owns everything the character grid shows: the fetched
//! collection, search text, filters, page selector, loading/error state,
//! the detail selection and the favorites view. It never performs I/O on
//! its own. Operations that need the network hand back a [`FetchTicket`];
//! the caller runs it (on a worker thread, or inline via [`ListController::execute`])
//! and feeds the outcome to [`ListController::complete`].
//!
//! Every ticket carries a sequence number. Only the most recently issued
//! ticket may change state, so a slow response can never overwrite the
//! result of a newer request.

use crate::api::{ApiError, CharacterSource};
use crate::favorites::FavoritesRepository;
use crate::models::{page_list, ApiResponse, Character, FilterSet, Page, PageInfo};
use crate::query::{build_query, collection_url};

pub const NO_RESULTS_MESSAGE: &str = "No characters found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded,
    /// The request succeeded but matched nothing
    Empty,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    Search,
    Filter,
    Page(u32),
}

/// A collection request issued by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub kind: FetchKind,
    pub url: String,
}

/// A by-id request for the character shown in the detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    pub seq: u64,
    pub id: i64,
}

pub struct ListController {
    base_url: String,
    page_count: u32,

    characters: Vec<Character>,
    info: Option<PageInfo>,
    search: String,
    filters: FilterSet,
    pages: Vec<Page>,

    state: ListState,
    message: Option<String>,
    selected: Option<Character>,

    favorites_only: bool,
    favorites: Vec<Character>,
    store: Box<dyn FavoritesRepository>,

    seq: u64,
    in_flight: Option<(u64, FetchKind)>,
    detail_in_flight: Option<u64>,
}

impl ListController {
    pub fn new(base_url: &str, page_count: u32, store: Box<dyn FavoritesRepository>) -> Self {
        Self {
            base_url: base_url.to_string(),
            page_count,
            characters: Vec::new(),
            info: None,
            search: String::new(),
            filters: FilterSet::default(),
            pages: Vec::new(),
            state: ListState::Idle,
            message: None,
            selected: None,
            favorites_only: false,
            favorites: Vec::new(),
            store,
            seq: 0,
            in_flight: None,
            detail_in_flight: None,
        }
    }

    // ---- accessors ----

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ListState::Loading
    }

    /// Error text or the empty-result notice
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The last applied fetch result, regardless of the favorites view
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// What the grid shows: the fetched collection, narrowed to favorites
    /// (keeping fetch order) when the favorites-only view is on
    pub fn displayed(&self) -> Vec<&Character> {
        if self.favorites_only {
            self.characters
                .iter()
                .filter(|c| self.is_favorite(c.id))
                .collect()
        } else {
            self.characters.iter().collect()
        }
    }

    pub fn info(&self) -> Option<&PageInfo> {
        self.info.as_ref()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut String {
        &mut self.search
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterSet::default();
    }

    pub fn selected(&self) -> Option<&Character> {
        self.selected.as_ref()
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn favorites(&self) -> &[Character] {
        &self.favorites
    }

    pub fn pending(&self) -> Option<FetchKind> {
        self.in_flight.map(|(_, kind)| kind)
    }

    // ---- fetch-triggering operations ----

    /// First load: page 1 selected, favorites read from storage, unfiltered fetch
    pub fn mount(&mut self) -> FetchTicket {
        self.pages = page_list(self.page_count, Some(1));
        self.favorites = self.store.list();
        log::info!("Loaded {} favorites", self.favorites.len());
        let url = collection_url(&self.base_url, "");
        self.issue(FetchKind::Initial, url)
    }

    /// Search by name only; filters are not applied
    pub fn submit_search(&mut self) -> FetchTicket {
        let query = build_query(Some(self.search.as_str()), None, None);
        let url = collection_url(&self.base_url, &query);
        self.issue(FetchKind::Search, url)
    }

    pub fn submit_filters(&mut self) -> FetchTicket {
        let query = build_query(Some(self.search.as_str()), Some(&self.filters), None);
        let url = collection_url(&self.base_url, &query);
        self.issue(FetchKind::Filter, url)
    }

    pub fn change_page(&mut self, page: u32) -> FetchTicket {
        let query = build_query(Some(self.search.as_str()), Some(&self.filters), Some(page));
        let url = collection_url(&self.base_url, &query);
        self.issue(FetchKind::Page(page), url)
    }

    /// Rebuild the page selector with nothing selected
    pub fn reset_pagination(&mut self) {
        self.pages = page_list(self.page_count, None);
    }

    /// Switching the view on is local: a pending response still lands and is
    /// narrowed by [`ListController::displayed`]. Switching it off re-runs the
    /// filter fetch.
    pub fn set_favorites_only(&mut self, enabled: bool) -> Option<FetchTicket> {
        self.favorites_only = enabled;
        if enabled {
            None
        } else {
            Some(self.submit_filters())
        }
    }

    fn issue(&mut self, kind: FetchKind, url: String) -> FetchTicket {
        self.seq += 1;
        self.in_flight = Some((self.seq, kind));
        self.state = ListState::Loading;
        log::info!("Request #{} {:?}: {}", self.seq, kind, url);
        FetchTicket { seq: self.seq, kind, url }
    }

    /// Apply the outcome of a collection request.
    ///
    /// Returns false when the ticket is no longer the latest one; nothing
    /// changes in that case.
    pub fn complete(&mut self, seq: u64, result: Result<ApiResponse, ApiError>) -> bool {
        let kind = match self.in_flight {
            Some((latest, kind)) if latest == seq => kind,
            _ => {
                log::debug!("Discarding stale response #{}", seq);
                return false;
            }
        };
        self.in_flight = None;

        match result {
            Ok(response) => {
                let results = response.results.into_vec();
                self.info = Some(response.info);
                if results.is_empty() {
                    self.show_empty();
                } else {
                    log::info!("Request #{} returned {} characters", seq, results.len());
                    self.characters = results;
                    self.state = ListState::Loaded;
                    self.message = None;
                }
            }
            // The API answers 404 when a query matches nothing
            Err(ApiError::Http { status: 404 }) => {
                self.info = None;
                self.show_empty();
            }
            Err(e) => {
                log::error!("Request #{} failed: {}", seq, e);
                self.state = ListState::Errored;
                self.message = Some(e.to_string());
                return true;
            }
        }

        if let FetchKind::Page(page) = kind {
            self.pages = page_list(self.page_count, Some(page));
        }
        true
    }

    fn show_empty(&mut self) {
        self.characters.clear();
        self.state = ListState::Empty;
        self.message = Some(NO_RESULTS_MESSAGE.to_string());
    }

    /// Run a ticket synchronously against `source`
    pub fn execute(&mut self, ticket: &FetchTicket, source: &dyn CharacterSource) -> bool {
        let result = source.fetch_page(&ticket.url);
        self.complete(ticket.seq, result)
    }

    // ---- detail view ----

    pub fn select(&mut self, character: Character) {
        self.selected = Some(character);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.detail_in_flight = None;
    }

    /// Re-fetch the selected character from the by-id endpoint
    pub fn refresh_detail(&mut self) -> Option<DetailTicket> {
        let id = self.selected.as_ref()?.id;
        self.seq += 1;
        self.detail_in_flight = Some(self.seq);
        Some(DetailTicket { seq: self.seq, id })
    }

    /// `Ok(false)` when the ticket is stale or the selection moved on
    pub fn complete_detail(&mut self, seq: u64, result: Result<Character, ApiError>) -> Result<bool, ApiError> {
        if self.detail_in_flight != Some(seq) {
            return Ok(false);
        }
        self.detail_in_flight = None;

        let character = result?;
        match &self.selected {
            Some(current) if current.id == character.id => {
                self.selected = Some(character);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn execute_detail(&mut self, ticket: DetailTicket, source: &dyn CharacterSource) -> Result<bool, ApiError> {
        let result = source.fetch_character(ticket.id);
        self.complete_detail(ticket.seq, result)
    }

    // ---- favorites ----

    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites.iter().any(|c| c.id == id)
    }

    /// Returns whether the character is a favorite afterwards
    pub fn toggle_favorite(&mut self, character: &Character) -> bool {
        if self.is_favorite(character.id) {
            self.store.remove(character.id);
        } else {
            self.store.add(character);
        }
        self.reload_favorites();
        self.is_favorite(character.id)
    }

    pub fn remove_favorite(&mut self, id: i64) {
        self.store.remove(id);
        self.reload_favorites();
    }

    pub fn clear_favorites(&mut self) {
        self.store.clear();
        self.reload_favorites();
    }

    fn reload_favorites(&mut self) {
        self.favorites = self.store.list();
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

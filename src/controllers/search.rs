//! Search controller
//!
//! Turns query edits into debounced search requests and owns the candidate
//! list shown to the user.

use std::sync::Arc;
use std::time::Duration;

use super::debounce::{Debouncer, RequestFence, RequestToken};
use super::sink::EventSink;
use crate::api::{ApiResult, NutritionApi};
use crate::models::{FoodId, FoodItem, SearchRequest};

/// Messages the search controller sends itself through the session loop
#[derive(Debug)]
pub enum SearchEvent {
    /// The quiet period after an edit elapsed
    Due(RequestToken),
    /// A search request finished
    Completed {
        token: RequestToken,
        result: ApiResult<Vec<FoodItem>>,
    },
}

/// What handling a [`SearchEvent`] changed
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    /// Superseded timer or response, or a request was just issued
    Unchanged,
    /// Candidate list replaced wholesale
    Replaced,
    /// The response had no usable item list; the user should be told
    Notice(String),
    /// Transport or decode failure, already logged
    Failed,
}

pub struct SearchController {
    api: Arc<dyn NutritionApi>,
    events: EventSink<SearchEvent>,
    debouncer: Debouncer,
    fence: RequestFence,
    query: String,
    candidates: Arc<[FoodItem]>,
    in_flight: bool,
}

impl SearchController {
    pub fn new(api: Arc<dyn NutritionApi>, events: EventSink<SearchEvent>, debounce: Duration) -> Self {
        Self {
            api,
            events,
            debouncer: Debouncer::new(debounce),
            fence: RequestFence::new(),
            query: String::new(),
            candidates: Arc::from(Vec::new()),
            in_flight: false,
        }
    }

    /// Populate the default candidate list right away, without debouncing
    pub fn load(&mut self) {
        self.debouncer.cancel();
        let token = self.fence.issue();
        self.issue(token);
    }

    /// Record the new query text and restart the quiet period
    pub fn query_changed(&mut self, text: String) {
        self.query = text;
        let token = self.fence.issue();
        let events = self.events.clone();
        self.debouncer.schedule(move || {
            events.send(SearchEvent::Due(token));
        });
        tracing::debug!(%token, query = %self.query, "search scheduled");
    }

    pub fn handle(&mut self, event: SearchEvent) -> SearchUpdate {
        match event {
            SearchEvent::Due(token) => {
                if self.fence.is_current(token) {
                    self.issue(token);
                } else {
                    tracing::debug!(%token, "superseded search timer ignored");
                }
                SearchUpdate::Unchanged
            }
            SearchEvent::Completed { token, result } => self.complete(token, result),
        }
    }

    fn issue(&mut self, token: RequestToken) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let request = SearchRequest::for_query(self.query.clone());
        self.in_flight = true;
        tracing::debug!(%token, query = %request.name, "search issued");

        tokio::spawn(async move {
            let result = api.search(&request).await;
            events.send(SearchEvent::Completed { token, result });
        });
    }

    fn complete(&mut self, token: RequestToken, result: ApiResult<Vec<FoodItem>>) -> SearchUpdate {
        if !self.fence.is_current(token) {
            tracing::debug!(%token, "stale search response discarded");
            return SearchUpdate::Unchanged;
        }
        self.in_flight = false;

        match result {
            Ok(items) => {
                tracing::info!(%token, count = items.len(), "search results applied");
                self.candidates = items.into();
                SearchUpdate::Replaced
            }
            Err(e) if e.is_malformed_payload() => {
                tracing::warn!(%token, "search response had no item list");
                SearchUpdate::Notice(e.to_string())
            }
            Err(e) => {
                tracing::error!(%token, error = %e, "search failed");
                SearchUpdate::Failed
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> Arc<[FoodItem]> {
        Arc::clone(&self.candidates)
    }

    pub fn candidate(&self, id: FoodId) -> Option<&FoodItem> {
        self.candidates.iter().find(|item| item.id == id)
    }

    /// A search is waiting on its timer or on the service
    pub fn is_busy(&self) -> bool {
        self.debouncer.is_pending() || self.in_flight
    }
}

//! Session state container
//!
//! Owns the selection store and both controllers, and serializes every
//! mutation through one event channel: user intents, timer expiries and
//! network completions all arrive as [`Event`]s and are applied one at a time.
//! The view only ever sees immutable [`ViewState`] snapshots.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::NutritionApi;
use crate::controllers::{
    CalculationController, CalculationEvent, CalculationUpdate, EventSink, SearchController,
    SearchEvent, SearchUpdate, DEFAULT_DEBOUNCE,
};
use crate::models::{
    CalculationResult, FoodId, FoodItem, SelectionSnapshot, SelectionStore,
};

/// Something the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// The search box text changed
    QueryChanged(String),
    /// Click on a candidate card (or a selected entry) by id
    Toggle(FoodId),
    /// Toggle an item the caller already holds
    ToggleItem(FoodItem),
    /// Quantity editor changed; `None` is non-numeric input
    SetQuantity { id: FoodId, value: Option<i64> },
    /// Removal control on a selected entry
    Remove(FoodId),
}

#[derive(Debug)]
pub enum Event {
    Intent(Intent),
    Search(SearchEvent),
    Calculation(CalculationEvent),
}

/// Handle for feeding intents into a running session from another task
#[derive(Debug, Clone)]
pub struct IntentSender {
    events: UnboundedSender<Event>,
}

impl IntentSender {
    /// Returns `false` once the session is gone
    pub fn send(&self, intent: Intent) -> bool {
        self.events.send(Event::Intent(intent)).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub search_debounce: Duration,
    pub calculation_debounce: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_DEBOUNCE,
            calculation_debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// The two things the screen can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Nothing selected, nothing to show above the candidates
    Empty,
    /// Something selected; the result is shown or on its way
    Composed,
}

/// Everything the view needs to draw one frame
#[derive(Debug, Clone)]
pub struct ViewState {
    pub query: String,
    pub candidates: Arc<[FoodItem]>,
    pub selection: SelectionSnapshot,
    pub result: Option<Arc<CalculationResult>>,
    pub calculating: bool,
    pub searching: bool,
}

impl ViewState {
    pub fn mode(&self) -> DisplayMode {
        if self.selection.is_empty() {
            DisplayMode::Empty
        } else {
            DisplayMode::Composed
        }
    }

    pub fn is_selected(&self, id: FoodId) -> bool {
        self.selection.entries.iter().any(|e| e.item.id == id)
    }

    pub fn quantity_for(&self, id: FoodId) -> Option<u32> {
        self.selection
            .entries
            .iter()
            .find(|e| e.item.id == id)
            .map(|e| e.quantity)
    }
}

pub struct Session {
    store: SelectionStore,
    search: SearchController,
    calculation: CalculationController,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    notices: VecDeque<String>,
}

impl Session {
    /// Timers and requests are spawned on the ambient tokio runtime
    pub fn new(api: Arc<dyn NutritionApi>, settings: SessionSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store: SelectionStore::new(),
            search: SearchController::new(
                Arc::clone(&api),
                EventSink::forward(events_tx.clone(), Event::Search),
                settings.search_debounce,
            ),
            calculation: CalculationController::new(
                api,
                EventSink::forward(events_tx.clone(), Event::Calculation),
                settings.calculation_debounce,
            ),
            events_tx,
            events_rx,
            notices: VecDeque::new(),
        }
    }

    /// Issue the initial empty-query search
    pub fn start(&mut self) {
        tracing::debug!("loading default candidates");
        self.search.load();
    }

    pub fn intent_sender(&self) -> IntentSender {
        IntentSender {
            events: self.events_tx.clone(),
        }
    }

    /// Wait for the next event. The session holds a sender itself, so this
    /// only returns `None` if the channel was closed from outside.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events_rx.recv().await
    }

    /// Wait for one event and apply it; returns whether the view changed
    pub async fn step(&mut self) -> Option<bool> {
        let event = self.next_event().await?;
        Some(self.handle(event))
    }

    /// Apply one event; returns whether anything visible changed
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Intent(intent) => self.apply(intent),
            Event::Search(event) => match self.search.handle(event) {
                SearchUpdate::Unchanged | SearchUpdate::Failed => false,
                SearchUpdate::Replaced => true,
                SearchUpdate::Notice(message) => {
                    self.notices.push_back(message);
                    true
                }
            },
            Event::Calculation(event) => match self.calculation.handle(event) {
                CalculationUpdate::Unchanged => false,
                // the in-flight marker is not worth a redraw
                CalculationUpdate::Pending => false,
                CalculationUpdate::Cleared
                | CalculationUpdate::Applied
                | CalculationUpdate::Failed => true,
            },
        }
    }

    /// Apply a user intent directly
    pub fn apply(&mut self, intent: Intent) -> bool {
        let changed = match intent {
            Intent::QueryChanged(text) => {
                self.search.query_changed(text);
                return true;
            }
            Intent::Toggle(id) => match self.lookup(id) {
                Some(item) => {
                    self.store.toggle(&item);
                    true
                }
                None => {
                    tracing::debug!(id, "toggle for unknown food ignored");
                    false
                }
            },
            Intent::ToggleItem(item) => {
                self.store.toggle(&item);
                true
            }
            Intent::SetQuantity { id, value } => self.store.set_quantity(id, value),
            Intent::Remove(id) => match self.store.get(id).map(|e| e.item.clone()) {
                Some(item) => {
                    self.store.toggle(&item);
                    true
                }
                None => false,
            },
        };

        if changed {
            self.calculation.selection_changed(self.store.snapshot());
        }
        changed
    }

    /// Selected entry first so a deselect works after the candidates moved on
    fn lookup(&self, id: FoodId) -> Option<FoodItem> {
        self.store
            .get(id)
            .map(|e| e.item.clone())
            .or_else(|| self.search.candidate(id).cloned())
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            query: self.search.query().to_string(),
            candidates: self.search.candidates(),
            selection: self.store.snapshot(),
            result: self.calculation.displayed_result(),
            calculating: self.calculation.is_pending(),
            searching: self.search.is_busy(),
        }
    }

    /// User notices raised since the last call, oldest first
    pub fn take_notices(&mut self) -> Vec<String> {
        self.notices.drain(..).collect()
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn is_calculating(&self) -> bool {
        self.calculation.is_pending()
    }
}

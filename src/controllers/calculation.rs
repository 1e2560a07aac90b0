//! Calculation controller
//!
//! Watches selection snapshots and keeps the displayed nutrition result in
//! step with them. An empty selection clears the result on the spot; any
//! other change waits out the quiet period and then asks the service.

use std::sync::Arc;
use std::time::Duration;

use super::debounce::{Debouncer, RequestFence, RequestToken};
use super::sink::EventSink;
use crate::api::{ApiResult, NutritionApi};
use crate::models::{CalculationRequest, CalculationResult, SelectionSnapshot};

#[derive(Debug)]
pub enum CalculationEvent {
    Due(RequestToken),
    Completed {
        token: RequestToken,
        result: ApiResult<CalculationResult>,
    },
}

/// Where the controller is between a selection change and its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationStatus {
    Idle,
    Scheduled,
    InFlight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalculationUpdate {
    Unchanged,
    /// Selection emptied, result dropped without a request
    Cleared,
    /// A calculation is now scheduled or running
    Pending,
    Applied,
    Failed,
}

pub struct CalculationController {
    api: Arc<dyn NutritionApi>,
    events: EventSink<CalculationEvent>,
    debouncer: Debouncer,
    fence: RequestFence,
    observed_revision: Option<u64>,
    scheduled: Option<SelectionSnapshot>,
    status: CalculationStatus,
    result: Option<Arc<CalculationResult>>,
}

impl CalculationController {
    pub fn new(api: Arc<dyn NutritionApi>, events: EventSink<CalculationEvent>, debounce: Duration) -> Self {
        Self {
            api,
            events,
            debouncer: Debouncer::new(debounce),
            fence: RequestFence::new(),
            observed_revision: None,
            scheduled: None,
            status: CalculationStatus::Idle,
            result: None,
        }
    }

    /// React to a new selection snapshot; repeated revisions are ignored
    pub fn selection_changed(&mut self, snapshot: SelectionSnapshot) -> CalculationUpdate {
        if self.observed_revision == Some(snapshot.revision) {
            return CalculationUpdate::Unchanged;
        }
        self.observed_revision = Some(snapshot.revision);

        if snapshot.is_empty() {
            self.debouncer.cancel();
            self.fence.invalidate();
            self.scheduled = None;
            self.status = CalculationStatus::Idle;
            self.result = None;
            tracing::debug!("selection empty, result cleared");
            return CalculationUpdate::Cleared;
        }

        let token = self.fence.issue();
        self.scheduled = Some(snapshot);
        self.status = CalculationStatus::Scheduled;
        let events = self.events.clone();
        self.debouncer.schedule(move || {
            events.send(CalculationEvent::Due(token));
        });
        tracing::debug!(%token, "calculation scheduled");
        CalculationUpdate::Pending
    }

    pub fn handle(&mut self, event: CalculationEvent) -> CalculationUpdate {
        match event {
            CalculationEvent::Due(token) => self.fire(token),
            CalculationEvent::Completed { token, result } => self.complete(token, result),
        }
    }

    fn fire(&mut self, token: RequestToken) -> CalculationUpdate {
        if !self.fence.is_current(token) {
            tracing::debug!(%token, "superseded calculation timer ignored");
            return CalculationUpdate::Unchanged;
        }
        let Some(snapshot) = self.scheduled.take() else {
            return CalculationUpdate::Unchanged;
        };

        let request = CalculationRequest::for_meal(snapshot.meal());
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        self.status = CalculationStatus::InFlight;
        tracing::debug!(%token, foods = request.meal.len(), "calculation issued");

        tokio::spawn(async move {
            let result = api.calculate(&request).await;
            events.send(CalculationEvent::Completed { token, result });
        });
        CalculationUpdate::Pending
    }

    fn complete(&mut self, token: RequestToken, result: ApiResult<CalculationResult>) -> CalculationUpdate {
        if !self.fence.is_current(token) {
            tracing::debug!(%token, "stale calculation response discarded");
            return CalculationUpdate::Unchanged;
        }
        self.status = CalculationStatus::Idle;

        match result {
            Ok(result) => {
                tracing::info!(
                    %token,
                    insulin = result.insulin_needed,
                    energy_kcal = result.energy_kcal,
                    "calculation applied"
                );
                self.result = Some(Arc::new(result));
                CalculationUpdate::Applied
            }
            Err(e) => {
                tracing::error!(%token, error = %e, "calculation failed");
                CalculationUpdate::Failed
            }
        }
    }

    pub fn status(&self) -> CalculationStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status != CalculationStatus::Idle
    }

    /// Result to display: hidden while a newer calculation is on its way,
    /// back on screen if that calculation fails.
    pub fn displayed_result(&self) -> Option<Arc<CalculationResult>> {
        match self.status {
            CalculationStatus::Idle => self.result.clone(),
            _ => None,
        }
    }
}

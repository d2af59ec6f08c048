//! View synchronization: list, mutate, then refresh.
//!
//! [`ViewController`] owns the only mutable copy of the view state. Renderers
//! take a [`ViewState`] snapshot and listen for [`ViewEvent`]s to know when to
//! take another one.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{
    domain::{Property, PropertyId},
    error::{ErrorKind, RecordError},
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    draft::{Draft, DraftField},
    RecordService,
};

const VIEW_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Submit,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Refresh => f.write_str("refresh"),
            Operation::Submit => f.write_str("submit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending(Operation),
}

/// Failure shown to the user until the next successful operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&RecordError> for Notice {
    fn from(err: &RecordError) -> Self {
        Notice {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// `None` until the first successful load.
    pub properties: Option<Vec<Property>>,
    pub draft: Draft,
    pub phase: Phase,
    pub notice: Option<Notice>,
    /// Id returned by the latest submit; cleared when the next operation starts.
    pub last_created: Option<PropertyId>,
}

impl ViewState {
    pub fn error(&self) -> Option<&str> {
        self.notice.as_ref().map(|notice| notice.message.as_str())
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.properties
            .as_deref()
            .is_some_and(|properties| properties.iter().any(|p| p.id == id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    StateChanged(Phase),
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("a {0} is already in progress")]
    Busy(Operation),
}

pub struct ViewController {
    service: Arc<dyn RecordService>,
    // Never held across an `.await`.
    state: Mutex<ViewState>,
    events: broadcast::Sender<ViewEvent>,
}

impl ViewController {
    pub fn new(service: Arc<dyn RecordService>) -> Self {
        let (events, _) = broadcast::channel(VIEW_EVENT_CAPACITY);
        Self {
            service,
            state: Mutex::new(ViewState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    pub async fn edit_draft(
        &self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), ViewError> {
        let phase = {
            let mut state = self.lock();
            if let Phase::Pending(operation) = state.phase {
                return Err(ViewError::Busy(operation));
            }
            state.draft.set(field, value);
            state.phase
        };
        self.emit(phase);
        Ok(())
    }

    pub async fn clear_draft(&self) -> Result<(), ViewError> {
        let phase = {
            let mut state = self.lock();
            if let Phase::Pending(operation) = state.phase {
                return Err(ViewError::Busy(operation));
            }
            state.draft = Draft::default();
            state.phase
        };
        self.emit(phase);
        Ok(())
    }

    /// Replaces the held list with whatever the service returns now.
    ///
    /// On failure the last good list stays in place and the error becomes the
    /// current notice. Returns the number of properties loaded.
    pub async fn refresh(&self) -> Result<usize, ViewError> {
        let pending = self.begin(Operation::Refresh)?;
        let result = self.load().await;
        pending.finish();
        result
    }

    /// Validates `draft`, creates it, then refreshes the list.
    ///
    /// The draft is kept as the current form values and only cleared once the
    /// service has accepted it. A failed follow-up refresh does not undo the
    /// create: the id stays in `last_created` next to the refresh error.
    pub async fn submit(&self, draft: Draft) -> Result<PropertyId, ViewError> {
        let body = {
            let mut state = self.lock();
            if let Phase::Pending(operation) = state.phase {
                return Err(ViewError::Busy(operation));
            }
            state.draft = draft;
            state.last_created = None;
            match state.draft.validate() {
                Ok(body) => {
                    state.phase = Phase::Pending(Operation::Submit);
                    body
                }
                Err(err) => {
                    warn!(error = %err, "draft failed validation; not contacting service");
                    state.notice = Some(Notice::from(&err));
                    drop(state);
                    self.emit(Phase::Idle);
                    return Err(err.into());
                }
            }
        };
        let pending = PendingGuard::new(self);
        self.emit(Phase::Pending(Operation::Submit));

        info!(address = %body.address, city = %body.city, "submitting property");
        let id = match self.service.create_property(&body).await {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "property create failed; draft kept for correction");
                {
                    let mut state = self.lock();
                    state.phase = Phase::Idle;
                    state.notice = Some(Notice::from(&err));
                }
                pending.finish();
                self.emit(Phase::Idle);
                return Err(err.into());
            }
        };

        {
            let mut state = self.lock();
            state.draft = Draft::default();
            state.last_created = Some(id);
            state.notice = None;
        }
        self.emit(Phase::Pending(Operation::Submit));

        let refreshed = self.load().await.is_ok();
        pending.finish();
        if refreshed && !self.lock().contains(id) {
            warn!(
                property_id = id.0,
                "created property missing from refreshed list"
            );
        }
        Ok(id)
    }

    fn begin(&self, operation: Operation) -> Result<PendingGuard<'_>, ViewError> {
        {
            let mut state = self.lock();
            if let Phase::Pending(current) = state.phase {
                debug!(requested = %operation, %current, "operation rejected while pending");
                return Err(ViewError::Busy(current));
            }
            state.phase = Phase::Pending(operation);
            state.last_created = None;
        }
        self.emit(Phase::Pending(operation));
        Ok(PendingGuard::new(self))
    }

    /// Lists, applies the outcome and returns to idle. Callers own the pending phase.
    async fn load(&self) -> Result<usize, ViewError> {
        let result = self.service.list_properties().await;

        let outcome = {
            let mut state = self.lock();
            state.phase = Phase::Idle;
            match result {
                Ok(properties) => {
                    let count = properties.len();
                    info!(count, "property list refreshed");
                    state.properties = Some(properties);
                    state.notice = None;
                    Ok(count)
                }
                Err(err) => {
                    warn!(error = %err, "property list refresh failed; keeping last known list");
                    state.notice = Some(Notice::from(&err));
                    Err(err.into())
                }
            }
        };
        self.emit(Phase::Idle);
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, phase: Phase) {
        // No subscribers is fine; renderers come and go.
        let _ = self.events.send(ViewEvent::StateChanged(phase));
    }
}

/// Returns the controller to idle if an operation future is dropped mid-call.
struct PendingGuard<'a> {
    controller: &'a ViewController,
    armed: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(controller: &'a ViewController) -> Self {
        Self {
            controller,
            armed: true,
        }
    }

    fn finish(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let abandoned = {
            let mut state = self.controller.lock();
            match state.phase {
                Phase::Pending(operation) => {
                    state.phase = Phase::Idle;
                    Some(operation)
                }
                Phase::Idle => None,
            }
        };
        if let Some(operation) = abandoned {
            warn!(%operation, "operation dropped while pending; back to idle");
            self.controller.emit(Phase::Idle);
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

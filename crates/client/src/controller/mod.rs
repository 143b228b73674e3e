//! List/filter controller.
//!
//! [`ListController::spawn`] starts a background task that owns a
//! [`ListState`], feeds it user [`Intent`]s and request completions, and
//! runs the [`Effect`]s each transition asks for:
//!
//! - filter edits restart a trailing-edge [`Debouncer`]; only the value
//!   present when it fires is fetched,
//! - every fetch carries a sequence number and supersedes (and aborts) the
//!   previous one, so late responses never overwrite newer results,
//! - saves and deletes run concurrently with fetches.
//!
//! Snapshots are published on a [`watch`] channel after every transition.

mod state;

pub use state::{
    Editor, EditorMode, Effect, Event, FetchSeq, FilterField, Intent, ListState, SaveRequest,
    SessionId, Transition,
};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::api::ResourceService;
use crate::debounce::Debouncer;

/// The controller task has stopped and no longer accepts intents.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("List controller has shut down")]
pub struct ControllerClosed;

/// Handle to a running list controller.
pub struct ListController {
    intents: mpsc::UnboundedSender<Intent>,
    state: watch::Receiver<ListState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ListController {
    /// Start the controller and issue the initial (unfiltered) fetch.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(service: Arc<dyn ResourceService>, debounce: Duration) -> Self {
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ListState::default());
        let cancel = CancellationToken::new();

        let driver = Driver {
            service,
            state: ListState::default(),
            publish: state_tx,
            debouncer: Debouncer::new(debounce),
            tasks: JoinSet::new(),
            current_fetch: None,
        };
        let task = tokio::spawn(driver.run(intent_rx, cancel.clone()));

        Self {
            intents: intent_tx,
            state: state_rx,
            cancel,
            task,
        }
    }

    /// Queue a user intent.
    pub fn dispatch(&self, intent: Intent) -> Result<(), ControllerClosed> {
        self.intents.send(intent).map_err(|_| ControllerClosed)
    }

    /// Latest published snapshot.
    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.clone()
    }

    /// Stop the controller, aborting any in-flight requests.
    ///
    /// Responses that arrive afterwards are dropped and never published.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "List controller task failed");
        }
    }
}

/// State owned by the controller task.
struct Driver {
    service: Arc<dyn ResourceService>,
    state: ListState,
    publish: watch::Sender<ListState>,
    debouncer: Debouncer,
    /// In-flight requests; each resolves to the event it produced.
    tasks: JoinSet<Event>,
    current_fetch: Option<AbortHandle>,
}

impl Driver {
    async fn run(mut self, mut intents: mpsc::UnboundedReceiver<Intent>, cancel: CancellationToken) {
        tracing::debug!("List controller started");
        self.handle(Intent::Refresh.into());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle(intent.into()),
                    None => break,
                },
                _ = self.debouncer.elapsed() => self.handle(Event::DebounceElapsed),
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => match joined {
                    Ok(event) => self.handle(event),
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => tracing::error!(error = %e, "List controller request task failed"),
                },
            }
        }

        self.tasks.abort_all();
        tracing::debug!("List controller stopped");
    }

    fn handle(&mut self, event: Event) {
        let Transition { state, effects } = self.state.apply(event);
        self.state = state;
        for effect in effects {
            self.execute(effect);
        }
        self.publish.send_replace(self.state.clone());
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleFetch => self.debouncer.schedule(),
            Effect::Fetch { seq, filter } => {
                self.debouncer.cancel();
                if let Some(previous) = self.current_fetch.take() {
                    previous.abort();
                }
                tracing::debug!(seq, ?filter, "Fetching resources");

                let service = Arc::clone(&self.service);
                let handle = self.tasks.spawn(async move {
                    match service.list(&filter).await {
                        Ok(resources) => Event::FetchSucceeded { seq, resources },
                        Err(e) => Event::FetchFailed {
                            seq,
                            message: e.to_string(),
                        },
                    }
                });
                self.current_fetch = Some(handle);
            }
            Effect::Save { session, request } => {
                let service = Arc::clone(&self.service);
                self.tasks.spawn(async move {
                    let saved = match request {
                        SaveRequest::Create(input) => {
                            service.create(&input).await.map(|r| (r, true))
                        }
                        SaveRequest::Update { id, patch } => {
                            service.update(id, &patch).await.map(|r| (r, false))
                        }
                    };
                    match saved {
                        Ok((resource, created)) => Event::SaveSucceeded {
                            session,
                            resource,
                            created,
                        },
                        Err(e) => Event::SaveFailed {
                            session,
                            message: e.to_string(),
                        },
                    }
                });
            }
            Effect::Delete { id } => {
                tracing::info!(resource_id = id, "Deleting resource");
                let service = Arc::clone(&self.service);
                self.tasks.spawn(async move {
                    match service.delete(id).await {
                        Ok(()) => Event::DeleteSucceeded { id },
                        Err(e) => Event::DeleteFailed {
                            id,
                            message: e.to_string(),
                        },
                    }
                });
            }
        }
    }
}

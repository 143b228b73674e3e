//! List/filter state and its transition function.
//!
//! [`ListState::apply`] is the only way state changes: it takes the current
//! snapshot and one [`Event`], and returns the next snapshot together with
//! the [`Effect`]s the driver must run. It performs no I/O, so every rule
//! here (stale-response rejection, stale-while-error, optimistic merges,
//! editor sessions, delete confirmation) is testable without a runtime.

use resman_core::resource::{self, ResourceFilter};
use resman_core::types::DbId;

use crate::models::{NewResource, Resource, ResourcePatch};

/// Sequence number attached to every list fetch. Strictly increasing.
pub type FetchSeq = u64;

/// Identifies one opening of the editor.
pub type SessionId = u64;

/// Prefix for save failures shown in the editor.
const SAVE_FAILED: &str = "Failed to save resource";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Name,
    Description,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit(Resource),
}

/// Draft state of the create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    pub session: SessionId,
    pub mode: EditorMode,
    pub name: String,
    pub description: String,
    pub saving: bool,
    /// Field-level validation message for `name`.
    pub name_error: Option<String>,
    /// Last save failure.
    pub error: Option<String>,
}

impl Editor {
    fn open(session: SessionId, mode: EditorMode) -> Self {
        let (name, description) = match &mode {
            EditorMode::Create => (String::new(), String::new()),
            EditorMode::Edit(r) => (r.name.clone(), r.description.clone().unwrap_or_default()),
        };
        Self {
            session,
            mode,
            name,
            description,
            saving: false,
            name_error: None,
            error: None,
        }
    }

    fn save_request(&self, name: String) -> SaveRequest {
        match &self.mode {
            EditorMode::Create => SaveRequest::Create(NewResource {
                name,
                description: Some(self.description.clone()).filter(|d| !d.trim().is_empty()),
            }),
            EditorMode::Edit(r) => SaveRequest::Update {
                id: r.id,
                patch: ResourcePatch {
                    name: Some(name),
                    description: Some(self.description.clone()),
                },
            },
        }
    }
}

/// User intents accepted by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetFilter { field: FilterField, value: String },
    /// Fetch immediately under the current filter.
    Refresh,
    OpenCreate,
    OpenEdit(Resource),
    EditName(String),
    EditDescription(String),
    Submit,
    CloseEditor,
    /// Ask for confirmation before deleting.
    RequestDelete(DbId),
    ConfirmDelete,
    CancelDelete,
}

/// Everything that can move the state forward.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Intent(Intent),
    DebounceElapsed,
    FetchSucceeded {
        seq: FetchSeq,
        resources: Vec<Resource>,
    },
    FetchFailed {
        seq: FetchSeq,
        message: String,
    },
    SaveSucceeded {
        session: SessionId,
        resource: Resource,
        created: bool,
    },
    SaveFailed {
        session: SessionId,
        message: String,
    },
    DeleteSucceeded {
        id: DbId,
    },
    DeleteFailed {
        id: DbId,
        message: String,
    },
}

impl From<Intent> for Event {
    fn from(intent: Intent) -> Self {
        Event::Intent(intent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Create(NewResource),
    Update { id: DbId, patch: ResourcePatch },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// (Re)start the filter debounce timer.
    ScheduleFetch,
    /// Fetch now; supersedes every earlier fetch.
    Fetch { seq: FetchSeq, filter: ResourceFilter },
    Save { session: SessionId, request: SaveRequest },
    Delete { id: DbId },
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ListState,
    pub effects: Vec<Effect>,
}

/// Snapshot of the list view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub filters: ResourceFilter,
    pub results: Vec<Resource>,
    pub loading: bool,
    pub error: Option<String>,
    pub editor: Option<Editor>,
    /// Resource awaiting delete confirmation.
    pub pending_delete: Option<DbId>,
    latest_fetch: FetchSeq,
    last_session: SessionId,
    /// Deleted while a fetch was in flight; that fetch may still list them.
    deleted_in_flight: Vec<DbId>,
}

impl ListState {
    /// Sequence number of the most recently issued fetch (0 before any).
    pub fn latest_fetch(&self) -> FetchSeq {
        self.latest_fetch
    }

    /// Apply one event, producing the next state and its effects.
    pub fn apply(&self, event: Event) -> Transition {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            Event::Intent(intent) => next.apply_intent(intent, &mut effects),
            Event::DebounceElapsed => next.begin_fetch(&mut effects),
            Event::FetchSucceeded { seq, resources } => {
                if next.is_current(seq) {
                    let deleted = std::mem::take(&mut next.deleted_in_flight);
                    next.results = resources;
                    next.results.retain(|r| !deleted.contains(&r.id));
                    next.error = None;
                    next.loading = false;
                }
            }
            Event::FetchFailed { seq, message } => {
                // Keep the last good results on screen.
                if next.is_current(seq) {
                    next.deleted_in_flight.clear();
                    next.error = Some(message);
                    next.loading = false;
                }
            }
            Event::SaveSucceeded {
                session,
                resource,
                created,
            } => {
                next.merge(resource, created);
                if next.editor_session() == Some(session) {
                    next.editor = None;
                }
                next.begin_fetch(&mut effects);
            }
            Event::SaveFailed { session, message } => {
                if let Some(editor) = next.editor.as_mut().filter(|e| e.session == session) {
                    editor.saving = false;
                    editor.error = Some(format!("{SAVE_FAILED}: {message}"));
                }
            }
            Event::DeleteSucceeded { id } => {
                next.results.retain(|r| r.id != id);
                if next.loading {
                    next.deleted_in_flight.push(id);
                }
            }
            Event::DeleteFailed { message, .. } => {
                next.error = Some(message);
            }
        }

        Transition {
            state: next,
            effects,
        }
    }

    fn apply_intent(&mut self, intent: Intent, effects: &mut Vec<Effect>) {
        match intent {
            Intent::SetFilter { field, value } => {
                let value = Some(value).filter(|v| !v.is_empty());
                let slot = match field {
                    FilterField::Name => &mut self.filters.name,
                    FilterField::Description => &mut self.filters.description,
                };
                if *slot != value {
                    *slot = value;
                    effects.push(Effect::ScheduleFetch);
                }
            }
            Intent::Refresh => self.begin_fetch(effects),
            Intent::OpenCreate => self.open_editor(EditorMode::Create),
            Intent::OpenEdit(resource) => self.open_editor(EditorMode::Edit(resource)),
            Intent::EditName(name) => {
                if let Some(editor) = self.editor.as_mut().filter(|e| !e.saving) {
                    editor.name = name;
                }
            }
            Intent::EditDescription(description) => {
                if let Some(editor) = self.editor.as_mut().filter(|e| !e.saving) {
                    editor.description = description;
                }
            }
            Intent::Submit => {
                let Some(editor) = self.editor.as_mut().filter(|e| !e.saving) else {
                    return;
                };
                match resource::validate_name(Some(&editor.name)) {
                    Ok(name) => {
                        editor.name_error = None;
                        editor.error = None;
                        editor.saving = true;
                        effects.push(Effect::Save {
                            session: editor.session,
                            request: editor.save_request(name),
                        });
                    }
                    Err(_) => {
                        editor.name_error = Some(resource::NAME_REQUIRED.to_string());
                    }
                }
            }
            Intent::CloseEditor => self.editor = None,
            Intent::RequestDelete(id) => self.pending_delete = Some(id),
            Intent::ConfirmDelete => {
                if let Some(id) = self.pending_delete.take() {
                    effects.push(Effect::Delete { id });
                }
            }
            Intent::CancelDelete => self.pending_delete = None,
        }
    }

    fn begin_fetch(&mut self, effects: &mut Vec<Effect>) {
        self.latest_fetch += 1;
        self.loading = true;
        effects.push(Effect::Fetch {
            seq: self.latest_fetch,
            filter: self.filters.clone(),
        });
    }

    fn is_current(&self, seq: FetchSeq) -> bool {
        let current = seq == self.latest_fetch;
        if !current {
            tracing::debug!(seq, latest = self.latest_fetch, "Discarding superseded fetch result");
        }
        current
    }

    fn open_editor(&mut self, mode: EditorMode) {
        self.last_session += 1;
        self.editor = Some(Editor::open(self.last_session, mode));
    }

    fn editor_session(&self) -> Option<SessionId> {
        self.editor.as_ref().map(|e| e.session)
    }

    /// Created records go to the top; updated records replace their row.
    fn merge(&mut self, resource: Resource, created: bool) {
        match self.results.iter_mut().find(|r| r.id == resource.id) {
            Some(existing) => *existing = resource,
            None if created => self.results.insert(0, resource),
            None => {}
        }
    }
}

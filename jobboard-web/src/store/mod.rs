//! Root store.
//!
//! [`AppState`] is a `yewdux` store. One [`Store`] owns the `yewdux::Context`
//! it lives in and is handed to every consumer. State is read through
//! [`Store::select`] and changed only through [`Store::dispatch`], which
//! applies each [`Action`] as a `yewdux` reducer routed to exactly one slice.

pub mod auth;
pub mod candidates;
pub mod filters;
pub mod jobs;
pub mod list;
pub mod ui;

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use shared::models::{
    Application, ApplicationFilters, Company, CompanyFilters, Demand, DemandFilters,
    PartnerFilters, PartnerProgramme, University, UniversityFilters,
};
use tracing::debug;
use yewdux::{Context, Dispatch, Reducer};

use crate::storage::DurableStorage;

pub use auth::{AuthAction, AuthState, Credentials};
pub use candidates::{CandidatesAction, CandidatesState};
pub use filters::{FilterSnapshot, FiltersAction, SavedFilters};
pub use jobs::{JobsAction, JobsState};
pub use list::{EntityList, ListAction};
pub use ui::{Theme, UiAction, UiState};

pub type ApplicationsState = EntityList<Application, ApplicationFilters>;
pub type CompaniesState = EntityList<Company, CompanyFilters>;
pub type UniversitiesState = EntityList<University, UniversityFilters>;
pub type DemandsState = EntityList<Demand, DemandFilters>;
pub type PartnerState = EntityList<PartnerProgramme, PartnerFilters>;

/// State paths whose values are not serializable and are skipped when the
/// state is serialized.
pub const SERIALIZATION_EXEMPT_PATHS: &[&str] = &["jobs.pending_import", "candidates.cv_upload"];

/// A user-picked file held in state until it is uploaded.
///
/// Equality is identity: two handles are equal only if they share the same
/// buffer.
#[derive(Clone)]
pub struct FileHandle {
    name: String,
    content_type: String,
    bytes: Rc<[u8]>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The whole client state tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, yewdux::Store)]
pub struct AppState {
    pub auth: AuthState,
    pub jobs: JobsState,
    pub applications: ApplicationsState,
    pub candidates: CandidatesState,
    pub companies: CompaniesState,
    pub universities: UniversitiesState,
    pub demands: DemandsState,
    pub partner: PartnerState,
    pub filters: SavedFilters,
    pub ui: UiState,
}

impl AppState {
    /// Initial state: everything empty except the session read from storage.
    pub fn rehydrate(storage: &dyn DurableStorage) -> Self {
        Self {
            auth: AuthState::rehydrate(storage),
            ..Self::default()
        }
    }

    fn reduce(&mut self, action: Action, storage: &dyn DurableStorage) {
        match action {
            Action::Auth(AuthAction::Logout) => {
                self.auth.reduce(AuthAction::Logout, storage);
                self.end_session();
            }
            Action::Auth(action) => self.auth.reduce(action, storage),
            Action::Jobs(action) => self.jobs.reduce(action),
            Action::Applications(action) => self.applications.reduce(action),
            Action::Candidates(action) => self.candidates.reduce(action),
            Action::Companies(action) => self.companies.reduce(action),
            Action::Universities(action) => self.universities.reduce(action),
            Action::Demands(action) => self.demands.reduce(action),
            Action::Partner(action) => self.partner.reduce(action),
            Action::Filters(action) => self.filters.reduce(action),
            Action::Ui(action) => self.ui.reduce(action),
        }
    }

    /// Drops everything loaded for the signed-out user. Only view state
    /// survives.
    fn end_session(&mut self) {
        let ui = std::mem::take(&mut self.ui);
        *self = Self {
            ui,
            ..Self::default()
        };
    }
}

/// Every state change, tagged by the slice that handles it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Jobs(JobsAction),
    Applications(ListAction<Application, ApplicationFilters>),
    Candidates(CandidatesAction),
    Companies(ListAction<Company, CompanyFilters>),
    Universities(ListAction<University, UniversityFilters>),
    Demands(ListAction<Demand, DemandFilters>),
    Partner(ListAction<PartnerProgramme, PartnerFilters>),
    Filters(FiltersAction),
    Ui(UiAction),
}

impl Action {
    /// Slice key plus action name, e.g. `jobs/toggle_saved`.
    pub fn name(&self) -> String {
        let (slice, action) = match self {
            Self::Auth(action) => ("auth", action.as_ref()),
            Self::Jobs(action) => ("jobs", action.name()),
            Self::Applications(action) => ("applications", action.as_ref()),
            Self::Candidates(action) => ("candidates", action.name()),
            Self::Companies(action) => ("companies", action.as_ref()),
            Self::Universities(action) => ("universities", action.as_ref()),
            Self::Demands(action) => ("demands", action.as_ref()),
            Self::Partner(action) => ("partner", action.as_ref()),
            Self::Filters(action) => ("filters", action.as_ref()),
            Self::Ui(action) => ("ui", action.as_ref()),
        };
        format!("{slice}/{action}")
    }
}

/// Checks that the state serializes and that no exempt path leaks into the
/// output.
///
/// # Errors
/// Returns a description of the first problem found.
pub fn check_serializable(state: &AppState) -> Result<(), String> {
    let value = serde_json::to_value(state).map_err(|err| err.to_string())?;
    for path in SERIALIZATION_EXEMPT_PATHS {
        if lookup_path(&value, path).is_some() {
            return Err(format!("non-serializable field `{path}` leaked into serialized state"));
        }
    }
    Ok(())
}

fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// An [`Action`] bound to the storage that auth actions write through to.
struct Persisted {
    action: Action,
    storage: Rc<dyn DurableStorage>,
}

impl Reducer<AppState> for Persisted {
    fn apply(self, mut state: Rc<AppState>) -> Rc<AppState> {
        Rc::make_mut(&mut state).reduce(self.action, self.storage.as_ref());
        state
    }
}

/// Keeps a listener registered until dropped.
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    _dispatch: Dispatch<AppState>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Handle to the single application state tree. Cloning shares the tree.
#[derive(Clone)]
pub struct Store {
    cx: Context,
    dispatcher: Dispatch<AppState>,
    storage: Rc<dyn DurableStorage>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.dispatcher.get())
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Builds the store in a fresh context, rehydrating the session from
    /// `storage`.
    pub fn new(storage: Rc<dyn DurableStorage>) -> Self {
        Self::in_context(&Context::new(), storage)
    }

    /// Builds the store inside `cx`, e.g. the context a UI root provides.
    pub fn in_context(cx: &Context, storage: Rc<dyn DurableStorage>) -> Self {
        let state = AppState::rehydrate(storage.as_ref());
        debug!(
            authenticated = state.auth.is_authenticated(),
            "store initialized"
        );
        let dispatcher = Dispatch::<AppState>::new(cx);
        dispatcher.set(state);
        Self {
            cx: cx.clone(),
            dispatcher,
            storage,
        }
    }

    pub fn context(&self) -> &Context {
        &self.cx
    }

    /// Applies an action. Subscribers are notified when the state changed.
    pub fn dispatch(&self, action: Action) {
        debug!(action = %action.name(), "dispatch");
        self.dispatcher.apply(Persisted {
            action,
            storage: Rc::clone(&self.storage),
        });

        #[cfg(debug_assertions)]
        if let Err(problem) = check_serializable(&self.dispatcher.get()) {
            tracing::warn!(%problem, "state failed the serialization check");
        }
    }

    /// Reads from the current state.
    pub fn select<R>(&self, selector: impl FnOnce(&AppState) -> R) -> R {
        selector(self.dispatcher.get().as_ref())
    }

    /// Clone of the whole state.
    pub fn snapshot(&self) -> AppState {
        AppState::clone(&self.dispatcher.get())
    }

    /// Registers a listener called with the new state after every dispatch
    /// that changes it.
    pub fn subscribe(&self, listener: impl Fn(Rc<AppState>) + 'static) -> Subscription {
        Subscription {
            _dispatch: Dispatch::<AppState>::new(&self.cx).subscribe_silent(listener),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::storage::{MemoryStorage, TOKEN_KEY, USER_KEY};
    use shared::models::{Candidate, Job, Role, UserPatch};

    fn store_with(storage: MemoryStorage) -> (Store, Rc<MemoryStorage>) {
        let storage = Rc::new(storage);
        let store = Store::new(storage.clone());
        (store, storage)
    }

    #[test]
    fn credentials_scenario_end_to_end() {
        let (store, storage) = store_with(MemoryStorage::new());
        store.dispatch(Action::Auth(AuthAction::SetCredentials(Credentials {
            token: "t1".into(),
            role: Role::Candidate,
            email: "a@x.com".into(),
            avatar: None,
            user_id: 7,
        })));

        store.select(|state| {
            assert!(state.auth.is_authenticated());
            let user = state.auth.user().unwrap();
            assert_eq!(user.id, 7);
            assert_eq!(user.email, "a@x.com");
            assert_eq!(user.role, Role::Candidate);
            assert_eq!(user.first_name, "");
            assert_eq!(user.last_name, "");
        });

        store.dispatch(Action::Auth(AuthAction::UpdateUser(UserPatch {
            first_name: Some("Anh".into()),
            ..UserPatch::default()
        })));
        store.select(|state| {
            let user = state.auth.user().unwrap();
            assert_eq!(user.first_name, "Anh");
            assert_eq!(user.email, "a@x.com");
            assert_eq!(user.id, 7);
        });

        store.dispatch(Action::Auth(AuthAction::Logout));
        assert_eq!(store.snapshot(), AppState::default());
        assert_eq!(storage.get(TOKEN_KEY), None);
        assert_eq!(storage.get(USER_KEY), None);
    }

    #[test]
    fn new_store_rehydrates_session() {
        let (store, _) = store_with(MemoryStorage::with_entries([
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id":2,"email":"hr@x.com","role":"HR"}"#),
        ]));
        assert_eq!(store.select(|state| state.auth.role()), Some(Role::Hr));
    }

    #[test]
    fn actions_route_to_one_slice() {
        let (store, _) = store_with(MemoryStorage::new());
        store.dispatch(Action::Companies(ListAction::Add(Company {
            id: 1,
            name: "Acme".into(),
            ..Company::default()
        })));

        let state = store.snapshot();
        assert_eq!(state.companies.items().len(), 1);
        assert!(state.jobs.list().items().is_empty());
        assert!(state.universities.items().is_empty());
    }

    #[test]
    fn action_names_include_slice() {
        assert_eq!(
            Action::Jobs(JobsAction::List(ListAction::Add(Job::default()))).name(),
            "jobs/add"
        );
        assert_eq!(Action::Auth(AuthAction::Logout).name(), "auth/logout");
        assert_eq!(Action::Ui(UiAction::CloseAllModals).name(), "ui/close_all_modals");
        assert_eq!(
            Action::Candidates(CandidatesAction::SetCvUpload(None)).name(),
            "candidates/set_cv_upload"
        );
    }

    #[test]
    fn subscribers_see_changes_until_dropped() {
        let (store, _) = store_with(MemoryStorage::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let subscription =
            store.subscribe(move |state| sink.borrow_mut().push(state.ui.sidebar_open()));

        store.dispatch(Action::Ui(UiAction::ToggleSidebar));
        store.dispatch(Action::Ui(UiAction::ToggleSidebar));
        store.dispatch(Action::Ui(UiAction::SetSidebar(true)));
        drop(subscription);
        store.dispatch(Action::Ui(UiAction::ToggleSidebar));

        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn stores_in_one_context_share_state() {
        let (store, storage) = store_with(MemoryStorage::new());
        let other = Store::in_context(store.context(), storage);
        other.dispatch(Action::Ui(UiAction::OpenModal("apply".into())));
        assert!(store.select(|state| state.ui.is_modal_open("apply")));
    }

    #[test]
    fn logout_resets_everything_but_view_state() {
        let (store, storage) = store_with(MemoryStorage::new());
        store.dispatch(Action::Auth(AuthAction::SetCredentials(Credentials {
            token: "t1".into(),
            role: Role::Candidate,
            email: "a@x.com".into(),
            avatar: None,
            user_id: 7,
        })));
        store.dispatch(Action::Jobs(JobsAction::SetSaved(vec![1, 2])));
        store.dispatch(Action::Companies(ListAction::Add(Company {
            id: 1,
            ..Company::default()
        })));
        store.dispatch(Action::Ui(UiAction::SetTheme(Theme::Dark)));

        store.dispatch(Action::Auth(AuthAction::Logout));

        let state = store.snapshot();
        assert_eq!(state.ui.theme(), Theme::Dark);
        assert_eq!(
            AppState {
                ui: UiState::default(),
                ..state
            },
            AppState::default()
        );
        assert!(storage.is_empty());
    }

    #[test]
    fn exempt_paths_never_serialize() {
        let (store, _) = store_with(MemoryStorage::new());
        store.dispatch(Action::Jobs(JobsAction::SetPendingImport(Some(FileHandle::new(
            "jobs.xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            vec![1, 2, 3],
        )))));
        store.dispatch(Action::Candidates(CandidatesAction::SetCvUpload(Some(
            FileHandle::new("cv.pdf", "application/pdf", vec![4]),
        ))));

        let state = store.snapshot();
        assert!(state.jobs.pending_import().is_some());
        assert!(state.candidates.cv_upload().is_some());
        assert_eq!(check_serializable(&state), Ok(()));

        let json = serde_json::to_value(&state).unwrap();
        for path in SERIALIZATION_EXEMPT_PATHS {
            assert!(lookup_path(&json, path).is_none(), "{path} serialized");
        }
        assert!(lookup_path(&json, "jobs.saved_job_ids").is_some());
        assert!(lookup_path(&json, "candidates.list").is_some());
    }

    #[test]
    fn file_handles_compare_by_identity() {
        let first = FileHandle::new("cv.pdf", "application/pdf", vec![1]);
        let copy = first.clone();
        let twin = FileHandle::new("cv.pdf", "application/pdf", vec![1]);
        assert_eq!(first, copy);
        assert_ne!(first, twin);
        assert!(format!("{first:?}").contains("len: 1"));
    }

    #[test]
    fn slices_hold_independent_copies() {
        let (store, _) = store_with(MemoryStorage::new());
        let candidate = Candidate {
            id: 5,
            first_name: "Anh".into(),
            ..Candidate::default()
        };
        store.dispatch(Action::Candidates(CandidatesAction::List(ListAction::Add(
            candidate.clone(),
        ))));
        let before = store.snapshot();

        let mut renamed = candidate;
        renamed.first_name = "Binh".into();
        store.dispatch(Action::Candidates(CandidatesAction::List(ListAction::Update(renamed))));

        assert_eq!(before.candidates.list().items()[0].first_name, "Anh");
        assert_eq!(
            store.select(|state| state.candidates.list().items()[0].first_name.clone()),
            "Binh"
        );
    }
}

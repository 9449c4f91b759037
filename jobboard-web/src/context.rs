//! Wiring of store, query cache and API client.
//!
//! An [`AppContext`] is built once at start-up and handed to every consumer,
//! which takes its hooks from it. Its store lives in a `yewdux::Context`, so
//! UI code holding that context reads the same state tree.

use std::fmt;
use std::rc::Rc;

use shared::config::ClientConfig;

use crate::api::{ApiError, AuthApi, JobBoardClient, ResourceApi};
use crate::hooks::{AuthHook, ResourceHook};
use crate::query::QueryClient;
use crate::resource::{
    Applications, Candidates, Companies, Demands, Jobs, Partners, Resource, Universities,
};
use crate::storage::DurableStorage;
use crate::store::Store;

pub struct AppContext<A> {
    store: Store,
    queries: Rc<QueryClient>,
    api: Rc<A>,
}

impl<A> Clone for AppContext<A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            queries: Rc::clone(&self.queries),
            api: Rc::clone(&self.api),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for AppContext<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .field("queries", &self.queries)
            .field("api", &self.api)
            .finish()
    }
}

impl AppContext<JobBoardClient> {
    /// Builds a context talking to the API described by `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: &ClientConfig, storage: Rc<dyn DurableStorage>) -> Result<Self, ApiError> {
        Ok(Self::new(storage, JobBoardClient::from_config(config)?))
    }

    /// Context for the browser bundle, backed by `localStorage`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Result<Self, ApiError> {
        let config = crate::config::FrontendConfig::new().to_client_config();
        Self::connect(&config, Rc::new(crate::storage::BrowserStorage))
    }
}

impl<A: AuthApi + 'static> AppContext<A> {
    /// Rehydrates the store from `storage` and hands any stored token to the
    /// API client.
    pub fn new(storage: Rc<dyn DurableStorage>, api: A) -> Self {
        let store = Store::new(storage);
        api.set_token(store.select(|state| state.auth.token().map(str::to_string)));
        Self {
            store,
            queries: Rc::new(QueryClient::new()),
            api: Rc::new(api),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn queries(&self) -> &Rc<QueryClient> {
        &self.queries
    }

    pub fn api(&self) -> &Rc<A> {
        &self.api
    }

    pub fn auth(&self) -> AuthHook<A> {
        AuthHook::new(self.store.clone(), Rc::clone(&self.queries), Rc::clone(&self.api))
    }

    /// Hook for any domain the API serves.
    pub fn resource<R: Resource>(&self) -> ResourceHook<R, A>
    where
        A: ResourceApi<R>,
    {
        ResourceHook::new(self.store.clone(), Rc::clone(&self.queries), Rc::clone(&self.api))
    }

    pub fn jobs(&self) -> ResourceHook<Jobs, A>
    where
        A: ResourceApi<Jobs>,
    {
        self.resource()
    }

    pub fn applications(&self) -> ResourceHook<Applications, A>
    where
        A: ResourceApi<Applications>,
    {
        self.resource()
    }

    pub fn candidates(&self) -> ResourceHook<Candidates, A>
    where
        A: ResourceApi<Candidates>,
    {
        self.resource()
    }

    pub fn companies(&self) -> ResourceHook<Companies, A>
    where
        A: ResourceApi<Companies>,
    {
        self.resource()
    }

    pub fn universities(&self) -> ResourceHook<Universities, A>
    where
        A: ResourceApi<Universities>,
    {
        self.resource()
    }

    pub fn demands(&self) -> ResourceHook<Demands, A>
    where
        A: ResourceApi<Demands>,
    {
        self.resource()
    }

    pub fn partners(&self) -> ResourceHook<Partners, A>
    where
        A: ResourceApi<Partners>,
    {
        self.resource()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::fake::{EMAIL, FakeApi, PASSWORD};
    use crate::storage::{MemoryStorage, TOKEN_KEY, USER_KEY};
    use crate::store::{Action, AppState, UiAction};
    use shared::models::Job;

    #[test]
    fn stored_token_reaches_the_api() {
        let storage = Rc::new(MemoryStorage::with_entries([
            (TOKEN_KEY, "abc"),
            (USER_KEY, r#"{"id":1,"email":"a@x.com","role":"CANDIDATE"}"#),
        ]));
        let context = AppContext::new(storage, FakeApi::default());
        assert_eq!(context.api().token.borrow().as_deref(), Some("abc"));
        assert!(context.store().select(|state| state.auth.is_authenticated()));
    }

    #[tokio::test]
    async fn hooks_share_one_store() {
        let context = AppContext::new(
            Rc::new(MemoryStorage::new()),
            FakeApi::with_jobs(vec![Job {
                id: 1,
                title: "Rust dev".into(),
                ..Job::default()
            }]),
        );
        context.auth().login(EMAIL, PASSWORD).await.unwrap();
        context.jobs().fetch().await.unwrap();

        let other = context.clone();
        assert_eq!(other.jobs().select(|list| list.total()), 1);
        assert!(other.store().select(|state| state.auth.is_authenticated()));
        assert_eq!(context.api().list_calls.get(), 1);
    }

    #[test]
    fn yewdux_dispatch_sees_store_updates() {
        let context = AppContext::new(Rc::new(MemoryStorage::new()), FakeApi::default());
        let dispatch = yewdux::Dispatch::<AppState>::new(context.store().context());

        context
            .store()
            .dispatch(Action::Ui(UiAction::OpenModal("apply".into())));
        assert!(dispatch.get().ui.is_modal_open("apply"));
    }

    #[test]
    fn connect_builds_a_reqwest_client() {
        let context =
            AppContext::connect(&ClientConfig::default(), Rc::new(MemoryStorage::new())).unwrap();
        assert_eq!(context.api().base_url(), shared::config::client::DEFAULT_API_BASE_URL);
    }
}

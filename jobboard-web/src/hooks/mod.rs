//! Data synchronization hooks.
//!
//! A hook binds one domain's store slice, query cache and API. List queries
//! go through the cache and land in the slice with `SetList`. Mutations call
//! the server first and only touch the slice once it confirms.

mod applications;
mod auth;
#[cfg(test)]
pub(crate) mod fake;
mod jobs;

use std::fmt;
use std::rc::Rc;

use shared::models::{EntityId, FilterSet, Identified, Page};
use tracing::{debug, warn};

use crate::api::{ApiError, ResourceApi};
use crate::query::{QueryCache, QueryClient, QueryKey};
use crate::resource::Resource;
use crate::store::{Action, EntityList, FiltersAction, ListAction, Store};

pub use auth::AuthHook;

/// List query and CRUD mutations for one domain.
pub struct ResourceHook<R: Resource, A> {
    store: Store,
    queries: Rc<QueryClient>,
    cache: Rc<QueryCache<R::Entity>>,
    api: Rc<A>,
}

impl<R: Resource, A> Clone for ResourceHook<R, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            queries: Rc::clone(&self.queries),
            cache: Rc::clone(&self.cache),
            api: Rc::clone(&self.api),
        }
    }
}

impl<R: Resource, A> fmt::Debug for ResourceHook<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHook")
            .field("domain", &R::NAME)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<R, A> ResourceHook<R, A>
where
    R: Resource,
    A: ResourceApi<R> + 'static,
{
    pub fn new(store: Store, queries: Rc<QueryClient>, api: Rc<A>) -> Self {
        let cache = queries.cache::<R>();
        Self {
            store,
            queries,
            cache,
            api,
        }
    }

    /// Cache key of the slice's current filters.
    pub fn key(&self) -> QueryKey {
        self.store
            .select(|state| QueryKey::for_filters(R::NAME, R::list(state).filters()))
    }

    /// Reads from this domain's list.
    pub fn select<T>(
        &self,
        selector: impl FnOnce(&EntityList<R::Entity, R::Filters>) -> T,
    ) -> T {
        self.store.select(|state| selector(R::list(state)))
    }

    /// True when the current key's cached page is outdated.
    pub fn is_stale(&self) -> bool {
        self.cache.is_stale(&self.key())
    }

    pub fn set_filters(&self, patch: <R::Filters as FilterSet>::Patch) {
        self.dispatch(ListAction::SetFilters(patch));
    }

    pub fn reset_filters(&self) {
        self.dispatch(ListAction::ResetFilters);
    }

    pub fn select_item(&self, item: Option<R::Entity>) {
        self.dispatch(ListAction::SetSelected(item));
    }

    /// Loads the page for the current filters into the slice.
    ///
    /// Fresh cached pages are served without a request and identical
    /// concurrent calls share one. A response whose filters were replaced
    /// while it was loading is cached but not written to the slice.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn fetch(&self) -> Result<Page<R::Entity>, ApiError> {
        let filters = self.store.select(|state| R::list(state).filters().clone());
        let key = QueryKey::for_filters(R::NAME, &filters);
        self.dispatch(ListAction::SetLoading(true));

        let mut result = self.load(&key, &filters).await;
        if result.is_ok() && self.cache.is_stale(&key) {
            debug!(%key, "list invalidated while loading; refetching");
            result = self.load(&key, &filters).await;
        }

        let current = self.key();
        if current != key {
            debug!(%key, "discarding response for replaced filters");
            if !self.cache.is_in_flight(&current) {
                self.dispatch(ListAction::SetLoading(false));
            }
            return result;
        }

        match result {
            Ok(page) => {
                self.dispatch(ListAction::SetList {
                    items: page.items.clone(),
                    total: page.total,
                });
                self.dispatch(ListAction::SetLoading(false));
                Ok(page)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Marks the current key stale and loads it again.
    ///
    /// # Errors
    /// Same as [`ResourceHook::fetch`].
    pub async fn refetch(&self) -> Result<Page<R::Entity>, ApiError> {
        self.cache.invalidate(&self.key());
        self.fetch().await
    }

    async fn load(
        &self,
        key: &QueryKey,
        filters: &R::Filters,
    ) -> Result<Page<R::Entity>, ApiError> {
        let api = Rc::clone(&self.api);
        let filters = filters.clone();
        self.cache
            .fetch(key, move || async move {
                ResourceApi::<R>::list(api.as_ref(), &filters).await
            })
            .await
    }

    /// Fetches one entity and refreshes it in the list. It becomes the
    /// selection only when the list holds it; otherwise the caller gets it
    /// back without touching the slice.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn get(&self, id: EntityId) -> Result<R::Entity, ApiError> {
        match ResourceApi::<R>::get(self.api.as_ref(), id).await {
            Ok(entity) => {
                self.dispatch(ListAction::Update(entity.clone()));
                if self.select(|list| list.find(entity.id()).is_some()) {
                    self.dispatch(ListAction::SetSelected(Some(entity.clone())));
                }
                Ok(entity)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Creates an entity and prepends it to the list.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn create(&self, draft: &R::Draft) -> Result<R::Entity, ApiError> {
        match ResourceApi::<R>::create(self.api.as_ref(), draft).await {
            Ok(entity) => {
                self.dispatch(ListAction::Add(entity.clone()));
                self.settled();
                Ok(entity)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Updates an entity and replaces it in the list.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R::Entity, ApiError> {
        match ResourceApi::<R>::update(self.api.as_ref(), id, draft).await {
            Ok(entity) => {
                self.dispatch(ListAction::Update(entity.clone()));
                self.settled();
                Ok(entity)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Deletes an entity and drops it from the list.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn remove(&self, id: EntityId) -> Result<(), ApiError> {
        match ResourceApi::<R>::delete(self.api.as_ref(), id).await {
            Ok(()) => {
                self.dispatch(ListAction::Remove(id));
                self.settled();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Stores the current filters under `key`.
    pub fn save_filters(&self, key: impl Into<String>) {
        let snapshot = self
            .store
            .select(|state| R::snapshot(R::list(state).filters()));
        self.store.dispatch(Action::Filters(FiltersAction::Save {
            key: key.into(),
            snapshot,
        }));
    }

    /// Replaces the filters with the ones saved under `key`. Returns false
    /// when nothing is saved there or it belongs to another domain.
    pub fn restore_filters(&self, key: &str) -> bool {
        let filters = self
            .store
            .select(|state| state.filters.get(key).and_then(R::restore));
        match filters {
            Some(filters) => {
                self.dispatch(ListAction::ReplaceFilters(filters));
                true
            }
            None => false,
        }
    }
}

impl<R: Resource, A> ResourceHook<R, A> {
    fn dispatch(&self, action: ListAction<R::Entity, R::Filters>) {
        self.store.dispatch(R::action(action));
    }

    /// Records a failed call in the slice and hands the error back.
    fn fail(&self, err: ApiError) -> ApiError {
        warn!(domain = R::NAME, status = ?err.status(), error = %err, "request failed");
        self.dispatch(ListAction::SetError(Some(err.message().to_string())));
        err
    }

    /// After a confirmed mutation: clears a leftover error and marks the
    /// domain's lists stale.
    fn settled(&self) {
        if self.store.select(|state| R::list(state).error().is_some()) {
            self.dispatch(ListAction::SetError(None));
        }
        self.queries.invalidate(R::NAME);
    }
}

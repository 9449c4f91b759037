//! Generic entity list slice.
//!
//! Every domain slice wraps one [`EntityList`]: the ordered items from the
//! last list fetch plus selection, total, loading and error flags and the
//! domain's filters. Reducers are pure and synchronous.

use serde::Serialize;
use shared::models::{EntityId, FilterSet, Identified};
use strum::AsRefStr;
use tracing::warn;

/// Mutations accepted by an [`EntityList`].
#[derive(Debug, Clone, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ListAction<T, F: FilterSet> {
    /// Replaces items and total together; clears the error.
    SetList { items: Vec<T>, total: u64 },
    /// Prepends a new item.
    Add(T),
    /// Replaces the item with the same id in place.
    Update(T),
    /// Drops the item with this id.
    Remove(EntityId),
    SetFilters(F::Patch),
    ReplaceFilters(F),
    ResetFilters,
    SetSelected(Option<T>),
    SetLoading(bool),
    SetError(Option<String>),
}

/// Cached list of one entity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityList<T, F> {
    items: Vec<T>,
    selected: Option<T>,
    total: u64,
    loading: bool,
    error: Option<String>,
    filters: F,
}

impl<T, F: Default> Default for EntityList<T, F> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            total: 0,
            loading: false,
            error: None,
            filters: F::default(),
        }
    }
}

impl<T: Identified + Clone, F: FilterSet> EntityList<T, F> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    /// Looks up an item by id.
    pub fn find(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn selected_id(&self) -> Option<EntityId> {
        self.selected.as_ref().map(Identified::id)
    }

    /// Applies one action.
    pub fn reduce(&mut self, action: ListAction<T, F>) {
        match action {
            ListAction::SetList { items, total } => {
                self.items = dedup_by_id(items);
                self.total = total;
                self.error = None;
                self.resync_selection();
            }
            ListAction::Add(item) => {
                if let Some(index) = self.position(item.id()) {
                    self.replace_at(index, item);
                } else {
                    self.items.insert(0, item);
                    self.total = self.total.saturating_add(1);
                }
            }
            ListAction::Update(item) => {
                if let Some(index) = self.position(item.id()) {
                    self.replace_at(index, item);
                } else if self.selected_id() == Some(item.id()) {
                    self.selected = Some(item);
                }
            }
            ListAction::Remove(id) => {
                if let Some(index) = self.position(id) {
                    self.items.remove(index);
                    self.decrement_total();
                }
                if self.selected_id() == Some(id) {
                    self.selected = None;
                }
            }
            ListAction::SetFilters(patch) => self.filters.apply(patch),
            ListAction::ReplaceFilters(filters) => self.filters = filters,
            ListAction::ResetFilters => self.filters = F::default(),
            ListAction::SetSelected(selected) => self.selected = selected,
            ListAction::SetLoading(loading) => self.loading = loading,
            ListAction::SetError(error) => {
                if error.is_some() {
                    self.loading = false;
                }
                self.error = error;
            }
        }
    }

    fn replace_at(&mut self, index: usize, item: T) {
        if self.selected_id() == Some(item.id()) {
            self.selected = Some(item.clone());
        }
        self.items[index] = item;
    }

    fn resync_selection(&mut self) {
        if let Some(id) = self.selected_id() {
            self.selected = self.find(id).cloned();
        }
    }

    fn decrement_total(&mut self) {
        if self.total == 0 {
            warn!("list total already zero; keeping it at zero after removal");
        } else {
            self.total -= 1;
        }
    }
}

fn dedup_by_id<T: Identified>(items: Vec<T>) -> Vec<T> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.id()))
        .collect()
}

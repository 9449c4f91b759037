//! Client-side list filters.
//!
//! Every domain has its own filter struct with optional fields plus a
//! [`Pagination`] that is always present. Filters never leave the client
//! except as query parameters, and their canonical query encoding doubles as
//! the list cache key.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Page number used when no page has been chosen.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when no size has been chosen.
pub const DEFAULT_LIMIT: u32 = 10;

/// Pagination cursor: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub no: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            no: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Merges an optional page number and size. Zero values are ignored.
    pub fn apply(&mut self, no: Option<u32>, limit: Option<u32>) {
        if let Some(no) = no.filter(|value| *value > 0) {
            self.no = no;
        }
        if let Some(limit) = limit.filter(|value| *value > 0) {
            self.limit = limit;
        }
    }

    fn push_pairs(self, pairs: &mut Vec<(&'static str, String)>) {
        pairs.push(("no", self.no.to_string()));
        pairs.push(("limit", self.limit.to_string()));
    }
}

/// Behaviour shared by every domain filter set.
pub trait FilterSet: Clone + Default + PartialEq + Debug + Serialize + 'static {
    /// Partial update accepted by [`FilterSet::apply`]. `None` fields leave the
    /// current value untouched; an empty string clears a text filter.
    type Patch: Clone + Debug + PartialEq + Default + 'static;

    /// Current page cursor.
    fn pagination(&self) -> Pagination;

    /// Merges a patch into the filters.
    fn apply(&mut self, patch: Self::Patch);

    /// Query parameters in a fixed order, pagination last. Unset fields are
    /// omitted.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// Canonical string form used as the list cache key.
    fn cache_key(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Sets or clears a text filter from a patch value.
pub(crate) fn merge_text(target: &mut Option<String>, patch: Option<String>) {
    if let Some(value) = patch {
        let trimmed = value.trim();
        *target = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
}

pub(crate) fn push_text(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<&String>,
) {
    if let Some(value) = value {
        pairs.push((key, value.clone()));
    }
}

pub(crate) fn push_id(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<EntityId>,
) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

pub(crate) fn push_ids(pairs: &mut Vec<(&'static str, String)>, key: &'static str, ids: &[EntityId]) {
    if !ids.is_empty() {
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        pairs.push((key, joined));
    }
}

pub(crate) fn push_pagination(pairs: &mut Vec<(&'static str, String)>, pagination: Pagination) {
    pagination.push_pairs(pairs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let pagination = Pagination::default();
        assert_eq!(pagination.no, 1);
        assert_eq!(pagination.limit, 10);
    }

    #[test]
    fn pagination_ignores_zero_values() {
        let mut pagination = Pagination::default();
        pagination.apply(Some(0), Some(0));
        assert_eq!(pagination, Pagination::default());

        pagination.apply(Some(3), None);
        assert_eq!(pagination.no, 3);
        assert_eq!(pagination.limit, 10);
    }

    #[test]
    fn merge_text_sets_trims_and_clears() {
        let mut value = None;
        merge_text(&mut value, Some("  rust ".to_string()));
        assert_eq!(value.as_deref(), Some("rust"));

        merge_text(&mut value, None);
        assert_eq!(value.as_deref(), Some("rust"));

        merge_text(&mut value, Some("   ".to_string()));
        assert_eq!(value, None);
    }

    #[test]
    fn id_lists_are_comma_joined() {
        let mut pairs = Vec::new();
        push_ids(&mut pairs, "categoryIds", &[3, 1, 2]);
        push_ids(&mut pairs, "skipped", &[]);
        assert_eq!(pairs, vec![("categoryIds", "3,1,2".to_string())]);
    }
}

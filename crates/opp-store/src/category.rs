//! Category slice: state and reducer.
//!
//! The reducer is a pure function — it never mutates its input and returns
//! a new state value for every transition. Actions from other families are
//! identity transitions, which keeps the combined-reducer composition sound
//! (every action reaches every slice reducer).

use std::collections::BTreeSet;

use crate::action::{Action, CategoryAction};
use crate::model::{Category, RequestId};

/// Normalized category slice.
///
/// `pending` holds the correlation ids of every outstanding mutation against
/// this slice; the slice is loading while the set is non-empty. Owned
/// exclusively by the [`Store`](crate::store::Store) — mutate through
/// dispatched actions only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryState {
    pub pending: BTreeSet<RequestId>,
    pub categories: Vec<Category>,
}

impl CategoryState {
    /// True while any mutation against this slice is unresolved.
    ///
    /// Coarse-grained on purpose: one flag for the whole slice, not one per
    /// entity.
    #[must_use]
    pub fn loading(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Apply one action to the category slice.
#[must_use]
pub fn reduce(state: &CategoryState, action: &Action) -> CategoryState {
    let Action::Category(action) = action else {
        return state.clone();
    };

    match action {
        // Effect-only signal: the phrase lives in the backend collaborator,
        // not in slice state.
        CategoryAction::SecretPhraseChange(_) => state.clone(),

        CategoryAction::Load { request } => CategoryState {
            pending: mark(&state.pending, *request),
            categories: Vec::new(),
        },

        CategoryAction::LoadSuccess {
            request,
            categories,
        } => CategoryState {
            pending: clear(&state.pending, *request),
            categories: categories.clone(),
        },

        CategoryAction::Add { request, name } => CategoryState {
            pending: mark(&state.pending, *request),
            categories: {
                let mut categories = state.categories.clone();
                categories.push(Category::local(*request, name.clone()));
                categories
            },
        },

        CategoryAction::AddSuccess { request, category } => CategoryState {
            pending: clear(&state.pending, *request),
            categories: state
                .categories
                .iter()
                .map(|c| {
                    if c.request == Some(*request) {
                        Category {
                            id: category.id,
                            name: c.name.clone(),
                            request: None,
                        }
                    } else {
                        c.clone()
                    }
                })
                .collect(),
        },

        CategoryAction::AddFail { request } => CategoryState {
            pending: clear(&state.pending, *request),
            categories: state
                .categories
                .iter()
                .filter(|c| c.request != Some(*request))
                .cloned()
                .collect(),
        },

        CategoryAction::Edit {
            request, id, name, ..
        } => CategoryState {
            pending: mark(&state.pending, *request),
            categories: rename(&state.categories, *id, name),
        },

        CategoryAction::EditSuccess { request } => CategoryState {
            pending: clear(&state.pending, *request),
            categories: state.categories.clone(),
        },

        CategoryAction::EditFail {
            request,
            id,
            initial_name,
            ..
        } => CategoryState {
            pending: clear(&state.pending, *request),
            categories: rename(&state.categories, *id, initial_name),
        },

        CategoryAction::Remove {
            request, category, ..
        } => CategoryState {
            pending: mark(&state.pending, *request),
            categories: state
                .categories
                .iter()
                .filter(|c| c.id != category.id)
                .cloned()
                .collect(),
        },

        CategoryAction::RemoveSuccess { request } => CategoryState {
            pending: clear(&state.pending, *request),
            categories: state.categories.clone(),
        },

        CategoryAction::RemoveFail { request, category } => CategoryState {
            pending: clear(&state.pending, *request),
            categories: {
                let mut categories = state.categories.clone();
                categories.push(category.clone());
                categories
            },
        },
    }
}

fn mark(pending: &BTreeSet<RequestId>, request: RequestId) -> BTreeSet<RequestId> {
    let mut pending = pending.clone();
    pending.insert(request);
    pending
}

fn clear(pending: &BTreeSet<RequestId>, request: RequestId) -> BTreeSet<RequestId> {
    let mut pending = pending.clone();
    pending.remove(&request);
    pending
}

fn rename(categories: &[Category], id: crate::model::CategoryId, name: &str) -> Vec<Category> {
    categories
        .iter()
        .map(|c| {
            if c.id == Some(id) {
                Category {
                    name: name.to_owned(),
                    ..c.clone()
                }
            } else {
                c.clone()
            }
        })
        .collect()
}

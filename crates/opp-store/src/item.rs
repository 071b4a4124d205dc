//! Item slice: state and reducer.
//!
//! Same contract as the category slice: pure transitions, identity for
//! foreign actions. The two bulk actions (`RemoveFromCategory`,
//! `SetCategory`) are local-only transforms — they resolve synchronously and
//! therefore leave the pending set untouched.

use std::collections::BTreeSet;

use crate::action::{Action, ItemAction};
use crate::model::{Item, RequestId};

/// Normalized item slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemState {
    pub pending: BTreeSet<RequestId>,
    pub items: Vec<Item>,
}

impl ItemState {
    /// True while any mutation against this slice is unresolved.
    #[must_use]
    pub fn loading(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Apply one action to the item slice.
#[must_use]
pub fn reduce(state: &ItemState, action: &Action) -> ItemState {
    let Action::Item(action) = action else {
        return state.clone();
    };

    match action {
        ItemAction::LoadSuccess { items } => ItemState {
            pending: state.pending.clone(),
            items: items.clone(),
        },

        ItemAction::Add { request, item } => ItemState {
            pending: mark(&state.pending, *request),
            items: {
                let mut items = state.items.clone();
                items.push(Item {
                    request: Some(*request),
                    ..item.clone()
                });
                items
            },
        },

        ItemAction::AddSuccess { request, item } => ItemState {
            pending: clear(&state.pending, *request),
            items: state
                .items
                .iter()
                .map(|i| {
                    if i.request == Some(*request) {
                        Item {
                            id: item.id,
                            request: None,
                            ..i.clone()
                        }
                    } else {
                        i.clone()
                    }
                })
                .collect(),
        },

        ItemAction::AddFail { request } => ItemState {
            pending: clear(&state.pending, *request),
            items: state
                .items
                .iter()
                .filter(|i| i.request != Some(*request))
                .cloned()
                .collect(),
        },

        // Optimistic wholesale replacement; `previous` only matters on
        // failure.
        ItemAction::Update { request, item, .. } => ItemState {
            pending: mark(&state.pending, *request),
            items: replace(&state.items, item),
        },

        ItemAction::UpdateSuccess { request } => ItemState {
            pending: clear(&state.pending, *request),
            items: state.items.clone(),
        },

        ItemAction::UpdateFail { request, previous } => ItemState {
            pending: clear(&state.pending, *request),
            items: replace(&state.items, previous),
        },

        ItemAction::Remove { request, item } => ItemState {
            pending: mark(&state.pending, *request),
            items: state
                .items
                .iter()
                .filter(|i| i.id != item.id)
                .cloned()
                .collect(),
        },

        ItemAction::RemoveSuccess { request } => ItemState {
            pending: clear(&state.pending, *request),
            items: state.items.clone(),
        },

        ItemAction::RemoveFail { request, item } => ItemState {
            pending: clear(&state.pending, *request),
            items: {
                let mut items = state.items.clone();
                items.push(item.clone());
                items
            },
        },

        ItemAction::RemoveFromCategory { category } => ItemState {
            pending: state.pending.clone(),
            items: state
                .items
                .iter()
                .filter(|i| i.category_id != Some(*category))
                .cloned()
                .collect(),
        },

        ItemAction::SetCategory { from, to } => ItemState {
            pending: state.pending.clone(),
            items: state
                .items
                .iter()
                .map(|i| {
                    if i.category_id == Some(*from) {
                        Item {
                            category_id: *to,
                            ..i.clone()
                        }
                    } else {
                        i.clone()
                    }
                })
                .collect(),
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

/// Replace the entry sharing `item`'s id wholesale.
fn replace(items: &[Item], item: &Item) -> Vec<Item> {
    items
        .iter()
        .map(|i| if i.id == item.id { item.clone() } else { i.clone() })
        .collect()
}

//! Composed application state and the root reducer.

use crate::action::Action;
use crate::category::{self, CategoryState};
use crate::item::{self, ItemState};

/// The full client state: two independently-reduced slices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub categories: CategoryState,
    pub items: ItemState,
}

impl AppState {
    /// True once every pending mutation in both slices has resolved.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.categories.pending.is_empty() && self.items.pending.is_empty()
    }
}

/// Fan one action out to every slice reducer.
#[must_use]
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    AppState {
        categories: category::reduce(&state.categories, action),
        items: item::reduce(&state.items, action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CategoryAction, ItemAction};
    use crate::model::{Category, Item, RequestId};

    #[test]
    fn every_action_reaches_both_slices() {
        let state = AppState::default();
        let next = reduce(
            &state,
            &Action::Category(CategoryAction::LoadSuccess {
                request: RequestId::new(),
                categories: vec![Category::persisted(1, "Email")],
            }),
        );
        assert_eq!(next.categories.categories.len(), 1);
        // The item slice saw the action and stayed put.
        assert_eq!(next.items, state.items);
    }

    #[test]
    fn cascade_false_sequence_refiles_then_removes() {
        let mut state = AppState {
            categories: CategoryState {
                categories: vec![Category::persisted(5, "A")],
                ..CategoryState::default()
            },
            items: ItemState {
                items: vec![
                    Item {
                        id: Some(1),
                        category_id: Some(5),
                        ..Item::default()
                    },
                    Item {
                        id: Some(2),
                        category_id: Some(5),
                        ..Item::default()
                    },
                ],
                ..ItemState::default()
            },
        };

        state = reduce(&state, &ItemAction::SetCategory { from: 5, to: None }.into());
        state = reduce(
            &state,
            &CategoryAction::Remove {
                request: RequestId::new(),
                category: Category::persisted(5, "A"),
                cascade: false,
            }
            .into(),
        );

        assert!(state.categories.categories.is_empty());
        assert_eq!(state.items.items.len(), 2);
        assert!(state.items.items.iter().all(|i| i.category_id.is_none()));
    }

    #[test]
    fn cascade_true_sequence_strips_then_removes() {
        let mut state = AppState {
            categories: CategoryState {
                categories: vec![Category::persisted(5, "A")],
                ..CategoryState::default()
            },
            items: ItemState {
                items: vec![
                    Item {
                        id: Some(1),
                        category_id: Some(5),
                        ..Item::default()
                    },
                    Item {
                        id: Some(2),
                        category_id: Some(5),
                        ..Item::default()
                    },
                ],
                ..ItemState::default()
            },
        };

        state = reduce(&state, &ItemAction::RemoveFromCategory { category: 5 }.into());
        state = reduce(
            &state,
            &CategoryAction::Remove {
                request: RequestId::new(),
                category: Category::persisted(5, "A"),
                cascade: true,
            }
            .into(),
        );

        assert!(state.categories.categories.is_empty());
        assert!(state.items.items.is_empty());
    }
}

//! Selector composition layer.
//!
//! Pure derivations over [`AppState`]. Nothing here is cached — views are
//! recomputed on every call, which is fine at user scale (tens of
//! categories, hundreds of items).

use crate::model::{Category, CategoryItems, Item};
use crate::state::AppState;

/// The normalized category list.
#[must_use]
pub fn categories(state: &AppState) -> &[Category] {
    &state.categories.categories
}

/// The normalized item list.
#[must_use]
pub fn items(state: &AppState) -> &[Item] {
    &state.items.items
}

/// Denormalized tree: every category joined with the items filed under it.
///
/// The join is on persisted ids only — an optimistic category (no backend id
/// yet) cannot have items filed under it, and unfiled items surface through
/// [`items_without_category`] instead.
#[must_use]
pub fn category_items(state: &AppState) -> Vec<CategoryItems> {
    state
        .categories
        .categories
        .iter()
        .map(|category| CategoryItems {
            id: category.id,
            name: category.name.clone(),
            items: state
                .items
                .items
                .iter()
                .filter(|item| category.id.is_some() && item.category_id == category.id)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Items not filed under any category.
#[must_use]
pub fn items_without_category(state: &AppState) -> Vec<Item> {
    state
        .items
        .items
        .iter()
        .filter(|item| item.category_id.is_none())
        .cloned()
        .collect()
}

/// Whether the category slice has unresolved mutations.
#[must_use]
pub fn categories_loading(state: &AppState) -> bool {
    state.categories.loading()
}

/// Whether the item slice has unresolved mutations.
#[must_use]
pub fn items_loading(state: &AppState) -> bool {
    state.items.loading()
}

/// Aggregate readiness signal: the AND of both slices' loading flags.
#[must_use]
pub fn loading(state: &AppState) -> bool {
    state.categories.loading() && state.items.loading()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryState;
    use crate::item::ItemState;
    use crate::model::RequestId;

    fn item(id: i64, category_id: Option<i64>) -> Item {
        Item {
            id: Some(id),
            name: format!("item-{id}"),
            category_id,
            ..Item::default()
        }
    }

    fn joined_state() -> AppState {
        AppState {
            categories: CategoryState {
                categories: vec![Category::persisted(1, "A"), Category::persisted(2, "B")],
                ..CategoryState::default()
            },
            items: ItemState {
                items: vec![item(10, Some(1)), item(11, Some(2)), item(12, None)],
                ..ItemState::default()
            },
        }
    }

    #[test]
    fn category_items_joins_on_id() {
        let views = category_items(&joined_state());
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "A");
        assert_eq!(views[0].items, vec![item(10, Some(1))]);
        assert_eq!(views[1].items, vec![item(11, Some(2))]);
    }

    #[test]
    fn optimistic_category_joins_nothing() {
        let mut state = joined_state();
        state
            .categories
            .categories
            .push(Category::local(RequestId::new(), "C"));
        let views = category_items(&state);
        assert!(views[2].items.is_empty());
    }

    #[test]
    fn unfiled_items_are_selected_separately() {
        assert_eq!(items_without_category(&joined_state()), vec![item(12, None)]);
    }

    #[test]
    fn loading_is_the_and_of_both_slices() {
        let mut state = AppState::default();
        assert!(!loading(&state));

        state.categories.pending.insert(RequestId::new());
        assert!(categories_loading(&state));
        assert!(!loading(&state));

        state.items.pending.insert(RequestId::new());
        assert!(items_loading(&state));
        assert!(loading(&state));

        state.categories.pending.clear();
        assert!(!loading(&state));
    }
}

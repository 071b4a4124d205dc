//! The closed action vocabulary.
//!
//! Every state transition in the client is expressed as one of these
//! variants. Intent actions (`Load`, `Add`, `Edit`, `Update`, `Remove`)
//! carry a [`RequestId`] minted at dispatch time; the effect layer echoes
//! that id in the matching success/failure action so reducers can resolve
//! or roll back exactly the entry the intent created. Payloads are plain
//! data — actions never carry behavior.

use crate::model::{Category, CategoryId, Item, ItemId, RequestId, SecretPhrase};

/// Top-level action, fanned out to every slice reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Category(CategoryAction),
    Item(ItemAction),
}

impl Action {
    /// Short variant name for structured logging — payloads (which may
    /// contain passwords) stay out of the log stream.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Category(action) => match action {
                CategoryAction::SecretPhraseChange(_) => "category::secret_phrase_change",
                CategoryAction::Load { .. } => "category::load",
                CategoryAction::LoadSuccess { .. } => "category::load_success",
                CategoryAction::Add { .. } => "category::add",
                CategoryAction::AddSuccess { .. } => "category::add_success",
                CategoryAction::AddFail { .. } => "category::add_fail",
                CategoryAction::Edit { .. } => "category::edit",
                CategoryAction::EditSuccess { .. } => "category::edit_success",
                CategoryAction::EditFail { .. } => "category::edit_fail",
                CategoryAction::Remove { .. } => "category::remove",
                CategoryAction::RemoveSuccess { .. } => "category::remove_success",
                CategoryAction::RemoveFail { .. } => "category::remove_fail",
            },
            Self::Item(action) => match action {
                ItemAction::LoadSuccess { .. } => "item::load_success",
                ItemAction::Add { .. } => "item::add",
                ItemAction::AddSuccess { .. } => "item::add_success",
                ItemAction::AddFail { .. } => "item::add_fail",
                ItemAction::Update { .. } => "item::update",
                ItemAction::UpdateSuccess { .. } => "item::update_success",
                ItemAction::UpdateFail { .. } => "item::update_fail",
                ItemAction::Remove { .. } => "item::remove",
                ItemAction::RemoveSuccess { .. } => "item::remove_success",
                ItemAction::RemoveFail { .. } => "item::remove_fail",
                ItemAction::RemoveFromCategory { .. } => "item::remove_from_category",
                ItemAction::SetCategory { .. } => "item::set_category",
            },
        }
    }
}

impl From<CategoryAction> for Action {
    fn from(action: CategoryAction) -> Self {
        Self::Category(action)
    }
}

impl From<ItemAction> for Action {
    fn from(action: ItemAction) -> Self {
        Self::Item(action)
    }
}

/// Category-family actions, plus the cross-cutting secret-phrase signal.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryAction {
    /// The decryption passphrase changed. Effect-only: updates the backend
    /// header and triggers a full reload; no slice transition.
    SecretPhraseChange(SecretPhrase),
    /// Start a full reload of categories and items.
    Load { request: RequestId },
    LoadSuccess {
        request: RequestId,
        categories: Vec<Category>,
    },
    Add {
        request: RequestId,
        name: String,
    },
    AddSuccess {
        request: RequestId,
        category: Category,
    },
    AddFail {
        request: RequestId,
    },
    Edit {
        request: RequestId,
        id: CategoryId,
        name: String,
        initial_name: String,
    },
    EditSuccess {
        request: RequestId,
    },
    EditFail {
        request: RequestId,
        id: CategoryId,
        name: String,
        initial_name: String,
    },
    Remove {
        request: RequestId,
        category: Category,
        cascade: bool,
    },
    RemoveSuccess {
        request: RequestId,
    },
    RemoveFail {
        request: RequestId,
        category: Category,
    },
}

/// Item-family actions.
///
/// `RemoveFromCategory` and `SetCategory` are local bulk transforms with no
/// backend counterpart — they are dispatched as the saga prelude of a
/// category removal, before the category itself disappears from the views.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemAction {
    LoadSuccess {
        items: Vec<Item>,
    },
    Add {
        request: RequestId,
        item: Item,
    },
    AddSuccess {
        request: RequestId,
        item: Item,
    },
    AddFail {
        request: RequestId,
    },
    Update {
        request: RequestId,
        item: Item,
        previous: Item,
    },
    UpdateSuccess {
        request: RequestId,
    },
    UpdateFail {
        request: RequestId,
        previous: Item,
    },
    Remove {
        request: RequestId,
        item: Item,
    },
    RemoveSuccess {
        request: RequestId,
    },
    RemoveFail {
        request: RequestId,
        item: Item,
    },
    RemoveFromCategory {
        category: CategoryId,
    },
    SetCategory {
        from: CategoryId,
        to: Option<CategoryId>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_carry_no_payload() {
        let action: Action = CategoryAction::Add {
            request: RequestId::new(),
            name: "Banking".to_owned(),
        }
        .into();
        assert_eq!(action.label(), "category::add");
    }
}

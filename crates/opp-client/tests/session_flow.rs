//! End-to-end flows through Session + Coordinator + MemoryBackend:
//! optimistic updates, rollbacks, cascade sequencing, and the secret-phrase
//! reload.

use std::sync::Arc;
use std::time::Duration;

use opp_client::{Backend, MemoryBackend, Session};
use opp_store::{Item, SecretPhrase, Store};

fn session_with(backend: &MemoryBackend) -> Session {
    Session::new(Store::new(), Arc::new(backend.clone()))
}

fn draft(name: &str, category_id: Option<i64>) -> Item {
    Item {
        name: name.to_owned(),
        category_id,
        ..Item::default()
    }
}

/// Poll until `check` passes or two seconds elapse.
async fn eventually<F: Fn() -> bool>(check: F, what: &str) {
    let wait = async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(2), wait)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for: {what}"));
}

#[tokio::test]
async fn add_category_resolves_with_backend_id() {
    let backend = MemoryBackend::new();
    let session = session_with(&backend);

    session.add_category("Email");
    // Optimistic: visible immediately, before the backend answers.
    let optimistic = session.categories();
    assert_eq!(optimistic.len(), 1);
    assert_eq!(optimistic[0].id, None);

    session.settled().await;
    let confirmed = session.categories();
    assert_eq!(confirmed[0].id, Some(1));
    assert_eq!(confirmed[0].name, "Email");
    assert_eq!(confirmed[0].request, None);
}

#[tokio::test]
async fn failed_add_category_rolls_back() {
    let backend = MemoryBackend::new();
    backend.set_failing(true).await;
    let session = session_with(&backend);

    session.add_category("Email");
    session.settled().await;

    assert!(session.categories().is_empty());
    assert!(!session.loading());
}

#[tokio::test]
async fn concurrent_same_name_adds_resolve_independently() {
    let backend = MemoryBackend::new();
    let session = session_with(&backend);

    session.add_category("Work");
    session.add_category("Work");
    session.settled().await;

    let mut ids: Vec<_> = session.categories().iter().map(|c| c.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![Some(1), Some(2)]);
}

#[tokio::test]
async fn cascade_false_unfiles_items_locally_and_remotely() {
    let backend = MemoryBackend::new();
    let session = session_with(&backend);

    session.add_category("Email");
    session.settled().await;
    session.add_item(draft("mail password", Some(1)));
    session.add_item(draft("mail recovery", Some(1)));
    session.settled().await;

    session.remove_category(1, false).unwrap();
    // The saga prelude re-files immediately, before the backend answers.
    assert!(session.snapshot().items.items.iter().all(|i| i.category_id.is_none()));

    session.settled().await;
    assert!(session.categories().is_empty());
    assert_eq!(session.unfiled_items().len(), 2);

    let remote = backend.fetch_all().await.unwrap();
    assert!(remote.categories.is_empty());
    assert!(remote.items.iter().all(|i| i.category_id.is_none()));
}

#[tokio::test]
async fn cascade_true_removes_items_locally_and_remotely() {
    let backend = MemoryBackend::new();
    let session = session_with(&backend);

    session.add_category("Email");
    session.settled().await;
    session.add_item(draft("mail password", Some(1)));
    session.settled().await;

    session.remove_category(1, true).unwrap();
    session.settled().await;

    assert!(session.categories().is_empty());
    assert!(session.snapshot().items.items.is_empty());
    assert_eq!(backend.item_count().await, 0);
}

#[tokio::test]
async fn failed_remove_category_restores_the_entry() {
    let backend = MemoryBackend::new();
    let session = session_with(&backend);

    session.add_category("Email");
    session.settled().await;

    backend.set_failing(true).await;
    session.remove_category(1, true).unwrap();
    session.settled().await;

    let categories = session.categories();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, Some(1));
}

#[tokio::test]
async fn removing_an_unknown_category_is_a_noop() {
    let backend = MemoryBackend::new();
    let session = session_with(&backend);
    assert!(session.remove_category(42, false).is_none());
}

#[tokio::test]
async fn load_failure_resolves_to_an_empty_settled_state() {
    let backend = MemoryBackend::new();
    backend.set_failing(true).await;
    let session = session_with(&backend);

    session.load();
    session.settled().await;

    assert!(session.categories().is_empty());
    assert!(session.snapshot().items.items.is_empty());
    assert!(!session.loading());
}

#[tokio::test]
async fn secret_phrase_change_updates_header_and_reloads() {
    let backend = MemoryBackend::new();
    backend.add_category("Email").await.unwrap();
    let session = session_with(&backend);

    session.change_secret_phrase(SecretPhrase::new("correct horse battery"));

    // The effect updates the backend's header value first…
    let expected = SecretPhrase::new("correct horse battery");
    let phrase_set = async {
        while backend.phrase().await != Some(expected.clone()) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(2), phrase_set)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for the backend phrase"));

    // …then triggers a full reload of the (re-decrypted) data.
    let store = session.store();
    eventually(
        || !store.state().categories.categories.is_empty(),
        "reload to land",
    )
    .await;
    assert_eq!(store.state().categories.categories[0].name, "Email");
}

#[tokio::test]
async fn failed_item_update_restores_the_previous_value() {
    let backend = MemoryBackend::new();
    let session = session_with(&backend);

    session.add_item(draft("wifi", None));
    session.settled().await;
    let stored = session.snapshot().items.items[0].clone();

    backend.set_failing(true).await;
    let edited = Item {
        password: "new-password".to_owned(),
        ..stored.clone()
    };
    session.update_item(edited.clone()).unwrap();
    // Optimistic replacement is visible at once.
    assert_eq!(session.snapshot().items.items[0], edited);

    session.settled().await;
    assert_eq!(session.snapshot().items.items[0], stored);
}

#[tokio::test]
async fn removed_item_disappears_locally_and_remotely() {
    let backend = MemoryBackend::new();
    let session = session_with(&backend);

    session.add_item(draft("wifi", None));
    session.settled().await;

    session.remove_item(1).unwrap();
    session.settled().await;

    assert!(session.snapshot().items.items.is_empty());
    assert_eq!(backend.item_count().await, 0);
}

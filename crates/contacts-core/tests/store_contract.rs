//! Behavioural tests shared by every `ContactStore` backend
//!
//! Each check runs against the in-memory store and the sled store so both
//! honour the same lifecycle: create, read, full replacement, delete.

use contacts_core::{
    Contact, ContactDraft, ContactFilter, ContactId, ContactStore, MemoryContactStore,
    SledContactStore,
};
use std::collections::HashSet;
use std::sync::Arc;

fn backends() -> Vec<Arc<dyn ContactStore>> {
    vec![
        Arc::new(MemoryContactStore::new()),
        Arc::new(SledContactStore::temporary().unwrap()),
    ]
}

fn draft(name: &str, email: &str) -> ContactDraft {
    ContactDraft::new(name, email, "555-0100")
}

#[tokio::test]
async fn test_round_trip_preserves_fields() {
    for store in backends() {
        let created = store
            .insert(draft("Jane Doe", "jane@x.com").with_address("1 Main St"))
            .await
            .unwrap();

        let fetched = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Jane Doe", "backend {}", store.name());
        assert_eq!(fetched.email, "jane@x.com");
        assert_eq!(fetched.phone, "555-0100");
        assert_eq!(fetched.address.as_deref(), Some("1 Main St"));
    }
}

#[tokio::test]
async fn test_update_is_full_replacement() {
    for store in backends() {
        let created = store
            .insert(draft("Jane Doe", "jane@x.com").with_address("1 Main St"))
            .await
            .unwrap();

        store
            .update(&created.id, ContactDraft::new("Jane D.", "jd@x.com", "555-9999"))
            .await
            .unwrap()
            .unwrap();

        let fetched = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(
            fetched,
            Contact {
                id: created.id,
                name: "Jane D.".to_string(),
                email: "jd@x.com".to_string(),
                phone: "555-9999".to_string(),
                address: None,
            },
            "backend {}",
            store.name()
        );
    }
}

#[tokio::test]
async fn test_deleted_id_is_gone_everywhere() {
    for store in backends() {
        let created = store.insert(draft("Jane Doe", "jane@x.com")).await.unwrap();
        store.delete(&created.id).await.unwrap().unwrap();

        assert!(store.find_by_id(&created.id).await.unwrap().is_none());
        assert!(store
            .update(&created.id, draft("Again", "again@x.com"))
            .await
            .unwrap()
            .is_none());
        assert!(store.delete(&created.id).await.unwrap().is_none());
        assert!(store.find_all().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    for store in backends() {
        let id = ContactId::generate();
        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store.delete(&id).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_ids_are_unique_and_not_reused() {
    for store in backends() {
        let mut seen = HashSet::new();
        for i in 0..50 {
            let created = store
                .insert(draft(&format!("Contact {i}"), "c@x.com"))
                .await
                .unwrap();
            assert!(seen.insert(created.id));
            if i % 2 == 0 {
                store.delete(&created.id).await.unwrap();
            }
        }
        assert_eq!(store.find_all().await.unwrap().len(), 25);
    }
}

#[tokio::test]
async fn test_search_matches_all_terms_case_insensitively() {
    for store in backends() {
        store.insert(draft("John Smith", "john@example.com")).await.unwrap();
        store.insert(draft("Johnny Walker", "jw@other.org")).await.unwrap();
        store.insert(draft("Alice", "alice@example.com")).await.unwrap();

        let mut names: Vec<String> = store
            .find_matching(&ContactFilter::new().with_name("JOHN"))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["John Smith", "Johnny Walker"]);

        let both = store
            .find_matching(&ContactFilter::new().with_name("john").with_email("example"))
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].name, "John Smith");

        let none = store
            .find_matching(&ContactFilter::new().with_name("zed"))
            .await
            .unwrap();
        assert!(none.is_empty());

        let all = store.find_matching(&ContactFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}

#[tokio::test]
async fn test_sled_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");

    let created = {
        let store = SledContactStore::open(&path).unwrap();
        let created = store.insert(draft("Jane Doe", "jane@x.com")).await.unwrap();
        store.flush().await.unwrap();
        created
    };

    let reopened = SledContactStore::open(&path).unwrap();
    assert_eq!(reopened.find_by_id(&created.id).await.unwrap(), Some(created));
}

//! In-memory contact store
//!
//! Keeps contacts in a map guarded by an async `RwLock`. Nothing survives the
//! process; intended for tests and throwaway local runs.

use std::collections::HashMap;
use tokio::sync::RwLock;

use super::ContactStore;
use crate::error::StoreResult;
use crate::model::{Contact, ContactDraft, ContactId};

#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contacts: RwLock<HashMap<ContactId, Contact>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored contacts
    pub async fn len(&self) -> usize {
        self.contacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contacts.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ContactStore for MemoryContactStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_all(&self) -> StoreResult<Vec<Contact>> {
        Ok(self.contacts.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &ContactId) -> StoreResult<Option<Contact>> {
        Ok(self.contacts.read().await.get(id).cloned())
    }

    async fn insert(&self, draft: ContactDraft) -> StoreResult<Contact> {
        let mut contacts = self.contacts.write().await;

        // An id never names two records.
        let mut id = ContactId::generate();
        while contacts.contains_key(&id) {
            id = ContactId::generate();
        }

        let contact = Contact::from_draft(id, draft);
        contacts.insert(id, contact.clone());
        Ok(contact)
    }

    async fn update(&self, id: &ContactId, draft: ContactDraft) -> StoreResult<Option<Contact>> {
        let mut contacts = self.contacts.write().await;
        Ok(contacts.get_mut(id).map(|contact| {
            contact.replace_with(draft);
            contact.clone()
        }))
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<Option<Contact>> {
        Ok(self.contacts.write().await.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContactFilter;

    fn jane() -> ContactDraft {
        ContactDraft::new("Jane Doe", "jane@x.com", "555-1212")
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = MemoryContactStore::new();
        let a = store.insert(jane()).await.unwrap();
        let b = store.insert(jane()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_by_id_round_trip() {
        let store = MemoryContactStore::new();
        let created = store.insert(jane().with_address("1 Main St")).await.unwrap();

        let fetched = store.find_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let store = MemoryContactStore::new();
        let created = store.insert(jane().with_address("1 Main St")).await.unwrap();

        let updated = store
            .update(&created.id, ContactDraft::new("Jane D.", "jd@x.com", "555-0000"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Jane D.");
        assert!(updated.address.is_none());
        assert_eq!(store.find_by_id(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_unknown_id_creates_nothing() {
        let store = MemoryContactStore::new();
        let result = store.update(&ContactId::generate(), jane()).await.unwrap();

        assert!(result.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_then_lookup_is_not_found() {
        let store = MemoryContactStore::new();
        let created = store.insert(jane()).await.unwrap();

        assert_eq!(store.delete(&created.id).await.unwrap(), Some(created.clone()));
        assert!(store.find_by_id(&created.id).await.unwrap().is_none());
        assert!(store.delete(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_matching_uses_filter() {
        let store = MemoryContactStore::new();
        store
            .insert(ContactDraft::new("John Smith", "john@example.com", "1"))
            .await
            .unwrap();
        store
            .insert(ContactDraft::new("Alice", "alice@example.com", "2"))
            .await
            .unwrap();

        let found = store
            .find_matching(&ContactFilter::new().with_name("john"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "John Smith");

        let all = store.find_matching(&ContactFilter::new()).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}

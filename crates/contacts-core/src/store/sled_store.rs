//! Embedded document store backed by sled
//!
//! Each contact is one JSON document in the `contacts` tree, keyed by the
//! 16 raw bytes of its id. Writes are buffered by sled and flushed on a
//! timer; call [`ContactStore::flush`] before shutdown to persist the tail.

use std::fmt;
use std::path::{Path, PathBuf};

use super::ContactStore;
use crate::error::{StoreError, StoreResult};
use crate::model::{Contact, ContactDraft, ContactId};

const CONTACTS_TREE: &str = "contacts";
const FLUSH_EVERY_MS: u64 = 500;

pub struct SledContactStore {
    db: sled::Db,
    contacts: sled::Tree,
    path: Option<PathBuf>,
}

impl SledContactStore {
    /// Open (or create) a store at `path`
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let db = sled::Config::new()
            .path(path)
            .flush_every_ms(Some(FLUSH_EVERY_MS))
            .open()?;

        tracing::info!(
            path = %path.display(),
            recovered = db.was_recovered(),
            "Opened contact database"
        );

        Self::from_db(db, Some(path.to_path_buf()))
    }

    /// Open a store that is deleted when dropped
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db, None)
    }

    fn from_db(db: sled::Db, path: Option<PathBuf>) -> StoreResult<Self> {
        let contacts = db.open_tree(CONTACTS_TREE)?;
        Ok(Self { db, contacts, path })
    }

    /// Number of stored contacts
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    fn decode(key: &[u8], value: &[u8]) -> StoreResult<Contact> {
        let contact: Contact = serde_json::from_slice(value)?;

        if ContactId::from_slice(key) != Some(contact.id) {
            return Err(StoreError::Corrupt {
                id: contact.id.to_string(),
                reason: "document id does not match its key".to_string(),
            });
        }
        Ok(contact)
    }
}

impl fmt::Debug for SledContactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SledContactStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ContactStore for SledContactStore {
    fn name(&self) -> &str {
        "sled"
    }

    async fn find_all(&self) -> StoreResult<Vec<Contact>> {
        self.contacts
            .iter()
            .map(|entry| {
                let (key, value) = entry?;
                Self::decode(&key, &value)
            })
            .collect()
    }

    async fn find_by_id(&self, id: &ContactId) -> StoreResult<Option<Contact>> {
        self.contacts
            .get(id.as_bytes())?
            .map(|value| Self::decode(id.as_bytes(), &value))
            .transpose()
    }

    async fn insert(&self, draft: ContactDraft) -> StoreResult<Contact> {
        loop {
            let contact = Contact::from_draft(ContactId::generate(), draft.clone());
            let document = serde_json::to_vec(&contact)?;

            // Only claim an id nobody holds.
            let swapped = self.contacts.compare_and_swap(
                contact.id.as_bytes(),
                None::<&[u8]>,
                Some(document),
            )?;

            if swapped.is_ok() {
                tracing::debug!(id = %contact.id, "Inserted contact");
                return Ok(contact);
            }
        }
    }

    async fn update(&self, id: &ContactId, draft: ContactDraft) -> StoreResult<Option<Contact>> {
        let contact = Contact::from_draft(*id, draft);
        let document = serde_json::to_vec(&contact)?;

        // Replace only when the key is live; a missing key stays missing.
        let previous = self
            .contacts
            .fetch_and_update(id.as_bytes(), |old| old.map(|_| document.clone()))?;

        Ok(previous.map(|_| contact))
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<Option<Contact>> {
        self.contacts
            .remove(id.as_bytes())?
            .map(|value| Self::decode(id.as_bytes(), &value))
            .transpose()
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.db.size_on_disk()?;
        Ok(())
    }

    async fn flush(&self) -> StoreResult<()> {
        let db = self.db.clone();
        let bytes = tokio::task::spawn_blocking(move || db.flush())
            .await
            .map_err(|e| StoreError::unavailable(format!("flush task failed: {e}")))??;
        tracing::debug!(bytes, "Flushed contact database");
        Ok(())
    }
}

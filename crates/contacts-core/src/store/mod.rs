//! Contact storage
//!
//! The [`ContactStore`] trait is the persistence boundary of the service.
//! Handlers only ever see `Arc<dyn ContactStore>`, so any backend can be
//! injected: the embedded [`SledContactStore`] in production and the
//! [`MemoryContactStore`] in tests.
//!
//! # Error Handling
//!
//! A missing record is not an error: lookups and mutations addressed by id
//! return `Ok(None)` when no live record has that id. `Err` is reserved for
//! backend failures.

pub mod memory;
pub mod sled_store;

pub use self::memory::MemoryContactStore;
pub use self::sled_store::SledContactStore;

use std::fmt;

use crate::error::StoreResult;
use crate::model::{Contact, ContactDraft, ContactFilter, ContactId};

/// Persistence operations for contacts
///
/// All methods are async to support remote backends. Implementations must be
/// safe to share across concurrently running requests.
#[async_trait::async_trait]
pub trait ContactStore: Send + Sync + fmt::Debug {
    /// Short backend name used in logs and health output
    fn name(&self) -> &str;

    /// Return every stored contact, in no particular order
    async fn find_all(&self) -> StoreResult<Vec<Contact>>;

    /// Fetch a single contact
    async fn find_by_id(&self, id: &ContactId) -> StoreResult<Option<Contact>>;

    /// Return the contacts accepted by `filter`
    ///
    /// Default implementation scans [`find_all`](Self::find_all).
    async fn find_matching(&self, filter: &ContactFilter) -> StoreResult<Vec<Contact>> {
        let contacts = self.find_all().await?;
        if filter.is_empty() {
            return Ok(contacts);
        }
        Ok(contacts.into_iter().filter(|c| filter.matches(c)).collect())
    }

    /// Store a new contact under a freshly assigned id
    async fn insert(&self, draft: ContactDraft) -> StoreResult<Contact>;

    /// Replace all mutable fields of an existing contact
    ///
    /// Returns the post-update record, or `None` if the id is unknown.
    async fn update(&self, id: &ContactId, draft: ContactDraft) -> StoreResult<Option<Contact>>;

    /// Remove a contact, returning the removed record if it existed
    async fn delete(&self, id: &ContactId) -> StoreResult<Option<Contact>>;

    /// Probe whether the backend can serve requests
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Persist buffered writes
    ///
    /// Default implementation does nothing (for backends without buffering).
    async fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}

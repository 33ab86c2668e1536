//! Contacts Core
//!
//! Domain model, payload validation and storage for the contacts service.
//!
//! ## Modules
//!
//! - [`model`]: `Contact`, `ContactDraft`, `ContactFilter` and `ContactId`
//! - [`validation`]: field rules turning an untyped JSON payload into a
//!   `ContactDraft` or a list of violations
//! - [`store`]: the `ContactStore` trait plus in-memory and sled backends
//! - [`error`]: storage error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use contacts_core::{validate, ContactStore, MemoryContactStore, Verdict};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryContactStore::new();
//!     let payload = serde_json::json!({
//!         "name": "Jane Doe",
//!         "email": "jane@x.com",
//!         "phone": "555-1212",
//!     });
//!
//!     if let Verdict::Valid(draft) = validate(&payload) {
//!         let contact = store.insert(draft).await.unwrap();
//!         println!("created {}", contact.id);
//!     }
//! }
//! ```

pub mod error;
pub mod model;
pub mod store;
pub mod validation;

pub use error::{StoreError, StoreResult};
pub use model::{Contact, ContactDraft, ContactFilter, ContactId};
pub use store::{ContactStore, MemoryContactStore, SledContactStore};
pub use validation::{is_valid_email, validate, FieldViolation, Validator, Verdict};

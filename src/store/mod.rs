pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

pub use memory::{MemoryContactStore, MemoryCredentialStore};
pub use postgres::{PgContactStore, PgCredentialStore};

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email_address: String,
    pub number: String,
}

/// The three mutable fields of a contact, already validated.
///
/// Produced by `validation::validate_draft`; both create and full update
/// take this as input, so the store never sees an unchecked value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email_address: String,
    pub number: String,
}

/// Errors from store backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Contact not found")]
    NotFound,

    #[error("A contact with this email address already exists")]
    DuplicateEmail,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Durable persistence of contacts.
///
/// Backends assign ids atomically on insert and enforce global uniqueness
/// of `email_address`. When several contacts share a name, name lookups
/// return the one with the lowest id.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert(&self, fields: ContactFields) -> Result<Contact, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Contact, StoreError>;

    /// Exact, case-sensitive match on `email_address`.
    async fn get_by_email(&self, email: &str) -> Result<Contact, StoreError>;

    /// Exact, case-sensitive match on `name`; lowest id wins on ties.
    async fn get_by_name(&self, name: &str) -> Result<Contact, StoreError>;

    /// All contacts in ascending id order.
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError>;

    /// Wholesale replacement of the three mutable fields. A contact
    /// keeping its own current email is never a duplicate.
    async fn update(&self, id: i64, fields: ContactFields) -> Result<Contact, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Backend liveness, used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Credential verification for the basic-auth gate.
///
/// Injected into the middleware rather than read from process-global
/// state, so tests and deployments can swap the backing user store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, StoreError>;
}

/// Hex SHA-256 digest used for stored passwords.
pub(crate) fn hash_password(password: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

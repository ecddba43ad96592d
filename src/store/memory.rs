use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{hash_password, Contact, ContactFields, ContactStore, CredentialStore, StoreError};

/// In-process contact store used when no DATABASE_URL is configured and
/// by the test suite. Enforces the same invariants as the postgres
/// backend: monotonically assigned ids and unique email addresses.
#[derive(Default)]
pub struct MemoryContactStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    // BTreeMap keeps iteration in ascending id order, which gives both
    // the list ordering and the lowest-id tie-break on name lookups.
    contacts: BTreeMap<i64, Contact>,
    last_id: i64,
}

impl Inner {
    fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> bool {
        self.contacts
            .values()
            .any(|c| c.email_address == email && Some(c.id) != exclude_id)
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn insert(&self, fields: ContactFields) -> Result<Contact, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&fields.email_address, None) {
            return Err(StoreError::DuplicateEmail);
        }

        inner.last_id += 1;
        let contact = Contact {
            id: inner.last_id,
            name: fields.name,
            email_address: fields.email_address,
            number: fields.number,
        };
        inner.contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn get_by_id(&self, id: i64) -> Result<Contact, StoreError> {
        let inner = self.inner.read().await;
        inner.contacts.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<Contact, StoreError> {
        let inner = self.inner.read().await;
        inner
            .contacts
            .values()
            .find(|c| c.email_address == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_name(&self, name: &str) -> Result<Contact, StoreError> {
        let inner = self.inner.read().await;
        inner
            .contacts
            .values()
            .find(|c| c.name == name)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.contacts.values().cloned().collect())
    }

    async fn update(&self, id: i64, fields: ContactFields) -> Result<Contact, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.contacts.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if inner.email_taken(&fields.email_address, Some(id)) {
            return Err(StoreError::DuplicateEmail);
        }

        let contact = Contact {
            id,
            name: fields.name,
            email_address: fields.email_address,
            number: fields.number,
        };
        inner.contacts.insert(id, contact.clone());
        Ok(contact)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .contacts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-process username/password store with SHA-256 digests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub async fn add_user(&self, username: &str, password: &str) {
        let mut users = self.users.write().await;
        users.insert(username.to_string(), hash_password(password));
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .get(username)
            .is_some_and(|stored| *stored == hash_password(password)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, email: &str, number: &str) -> ContactFields {
        ContactFields {
            name: name.to_string(),
            email_address: email.to_string(),
            number: number.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryContactStore::default();
        let a = store.insert(fields("Ada", "ada@example.com", "100")).await.unwrap();
        let b = store.insert(fields("Bob", "bob@example.com", "200")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = MemoryContactStore::default();
        let a = store.insert(fields("Ada", "ada@example.com", "100")).await.unwrap();
        store.delete(a.id).await.unwrap();
        let b = store.insert(fields("Bob", "bob@example.com", "200")).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn duplicate_email_rejected_on_insert() {
        let store = MemoryContactStore::default();
        store.insert(fields("Ada", "ada@example.com", "100")).await.unwrap();
        let err = store
            .insert(fields("Imposter", "ada@example.com", "200"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_keeping_own_email_succeeds() {
        let store = MemoryContactStore::default();
        let a = store.insert(fields("Ada", "ada@example.com", "100")).await.unwrap();
        let updated = store
            .update(a.id, fields("Ada Lovelace", "ada@example.com", "100"))
            .await
            .unwrap();
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn update_to_taken_email_rejected() {
        let store = MemoryContactStore::default();
        store.insert(fields("Ada", "ada@example.com", "100")).await.unwrap();
        let b = store.insert(fields("Bob", "bob@example.com", "200")).await.unwrap();
        let err = store
            .update(b.id, fields("Bob", "ada@example.com", "200"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn name_lookup_returns_lowest_id_on_ties() {
        let store = MemoryContactStore::default();
        let first = store.insert(fields("Ada", "ada@example.com", "100")).await.unwrap();
        store.insert(fields("Ada", "ada2@example.com", "200")).await.unwrap();
        let found = store.get_by_name("Ada").await.unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn get_and_delete_missing_id() {
        let store = MemoryContactStore::default();
        assert!(matches!(store.get_by_id(42).await.unwrap_err(), StoreError::NotFound));
        assert!(matches!(store.delete(42).await.unwrap_err(), StoreError::NotFound));
    }

    #[tokio::test]
    async fn credential_store_verifies_exact_pair() {
        let users = MemoryCredentialStore::default();
        users.add_user("admin", "hunter2").await;
        assert!(users.verify("admin", "hunter2").await.unwrap());
        assert!(!users.verify("admin", "wrong").await.unwrap());
        assert!(!users.verify("nobody", "hunter2").await.unwrap());
    }
}

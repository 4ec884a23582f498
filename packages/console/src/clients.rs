//! Client directory: listing, creating and deleting client documents.

use docbind_bindings::{ActionRunner, EmailAddress};
use docbind_core_store::{CollectionStore, DocRef, Value};

use crate::error::{ClientIdError, ConsoleError};

/// Validate a new client id against the existing ones.
///
/// Ids are e-mail addresses, compared in lower case.
pub fn validate_client_id(id: &str, existing: &[String]) -> Result<String, ClientIdError> {
    let id = id.trim().to_lowercase();
    if id.is_empty() {
        return Err(ClientIdError::Empty);
    }
    if existing.iter().any(|other| *other == id) {
        return Err(ClientIdError::Duplicate { id });
    }
    if !EmailAddress::is_valid(&id) {
        return Err(ClientIdError::Malformed { id });
    }
    Ok(id)
}

/// The collection of client configuration documents.
#[derive(Clone, Debug)]
pub struct ClientDirectory {
    collection: String,
    defaults: Value,
}

impl ClientDirectory {
    /// `defaults` is the initial document of every new client.
    pub fn new(collection: impl Into<String>, defaults: Value) -> Self {
        Self {
            collection: collection.into(),
            defaults,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn doc(&self, id: &str) -> DocRef {
        DocRef::new(self.collection.clone(), id)
    }

    /// Client ids in id order.
    pub fn list(&self, store: &dyn CollectionStore) -> Vec<String> {
        store
            .list_documents(&self.collection)
            .into_iter()
            .map(|doc| doc.id().to_string())
            .collect()
    }

    /// Create a client with the default configuration.
    pub async fn create(&self, store: &dyn CollectionStore, id: &str) -> Result<DocRef, ConsoleError> {
        let id = validate_client_id(id, &self.list(store))?;
        let doc = self.doc(&id);
        store
            .create_document(&doc, self.defaults.clone())
            .await
            .map_err(|error| {
                tracing::error!(%doc, %error, "error creating client");
                error
            })?;
        tracing::info!(%doc, "created client");
        Ok(doc)
    }

    pub async fn delete(&self, store: &dyn CollectionStore, id: &str) -> Result<(), ConsoleError> {
        let doc = self.doc(id);
        store.delete_document(&doc).await.map_err(|error| {
            tracing::error!(%doc, %error, "error deleting client");
            error
        })?;
        tracing::info!(%doc, "deleted client");
        Ok(())
    }
}

/// The "new client" form: an id buffer and a single create action.
#[derive(Debug, Default)]
pub struct NewClientForm {
    id: String,
    runner: ActionRunner,
}

impl NewClientForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the typed id; input is folded to lower case.
    pub fn input(&mut self, text: &str) {
        self.id = text.to_lowercase();
    }

    pub fn runner(&self) -> &ActionRunner {
        &self.runner
    }

    pub fn clear_error(&mut self) {
        self.runner.clear_error();
    }

    pub fn validation(&self, existing: &[String]) -> Result<String, ClientIdError> {
        validate_client_id(&self.id, existing)
    }

    /// Submit is disabled while creating or while the id is unusable.
    pub fn is_disabled(&self, existing: &[String]) -> bool {
        self.runner.is_running() || self.validation(existing).is_err()
    }

    /// Create the client. On success the form is cleared; on failure the
    /// id is kept and the error is in the runner's slot.
    pub async fn submit(&mut self, directory: &ClientDirectory, store: &dyn CollectionStore) -> bool {
        let existing = directory.list(store);
        let Ok(id) = self.validation(&existing) else {
            return false;
        };
        if self.runner.is_running() {
            return false;
        }

        let doc = directory.doc(&id);
        let defaults = directory.defaults.clone();
        let created = self
            .runner
            .run(async move { store.create_document(&doc, defaults).await })
            .await;
        if created {
            self.id.clear();
        }
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Vec<String> {
        vec!["alice@example.com".to_string()]
    }

    #[test]
    fn validation_rules() {
        assert_eq!(validate_client_id("", &existing()), Err(ClientIdError::Empty));
        assert_eq!(validate_client_id("   ", &existing()), Err(ClientIdError::Empty));
        assert_eq!(
            validate_client_id("Alice@Example.com", &existing()),
            Err(ClientIdError::Duplicate {
                id: "alice@example.com".into()
            })
        );
        assert_eq!(
            validate_client_id("bob", &existing()),
            Err(ClientIdError::Malformed { id: "bob".into() })
        );
        assert_eq!(
            validate_client_id("Bob@Example.com", &existing()),
            Ok("bob@example.com".to_string())
        );
    }

    #[test]
    fn form_folds_case_and_disables() {
        let mut form = NewClientForm::new();
        assert!(form.is_disabled(&existing()));
        form.input("Bob@Example.COM");
        assert_eq!(form.id(), "bob@example.com");
        assert!(!form.is_disabled(&existing()));
        form.input("alice@example.com");
        assert!(form.is_disabled(&existing()));
    }
}

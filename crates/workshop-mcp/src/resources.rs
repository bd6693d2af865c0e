use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::content::{ResourceContents, JSON_MIME_TYPE};
use crate::error::{McpError, RegistryError};

/// Entry of `resources/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

impl ResourceDescriptor {
    /// Descriptor of a JSON snapshot.
    pub fn json(uri: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: description.into(),
            mime_type: JSON_MIME_TYPE.to_string(),
        }
    }
}

type Snapshot = Box<dyn Fn() -> Result<String, serde_json::Error> + Send + Sync>;

struct Entry {
    descriptor: ResourceDescriptor,
    snapshot: Snapshot,
    cached: OnceLock<String>,
}

impl Entry {
    fn text(&self) -> Result<&str, serde_json::Error> {
        if let Some(text) = self.cached.get() {
            return Ok(text);
        }
        let text = (self.snapshot)()?;
        Ok(self.cached.get_or_init(|| text))
    }
}

/// Ordered, read-only set of URI-addressed data snapshots.
///
/// Snapshots are serialized on first read and cached for the lifetime of
/// the catalog.
#[derive(Default)]
pub struct ResourceCatalog {
    entries: IndexMap<String, Entry>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource whose text is produced by `snapshot`.
    ///
    /// # Errors
    ///
    /// Fails if the URI is already registered.
    pub fn register<F>(&mut self, descriptor: ResourceDescriptor, snapshot: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Result<String, serde_json::Error> + Send + Sync + 'static,
    {
        if self.entries.contains_key(&descriptor.uri) {
            return Err(RegistryError::DuplicateResource(descriptor.uri));
        }

        self.entries.insert(
            descriptor.uri.clone(),
            Entry {
                descriptor,
                snapshot: Box::new(snapshot),
                cached: OnceLock::new(),
            },
        );
        Ok(())
    }

    /// Descriptors for `resources/list`, in registration order.
    pub fn descriptors(&self) -> Vec<ResourceDescriptor> {
        self.entries.values().map(|e| e.descriptor.clone()).collect()
    }

    /// Contents for `resources/read`.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::UnknownResource`] for URIs not in the catalog and
    /// [`McpError::Serialization`] if the snapshot cannot be produced.
    pub fn read(&self, uri: &str) -> Result<ResourceContents, McpError> {
        let entry = self
            .entries
            .get(uri)
            .ok_or_else(|| McpError::UnknownResource(uri.to_string()))?;

        Ok(ResourceContents {
            uri: entry.descriptor.uri.clone(),
            mime_type: entry.descriptor.mime_type.clone(),
            text: entry.text()?.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

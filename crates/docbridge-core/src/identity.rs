use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Backend-opaque handle addressing a stored object, distinct from its
/// human-readable path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileIdentity(String);

impl FileIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileIdentity {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A backend object as seen by the identity listing contract: its handle,
/// leaf name, and immediate parent (None for objects directly under the
/// backend root).
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRef {
    pub identity: FileIdentity,
    pub name: String,
    pub parent: Option<FileIdentity>,
}

/// Descriptive metadata for a file or folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub identity: FileIdentity,
    pub name: String,
    pub is_folder: bool,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
    pub mime_type: Option<String>,
}

/// Identity listing contract: enough to map a virtual path to a backend
/// object by listing leaf-name candidates and walking parent chains.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// List all objects whose leaf name equals `name`, in backend order.
    async fn list_by_name(&self, name: &str) -> Result<Vec<ObjectRef>, StoreError>;

    /// Fetch a single object by identity, or None if it no longer exists.
    async fn get_object(&self, identity: &FileIdentity) -> Result<Option<ObjectRef>, StoreError>;
}

/// File operations contract: metadata, folder listing, and whole-object
/// copy/move/delete.
#[async_trait]
pub trait FileBackend: Send + Sync {
    async fn file_info(&self, identity: &FileIdentity) -> Result<FileInfo, StoreError>;

    /// Immediate children of a folder, in backend order.
    async fn list_children(&self, folder: &FileIdentity) -> Result<Vec<FileInfo>, StoreError>;

    /// Copy an object into `parent` under `name`, returning the copy's identity.
    async fn copy(
        &self,
        source: &FileIdentity,
        parent: &FileIdentity,
        name: &str,
    ) -> Result<FileIdentity, StoreError>;

    /// Re-parent and/or rename an object in place.
    async fn rename_move(
        &self,
        source: &FileIdentity,
        parent: &FileIdentity,
        name: &str,
    ) -> Result<(), StoreError>;

    async fn delete(&self, identity: &FileIdentity) -> Result<(), StoreError>;
}

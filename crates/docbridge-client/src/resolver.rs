use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use docbridge_core::{FileIdentity, IdentityBackend, ObjectRef, StoreError};
use tracing::{debug, instrument};

/// Bidirectional path ↔ identity cache over the identity listing contract.
///
/// Entries are created lazily on first resolution and held for the life of
/// the resolver, never invalidated: external changes to the backend surface
/// as stale identities until the resolver is rebuilt. Repeated resolution of
/// a known path costs zero backend calls; a cold resolution costs O(depth).
pub struct IdentityResolver {
    backend: Arc<dyn IdentityBackend>,
    root: FileIdentity,
    cache: Mutex<PathCache>,
}

#[derive(Default)]
struct PathCache {
    by_path: HashMap<String, FileIdentity>,
    by_identity: HashMap<FileIdentity, String>,
}

impl PathCache {
    fn insert(&mut self, path: String, identity: FileIdentity) {
        self.by_path.insert(path.clone(), identity.clone());
        self.by_identity.insert(identity, path);
    }
}

impl IdentityResolver {
    pub fn new(backend: Arc<dyn IdentityBackend>, root: FileIdentity) -> Self {
        Self {
            backend,
            root,
            cache: Mutex::new(PathCache::default()),
        }
    }

    /// The preconfigured identity of the virtual root `/`.
    pub fn root(&self) -> &FileIdentity {
        &self.root
    }

    fn cache(&self) -> MutexGuard<'_, PathCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Resolve a virtual path to a backend identity.
    ///
    /// Paths are rooted, `/`-separated, and case-sensitive, with no trailing
    /// slash except the root itself. Fails with `NotFound` when no backend
    /// object reconstructs to the requested path.
    #[instrument(skip(self), level = "debug")]
    pub async fn resolve(&self, path: &str) -> Result<FileIdentity, StoreError> {
        validate_path(path)?;
        if path == "/" {
            return Ok(self.root.clone());
        }
        if let Some(identity) = self.cache().by_path.get(path) {
            debug!(%identity, "path cache hit");
            return Ok(identity.clone());
        }

        let leaf = path.rsplit('/').next().unwrap_or(path);
        let candidates = self.backend.list_by_name(leaf).await?;
        debug!(candidates = candidates.len(), leaf, "cold resolution");
        for candidate in candidates {
            let full = self.object_path(&candidate).await?;
            if full == path {
                return Ok(candidate.identity);
            }
        }
        Err(StoreError::NotFound(format!("no object at path {path}")))
    }

    /// Reconstruct an object's full virtual path, caching every ancestor's
    /// path along the way.
    ///
    /// The parent chain is walked iteratively with an explicit stack so deep
    /// hierarchies stay bounded in memory.
    pub async fn object_path(&self, object: &ObjectRef) -> Result<String, StoreError> {
        if let Some(path) = self.cache().by_identity.get(&object.identity) {
            return Ok(path.clone());
        }

        let mut stack = vec![object.clone()];
        let mut prefix = String::new();
        loop {
            let parent = match stack.last().and_then(|top| top.parent.clone()) {
                None => break,
                Some(parent) if parent == self.root => break,
                Some(parent) => parent,
            };
            if let Some(known) = self.cache().by_identity.get(&parent) {
                prefix = known.clone();
                break;
            }
            let resolved = self.backend.get_object(&parent).await?.ok_or_else(|| {
                StoreError::NotFound(format!("missing ancestor object {parent}"))
            })?;
            stack.push(resolved);
        }

        let mut path = prefix;
        let mut cache = self.cache();
        while let Some(ancestor) = stack.pop() {
            path = format!("{path}/{}", ancestor.name);
            cache.insert(path.clone(), ancestor.identity);
        }
        Ok(path)
    }
}

fn validate_path(path: &str) -> Result<(), StoreError> {
    if path == "/" {
        return Ok(());
    }
    if !path.starts_with('/') {
        return Err(StoreError::InvalidArgument(format!(
            "path must be rooted: {path}"
        )));
    }
    if path.ends_with('/') {
        return Err(StoreError::InvalidArgument(format!(
            "path must not end with a slash: {path}"
        )));
    }
    if path[1..].split('/').any(str::is_empty) {
        return Err(StoreError::InvalidArgument(format!(
            "path contains an empty segment: {path}"
        )));
    }
    Ok(())
}

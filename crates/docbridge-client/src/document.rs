use std::sync::Arc;

use docbridge_core::{
    DocumentCodec, DocumentFetch, FileIdentity, NativeDocument, Node, RawContent, StoreError,
};
use tracing::{debug, instrument};

use crate::resolver::IdentityResolver;

/// Ephemeral document snapshot: the normalized top-level node sequence plus,
/// for offset-addressed backends, the raw native form edits are computed
/// against. Never cached across edits: every logical operation loads a
/// fresh snapshot and discards it after writing.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub identity: FileIdentity,
    pub path: String,
    pub nodes: Vec<Node>,
    pub native: Option<NativeDocument>,
}

/// Fetches raw backend content by path and normalizes it into the common
/// node model.
pub struct DocumentModel {
    resolver: Arc<IdentityResolver>,
    fetch: Arc<dyn DocumentFetch>,
    codec: Option<Arc<dyn DocumentCodec>>,
}

impl DocumentModel {
    pub fn new(
        resolver: Arc<IdentityResolver>,
        fetch: Arc<dyn DocumentFetch>,
        codec: Option<Arc<dyn DocumentCodec>>,
    ) -> Self {
        Self {
            resolver,
            fetch,
            codec,
        }
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn load(&self, path: &str) -> Result<LoadedDocument, StoreError> {
        let identity = self.resolver.resolve(path).await?;
        match self.fetch.fetch(&identity).await? {
            RawContent::Native(native) => {
                let nodes = native.normalize();
                debug!(elements = native.elements.len(), nodes = nodes.len(), "loaded native document");
                Ok(LoadedDocument {
                    identity,
                    path: path.to_string(),
                    nodes,
                    native: Some(native),
                })
            }
            RawContent::Bytes(bytes) => {
                let codec = self.codec.as_ref().ok_or_else(|| {
                    StoreError::InvalidArgument(
                        "no document codec configured for byte-oriented backend".to_string(),
                    )
                })?;
                let nodes = codec.decode(&bytes)?;
                debug!(bytes = bytes.len(), nodes = nodes.len(), "decoded document");
                Ok(LoadedDocument {
                    identity,
                    path: path.to_string(),
                    nodes,
                    native: None,
                })
            }
        }
    }
}

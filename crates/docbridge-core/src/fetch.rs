use async_trait::async_trait;

use crate::error::StoreError;
use crate::identity::FileIdentity;
use crate::native::NativeDocument;
use crate::node::Node;

/// Raw document content as retrieved from a backend.
#[derive(Debug, Clone)]
pub enum RawContent {
    /// Structured native form with integer offsets (offset-addressed backends).
    Native(NativeDocument),
    /// Opaque serialized bytes (reserialize backends).
    Bytes(Vec<u8>),
}

/// Document retrieval contract.
#[async_trait]
pub trait DocumentFetch: Send + Sync {
    async fn fetch(&self, identity: &FileIdentity) -> Result<RawContent, StoreError>;
}

/// Parser/serializer contract for byte-oriented backends.
///
/// How the bytes map to the node model is entirely the backend's concern;
/// the engine only requires that `decode` and `encode` agree with each other.
pub trait DocumentCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Node>, StoreError>;
    fn encode(&self, nodes: &[Node]) -> Result<Vec<u8>, StoreError>;
}

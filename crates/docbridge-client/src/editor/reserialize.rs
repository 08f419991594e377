use std::sync::Arc;

use async_trait::async_trait;
use docbridge_core::{CellMatrix, ContentUploader, DocumentCodec, Node, StoreError};
use tracing::{debug, info};

use crate::document::LoadedDocument;
use crate::editor::{EditStrategy, InsertTarget};
use crate::sections::section_spans;

/// Mutate-and-reserialize strategy: the edit is applied to a clone of the
/// normalized tree, and the whole document is re-encoded and uploaded as a
/// complete replacement. An edit that leaves the tree structurally unchanged
/// performs no write.
pub struct ReserializeEditor {
    codec: Arc<dyn DocumentCodec>,
    uploader: Arc<dyn ContentUploader>,
}

impl ReserializeEditor {
    pub fn new(codec: Arc<dyn DocumentCodec>, uploader: Arc<dyn ContentUploader>) -> Self {
        Self { codec, uploader }
    }

    async fn commit(&self, doc: &LoadedDocument, mutated: Vec<Node>) -> Result<(), StoreError> {
        if mutated == doc.nodes {
            debug!(path = %doc.path, "document unchanged, skipping upload");
            return Ok(());
        }
        let bytes = self.codec.encode(&mutated)?;
        info!(path = %doc.path, bytes = bytes.len(), "uploading reserialized document");
        self.uploader.upload(&doc.identity, bytes).await
    }
}

#[async_trait]
impl EditStrategy for ReserializeEditor {
    async fn insert_block(
        &self,
        doc: &LoadedDocument,
        target: InsertTarget,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        let at = insertion_index(&doc.nodes, target)?;
        let mut nodes = doc.nodes.clone();
        nodes.insert(at, Node::table_from_matrix(data));
        self.commit(doc, nodes).await
    }

    async fn update_block(
        &self,
        doc: &LoadedDocument,
        block_index: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        let mut nodes = doc.nodes.clone();
        let table = nodes
            .iter_mut()
            .filter(|node| node.is_table())
            .nth(block_index)
            .ok_or_else(|| StoreError::NotFound(format!("no block {block_index}")))?;
        if let Node::Table(rows) = table {
            let header = rows.first().cloned().ok_or_else(|| {
                StoreError::InvalidArgument(format!("block {block_index} has no header row"))
            })?;
            let mut replacement = vec![header];
            replacement.extend(data.iter().map(|row| Node::table_row(row)));
            *rows = replacement;
        }
        self.commit(doc, nodes).await
    }

    async fn remove_block(
        &self,
        doc: &LoadedDocument,
        block_index: usize,
    ) -> Result<(), StoreError> {
        let mut seen = 0usize;
        let mut nodes = doc.nodes.clone();
        nodes.retain(|node| {
            if node.is_table() {
                seen += 1;
                seen - 1 != block_index
            } else {
                true
            }
        });
        self.commit(doc, nodes).await
    }
}

/// Index into the top-level node sequence where an inserted block lands,
/// mirroring the offset strategy's anchor choice: after the addressed
/// position, at the end of the section for appends, right after the opening
/// break for an empty bounded section.
fn insertion_index(nodes: &[Node], target: InsertTarget) -> Result<usize, StoreError> {
    let spans = section_spans(nodes);
    match target {
        InsertTarget::AppendToSection(section) => {
            let span = spans
                .get(section)
                .ok_or_else(|| StoreError::NotFound(format!("no section {section}")))?;
            match span.last() {
                Some(&last) => Ok(last + 1),
                None if section == 0 => Ok(0),
                None => {
                    let opening_break = nodes
                        .iter()
                        .enumerate()
                        .filter(|(_, node)| matches!(node, Node::ThematicBreak))
                        .map(|(i, _)| i)
                        .nth(section - 1)
                        .ok_or_else(|| StoreError::NotFound(format!("no section {section}")))?;
                    Ok(opening_break + 1)
                }
            }
        }
        InsertTarget::AtPosition { section, position } => {
            let span = spans
                .get(section)
                .ok_or_else(|| StoreError::NotFound(format!("no section {section}")))?;
            span.get(position)
                .map(|&i| i + 1)
                .ok_or_else(|| {
                    StoreError::NotFound(format!("no position {position} in section {section}"))
                })
        }
    }
}

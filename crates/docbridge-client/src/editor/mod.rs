//! The structural-edit engine.
//!
//! `StructuralEditor` validates logical edits against a fresh normalized
//! snapshot and delegates the write to one of two interchangeable
//! strategies, chosen once at construction per backend:
//! - [`OffsetBatchEditor`] computes offset-addressed instructions and
//!   submits them as one atomic batch;
//! - [`ReserializeEditor`] mutates a clone of the node tree and uploads the
//!   re-serialized document, skipping the upload when nothing changed.

mod offset;
mod reserialize;

use std::sync::Arc;

use async_trait::async_trait;
use docbridge_core::{validate_matrix, CellMatrix, StoreError};
use tracing::instrument;

use crate::blocks::{named_block_positions, tables};
use crate::document::{DocumentModel, LoadedDocument};
use crate::sections::section_spans;

pub use offset::OffsetBatchEditor;
pub use reserialize::ReserializeEditor;

/// Where an inserted block lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTarget {
    /// After the last node of the section.
    AppendToSection(usize),
    /// Immediately after the node at `position` within `section`.
    AtPosition { section: usize, position: usize },
}

/// One backend-specific way of applying a structural edit. Preconditions
/// are already checked by `StructuralEditor`; implementations only translate
/// the logical edit into their write protocol.
#[async_trait]
pub trait EditStrategy: Send + Sync {
    async fn insert_block(
        &self,
        doc: &LoadedDocument,
        target: InsertTarget,
        data: &CellMatrix,
    ) -> Result<(), StoreError>;

    /// Replace all rows after the header row with `data`.
    async fn update_block(
        &self,
        doc: &LoadedDocument,
        block_index: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError>;

    async fn remove_block(
        &self,
        doc: &LoadedDocument,
        block_index: usize,
    ) -> Result<(), StoreError>;
}

/// Applies logical structural edits to path-addressed documents.
///
/// Each operation fetches a fresh snapshot, validates indices against the
/// normalized tree, and hands the edit to the configured strategy. A backend
/// failure is surfaced unmodified; callers re-fetch and retry.
pub struct StructuralEditor {
    model: Arc<DocumentModel>,
    strategy: Arc<dyn EditStrategy>,
}

impl StructuralEditor {
    pub fn new(model: Arc<DocumentModel>, strategy: Arc<dyn EditStrategy>) -> Self {
        Self { model, strategy }
    }

    #[instrument(skip(self, data), level = "debug")]
    pub async fn append_block(
        &self,
        path: &str,
        section: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        validate_matrix(data)?;
        let doc = self.model.load(path).await?;
        self.ensure_section(&doc, section)?;
        self.strategy
            .insert_block(&doc, InsertTarget::AppendToSection(section), data)
            .await
    }

    #[instrument(skip(self, data), level = "debug")]
    pub async fn insert_block_at(
        &self,
        path: &str,
        section: usize,
        position: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        validate_matrix(data)?;
        let doc = self.model.load(path).await?;
        let spans = section_spans(&doc.nodes);
        let span = spans
            .get(section)
            .ok_or_else(|| StoreError::NotFound(format!("no section {section}")))?;
        if position >= span.len() {
            return Err(StoreError::NotFound(format!(
                "no position {position} in section {section} ({} nodes)",
                span.len()
            )));
        }
        self.strategy
            .insert_block(&doc, InsertTarget::AtPosition { section, position }, data)
            .await
    }

    #[instrument(skip(self, data), level = "debug")]
    pub async fn update_block(
        &self,
        path: &str,
        block_index: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        validate_matrix(data)?;
        let doc = self.model.load(path).await?;
        self.ensure_block(&doc, block_index)?;
        self.strategy.update_block(&doc, block_index, data).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn remove_block(&self, path: &str, block_index: usize) -> Result<(), StoreError> {
        let doc = self.model.load(path).await?;
        self.ensure_block(&doc, block_index)?;
        self.strategy.remove_block(&doc, block_index).await
    }

    /// Rewrite the page-level `Metadata` block from key/value pairs.
    #[instrument(skip(self, entries), level = "debug")]
    pub async fn update_page_metadata(
        &self,
        path: &str,
        entries: &[(String, String)],
    ) -> Result<(), StoreError> {
        self.update_named_block(path, "Metadata", 0, entries).await
    }

    /// Rewrite the `Section Metadata` block of the given section, addressed
    /// by occurrence among blocks of that name.
    #[instrument(skip(self, entries), level = "debug")]
    pub async fn update_section_metadata(
        &self,
        path: &str,
        section_index: usize,
        entries: &[(String, String)],
    ) -> Result<(), StoreError> {
        self.update_named_block(path, "Section Metadata", section_index, entries)
            .await
    }

    async fn update_named_block(
        &self,
        path: &str,
        name: &str,
        occurrence: usize,
        entries: &[(String, String)],
    ) -> Result<(), StoreError> {
        let data: CellMatrix = entries
            .iter()
            .map(|(key, value)| vec![key.clone(), value.clone()])
            .collect();
        validate_matrix(&data)?;
        let doc = self.model.load(path).await?;
        let block_index = *named_block_positions(&doc.nodes, name)
            .get(occurrence)
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "no block named {name:?} (occurrence {occurrence}) in {path}"
                ))
            })?;
        self.strategy.update_block(&doc, block_index, &data).await
    }

    fn ensure_section(&self, doc: &LoadedDocument, section: usize) -> Result<(), StoreError> {
        let count = section_spans(&doc.nodes).len();
        if section >= count {
            return Err(StoreError::NotFound(format!(
                "no section {section} ({count} sections)"
            )));
        }
        Ok(())
    }

    fn ensure_block(&self, doc: &LoadedDocument, block_index: usize) -> Result<(), StoreError> {
        let count = tables(&doc.nodes).len();
        if block_index >= count {
            return Err(StoreError::NotFound(format!(
                "no block {block_index} ({count} blocks)"
            )));
        }
        Ok(())
    }
}

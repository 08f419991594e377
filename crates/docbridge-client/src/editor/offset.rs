use std::sync::Arc;

use async_trait::async_trait;
use docbridge_core::{
    BatchWriter, CellMatrix, EditInstruction, NativeBody, NativeDocument, NativeTable, StoreError,
};
use tracing::debug;

use crate::document::LoadedDocument;
use crate::editor::{EditStrategy, InsertTarget};

/// Offset-addressed strategy: every logical edit becomes one ordered
/// instruction batch, submitted atomically to the backend.
pub struct OffsetBatchEditor {
    writer: Arc<dyn BatchWriter>,
}

impl OffsetBatchEditor {
    pub fn new(writer: Arc<dyn BatchWriter>) -> Self {
        Self { writer }
    }

    fn native(doc: &LoadedDocument) -> Result<&NativeDocument, StoreError> {
        doc.native.as_ref().ok_or_else(|| {
            StoreError::InvalidArgument(
                "offset strategy requires a native document snapshot".to_string(),
            )
        })
    }

    async fn submit(
        &self,
        doc: &LoadedDocument,
        batch: Vec<EditInstruction>,
    ) -> Result<(), StoreError> {
        debug!(path = %doc.path, instructions = batch.len(), "submitting edit batch");
        self.writer.submit(&doc.identity, batch).await
    }
}

#[async_trait]
impl EditStrategy for OffsetBatchEditor {
    async fn insert_block(
        &self,
        doc: &LoadedDocument,
        target: InsertTarget,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        let native = Self::native(doc)?;
        let at = match target {
            InsertTarget::AppendToSection(section) => append_offset(native, section),
            InsertTarget::AtPosition { section, position } => {
                position_offset(native, section, position)?
            }
        };
        let mut batch = vec![EditInstruction::InsertTable {
            rows: data.len(),
            columns: data.first().map(Vec::len).unwrap_or(0),
            at,
        }];
        batch.extend(fill_instructions(at, data));
        self.submit(doc, batch).await
    }

    async fn update_block(
        &self,
        doc: &LoadedDocument,
        block_index: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        let native = Self::native(doc)?;
        let (table_start, table) = native_table(native, block_index)?;
        let header = table.rows.first().ok_or_else(|| {
            StoreError::InvalidArgument(format!("block {block_index} has no header row"))
        })?;

        let mut batch = Vec::new();
        // Delete existing body rows highest-first so earlier deletions do not
        // shift the indices of the remaining ones.
        for row_index in (1..table.rows.len()).rev() {
            batch.push(EditInstruction::DeleteTableRow {
                table_start,
                row_index,
            });
        }
        for _ in 0..data.len() {
            batch.push(EditInstruction::InsertTableRowBelow { table_start });
        }
        batch.extend(fill_instructions(header.end_offset, data));
        self.submit(doc, batch).await
    }

    async fn remove_block(
        &self,
        doc: &LoadedDocument,
        block_index: usize,
    ) -> Result<(), StoreError> {
        let native = Self::native(doc)?;
        let element = native
            .elements
            .iter()
            .filter(|el| matches!(el.body, NativeBody::Table(_)))
            .nth(block_index)
            .ok_or_else(|| StoreError::NotFound(format!("no native block {block_index}")))?;
        self.submit(
            doc,
            vec![EditInstruction::DeleteRange {
                start: element.start_offset,
                end: element.end_offset,
            }],
        )
        .await
    }
}

fn native_table(
    native: &NativeDocument,
    block_index: usize,
) -> Result<(usize, &NativeTable), StoreError> {
    native
        .elements
        .iter()
        .filter_map(|el| match &el.body {
            NativeBody::Table(table) => Some((el.start_offset, table)),
            _ => None,
        })
        .nth(block_index)
        .ok_or_else(|| StoreError::NotFound(format!("no native block {block_index}")))
}

/// Insertion offset for appending to a section: the end of its last
/// substantive element, or of its opening break when the section is empty,
/// or the document start for an empty leading section.
fn append_offset(native: &NativeDocument, section: usize) -> usize {
    let mut current = 0usize;
    let mut anchor = None;
    for el in &native.elements {
        if el.is_break() {
            if current == section {
                break;
            }
            current += 1;
            anchor = Some(el.end_offset);
        } else if current == section && el.is_substantive() {
            anchor = Some(el.end_offset);
        }
    }
    anchor.unwrap_or_else(|| native.body_start())
}

/// Insertion offset for a position within a section: the end of the
/// substantive element currently occupying that position. Replays the same
/// break-counting rule the section indexer uses, counting only elements
/// that contribute a normalized node.
fn position_offset(
    native: &NativeDocument,
    section: usize,
    position: usize,
) -> Result<usize, StoreError> {
    let mut current = 0usize;
    let mut pos = 0usize;
    for el in &native.elements {
        if el.is_break() {
            current += 1;
            pos = 0;
            continue;
        }
        if !el.is_substantive() {
            continue;
        }
        if current == section && pos == position {
            return Ok(el.end_offset);
        }
        pos += 1;
    }
    Err(StoreError::NotFound(format!(
        "no position {position} in section {section}"
    )))
}

/// Per-cell text fill for a table anchored at `base`.
///
/// Each cell reserves `len(text) + 1` slots and the first cell of every row
/// reserves one additional slot for the row boundary; each instruction's
/// offset accounts for the text inserted before it. Empty cells emit
/// nothing.
fn fill_instructions(base: usize, data: &CellMatrix) -> Vec<EditInstruction> {
    let mut out = Vec::new();
    let mut end = base + 2;
    for row in data {
        for (column, cell) in row.iter().enumerate() {
            if column == 0 {
                end += 1;
            }
            let start = end + 1;
            end = start + cell.chars().count() + 1;
            if !cell.is_empty() {
                out.push(EditInstruction::InsertText {
                    text: cell.clone(),
                    at: start,
                });
            }
        }
    }
    out
}

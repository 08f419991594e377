use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::identity::FileIdentity;

/// One offset-addressed edit instruction.
///
/// Offsets refer to the native snapshot the batch was computed against;
/// instructions within a batch account for the shifts introduced by the
/// instructions preceding them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditInstruction {
    InsertTable {
        rows: usize,
        columns: usize,
        at: usize,
    },
    InsertText {
        text: String,
        at: usize,
    },
    DeleteTableRow {
        table_start: usize,
        row_index: usize,
    },
    InsertTableRowBelow {
        table_start: usize,
    },
    DeleteRange {
        start: usize,
        end: usize,
    },
}

/// Offset-addressed write contract. The backend applies the ordered batch
/// atomically: all instructions succeed or none do.
#[async_trait]
pub trait BatchWriter: Send + Sync {
    async fn submit(
        &self,
        identity: &FileIdentity,
        batch: Vec<EditInstruction>,
    ) -> Result<(), StoreError>;
}

/// Whole-document write contract: upload bytes as a complete content
/// replacement.
#[async_trait]
pub trait ContentUploader: Send + Sync {
    async fn upload(&self, identity: &FileIdentity, content: Vec<u8>) -> Result<(), StoreError>;
}

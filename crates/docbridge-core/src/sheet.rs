use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::identity::FileIdentity;

/// Axis of a structural sheet edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Rows,
    Columns,
}

/// Spreadsheet range I/O contract.
///
/// Ranges are A1-style addresses, optionally sheet-qualified
/// (`Sheet1!A2:C4`). Structural positions are 1-based, matching A1 row and
/// column numbering.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Read a rectangular cell range. Trailing empty rows/cells may be
    /// omitted by the backend.
    async fn get_range(
        &self,
        workbook: &FileIdentity,
        range: &str,
    ) -> Result<Vec<Vec<String>>, StoreError>;

    /// Write values into a rectangular cell range.
    async fn set_range(
        &self,
        workbook: &FileIdentity,
        range: &str,
        values: &[Vec<String>],
    ) -> Result<(), StoreError>;

    /// Insert one empty row/column at 1-based position `at`, shifting
    /// existing content away from the sheet origin.
    async fn insert_dimension(
        &self,
        workbook: &FileIdentity,
        sheet: &str,
        dimension: Dimension,
        at: usize,
    ) -> Result<(), StoreError>;

    /// Delete the row/column at 1-based position `at`, shifting the
    /// remainder toward the sheet origin.
    async fn delete_dimension(
        &self,
        workbook: &FileIdentity,
        sheet: &str,
        dimension: Dimension,
        at: usize,
    ) -> Result<(), StoreError>;
}

use std::sync::Arc;

use docbridge_core::{Dimension, FileIdentity, SheetBackend, StoreError};
use tracing::{debug, instrument};

use crate::resolver::IdentityResolver;
use crate::rows::{find_row, find_rows, RowMatch};

/// Header probe range used to find the first free column when appending.
const HEADER_PROBE_RANGE: &str = "A1:ZZ1";

/// 1-based column index to bijective base-26 letters: 1 → `A`, 26 → `Z`,
/// 27 → `AA`, 52 → `AZ`, 703 → `AAA`. There is no zero digit, so `index`
/// must be at least 1.
pub fn column_letter(index: usize) -> String {
    debug_assert!(index > 0, "column indices are 1-based");
    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// A1-style rectangular range address, sheet-qualified. Rows and columns are
/// 1-based.
pub fn range_notation(
    sheet: &str,
    start_col: usize,
    start_row: usize,
    end_col: usize,
    end_row: usize,
) -> String {
    format!(
        "{sheet}!{}{start_row}:{}{end_row}",
        column_letter(start_col),
        column_letter(end_col)
    )
}

/// Path-addressed spreadsheet operations over the range I/O contract.
///
/// Structural inserts are compound: a "make room" shift instruction followed
/// by a separate "set values" write, never a single combined primitive. The
/// pair is not atomic; a failure between the two steps leaves an empty
/// inserted row or column, and callers must verify and retry.
pub struct SheetOps {
    resolver: Arc<IdentityResolver>,
    backend: Arc<dyn SheetBackend>,
}

impl SheetOps {
    pub fn new(resolver: Arc<IdentityResolver>, backend: Arc<dyn SheetBackend>) -> Self {
        Self { resolver, backend }
    }

    /// Read a cell range; `None` reads the whole sheet.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_cell_range(
        &self,
        workbook: &str,
        sheet: &str,
        range: Option<&str>,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        let id = self.resolver.resolve(workbook).await?;
        let address = match range {
            Some(range) => format!("{sheet}!{range}"),
            None => sheet.to_string(),
        };
        self.backend.get_range(&id, &address).await
    }

    /// Overwrite the 1-based row `row` starting at column A.
    #[instrument(skip(self, values), level = "debug")]
    pub async fn update_row_at(
        &self,
        workbook: &str,
        sheet: &str,
        row: usize,
        values: &[String],
    ) -> Result<(), StoreError> {
        ensure_position(row, "row")?;
        ensure_values(values)?;
        let id = self.resolver.resolve(workbook).await?;
        let range = range_notation(sheet, 1, row, values.len(), row);
        self.backend.set_range(&id, &range, &[values.to_vec()]).await
    }

    /// Write values into the first row past the sheet's current extent.
    #[instrument(skip(self, values), level = "debug")]
    pub async fn append_row(
        &self,
        workbook: &str,
        sheet: &str,
        values: &[String],
    ) -> Result<(), StoreError> {
        ensure_values(values)?;
        let rows = self.get_cell_range(workbook, sheet, None).await?;
        let next = rows.len() + 1;
        debug!(next, "appending row");
        self.update_row_at(workbook, sheet, next, values).await
    }

    /// Shift rows down at `row`, then fill the newly opened row. Two backend
    /// calls; not atomic.
    #[instrument(skip(self, values), level = "debug")]
    pub async fn insert_row_at(
        &self,
        workbook: &str,
        sheet: &str,
        row: usize,
        values: &[String],
    ) -> Result<(), StoreError> {
        ensure_position(row, "row")?;
        ensure_values(values)?;
        let id = self.resolver.resolve(workbook).await?;
        self.backend
            .insert_dimension(&id, sheet, Dimension::Rows, row)
            .await?;
        self.update_row_at(workbook, sheet, row, values).await
    }

    /// Overwrite the 1-based column `column` starting at row 1.
    #[instrument(skip(self, values), level = "debug")]
    pub async fn update_column_at(
        &self,
        workbook: &str,
        sheet: &str,
        column: usize,
        values: &[String],
    ) -> Result<(), StoreError> {
        ensure_position(column, "column")?;
        ensure_values(values)?;
        let id = self.resolver.resolve(workbook).await?;
        let range = range_notation(sheet, column, 1, column, values.len());
        let cells: Vec<Vec<String>> = values.iter().map(|v| vec![v.clone()]).collect();
        self.backend.set_range(&id, &range, &cells).await
    }

    /// Write values into the first column past the header row's extent.
    #[instrument(skip(self, values), level = "debug")]
    pub async fn append_column(
        &self,
        workbook: &str,
        sheet: &str,
        values: &[String],
    ) -> Result<(), StoreError> {
        ensure_values(values)?;
        let header = self
            .get_cell_range(workbook, sheet, Some(HEADER_PROBE_RANGE))
            .await?;
        let next = header.first().map(Vec::len).unwrap_or(0) + 1;
        debug!(next, "appending column");
        self.update_column_at(workbook, sheet, next, values).await
    }

    /// Shift columns right at `column`, then fill the newly opened column.
    /// Two backend calls; not atomic.
    #[instrument(skip(self, values), level = "debug")]
    pub async fn insert_column_at(
        &self,
        workbook: &str,
        sheet: &str,
        column: usize,
        values: &[String],
    ) -> Result<(), StoreError> {
        ensure_position(column, "column")?;
        ensure_values(values)?;
        let id = self.resolver.resolve(workbook).await?;
        self.backend
            .insert_dimension(&id, sheet, Dimension::Columns, column)
            .await?;
        self.update_column_at(workbook, sheet, column, values).await
    }

    /// Delete the 1-based row `row`, shifting the remainder up.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_row(
        &self,
        workbook: &str,
        sheet: &str,
        row: usize,
    ) -> Result<(), StoreError> {
        ensure_position(row, "row")?;
        let id = self.resolver.resolve(workbook).await?;
        self.backend
            .delete_dimension(&id, sheet, Dimension::Rows, row)
            .await
    }

    /// First row of the sheet satisfying the predicate; sentinel index -1
    /// when none match.
    pub async fn find_row<F>(
        &self,
        workbook: &str,
        sheet: &str,
        predicate: F,
    ) -> Result<RowMatch, StoreError>
    where
        F: Fn(&[String]) -> bool,
    {
        let values = self.get_cell_range(workbook, sheet, None).await?;
        Ok(find_row(&values, predicate))
    }

    /// All rows of the sheet satisfying the predicate, tagged with their
    /// original indices.
    pub async fn find_rows<F>(
        &self,
        workbook: &str,
        sheet: &str,
        predicate: F,
    ) -> Result<Vec<RowMatch>, StoreError>
    where
        F: Fn(&[String]) -> bool,
    {
        let values = self.get_cell_range(workbook, sheet, None).await?;
        Ok(find_rows(&values, predicate))
    }

    /// Resolve the workbook path without touching the sheet, for callers
    /// composing their own ranges.
    pub async fn workbook_identity(&self, workbook: &str) -> Result<FileIdentity, StoreError> {
        self.resolver.resolve(workbook).await
    }
}

fn ensure_position(at: usize, what: &str) -> Result<(), StoreError> {
    if at == 0 {
        return Err(StoreError::InvalidArgument(format!(
            "{what} positions are 1-based"
        )));
    }
    Ok(())
}

fn ensure_values(values: &[String]) -> Result<(), StoreError> {
    if values.is_empty() {
        return Err(StoreError::InvalidArgument(
            "values must not be empty".to_string(),
        ));
    }
    Ok(())
}

use std::sync::Arc;

use docbridge_core::{
    BatchWriter, CellMatrix, ContentUploader, DocumentCodec, DocumentFetch, FileBackend,
    FileIdentity, FileInfo, IdentityBackend, Node, SheetBackend, StoreError,
};
use tracing::instrument;

use crate::blocks::{self, Metadata};
use crate::document::DocumentModel;
use crate::editor::{OffsetBatchEditor, ReserializeEditor, StructuralEditor};
use crate::resolver::IdentityResolver;
use crate::rows::RowMatch;
use crate::sections::sections;
use crate::sheets::SheetOps;

/// Path-addressed client over one backend wiring.
///
/// The edit strategy is fixed at construction: [`DocBridge::offset_addressed`]
/// for backends with a position-addressed batch protocol,
/// [`DocBridge::reserializing`] for backends that only replace whole
/// documents. Both expose the same operation set with the same observable
/// behavior.
pub struct DocBridge {
    resolver: Arc<IdentityResolver>,
    model: Arc<DocumentModel>,
    editor: StructuralEditor,
    sheets: SheetOps,
    files: Arc<dyn FileBackend>,
}

impl DocBridge {
    /// Wire a backend whose documents are edited through offset-addressed
    /// instruction batches.
    pub fn offset_addressed(
        root: FileIdentity,
        identity: Arc<dyn IdentityBackend>,
        files: Arc<dyn FileBackend>,
        fetch: Arc<dyn DocumentFetch>,
        writer: Arc<dyn BatchWriter>,
        sheets: Arc<dyn SheetBackend>,
    ) -> Self {
        let resolver = Arc::new(IdentityResolver::new(identity, root));
        let model = Arc::new(DocumentModel::new(resolver.clone(), fetch, None));
        let editor =
            StructuralEditor::new(model.clone(), Arc::new(OffsetBatchEditor::new(writer)));
        Self {
            sheets: SheetOps::new(resolver.clone(), sheets),
            resolver,
            model,
            editor,
            files,
        }
    }

    /// Wire a backend whose documents are edited by re-serializing the whole
    /// tree and uploading it as a complete replacement.
    pub fn reserializing(
        root: FileIdentity,
        identity: Arc<dyn IdentityBackend>,
        files: Arc<dyn FileBackend>,
        fetch: Arc<dyn DocumentFetch>,
        codec: Arc<dyn DocumentCodec>,
        uploader: Arc<dyn ContentUploader>,
        sheets: Arc<dyn SheetBackend>,
    ) -> Self {
        let resolver = Arc::new(IdentityResolver::new(identity, root));
        let model = Arc::new(DocumentModel::new(
            resolver.clone(),
            fetch,
            Some(codec.clone()),
        ));
        let editor = StructuralEditor::new(
            model.clone(),
            Arc::new(ReserializeEditor::new(codec, uploader)),
        );
        Self {
            sheets: SheetOps::new(resolver.clone(), sheets),
            resolver,
            model,
            editor,
            files,
        }
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    pub fn sheets(&self) -> &SheetOps {
        &self.sheets
    }

    /* Document reads */

    /// Normalized top-level node sequence of the document at `path`.
    pub async fn get_document(&self, path: &str) -> Result<Vec<Node>, StoreError> {
        Ok(self.model.load(path).await?.nodes)
    }

    /// All sections of the document, in order.
    pub async fn get_sections(&self, path: &str) -> Result<Vec<Vec<Node>>, StoreError> {
        let doc = self.model.load(path).await?;
        Ok(sections(&doc.nodes)
            .into_iter()
            .map(|section| section.nodes.into_iter().cloned().collect())
            .collect())
    }

    /// Nodes of section `index`, or `NotFound` when out of range.
    pub async fn get_section(&self, path: &str, index: usize) -> Result<Vec<Node>, StoreError> {
        let mut all = self.get_sections(path).await?;
        if index >= all.len() {
            return Err(StoreError::NotFound(format!(
                "no section {index} ({} sections)",
                all.len()
            )));
        }
        Ok(all.swap_remove(index))
    }

    /// First block named `name` (case-insensitive header match), if any.
    pub async fn get_block(&self, path: &str, name: &str) -> Result<Option<Node>, StoreError> {
        let doc = self.model.load(path).await?;
        Ok(blocks::find_block(&doc.nodes, name).cloned())
    }

    /// All blocks named `name`, document order.
    pub async fn get_blocks(&self, path: &str, name: &str) -> Result<Vec<Node>, StoreError> {
        let doc = self.model.load(path).await?;
        Ok(blocks::find_blocks(&doc.nodes, name)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Key/value pairs of the page-level `Metadata` block.
    pub async fn get_page_metadata(&self, path: &str) -> Result<Metadata, StoreError> {
        let doc = self.model.load(path).await?;
        let block = blocks::find_block(&doc.nodes, "Metadata")
            .ok_or_else(|| StoreError::NotFound(format!("no Metadata block in {path}")))?;
        Ok(blocks::block_metadata(block))
    }

    /// Key/value pairs of the `section_index`-th `Section Metadata` block.
    pub async fn get_section_metadata(
        &self,
        path: &str,
        section_index: usize,
    ) -> Result<Metadata, StoreError> {
        let doc = self.model.load(path).await?;
        let found = blocks::find_blocks(&doc.nodes, "Section Metadata");
        let block = found.get(section_index).ok_or_else(|| {
            StoreError::NotFound(format!(
                "no Section Metadata block {section_index} in {path}"
            ))
        })?;
        Ok(blocks::block_metadata(block))
    }

    /* Document writes */

    pub async fn append_block(
        &self,
        path: &str,
        section: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        self.editor.append_block(path, section, data).await
    }

    pub async fn insert_block_at(
        &self,
        path: &str,
        section: usize,
        position: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        self.editor
            .insert_block_at(path, section, position, data)
            .await
    }

    pub async fn update_block(
        &self,
        path: &str,
        block_index: usize,
        data: &CellMatrix,
    ) -> Result<(), StoreError> {
        self.editor.update_block(path, block_index, data).await
    }

    pub async fn remove_block(&self, path: &str, block_index: usize) -> Result<(), StoreError> {
        self.editor.remove_block(path, block_index).await
    }

    pub async fn update_page_metadata(
        &self,
        path: &str,
        entries: &[(String, String)],
    ) -> Result<(), StoreError> {
        self.editor.update_page_metadata(path, entries).await
    }

    pub async fn update_section_metadata(
        &self,
        path: &str,
        section_index: usize,
        entries: &[(String, String)],
    ) -> Result<(), StoreError> {
        self.editor
            .update_section_metadata(path, section_index, entries)
            .await
    }

    /* Spreadsheet operations */

    pub async fn get_cell_range_in_sheet(
        &self,
        workbook: &str,
        sheet: &str,
        range: Option<&str>,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        self.sheets.get_cell_range(workbook, sheet, range).await
    }

    pub async fn append_row_to_sheet(
        &self,
        workbook: &str,
        sheet: &str,
        values: &[String],
    ) -> Result<(), StoreError> {
        self.sheets.append_row(workbook, sheet, values).await
    }

    pub async fn insert_row_into_sheet_at(
        &self,
        workbook: &str,
        sheet: &str,
        row: usize,
        values: &[String],
    ) -> Result<(), StoreError> {
        self.sheets.insert_row_at(workbook, sheet, row, values).await
    }

    pub async fn update_sheet_row_at(
        &self,
        workbook: &str,
        sheet: &str,
        row: usize,
        values: &[String],
    ) -> Result<(), StoreError> {
        self.sheets.update_row_at(workbook, sheet, row, values).await
    }

    pub async fn append_column_to_sheet(
        &self,
        workbook: &str,
        sheet: &str,
        values: &[String],
    ) -> Result<(), StoreError> {
        self.sheets.append_column(workbook, sheet, values).await
    }

    pub async fn insert_column_into_sheet_at(
        &self,
        workbook: &str,
        sheet: &str,
        column: usize,
        values: &[String],
    ) -> Result<(), StoreError> {
        self.sheets
            .insert_column_at(workbook, sheet, column, values)
            .await
    }

    pub async fn update_sheet_column_at(
        &self,
        workbook: &str,
        sheet: &str,
        column: usize,
        values: &[String],
    ) -> Result<(), StoreError> {
        self.sheets
            .update_column_at(workbook, sheet, column, values)
            .await
    }

    pub async fn delete_row_from_sheet(
        &self,
        workbook: &str,
        sheet: &str,
        row: usize,
    ) -> Result<(), StoreError> {
        self.sheets.delete_row(workbook, sheet, row).await
    }

    pub async fn find_row_in_sheet<F>(
        &self,
        workbook: &str,
        sheet: &str,
        predicate: F,
    ) -> Result<RowMatch, StoreError>
    where
        F: Fn(&[String]) -> bool,
    {
        self.sheets.find_row(workbook, sheet, predicate).await
    }

    pub async fn find_rows_in_sheet<F>(
        &self,
        workbook: &str,
        sheet: &str,
        predicate: F,
    ) -> Result<Vec<RowMatch>, StoreError>
    where
        F: Fn(&[String]) -> bool,
    {
        self.sheets.find_rows(workbook, sheet, predicate).await
    }

    /* File operations */

    #[instrument(skip(self), level = "debug")]
    pub async fn get_file(&self, path: &str) -> Result<FileInfo, StoreError> {
        let id = self.resolver.resolve(path).await?;
        self.files.file_info(&id).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_files(
        &self,
        folder: &str,
    ) -> Result<Vec<FileInfo>, StoreError> {
        let id = self.resolver.resolve(folder).await?;
        self.files.list_children(&id).await
    }

    /// Copy a file. The destination's last segment is the new name; a
    /// trailing slash keeps the source name.
    #[instrument(skip(self), level = "debug")]
    pub async fn copy_file(
        &self,
        path: &str,
        destination: &str,
    ) -> Result<FileIdentity, StoreError> {
        let source = self.resolver.resolve(path).await?;
        let (parent_path, name) = parse_destination(destination)?;
        let name = name.unwrap_or_else(|| leaf_name(path).to_string());
        let parent = self.resolver.resolve(&parent_path).await?;
        self.files.copy(&source, &parent, &name).await
    }

    /// Move and/or rename a file; destination semantics as in [`Self::copy_file`].
    #[instrument(skip(self), level = "debug")]
    pub async fn move_file(&self, path: &str, destination: &str) -> Result<(), StoreError> {
        let source = self.resolver.resolve(path).await?;
        let (parent_path, name) = parse_destination(destination)?;
        let name = name.unwrap_or_else(|| leaf_name(path).to_string());
        let parent = self.resolver.resolve(&parent_path).await?;
        self.files.rename_move(&source, &parent, &name).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn delete_file(&self, path: &str) -> Result<(), StoreError> {
        let id = self.resolver.resolve(path).await?;
        self.files.delete(&id).await
    }
}

fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a destination into parent path and optional new name.
/// `/a/b/name` → (`/a/b`, Some(`name`)); `/a/b/` → (`/a/b`, None);
/// `/name` → (`/`, Some(`name`)); `/` → (`/`, None).
fn parse_destination(destination: &str) -> Result<(String, Option<String>), StoreError> {
    if !destination.starts_with('/') {
        return Err(StoreError::InvalidArgument(format!(
            "destination must be rooted: {destination}"
        )));
    }
    if destination == "/" {
        return Ok(("/".to_string(), None));
    }
    let trimmed = destination.strip_suffix('/').unwrap_or(destination);
    let keep_name = trimmed.len() != destination.len();
    let (parent, name) = match trimmed.rfind('/') {
        Some(0) => ("/", &trimmed[1..]),
        Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
        None => {
            return Err(StoreError::InvalidArgument(format!(
                "malformed destination: {destination}"
            )))
        }
    };
    if name.is_empty() {
        return Err(StoreError::InvalidArgument(format!(
            "malformed destination: {destination}"
        )));
    }
    if keep_name {
        Ok((format!("{parent}/{name}").replace("//", "/"), None))
    } else {
        Ok((parent.to_string(), Some(name.to_string())))
    }
}

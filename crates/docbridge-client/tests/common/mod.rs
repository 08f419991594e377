//! In-memory backend fakes implementing the docbridge-core contracts,
//! with call counters for asserting backend traffic.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use docbridge_core::{
    BatchWriter, ContentUploader, Dimension, DocumentCodec, DocumentFetch, EditInstruction,
    FileBackend, FileIdentity, FileInfo, IdentityBackend, NativeBody, NativeDocument,
    NativeElement, NativeTable, NativeTableCell, NativeTableRow, Node, ObjectRef, RawContent,
    SheetBackend, StoreError,
};

pub const ROOT_ID: &str = "drive-root";

pub fn root() -> FileIdentity {
    FileIdentity::new(ROOT_ID)
}

#[derive(Debug, Clone)]
pub struct FakeObject {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub folder: bool,
}

impl FakeObject {
    pub fn new(id: &str, name: &str, parent: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            parent: Some(parent.to_string()),
            folder: false,
        }
    }

    pub fn folder(id: &str, name: &str, parent: &str) -> Self {
        Self {
            folder: true,
            ..Self::new(id, name, parent)
        }
    }
}

/// Flat object store doubling as identity listing and file operations
/// backend.
#[derive(Default)]
pub struct FakeDrive {
    objects: Mutex<Vec<FakeObject>>,
    pub list_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
}

impl FakeDrive {
    pub fn with_objects(objects: Vec<FakeObject>) -> Arc<Self> {
        Arc::new(Self {
            objects: Mutex::new(objects),
            ..Self::default()
        })
    }

    pub fn backend_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.get_calls.load(Ordering::SeqCst)
    }

    pub fn names(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.name.clone())
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<FakeObject> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    fn to_ref(object: &FakeObject) -> ObjectRef {
        ObjectRef {
            identity: FileIdentity::new(object.id.clone()),
            name: object.name.clone(),
            parent: object.parent.clone().map(FileIdentity::new),
        }
    }

    fn to_info(object: &FakeObject) -> FileInfo {
        FileInfo {
            identity: FileIdentity::new(object.id.clone()),
            name: object.name.clone(),
            is_folder: object.folder,
            size_bytes: 0,
            modified_at: Utc::now(),
            mime_type: None,
        }
    }
}

#[async_trait]
impl IdentityBackend for FakeDrive {
    async fn list_by_name(&self, name: &str) -> Result<Vec<ObjectRef>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.name == name)
            .map(Self::to_ref)
            .collect())
    }

    async fn get_object(&self, identity: &FileIdentity) -> Result<Option<ObjectRef>, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == identity.as_str())
            .map(Self::to_ref))
    }
}

#[async_trait]
impl FileBackend for FakeDrive {
    async fn file_info(&self, identity: &FileIdentity) -> Result<FileInfo, StoreError> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == identity.as_str())
            .map(Self::to_info)
            .ok_or_else(|| StoreError::NotFound(format!("no object {identity}")))
    }

    async fn list_children(&self, folder: &FileIdentity) -> Result<Vec<FileInfo>, StoreError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.parent.as_deref() == Some(folder.as_str()))
            .map(Self::to_info)
            .collect())
    }

    async fn copy(
        &self,
        source: &FileIdentity,
        parent: &FileIdentity,
        name: &str,
    ) -> Result<FileIdentity, StoreError> {
        let mut objects = self.objects.lock().unwrap();
        let original = objects
            .iter()
            .find(|o| o.id == source.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("no object {source}")))?;
        let copy_id = format!("{}-copy", original.id);
        objects.push(FakeObject {
            id: copy_id.clone(),
            name: name.to_string(),
            parent: Some(parent.as_str().to_string()),
            folder: original.folder,
        });
        Ok(FileIdentity::new(copy_id))
    }

    async fn rename_move(
        &self,
        source: &FileIdentity,
        parent: &FileIdentity,
        name: &str,
    ) -> Result<(), StoreError> {
        let mut objects = self.objects.lock().unwrap();
        let object = objects
            .iter_mut()
            .find(|o| o.id == source.as_str())
            .ok_or_else(|| StoreError::NotFound(format!("no object {source}")))?;
        object.parent = Some(parent.as_str().to_string());
        object.name = name.to_string();
        Ok(())
    }

    async fn delete(&self, identity: &FileIdentity) -> Result<(), StoreError> {
        let mut objects = self.objects.lock().unwrap();
        let before = objects.len();
        objects.retain(|o| o.id != identity.as_str());
        if objects.len() == before {
            return Err(StoreError::NotFound(format!("no object {identity}")));
        }
        Ok(())
    }
}

/// Serves a fixed native snapshot.
pub struct NativeFetch {
    pub native: NativeDocument,
}

#[async_trait]
impl DocumentFetch for NativeFetch {
    async fn fetch(&self, _identity: &FileIdentity) -> Result<RawContent, StoreError> {
        Ok(RawContent::Native(self.native.clone()))
    }
}

/// Byte-oriented store: fetches serve the current bytes, uploads replace
/// them, so successive operations observe each other's writes.
pub struct ByteStore {
    bytes: Mutex<Vec<u8>>,
    pub uploads: AtomicUsize,
}

impl ByteStore {
    pub fn seeded(nodes: &[Node]) -> Arc<Self> {
        Arc::new(Self {
            bytes: Mutex::new(serde_json::to_vec(nodes).unwrap()),
            uploads: AtomicUsize::new(0),
        })
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentFetch for ByteStore {
    async fn fetch(&self, _identity: &FileIdentity) -> Result<RawContent, StoreError> {
        Ok(RawContent::Bytes(self.bytes.lock().unwrap().clone()))
    }
}

#[async_trait]
impl ContentUploader for ByteStore {
    async fn upload(&self, _identity: &FileIdentity, content: Vec<u8>) -> Result<(), StoreError> {
        *self.bytes.lock().unwrap() = content;
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// JSON node-tree codec standing in for a real backend serializer.
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Node>, StoreError> {
        serde_json::from_slice(bytes).map_err(StoreError::backend)
    }

    fn encode(&self, nodes: &[Node]) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(nodes).map_err(StoreError::backend)
    }
}

/// Records submitted instruction batches.
#[derive(Default)]
pub struct RecordingWriter {
    pub batches: Mutex<Vec<Vec<EditInstruction>>>,
}

impl RecordingWriter {
    pub fn batches(&self) -> Vec<Vec<EditInstruction>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchWriter for RecordingWriter {
    async fn submit(
        &self,
        _identity: &FileIdentity,
        batch: Vec<EditInstruction>,
    ) -> Result<(), StoreError> {
        self.batches.lock().unwrap().push(batch);
        Ok(())
    }
}

/// Recorded sheet backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCall {
    Get(String),
    Set(String, Vec<Vec<String>>),
    Insert(Dimension, usize),
    Delete(Dimension, usize),
}

/// Sheet backend that serves a canned grid and records every call.
#[derive(Default)]
pub struct FakeSheet {
    pub grid: Vec<Vec<String>>,
    pub calls: Mutex<Vec<SheetCall>>,
}

impl FakeSheet {
    pub fn with_grid(grid: Vec<Vec<String>>) -> Arc<Self> {
        Arc::new(Self {
            grid,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetBackend for FakeSheet {
    async fn get_range(
        &self,
        _workbook: &FileIdentity,
        range: &str,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(SheetCall::Get(range.to_string()));
        Ok(self.grid.clone())
    }

    async fn set_range(
        &self,
        _workbook: &FileIdentity,
        range: &str,
        values: &[Vec<String>],
    ) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(SheetCall::Set(range.to_string(), values.to_vec()));
        Ok(())
    }

    async fn insert_dimension(
        &self,
        _workbook: &FileIdentity,
        _sheet: &str,
        dimension: Dimension,
        at: usize,
    ) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(SheetCall::Insert(dimension, at));
        Ok(())
    }

    async fn delete_dimension(
        &self,
        _workbook: &FileIdentity,
        _sheet: &str,
        dimension: Dimension,
        at: usize,
    ) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(SheetCall::Delete(dimension, at));
        Ok(())
    }
}

/* Native document builders */

pub fn native_para(start: usize, end: usize, text: &str) -> NativeElement {
    NativeElement {
        start_offset: start,
        end_offset: end,
        body: NativeBody::Paragraph {
            text: text.to_string(),
        },
    }
}

pub fn native_cell(start: usize, end: usize, text: &str) -> NativeTableCell {
    NativeTableCell {
        start_offset: start,
        end_offset: end,
        text: text.to_string(),
    }
}

pub fn native_row(start: usize, end: usize, cells: Vec<NativeTableCell>) -> NativeTableRow {
    NativeTableRow {
        start_offset: start,
        end_offset: end,
        cells,
    }
}

pub fn native_table(start: usize, end: usize, rows: Vec<NativeTableRow>) -> NativeElement {
    NativeElement {
        start_offset: start,
        end_offset: end,
        body: NativeBody::Table(NativeTable { rows }),
    }
}

/// `[Break, Paragraph A, Table(Cards: one), Break, Paragraph B]` with
/// plausible offsets.
pub fn native_sample() -> NativeDocument {
    NativeDocument {
        elements: vec![
            native_para(1, 5, "---\n"),
            native_para(5, 10, "A\n"),
            native_table(
                10,
                30,
                vec![
                    native_row(11, 18, vec![native_cell(12, 17, "Cards\n")]),
                    native_row(18, 29, vec![native_cell(19, 28, "one\n")]),
                ],
            ),
            native_para(30, 34, "---\n"),
            native_para(34, 40, "B\n"),
        ],
    }
}

/* Node tree builders */

pub fn para(text: &str) -> Node {
    Node::Paragraph(vec![Node::Text(text.to_string())])
}

pub fn table(rows: &[&[&str]]) -> Node {
    Node::table_from_matrix(&matrix(rows))
}

pub fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

pub fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

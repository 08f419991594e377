//! Core types and backend contracts for docbridge.
//!
//! This crate defines the abstractions shared between the engine and the
//! storage backend implementations:
//! - `Node`: the normalized document content model
//! - `NativeDocument`: the offset-addressed native form kept for batch edits
//! - `IdentityBackend` / `FileBackend`: object listing and file operations
//! - `DocumentFetch` / `DocumentCodec`: content retrieval and (de)serialization
//! - `BatchWriter` / `ContentUploader`: the two native write protocols
//! - `SheetBackend`: rectangular range I/O and structural row/column edits

mod error;
mod fetch;
mod identity;
mod native;
mod node;
mod sheet;
mod write;

pub use error::StoreError;
pub use fetch::{DocumentCodec, DocumentFetch, RawContent};
pub use identity::{FileBackend, FileIdentity, FileInfo, IdentityBackend, ObjectRef};
pub use native::{
    NativeBody, NativeDocument, NativeElement, NativeTable, NativeTableCell, NativeTableRow,
};
pub use node::{validate_matrix, CellMatrix, Node};
pub use sheet::{Dimension, SheetBackend};
pub use write::{BatchWriter, ContentUploader, EditInstruction};

//! Path-addressed document, spreadsheet, and file operations backed
//! interchangeably by unrelated cloud storage backends.
//!
//! The engine resolves hierarchical virtual paths to backend-opaque
//! identities with caching, normalizes backend-native documents into a
//! common section/block model, and translates logical structural edits into
//! each backend's native write protocol, either an offset-addressed
//! instruction batch or a whole-document re-serialization. Both strategies
//! produce the same observable edit at the same logical position.
//!
//! Entry point is [`DocBridge`], constructed once per backend wiring via
//! [`DocBridge::offset_addressed`] or [`DocBridge::reserializing`].

mod blocks;
mod client;
mod document;
mod editor;
mod resolver;
mod rows;
mod sections;
mod sheets;

pub use blocks::{block_metadata, find_block, find_blocks, header_text, Metadata};
pub use client::DocBridge;
pub use document::{DocumentModel, LoadedDocument};
pub use editor::{EditStrategy, InsertTarget, OffsetBatchEditor, ReserializeEditor, StructuralEditor};
pub use resolver::IdentityResolver;
pub use rows::{find_row, find_rows, RowMatch, NO_MATCH};
pub use sections::{sections, Section};
pub use sheets::{column_letter, range_notation, SheetOps};

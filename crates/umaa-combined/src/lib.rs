// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # UMAA Combined-Object Runtime
//!
//! A runtime for UMAA-style combined objects over DDS: large composite
//! reports are published as independent topic fragments (base object,
//! specialization overlays, collection elements), and this crate assembles
//! them back into one navigable object on the read side and splits an
//! incrementally built composite into fragments on the write side.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use umaa_combined::{Path, UmaaWriterAdapter, Value};
//! # fn tree() -> std::sync::Arc<dyn umaa_combined::TopLevelWriter> { unimplemented!() }
//!
//! fn main() -> umaa_combined::Result<()> {
//!     let adapter = UmaaWriterAdapter::new(tree());
//!
//!     // Builder pre-wired with the schema's collections.
//!     let mut report = adapter.new_combined(None, None, true)?;
//!     report.set("speed", Value::F64(3.2))?;
//!
//!     let mut contacts = adapter.editor_for_set(&mut report, &Path::root(), "contacts");
//!     let mut contact = contacts.add_new(None)?;
//!     contact.set("range", Value::F64(120.0))?;
//!     drop(contact);
//!
//!     adapter.write(&report)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        Application Layer                            |
//! |   OverlayView / ElementView (read)  |  EditHandle / Editors (write) |
//! +---------------------------------------------------------------------+
//! |                         Object Model                                |
//! |   CombinedSample | CombinedBuilder | Path | Collection | Value      |
//! +---------------------------------------------------------------------+
//! |                        Adapter Layer                                |
//! |   UmaaReaderAdapter (buffer, dedup) | UmaaWriterAdapter (split)     |
//! +---------------------------------------------------------------------+
//! |                     Transport Seams (traits)                        |
//! |   RawReader / RawWriter | AssemblyNode | TopLevelWriter             |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CombinedSample`] | Immutable assembled snapshot (base + overlays + collections) |
//! | [`OverlayView`] | Read-side navigation with overlay-over-base precedence |
//! | [`CombinedBuilder`] | Mutable write-side dual, fragment source for publication |
//! | [`UmaaReaderAdapter`] | Buffers assembled samples, dedups reads by instance key |
//! | [`UmaaWriterAdapter`] | Presents a fragment-writer tree as one endpoint |
//! | [`Path`] | Absolute address of overlays and collection bags |
//!
//! ## Modules Overview
//!
//! - [`sample`] / [`view`] - Read side (start here for consumers)
//! - [`builder`] / [`edit`] / [`editor`] - Write side (start here for producers)
//! - [`adapter`] - Reader/writer adapters over the transport seams
//! - [`transport`] - Traits a generated per-schema tree implements

/// Reader/writer adapters presenting the combined-object illusion.
pub mod adapter;
/// Mutable write-side dual of the combined sample.
pub mod builder;
/// Field classification for schema shapes (metadata and generalization roles).
pub mod classify;
/// Set and list collections of identified elements.
pub mod collection;
/// Write-side navigation proxies (edit views, edit handle).
pub mod edit;
/// Ergonomic helpers for building collection content.
pub mod editor;
/// Error types for the combined-object runtime.
pub mod error;
/// 16-byte element/instance identifiers.
pub mod guid;
/// Listener traits, status types, and masked event forwarding.
pub mod listener;
/// Path addressing for fragmented object trees.
pub mod path;
/// Immutable assembled snapshot of one combined object.
pub mod sample;
/// Collaborator seams toward the underlying pub/sub transport.
pub mod transport;
/// Dynamic values carried by base objects, overlays, and elements.
pub mod value;
/// Read-side navigation views with overlay-over-base precedence.
pub mod view;

pub use adapter::{ReadEntry, UmaaFilteredReaderAdapter, UmaaReaderAdapter, UmaaWriterAdapter};
pub use builder::CombinedBuilder;
pub use classify::{FieldClass, FieldClassifier, SuffixClassifier};
pub use collection::{Collection, CollectionKind, Element, ListCollection, SetCollection};
pub use edit::{BuilderEditView, CombinedEditHandle, EditResolved, EditScope};
pub use editor::{ElementHandle, ListEditor, SetEditor};
pub use error::{Error, Result};
pub use guid::Guid;
pub use listener::{
    ClosureReaderListener, CombinedReaderListener, CombinedWriterListener, StatusMask,
};
pub use path::{Path, Segment};
pub use sample::CombinedSample;
pub use transport::{
    AssemblyNode, AssemblyNotify, RawReader, RawWriter, SampleInfo, TopLevelWriter,
    WriterDecorator, WriterNode,
};
pub use value::Value;
pub use view::{ElementView, OverlayView, Resolved};

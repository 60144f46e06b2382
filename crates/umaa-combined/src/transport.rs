// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collaborator seams toward the underlying pub/sub transport.
//!
//! The runtime never touches wire encoding, discovery, or QoS. It consumes
//! raw reader/writer endpoints that accept a listener, an assembly-node tree
//! on the read side, and a top-level writer tree on the write side. Per-
//! schema reader/writer trees (usually generated) implement these traits.

use crate::builder::CombinedBuilder;
use crate::error::Result;
use crate::guid::Guid;
use crate::listener::{CombinedReaderListener, CombinedWriterListener, StatusMask};
use crate::sample::CombinedSample;
use std::sync::Arc;

/// Sample metadata delivered alongside assembled updates.
///
/// `valid` is false for disposal/unregistration markers carrying no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleInfo {
    /// True when the associated sample carries valid data.
    pub valid: bool,
    /// Key of the publication the triggering fragment came from, if known.
    pub source: Option<Guid>,
}

impl SampleInfo {
    /// Info for a valid data sample.
    pub fn valid() -> Self {
        Self {
            valid: true,
            source: None,
        }
    }

    /// Info for a disposal/invalid marker.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            source: None,
        }
    }
}

/// Raw transport reader endpoint.
///
/// The runtime installs its own internal listener once at adapter
/// construction; everything else (QoS, topic metadata) stays behind the
/// implementor.
pub trait RawReader: Send + Sync {
    /// Install `listener` filtered by `mask`, replacing any previous one.
    fn set_listener(
        &self,
        listener: Arc<dyn CombinedReaderListener>,
        mask: StatusMask,
    ) -> Result<()>;

    /// Topic this endpoint is subscribed to.
    fn topic_name(&self) -> &str;
}

/// Raw transport writer endpoint.
pub trait RawWriter: Send + Sync {
    /// Install `listener` filtered by `mask`, replacing any previous one.
    fn set_listener(
        &self,
        listener: Arc<dyn CombinedWriterListener>,
        mask: StatusMask,
    ) -> Result<()>;

    /// Topic this endpoint publishes to.
    fn topic_name(&self) -> &str;
}

/// Callback the assembly tree uses to push completed/changed results.
///
/// `None` sample with an invalid info marks a disposal.
pub type AssemblyNotify =
    Arc<dyn Fn(Guid, Option<Arc<CombinedSample>>, Option<SampleInfo>) + Send + Sync>;

/// Root of a reader-node assembly tree.
///
/// `poll_once` runs one assembly pass; it is synchronous and must not be
/// invoked concurrently for the same root (the transport serializes its
/// listener callbacks per reader, and the adapter relies on that).
pub trait AssemblyNode: Send + Sync {
    /// Run one assembly pass over buffered fragments.
    fn poll_once(&self);

    /// Register the callback completed results are pushed through.
    fn set_parent_notify(&self, notify: AssemblyNotify);
}

/// A decorator installed on a writer node, owning child nodes that publish
/// dependent fragments (collection elements, specializations).
pub trait WriterDecorator: Send + Sync {
    /// Child writer nodes beneath this decorator.
    fn children(&self) -> Vec<Arc<dyn WriterNode>>;
}

/// One node of the writer-assembly tree.
pub trait WriterNode: Send + Sync {
    /// Raw writer endpoint publishing this node's fragment topic.
    fn writer(&self) -> Arc<dyn RawWriter>;

    /// Decorators installed on this node.
    fn decorators(&self) -> Vec<Arc<dyn WriterDecorator>>;
}

/// Root of a writer-assembly tree.
///
/// `write` walks the builder's per-path overlays/collections, spawns child
/// builders, and publishes each fragment on its per-node writer. The
/// adapter delegates publication entirely; it never serializes anything.
pub trait TopLevelWriter: WriterNode {
    /// Fresh builder over this tree's base-object shape.
    fn new_builder(&self) -> CombinedBuilder;

    /// Split and publish every fragment of `builder`.
    fn write(&self, builder: &CombinedBuilder) -> Result<()>;
}

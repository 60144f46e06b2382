// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable assembled snapshot of a fragmented object tree.

use crate::collection::Collection;
use crate::path::Path;
use crate::value::Value;
use crate::view::OverlayView;
use std::collections::HashMap;

/// One assembled update: a base object, the node's named collection bags,
/// and specialization overlays registered by absolute path.
///
/// Constructed once per assembled update by the external reader-node tree
/// and immutable thereafter; safe to share across threads once produced.
/// `collections` holds only the node this sample is rooted at — deeper
/// collections arrive as separate per-node samples and are reached through
/// registered overlays during navigation.
#[derive(Debug, Clone, Default)]
pub struct CombinedSample {
    base: Value,
    collections: HashMap<String, Collection>,
    overlays: HashMap<Path, Value>,
}

impl CombinedSample {
    /// Sample with no collections or overlays.
    pub fn new(base: Value) -> Self {
        Self {
            base,
            collections: HashMap::new(),
            overlays: HashMap::new(),
        }
    }

    /// Sample from pre-assembled parts.
    pub fn with_parts(
        base: Value,
        collections: HashMap<String, Collection>,
        overlays: HashMap<Path, Value>,
    ) -> Self {
        Self {
            base,
            collections,
            overlays,
        }
    }

    /// Base object.
    pub fn base(&self) -> &Value {
        &self.base
    }

    /// Named collection bags local to this node.
    pub fn collections(&self) -> &HashMap<String, Collection> {
        &self.collections
    }

    /// Specialization overlays by absolute path.
    pub fn overlays(&self) -> &HashMap<Path, Value> {
        &self.overlays
    }

    /// Functional update: new sample with `collections` swapped in.
    pub fn clone_with_collections(&self, collections: HashMap<String, Collection>) -> Self {
        Self {
            base: self.base.clone(),
            collections,
            overlays: self.overlays.clone(),
        }
    }

    /// Functional update: new sample with one more overlay registered.
    pub fn add_overlay_at(&self, path: Path, overlay: Value) -> Self {
        let mut overlays = self.overlays.clone();
        overlays.insert(path, overlay);
        Self {
            base: self.base.clone(),
            collections: self.collections.clone(),
            overlays,
        }
    }

    /// Read-only navigation view rooted at this sample.
    pub fn view(&self) -> OverlayView<'_> {
        OverlayView::root(self)
    }
}

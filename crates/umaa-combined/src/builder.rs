// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mutable write-side dual of the combined sample.

use crate::collection::{Collection, CollectionKind};
use crate::error::{Error, Result};
use crate::path::Path;
use crate::value::Value;
use std::collections::HashMap;

/// Accumulates content for an entire object tree before publication.
///
/// Unlike the read side, collection bags are tracked per absolute path: one
/// builder holds every fragment of the composite, and the external top-level
/// writer splits it into per-node publications via [`CombinedBuilder::spawn_child`].
///
/// A builder is single-writer: it is mutated by one producer at a time and
/// consumed by `write()`.
#[derive(Debug, Clone, Default)]
pub struct CombinedBuilder {
    base: Value,
    overlays: HashMap<Path, Value>,
    collections: HashMap<Path, HashMap<String, Collection>>,
}

impl CombinedBuilder {
    /// Builder over a base object.
    pub fn new(base: Value) -> Self {
        Self {
            base,
            overlays: HashMap::new(),
            collections: HashMap::new(),
        }
    }

    /// Base object.
    pub fn base(&self) -> &Value {
        &self.base
    }

    /// Mutable base object.
    pub fn base_mut(&mut self) -> &mut Value {
        &mut self.base
    }

    /// Specialization overlays by absolute path.
    pub fn overlays(&self) -> &HashMap<Path, Value> {
        &self.overlays
    }

    /// Collection bags by absolute path.
    pub fn collections_by_path(&self) -> &HashMap<Path, HashMap<String, Collection>> {
        &self.collections
    }

    /// Register `overlay` at `path`, replacing any previous overlay there.
    pub fn add_overlay_at(&mut self, path: Path, overlay: Value) {
        self.overlays.insert(path, overlay);
    }

    /// Overlay registered exactly at `path`.
    pub fn overlay_at(&self, path: &Path) -> Option<&Value> {
        self.overlays.get(path)
    }

    /// Mutable overlay registered exactly at `path`.
    pub fn overlay_at_mut(&mut self, path: &Path) -> Option<&mut Value> {
        self.overlays.get_mut(path)
    }

    /// Collection bag at `path`.
    pub fn collections_at(&self, path: &Path) -> Option<&HashMap<String, Collection>> {
        self.collections.get(path)
    }

    /// Mutable collection bag at `path`, created if absent.
    pub fn collections_at_mut(&mut self, path: &Path) -> &mut HashMap<String, Collection> {
        self.collections.entry(path.clone()).or_default()
    }

    /// Collection `name` in the bag at `path`, created empty if absent.
    ///
    /// Fails when a collection of the other kind already occupies the name;
    /// that is an invalid configuration, not a recoverable condition.
    pub fn ensure_collection_at(
        &mut self,
        path: &Path,
        name: &str,
        kind: CollectionKind,
    ) -> Result<&mut Collection> {
        let bag = self.collections.entry(path.clone()).or_default();
        let col = bag
            .entry(name.to_string())
            .or_insert_with(|| Collection::new(kind));
        if col.kind() != kind {
            return Err(Error::CollectionKindMismatch(format!(
                "{} at {} is {:?}, requested {:?}",
                name,
                path,
                col.kind(),
                kind
            )));
        }
        Ok(col)
    }

    /// Navigate the base tree along `path` (attribute segments only).
    ///
    /// Element segments address collection members, which live in bags
    /// rather than the base tree, so any element segment yields `None`.
    pub fn base_value_at(&self, path: &Path) -> Option<&Value> {
        let mut current = &self.base;
        for seg in path.segments() {
            current = current.get_field(seg.as_attr()?)?;
        }
        Some(current)
    }

    /// Mutable variant of [`CombinedBuilder::base_value_at`].
    pub fn base_value_at_mut(&mut self, path: &Path) -> Option<&mut Value> {
        let mut current = &mut self.base;
        for seg in path.segments() {
            current = current.get_field_mut(seg.as_attr()?)?;
        }
        Some(current)
    }

    /// Isolate the fragment rooted at `path` for independent publication.
    ///
    /// The child keeps exactly the overlays and collection bags whose key
    /// was at or below `path`, rebased by stripping the prefix — an entry
    /// exactly at `path` becomes the child's root entry. The child's base is
    /// supplied by the caller (the relevant sub-object), not derived.
    ///
    /// Rebasing is what makes a spawned child navigate identically to a
    /// builder constructed top-level from the start.
    pub fn spawn_child(&self, path: &Path, base: Value) -> CombinedBuilder {
        let overlays = self
            .overlays
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(path).map(|rebased| (rebased, v.clone())))
            .collect();
        let collections = self
            .collections
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(path).map(|rebased| (rebased, v.clone())))
            .collect();
        CombinedBuilder {
            base,
            overlays,
            collections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn overlay(tag: i64) -> Value {
        let mut v = Value::object();
        v.set_field("tag", tag.into());
        v
    }

    #[test]
    fn spawn_child_rebases_descendants_and_drops_the_rest() {
        let mut builder = CombinedBuilder::new(Value::object());
        builder.add_overlay_at(Path::root(), overlay(0));
        builder.add_overlay_at(Path::attr("a"), overlay(1));
        builder.add_overlay_at(Path::from_attrs(["a", "b"]), overlay(2));
        builder.add_overlay_at(Path::attr("x"), overlay(3));

        let child = builder.spawn_child(&Path::attr("a"), Value::object());

        assert_eq!(child.overlays().len(), 2);
        assert_eq!(child.overlay_at(&Path::root()), Some(&overlay(1)));
        assert_eq!(child.overlay_at(&Path::attr("b")), Some(&overlay(2)));
        // Root entry and the unrelated subtree are gone.
        assert!(child.overlay_at(&Path::attr("a")).is_none());
        assert!(child.overlay_at(&Path::attr("x")).is_none());
    }

    #[test]
    fn spawn_child_rebases_collection_bags() {
        let mut builder = CombinedBuilder::new(Value::object());
        builder
            .ensure_collection_at(&Path::attr("a"), "items", CollectionKind::Set)
            .expect("fresh");
        builder
            .ensure_collection_at(&Path::root(), "top", CollectionKind::List)
            .expect("fresh");

        let child = builder.spawn_child(&Path::attr("a"), Value::object());
        let bag = child.collections_at(&Path::root()).expect("rebased bag");
        assert!(bag.contains_key("items"));
        assert!(child.collections_at(&Path::attr("a")).is_none());
        assert_eq!(child.collections_by_path().len(), 1);
    }

    #[test]
    fn ensure_collection_rejects_kind_change() {
        let mut builder = CombinedBuilder::new(Value::object());
        builder
            .ensure_collection_at(&Path::root(), "items", CollectionKind::Set)
            .expect("fresh");
        // Re-ensuring the same kind is idempotent.
        builder
            .ensure_collection_at(&Path::root(), "items", CollectionKind::Set)
            .expect("same kind");
        let err = builder
            .ensure_collection_at(&Path::root(), "items", CollectionKind::List)
            .unwrap_err();
        assert!(matches!(err, Error::CollectionKindMismatch(_)));
    }

    #[test]
    fn base_navigation_follows_attr_segments_only() {
        let mut inner = Value::object();
        inner.set_field("depth", 3i64.into());
        let mut base = Value::object();
        base.set_field("nav", inner);

        let builder = CombinedBuilder::new(base);
        let nav = builder.base_value_at(&Path::attr("nav")).expect("subtree");
        assert_eq!(nav.get_field("depth").and_then(Value::as_i64), Some(3));
        assert!(builder.base_value_at(&Path::attr("missing")).is_none());
        assert!(builder
            .base_value_at(&Path::set_element("items", crate::guid::Guid::nil()))
            .is_none());
    }
}

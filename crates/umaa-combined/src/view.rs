// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read-side navigation proxies.
//!
//! [`OverlayView`] and [`ElementView`] let a caller dot-navigate an
//! assembled [`CombinedSample`](crate::sample::CombinedSample) as if it were
//! one in-memory object, without knowing which fragments arrived on which
//! topic. Resolution follows a fixed precedence over a closed set of slot
//! kinds: collections bag, named collection, overlay at the node, overlay
//! one level deeper, base attribute, missing.
//!
//! The precedence is load-bearing: a collection name always wins over a
//! same-named overlay or base attribute, and an overlay always wins over the
//! base. Changing either rule silently breaks navigation for structures
//! whose specialization lives several hops deep.

use crate::collection::{element_segment, Collection, Element};
use crate::error::{Error, Result};
use crate::guid::Guid;
use crate::path::Path;
use crate::sample::CombinedSample;
use crate::value::Value;
use std::collections::HashMap;

/// Outcome of one resolution step.
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    /// Raw leaf value (or an unwrapped base subtree with no overlays beneath).
    Value(&'a Value),
    /// Element identifier surfaced from a wrapper.
    Guid(Guid),
    /// Nested structured value; navigate further through the view.
    View(OverlayView<'a>),
    /// A named collection.
    Collection(&'a Collection),
    /// The per-node collections bag itself.
    Collections(&'a HashMap<String, Collection>),
}

impl<'a> Resolved<'a> {
    /// Raw value, if this resolved to one.
    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Resolved::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Nested view, if this resolved to one.
    pub fn into_view(self) -> Option<OverlayView<'a>> {
        match self {
            Resolved::View(v) => Some(v),
            _ => None,
        }
    }

    /// Collection, if this resolved to one.
    pub fn as_collection(&self) -> Option<&'a Collection> {
        match self {
            Resolved::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Convenience: leaf f64 (accepts f32/f64 values).
    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_f64)
    }

    /// Convenience: leaf string.
    pub fn as_str(&self) -> Option<&'a str> {
        self.as_value().and_then(Value::as_str)
    }
}

/// Read-only proxy over `(base, collections, overlays, path)`.
///
/// Views are cheap to construct and carry no independent state; each
/// navigation step yields a fresh view with a longer path while preserving
/// the same collections bag and overlay map, so deeper lookups still see
/// sibling overlays registered at deeper paths.
#[derive(Debug, Clone)]
pub struct OverlayView<'a> {
    base: Option<&'a Value>,
    collections: &'a HashMap<String, Collection>,
    overlays: &'a HashMap<Path, Value>,
    path: Path,
}

impl<'a> OverlayView<'a> {
    /// Root view over a sample.
    pub(crate) fn root(sample: &'a CombinedSample) -> Self {
        Self {
            base: Some(sample.base()),
            collections: sample.collections(),
            overlays: sample.overlays(),
            path: Path::root(),
        }
    }

    /// View over loose parts (used by element navigation).
    pub(crate) fn new(
        base: Option<&'a Value>,
        collections: &'a HashMap<String, Collection>,
        overlays: &'a HashMap<Path, Value>,
        path: Path,
    ) -> Self {
        Self {
            base,
            collections,
            overlays,
            path,
        }
    }

    /// Absolute path this view is rooted at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve `name` with the fixed overlay-over-base precedence.
    pub fn get(&self, name: &str) -> Result<Resolved<'a>> {
        // 1. The collections bag itself.
        if name == "collections" {
            return Ok(Resolved::Collections(self.collections));
        }

        // 2. A collection name shadows same-named overlay/base attributes.
        if let Some(col) = self.collections.get(name) {
            return Ok(Resolved::Collection(col));
        }

        let deeper = self.path.child_attr(name);

        // 3. Overlay registered exactly at this node.
        if let Some(overlay) = self.overlays.get(&self.path) {
            if let Some(value) = overlay.get_field(name) {
                if value.is_structured() {
                    let base = self.base.and_then(|b| b.get_field(name));
                    return Ok(Resolved::View(OverlayView::new(
                        base,
                        self.collections,
                        self.overlays,
                        deeper,
                    )));
                }
                return Ok(Resolved::Value(value));
            }
        }

        // 4. Overlay registered one level deeper.
        if self.overlays.contains_key(&deeper) {
            let base = self.base.and_then(|b| b.get_field(name));
            return Ok(Resolved::View(OverlayView::new(
                base,
                self.collections,
                self.overlays,
                deeper,
            )));
        }

        // 5. Base attribute. Wrap only when an overlay lives beneath the
        //    child path; plain base subtrees are navigable natively.
        if let Some(base) = self.base {
            if let Some(value) = base.get_field(name) {
                if value.is_structured() && self.has_overlay_beneath(&deeper) {
                    return Ok(Resolved::View(OverlayView::new(
                        Some(value),
                        self.collections,
                        self.overlays,
                        deeper,
                    )));
                }
                return Ok(Resolved::Value(value));
            }
        }

        Err(Error::NoSuchField(format!("{} at {}", name, self.path)))
    }

    /// Wrapped views over every member of collection `name`.
    pub fn elements(&self, name: &str) -> Result<Vec<ElementView<'a>>> {
        let col = self
            .collections
            .get(name)
            .ok_or_else(|| Error::NoSuchCollection(name.to_string()))?;
        let kind = col.kind();
        Ok(col
            .iter()
            .map(|e| {
                ElementView::new(
                    e,
                    self.collections,
                    self.overlays,
                    self.path.child(element_segment(name, kind, e.id)),
                )
            })
            .collect())
    }

    /// Wrapped view over the member of collection `name` with identifier `id`.
    pub fn element(&self, name: &str, id: Guid) -> Result<ElementView<'a>> {
        let col = self
            .collections
            .get(name)
            .ok_or_else(|| Error::NoSuchCollection(name.to_string()))?;
        let elem = col.get(&id).ok_or_else(|| {
            Error::NoSuchField(format!("element {} in collection {}", id, name))
        })?;
        Ok(ElementView::new(
            elem,
            self.collections,
            self.overlays,
            self.path.child(element_segment(name, col.kind(), id)),
        ))
    }

    fn has_overlay_beneath(&self, prefix: &Path) -> bool {
        self.overlays.keys().any(|k| k.starts_with(prefix))
    }
}

/// Read-only proxy over one collection element.
///
/// Splits the metadata wrapper (`element_id`) from the contained payload
/// (`element`). Payload attribute lookups prefer a specialization overlay
/// registered at the payload path over the payload's own fields, since a
/// specialization replaces the generalization view.
#[derive(Debug, Clone)]
pub struct ElementView<'a> {
    element: &'a Element,
    collections: &'a HashMap<String, Collection>,
    overlays: &'a HashMap<Path, Value>,
    path: Path,
}

impl<'a> ElementView<'a> {
    pub(crate) fn new(
        element: &'a Element,
        collections: &'a HashMap<String, Collection>,
        overlays: &'a HashMap<Path, Value>,
        path: Path,
    ) -> Self {
        Self {
            element,
            collections,
            overlays,
            path,
        }
    }

    /// Element identifier.
    pub fn id(&self) -> Guid {
        self.element.id
    }

    /// Raw payload value, bypassing overlay resolution.
    pub fn payload(&self) -> &'a Value {
        &self.element.value
    }

    /// Absolute element path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve `name` against wrapper, overlays, and payload.
    pub fn get(&self, name: &str) -> Result<Resolved<'a>> {
        // Collection membership is always answered by the sample's global
        // bag; that is where the assembler deposits resolved per-node bags.
        if name == "collections" {
            return Ok(Resolved::Collections(self.collections));
        }

        // Overlay registered directly under the element path.
        let at = self.path.child_attr(name);
        if self.overlays.contains_key(&at) {
            let base = if name == "element" {
                Some(&self.element.value)
            } else {
                self.element.value.get_field(name)
            };
            return Ok(Resolved::View(OverlayView::new(
                base,
                self.collections,
                self.overlays,
                at,
            )));
        }

        // Wrapper attributes.
        if name == "element_id" {
            return Ok(Resolved::Guid(self.element.id));
        }
        if name == "element" {
            let payload = &self.element.value;
            if payload.is_structured() && self.overlays.keys().any(|k| k.starts_with(&at)) {
                return Ok(Resolved::View(OverlayView::new(
                    Some(payload),
                    self.collections,
                    self.overlays,
                    at,
                )));
            }
            return Ok(Resolved::Value(payload));
        }

        // Payload resolution: specialization at the payload path wins over
        // the payload's own fields.
        let payload_path = self.path.child_attr("element");
        if let Some(spec) = self.overlays.get(&payload_path) {
            if let Some(value) = spec.get_field(name) {
                if value.is_structured() {
                    return Ok(Resolved::View(OverlayView::new(
                        self.element.value.get_field(name),
                        self.collections,
                        self.overlays,
                        payload_path.child_attr(name),
                    )));
                }
                return Ok(Resolved::Value(value));
            }
        }

        let deeper = payload_path.child_attr(name);
        if self.overlays.contains_key(&deeper) {
            return Ok(Resolved::View(OverlayView::new(
                self.element.value.get_field(name),
                self.collections,
                self.overlays,
                deeper,
            )));
        }

        if let Some(value) = self.element.value.get_field(name) {
            if value.is_structured() && self.overlays.keys().any(|k| k.starts_with(&deeper)) {
                return Ok(Resolved::View(OverlayView::new(
                    Some(value),
                    self.collections,
                    self.overlays,
                    deeper,
                )));
            }
            return Ok(Resolved::Value(value));
        }

        Err(Error::NoSuchField(format!("{} at {}", name, self.path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{CollectionKind, SetCollection};

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut v = Value::object();
        for (name, value) in pairs {
            v.set_field(*name, value.clone());
        }
        v
    }

    #[test]
    fn overlay_wins_over_base() {
        // Attribute present on both overlay and base resolves to the overlay.
        let base = obj(&[("speed", 1.0f64.into())]);
        let sample =
            CombinedSample::new(base).add_overlay_at(Path::root(), obj(&[("speed", 9.0f64.into())]));

        let got = sample.view().get("speed").expect("resolves");
        assert_eq!(got.as_f64(), Some(9.0));
    }

    #[test]
    fn collection_name_shadows_base_attribute() {
        let base = obj(&[("contacts", "not-a-collection".into())]);
        let mut collections = HashMap::new();
        collections.insert(
            "contacts".to_string(),
            Collection::Set(SetCollection::new()),
        );
        let sample = CombinedSample::with_parts(base, collections, HashMap::new());

        let got = sample.view().get("contacts").expect("resolves");
        assert!(got.as_collection().is_some());
        assert!(got.as_str().is_none());
    }

    #[test]
    fn collections_attribute_returns_bag() {
        let mut collections = HashMap::new();
        collections.insert(
            "waypoints".to_string(),
            Collection::new(CollectionKind::List),
        );
        let sample = CombinedSample::with_parts(Value::object(), collections, HashMap::new());

        match sample.view().get("collections").expect("resolves") {
            Resolved::Collections(bag) => assert!(bag.contains_key("waypoints")),
            other => panic!("expected bag, got {:?}", other),
        }
    }

    #[test]
    fn deep_overlay_visible_through_base_navigation() {
        // Overlay registered two hops down, no overlay at the root: the view
        // must still expose it when navigating through plain base structs.
        let base = obj(&[(
            "body",
            obj(&[("engine", obj(&[("rpm", 100i64.into())]))]),
        )]);
        let sample = CombinedSample::new(base).add_overlay_at(
            Path::from_attrs(["body", "engine"]),
            obj(&[("rpm", 200i64.into())]),
        );

        let body = sample
            .view()
            .get("body")
            .expect("resolves")
            .into_view()
            .expect("wrapped: overlay beneath");
        let engine = body
            .get("engine")
            .expect("resolves")
            .into_view()
            .expect("overlay at this path");
        let rpm = engine.get("rpm").expect("resolves");
        assert_eq!(rpm.as_value().and_then(Value::as_i64), Some(200));
    }

    #[test]
    fn base_subtree_without_overlays_returned_raw() {
        let base = obj(&[("meta", obj(&[("rev", 4i64.into())]))]);
        let sample = CombinedSample::new(base);

        let got = sample.view().get("meta").expect("resolves");
        let raw = got.as_value().expect("unwrapped");
        assert_eq!(raw.get_field("rev").and_then(Value::as_i64), Some(4));
    }

    #[test]
    fn missing_field_fails_loudly() {
        let sample = CombinedSample::new(Value::object());
        let err = sample.view().get("nope").unwrap_err();
        assert!(matches!(err, Error::NoSuchField(_)));
    }

    #[test]
    fn overlay_fills_gap_in_base() {
        // Overlay attribute with no base counterpart still resolves.
        let sample = CombinedSample::new(Value::object())
            .add_overlay_at(Path::root(), obj(&[("extra", 7i64.into())]));
        let got = sample.view().get("extra").expect("resolves");
        assert_eq!(got.as_value().and_then(Value::as_i64), Some(7));
    }

    fn sample_with_set_element(payload: Value) -> (CombinedSample, Guid) {
        let mut set = SetCollection::new();
        let id = set.add(Element::new(payload));
        let mut collections = HashMap::new();
        collections.insert("contacts".to_string(), Collection::Set(set));
        (
            CombinedSample::with_parts(Value::object(), collections, HashMap::new()),
            id,
        )
    }

    #[test]
    fn element_view_exposes_wrapper_and_payload() {
        let (sample, id) = sample_with_set_element(obj(&[("range", 12.5f64.into())]));
        let view = sample.view();
        let elem = view.element("contacts", id).expect("element");

        assert_eq!(elem.id(), id);
        match elem.get("element_id").expect("wrapper attr") {
            Resolved::Guid(g) => assert_eq!(g, id),
            other => panic!("expected guid, got {:?}", other),
        }
        // Payload field through delegation.
        assert_eq!(elem.get("range").expect("payload attr").as_f64(), Some(12.5));
        // Global collections bag from the element.
        match elem.get("collections").expect("bag") {
            Resolved::Collections(bag) => assert!(bag.contains_key("contacts")),
            other => panic!("expected bag, got {:?}", other),
        }
    }

    #[test]
    fn element_specialization_replaces_payload_fields() {
        let (sample, id) = sample_with_set_element(obj(&[("range", 1.0f64.into())]));
        // Specialization registered at elementPath + ("element",).
        let elem_path = Path::root().child(element_segment("contacts", CollectionKind::Set, id));
        let sample = sample.add_overlay_at(
            elem_path.child_attr("element"),
            obj(&[("range", 99.0f64.into())]),
        );

        let view = sample.view();
        let elem = view.element("contacts", id).expect("element");
        assert_eq!(elem.get("range").expect("spec attr").as_f64(), Some(99.0));
    }

    #[test]
    fn element_iteration_wraps_every_member() {
        let (sample, id) = sample_with_set_element(obj(&[("range", 1.0f64.into())]));
        let view = sample.view();
        let elems = view.elements("contacts").expect("collection");
        assert_eq!(elems.len(), 1);
        assert_eq!(elems[0].id(), id);
        assert!(view.elements("unknown").is_err());
    }
}

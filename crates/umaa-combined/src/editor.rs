// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ergonomic helpers for building collection content.
//!
//! Editors anchor a named collection at a node path inside a builder and
//! hand back an [`ElementHandle`] scoped at the created element's path, so
//! a producer can keep editing the element (and attach specializations)
//! without tracking paths by hand.

use crate::builder::CombinedBuilder;
use crate::classify::{FieldClass, FieldClassifier, SuffixClassifier};
use crate::collection::{Collection, CollectionKind, Element};
use crate::edit::{BuilderEditView, EditScope};
use crate::error::{Error, Result};
use crate::guid::Guid;
use crate::path::{Path, Segment};
use crate::value::Value;

/// Editor for a set collection anchored at `node_path`.
#[derive(Debug)]
pub struct SetEditor<'a> {
    builder: &'a mut CombinedBuilder,
    node_path: Path,
    name: String,
}

impl<'a> SetEditor<'a> {
    /// Anchor an editor; the collection bag is created lazily on first add.
    pub fn new(builder: &'a mut CombinedBuilder, node_path: Path, name: impl Into<String>) -> Self {
        Self {
            builder,
            node_path,
            name: name.into(),
        }
    }

    /// Create an empty element, insert it, and return a handle at its path.
    ///
    /// A fresh identifier is assigned unless `id` is given.
    pub fn add_new(&mut self, id: Option<Guid>) -> Result<ElementHandle<'_>> {
        let elem = match id {
            Some(id) => Element::with_id(id, Value::object()),
            None => Element::new(Value::object()),
        };
        self.add(elem)
    }

    /// Insert a caller-supplied element and return a handle at its path.
    ///
    /// A fresh identifier is assigned only when the element's id is nil.
    pub fn add(&mut self, elem: Element) -> Result<ElementHandle<'_>> {
        let col =
            self.builder
                .ensure_collection_at(&self.node_path, &self.name, CollectionKind::Set)?;
        let Collection::Set(set) = col else {
            return Err(Error::CollectionKindMismatch(self.name.clone()));
        };
        let id = set.add(elem);
        log::trace!(
            "[SET-EDITOR] added element {} to '{}' at {}",
            id,
            self.name,
            self.node_path
        );
        let path = self.node_path.child(Segment::SetElement {
            collection: self.name.clone(),
            id,
        });
        Ok(ElementHandle::new(&mut *self.builder, path))
    }
}

/// Editor for a list collection anchored at `node_path`.
///
/// Elements are still path-addressed by identifier; publication order comes
/// from the list's own sequence, never from path ordering.
#[derive(Debug)]
pub struct ListEditor<'a> {
    builder: &'a mut CombinedBuilder,
    node_path: Path,
    name: String,
}

impl<'a> ListEditor<'a> {
    /// Anchor an editor; the collection bag is created lazily on first append.
    pub fn new(builder: &'a mut CombinedBuilder, node_path: Path, name: impl Into<String>) -> Self {
        Self {
            builder,
            node_path,
            name: name.into(),
        }
    }

    /// Create an empty element, append it, and return a handle at its path.
    pub fn append_new(&mut self, id: Option<Guid>) -> Result<ElementHandle<'_>> {
        let elem = match id {
            Some(id) => Element::with_id(id, Value::object()),
            None => Element::new(Value::object()),
        };
        self.append(elem)
    }

    /// Append a caller-supplied element and return a handle at its path.
    pub fn append(&mut self, elem: Element) -> Result<ElementHandle<'_>> {
        self.splice(None, elem)
    }

    /// Insert at `index` and return a handle at the element's path.
    pub fn insert(&mut self, index: usize, elem: Element) -> Result<ElementHandle<'_>> {
        self.splice(Some(index), elem)
    }

    fn splice(&mut self, index: Option<usize>, elem: Element) -> Result<ElementHandle<'_>> {
        let col =
            self.builder
                .ensure_collection_at(&self.node_path, &self.name, CollectionKind::List)?;
        let Collection::List(list) = col else {
            return Err(Error::CollectionKindMismatch(self.name.clone()));
        };
        let id = match index {
            Some(index) => list.insert(index, elem),
            None => list.append(elem),
        };
        log::trace!(
            "[LIST-EDITOR] appended element {} to '{}' at {}",
            id,
            self.name,
            self.node_path
        );
        let path = self.node_path.child(Segment::ListElement {
            collection: self.name.clone(),
            id,
        });
        Ok(ElementHandle::new(&mut *self.builder, path))
    }
}

/// Mutable handle to one collection element inside a builder.
///
/// Attribute get/set delegates to the metadata wrapper first, then to the
/// contained payload, mirroring the wrapper-vs-payload split of large
/// collection elements on the wire.
#[derive(Debug)]
pub struct ElementHandle<'a> {
    builder: &'a mut CombinedBuilder,
    path: Path,
}

impl<'a> ElementHandle<'a> {
    pub(crate) fn new(builder: &'a mut CombinedBuilder, path: Path) -> Self {
        Self { builder, path }
    }

    /// Absolute element path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Element identifier, decoded from the path's element token.
    pub fn id(&self) -> Guid {
        self.path
            .last()
            .and_then(Segment::element_id)
            .unwrap_or_else(Guid::nil)
    }

    fn locate(&self) -> Result<(Path, String, Guid)> {
        let (node, seg) = self
            .path
            .split_last()
            .ok_or_else(|| Error::InvalidState("element handle at root path".to_string()))?;
        match (seg.collection_name(), seg.element_id()) {
            (Some(name), Some(id)) => Ok((node, name.to_string(), id)),
            _ => Err(Error::InvalidState(format!(
                "element handle path {} does not end in an element token",
                self.path
            ))),
        }
    }

    /// The element this handle addresses.
    pub fn element(&self) -> Result<&Element> {
        let (node, name, id) = self.locate()?;
        self.builder
            .collections_at(&node)
            .and_then(|bag| bag.get(&name))
            .and_then(|col| col.get(&id))
            .ok_or_else(|| Error::NoSuchField(format!("element at {}", self.path)))
    }

    fn element_mut(&mut self) -> Result<&mut Element> {
        let (node, name, id) = self.locate()?;
        self.builder
            .collections_at_mut(&node)
            .get_mut(&name)
            .and_then(|col| col.get_mut(&id))
            .ok_or_else(|| Error::NoSuchField(format!("element at {}", self.path)))
    }

    /// Wrapper-then-payload attribute read.
    pub fn get(&self, name: &str) -> Result<Value> {
        if name == "element_id" {
            return Ok(Value::Guid(self.id()));
        }
        let elem = self.element()?;
        if name == "element" {
            return Ok(elem.value.clone());
        }
        elem.value
            .get_field(name)
            .cloned()
            .ok_or_else(|| Error::NoSuchField(format!("{} at {}", name, self.path)))
    }

    /// Wrapper-then-payload attribute write.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        if name == "element" {
            self.element_mut()?.value = value;
            return Ok(());
        }
        let path = self.path.clone();
        let elem = self.element_mut()?;
        if elem.value.set_field(name, value) {
            Ok(())
        } else {
            Err(Error::NotAStruct(format!(
                "element payload at {} cannot take field {}",
                path, name
            )))
        }
    }

    /// Replace the element payload wholesale.
    pub fn set_payload(&mut self, value: Value) -> Result<()> {
        self.element_mut()?.value = value;
        Ok(())
    }

    /// Edit view rooted at this element's path, for overlay-aware edits.
    pub fn edit(&mut self) -> BuilderEditView<'_> {
        BuilderEditView::new(&mut *self.builder, self.path.clone())
    }

    /// Attach a specialization overlay under this element.
    ///
    /// With an explicit `at` (relative to the element wrapper), the overlay
    /// is registered at `element_path + at`. Without one, the payload's
    /// classification must contain exactly one generalization field; zero or
    /// several candidates fail loudly rather than guessing.
    pub fn use_specialization(&mut self, spec: Value, at: Option<Path>) -> Result<&mut Value> {
        let rel = match at {
            Some(path) => path,
            None => {
                let payload = &self.element()?.value;
                let mut candidates: Vec<Path> = SuffixClassifier
                    .classify(payload)
                    .into_iter()
                    .filter(|(_, class)| *class == FieldClass::Generalization)
                    .map(|(path, _)| path)
                    .collect();
                if candidates.len() != 1 {
                    return Err(Error::AmbiguousSpecialization(format!(
                        "{} generalization fields at {}",
                        candidates.len(),
                        self.path
                    )));
                }
                Path::attr("element").join(&candidates.remove(0))
            }
        };
        let abs = self.path.join(&rel);
        log::debug!("[ELEMENT-HANDLE] specialization registered at {}", abs);
        self.builder.add_overlay_at(abs.clone(), spec);
        self.builder
            .overlay_at_mut(&abs)
            .ok_or_else(|| Error::InvalidState(format!("overlay vanished at {}", abs)))
    }
}

impl EditScope for ElementHandle<'_> {
    fn scope_builder_mut(&mut self) -> &mut CombinedBuilder {
        self.builder
    }

    fn scope_path(&self) -> Path {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut v = Value::object();
        for (name, value) in pairs {
            v.set_field(*name, value.clone());
        }
        v
    }

    #[test]
    fn set_add_new_round_trips_through_address() {
        let mut builder = CombinedBuilder::new(Value::object());
        let mut editor = SetEditor::new(&mut builder, Path::root(), "contacts");

        let handle = editor.add_new(None).expect("insert");
        let id = handle.id();
        let path = handle.path().clone();
        assert!(!id.is_nil());

        // The handle's path decodes to the same (collection, id) pair.
        let seg = path.last().expect("token");
        assert_eq!(seg.collection_name(), Some("contacts"));
        assert_eq!(seg.element_id(), Some(id));
        assert_eq!(
            path,
            Path::root().child(Segment::SetElement {
                collection: "contacts".to_string(),
                id,
            })
        );

        // The owning collection snapshot contains exactly that element.
        let bag = builder.collections_at(&Path::root()).expect("bag");
        let runtime = bag.get("contacts").expect("collection").to_runtime();
        assert_eq!(runtime.len(), 1);
        assert_eq!(runtime[0].id, id);
    }

    #[test]
    fn set_add_keeps_caller_id_when_not_nil() {
        let mut builder = CombinedBuilder::new(Value::object());
        let mut editor = SetEditor::new(&mut builder, Path::root(), "contacts");
        let id = Guid::generate();
        let handle = editor
            .add(Element::with_id(id, Value::object()))
            .expect("insert");
        assert_eq!(handle.id(), id);
    }

    #[test]
    fn list_append_preserves_order() {
        let mut builder = CombinedBuilder::new(Value::object());
        let mut ids = Vec::new();
        {
            let mut editor = ListEditor::new(&mut builder, Path::root(), "waypoints");
            for tag in 1..=3i64 {
                let mut handle = editor
                    .append(Element::new(Value::object()))
                    .expect("append");
                handle.set("tag", tag.into()).expect("payload field");
                ids.push(handle.id());
            }
        }

        let bag = builder.collections_at(&Path::root()).expect("bag");
        let runtime = bag.get("waypoints").expect("collection").to_runtime();
        let stored: Vec<Guid> = runtime.iter().map(|e| e.id).collect();
        assert_eq!(stored, ids);
        let tags: Vec<i64> = runtime
            .iter()
            .filter_map(|e| e.value.get_field("tag").and_then(Value::as_i64))
            .collect();
        assert_eq!(tags, vec![1, 2, 3]);
    }

    #[test]
    fn element_handle_delegates_wrapper_then_payload() {
        let mut builder = CombinedBuilder::new(Value::object());
        let mut editor = SetEditor::new(&mut builder, Path::root(), "contacts");
        let mut handle = editor.add_new(None).expect("insert");

        handle.set("range", 4.5f64.into()).expect("payload write");
        assert_eq!(handle.get("range").expect("payload read").as_f64(), Some(4.5));
        assert_eq!(
            handle.get("element_id").expect("wrapper read").as_guid(),
            Some(handle.id())
        );
        assert!(matches!(
            handle.get("missing"),
            Err(Error::NoSuchField(_))
        ));
    }

    #[test]
    fn use_specialization_finds_unique_generalization() {
        let mut builder = CombinedBuilder::new(Value::object());
        let mut editor = SetEditor::new(&mut builder, Path::root(), "contacts");
        let mut handle = editor.add_new(None).expect("insert");
        handle
            .set_payload(obj(&[("bodyGeneralization", Value::object())]))
            .expect("payload");

        let spec = obj(&[("rpm", 5i64.into())]);
        handle
            .use_specialization(spec.clone(), None)
            .expect("unique candidate");

        let expected = handle
            .path()
            .clone()
            .join(&Path::from_attrs(["element", "bodyGeneralization"]));
        let id = handle.id();
        drop(handle);
        assert_eq!(builder.overlay_at(&expected), Some(&spec));

        // The read side sees the overlay after assembling the same layout.
        let elem = builder
            .collections_at(&Path::root())
            .and_then(|bag| bag.get("contacts"))
            .and_then(|col| col.get(&id))
            .expect("element");
        assert!(!elem.id.is_nil());
    }

    #[test]
    fn use_specialization_rejects_ambiguity() {
        let mut builder = CombinedBuilder::new(Value::object());
        let mut editor = SetEditor::new(&mut builder, Path::root(), "contacts");

        // Zero candidates.
        let mut handle = editor.add_new(None).expect("insert");
        let err = handle.use_specialization(Value::object(), None).unwrap_err();
        assert!(matches!(err, Error::AmbiguousSpecialization(_)));

        // Two candidates.
        handle
            .set_payload(obj(&[
                ("aGeneralization", Value::object()),
                ("bGeneralization", Value::object()),
            ]))
            .expect("payload");
        let err = handle.use_specialization(Value::object(), None).unwrap_err();
        assert!(matches!(err, Error::AmbiguousSpecialization(_)));

        // Explicit target sidesteps classification entirely.
        handle
            .use_specialization(
                Value::object(),
                Some(Path::from_attrs(["element", "aGeneralization"])),
            )
            .expect("explicit target");
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Large-set and large-list collection primitives.
//!
//! Collections whose elements are published on separately keyed topics are
//! held locally as element bags. A set keys elements by GUID with no order;
//! a list keeps an explicit sequence and uses the GUID purely for
//! path-addressing, never for uniqueness.

use crate::guid::Guid;
use crate::path::Segment;
use crate::value::Value;
use std::collections::hash_map;
use std::collections::HashMap;

/// Collection flavor, set vs list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Unordered, keyed by element id.
    Set,
    /// Ordered sequence.
    List,
}

/// One collection element: the metadata wrapper (id) plus its payload value.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element identifier; nil until assigned by a collection.
    pub id: Guid,
    /// Contained payload ("element" on the wire).
    pub value: Value,
}

impl Element {
    /// Element with a nil id; the collection assigns a fresh one on insert.
    pub fn new(value: Value) -> Self {
        Self {
            id: Guid::nil(),
            value,
        }
    }

    /// Element with a caller-chosen id.
    pub fn with_id(id: Guid, value: Value) -> Self {
        Self { id, value }
    }
}

/// Unordered element bag keyed by element id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetCollection {
    elements: HashMap<Guid, Element>,
}

impl SetCollection {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element, assigning a fresh id when the element's id is nil.
    ///
    /// An id collision replaces the stored element. Returns the effective id.
    pub fn add(&mut self, mut elem: Element) -> Guid {
        if elem.id.is_nil() {
            elem.id = Guid::generate();
        }
        let id = elem.id;
        self.elements.insert(id, elem);
        id
    }

    /// Remove by identifier.
    pub fn discard(&mut self, id: &Guid) -> Option<Element> {
        self.elements.remove(id)
    }

    /// Look up by identifier.
    pub fn get(&self, id: &Guid) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Mutable lookup by identifier.
    pub fn get_mut(&mut self, id: &Guid) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// True when an element with `id` is stored.
    pub fn contains(&self, id: &Guid) -> bool {
        self.elements.contains_key(id)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate elements (no order guarantee).
    pub fn iter(&self) -> hash_map::Values<'_, Guid, Element> {
        self.elements.values()
    }

    /// Snapshot sequence for publishing (no order guarantee).
    pub fn to_runtime(&self) -> Vec<Element> {
        self.elements.values().cloned().collect()
    }
}

/// Ordered element sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListCollection {
    elements: Vec<Element>,
}

impl ListCollection {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append, assigning a fresh id when the element's id is nil so every
    /// stored element stays path-addressable. Returns the effective id.
    pub fn append(&mut self, mut elem: Element) -> Guid {
        if elem.id.is_nil() {
            elem.id = Guid::generate();
        }
        let id = elem.id;
        self.elements.push(elem);
        id
    }

    /// Insert at `index` (same id assignment as [`ListCollection::append`]).
    pub fn insert(&mut self, index: usize, mut elem: Element) -> Guid {
        if elem.id.is_nil() {
            elem.id = Guid::generate();
        }
        let id = elem.id;
        self.elements.insert(index.min(self.elements.len()), elem);
        id
    }

    /// Remove and return the element at `index`.
    pub fn pop(&mut self, index: usize) -> Option<Element> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    /// First element carrying `id` (ids are addressing keys, not unique keys).
    pub fn get(&self, id: &Guid) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Mutable variant of [`ListCollection::get`].
    pub fn get_mut(&mut self, id: &Guid) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate elements in sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Snapshot sequence for publishing, in sequence order.
    pub fn to_runtime(&self) -> Vec<Element> {
        self.elements.clone()
    }
}

/// A named collection stored in a per-node bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    /// Large-set collection.
    Set(SetCollection),
    /// Large-list collection.
    List(ListCollection),
}

impl Collection {
    /// Empty collection of the given kind.
    pub fn new(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Set => Collection::Set(SetCollection::new()),
            CollectionKind::List => Collection::List(ListCollection::new()),
        }
    }

    /// Kind of this collection.
    pub fn kind(&self) -> CollectionKind {
        match self {
            Collection::Set(_) => CollectionKind::Set,
            Collection::List(_) => CollectionKind::List,
        }
    }

    /// Look up an element by identifier.
    pub fn get(&self, id: &Guid) -> Option<&Element> {
        match self {
            Collection::Set(s) => s.get(id),
            Collection::List(l) => l.get(id),
        }
    }

    /// Mutable lookup by identifier.
    pub fn get_mut(&mut self, id: &Guid) -> Option<&mut Element> {
        match self {
            Collection::Set(s) => s.get_mut(id),
            Collection::List(l) => l.get_mut(id),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Collection::Set(s) => s.len(),
            Collection::List(l) => l.len(),
        }
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate elements (sequence order for lists, unordered for sets).
    pub fn iter(&self) -> CollectionIter<'_> {
        match self {
            Collection::Set(s) => CollectionIter::Set(s.iter()),
            Collection::List(l) => CollectionIter::List(l.iter()),
        }
    }

    /// Snapshot sequence for publishing.
    pub fn to_runtime(&self) -> Vec<Element> {
        match self {
            Collection::Set(s) => s.to_runtime(),
            Collection::List(l) => l.to_runtime(),
        }
    }

    /// Element-address segment for a member of this collection.
    pub fn element_segment(&self, collection_name: &str, id: Guid) -> Segment {
        element_segment(collection_name, self.kind(), id)
    }
}

/// Element-address segment for `kind`-flavored collection `name`.
pub fn element_segment(name: &str, kind: CollectionKind, id: Guid) -> Segment {
    match kind {
        CollectionKind::Set => Segment::SetElement {
            collection: name.to_string(),
            id,
        },
        CollectionKind::List => Segment::ListElement {
            collection: name.to_string(),
            id,
        },
    }
}

/// Iterator over a collection's elements.
pub enum CollectionIter<'a> {
    /// Set iteration (unordered).
    Set(hash_map::Values<'a, Guid, Element>),
    /// List iteration (sequence order).
    List(std::slice::Iter<'a, Element>),
}

impl<'a> Iterator for CollectionIter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            CollectionIter::Set(it) => it.next(),
            CollectionIter::List(it) => it.next(),
        }
    }
}

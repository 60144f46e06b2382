// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Path addressing for fragmented object trees.
//!
//! Every overlay and collection bag is keyed by an absolute [`Path`] rooted
//! at the enclosing sample or builder. A path is an immutable sequence of
//! segments: plain attribute names, or element tokens addressing one member
//! of a named set/list collection by its GUID. Set and list tokens are
//! distinct kinds so structurally similar paths can never collide.
//!
//! List element tokens deliberately do not encode a position: the stable
//! addressing key is the element identifier, and publication order comes
//! from the `ListCollection` sequence itself (index-based addressing would
//! break under insert/pop).

use crate::guid::Guid;
use std::fmt;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Plain attribute name.
    Attr(String),
    /// Member of a set collection, addressed by element id.
    SetElement {
        /// Collection (attribute) name the element belongs to.
        collection: String,
        /// Element identifier.
        id: Guid,
    },
    /// Member of a list collection, addressed by element id.
    ListElement {
        /// Collection (attribute) name the element belongs to.
        collection: String,
        /// Element identifier.
        id: Guid,
    },
}

impl Segment {
    /// Attribute name, if this is an `Attr` segment.
    pub fn as_attr(&self) -> Option<&str> {
        match self {
            Segment::Attr(name) => Some(name),
            _ => None,
        }
    }

    /// Collection name, if this is an element token.
    pub fn collection_name(&self) -> Option<&str> {
        match self {
            Segment::SetElement { collection, .. } | Segment::ListElement { collection, .. } => {
                Some(collection)
            }
            Segment::Attr(_) => None,
        }
    }

    /// Element identifier, if this is an element token.
    pub fn element_id(&self) -> Option<Guid> {
        match self {
            Segment::SetElement { id, .. } | Segment::ListElement { id, .. } => Some(*id),
            Segment::Attr(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Attr(name) => write!(f, "{}", name),
            Segment::SetElement { collection, id } => write!(f, "{}{{set:{}}}", collection, id),
            Segment::ListElement { collection, id } => write!(f, "{}{{list:{}}}", collection, id),
        }
    }
}

/// Immutable ordered segment sequence, used as a map key everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty (root) path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Single-segment path from an attribute name.
    pub fn attr(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Attr(name.into())],
        }
    }

    /// Path from a sequence of attribute names.
    pub fn from_attrs<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: names.into_iter().map(|n| Segment::Attr(n.into())).collect(),
        }
    }

    /// Element-address suffix for "the member of set `collection` with id `id`".
    pub fn set_element(collection: impl Into<String>, id: Guid) -> Self {
        Self {
            segments: vec![Segment::SetElement {
                collection: collection.into(),
                id,
            }],
        }
    }

    /// Element-address suffix for "the member of list `collection` with id `id`".
    pub fn list_element(collection: impl Into<String>, id: Guid) -> Self {
        Self {
            segments: vec![Segment::ListElement {
                collection: collection.into(),
                id,
            }],
        }
    }

    /// New path with `segment` appended.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// New path with an attribute segment appended.
    pub fn child_attr(&self, name: impl Into<String>) -> Self {
        self.child(Segment::Attr(name.into()))
    }

    /// New path with every segment of `other` appended.
    pub fn join(&self, other: &Path) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// True when `prefix` is a (non-strict) prefix of this path.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Rebase this path by stripping `prefix`.
    ///
    /// Returns `None` when this path is not at or below `prefix`. A path
    /// equal to `prefix` rebases to the root path.
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Path> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Path {
            segments: self.segments[prefix.segments.len()..].to_vec(),
        })
    }

    /// Path without its last segment (`None` for the root).
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Path {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Last segment (`None` for the root).
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Split into (parent, last segment).
    pub fn split_last(&self) -> Option<(Path, &Segment)> {
        let last = self.segments.last()?;
        Some((
            Path {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            },
            last,
        ))
    }

    /// Segment slice.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl From<Segment> for Path {
    fn from(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

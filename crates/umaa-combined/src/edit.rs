// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Write-side navigation proxies: the mutable dual of the read views.
//!
//! [`BuilderEditView`] resolves names with the same overlay-over-base
//! precedence as the read side, but writes go through to the underlying
//! builder in place — no copies. A producer edits a nested composite as one
//! object; the builder records where each write landed so the top-level
//! writer can later split fragments correctly.

use crate::builder::CombinedBuilder;
use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::path::Path;
use crate::value::Value;
use std::collections::HashMap;

/// Outcome of one write-side resolution step.
#[derive(Debug)]
pub enum EditResolved<'v> {
    /// Leaf value.
    Value(&'v Value),
    /// Nested structured slot; navigate and mutate through the child view.
    View(BuilderEditView<'v>),
    /// A named collection at this node.
    Collection(&'v Collection),
    /// The node's collection bag.
    Collections(&'v HashMap<String, Collection>),
}

impl<'v> EditResolved<'v> {
    /// Leaf value, if this resolved to one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            EditResolved::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Child view, if this resolved to a nested slot.
    pub fn into_view(self) -> Option<BuilderEditView<'v>> {
        match self {
            EditResolved::View(v) => Some(v),
            _ => None,
        }
    }
}

// Slot kinds evaluated in fixed precedence order; classification runs with
// shared borrows so the acting match can reborrow mutably.
enum Slot {
    CollectionsBag,
    Collection,
    OverlayLeaf,
    Nested,
    BaseLeaf,
    Missing,
}

/// Write-through proxy over `(builder, path)`.
#[derive(Debug)]
pub struct BuilderEditView<'a> {
    builder: &'a mut CombinedBuilder,
    path: Path,
}

impl<'a> BuilderEditView<'a> {
    pub(crate) fn new(builder: &'a mut CombinedBuilder, path: Path) -> Self {
        Self { builder, path }
    }

    /// Absolute path this view is rooted at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying builder.
    pub fn builder(&mut self) -> &mut CombinedBuilder {
        self.builder
    }

    fn classify(&self, name: &str) -> Slot {
        if name == "collections" {
            return Slot::CollectionsBag;
        }
        if let Some(bag) = self.builder.collections_at(&self.path) {
            if bag.contains_key(name) {
                return Slot::Collection;
            }
        }
        if let Some(overlay) = self.builder.overlay_at(&self.path) {
            if let Some(value) = overlay.get_field(name) {
                return if value.is_structured() {
                    Slot::Nested
                } else {
                    Slot::OverlayLeaf
                };
            }
        }
        let deeper = self.path.child_attr(name);
        if self.builder.overlay_at(&deeper).is_some() {
            return Slot::Nested;
        }
        if let Some(base) = self.builder.base_value_at(&self.path) {
            if let Some(value) = base.get_field(name) {
                return if value.is_structured() {
                    Slot::Nested
                } else {
                    Slot::BaseLeaf
                };
            }
        }
        Slot::Missing
    }

    /// Resolve `name` with the read-side precedence; nested structured slots
    /// yield a child edit view instead of a read-only one.
    pub fn get(&mut self, name: &str) -> Result<EditResolved<'_>> {
        match self.classify(name) {
            Slot::CollectionsBag => Ok(EditResolved::Collections(
                self.builder.collections_at_mut(&self.path),
            )),
            Slot::Collection => {
                let col = self
                    .builder
                    .collections_at(&self.path)
                    .and_then(|bag| bag.get(name))
                    .ok_or_else(|| Error::NoSuchCollection(name.to_string()))?;
                Ok(EditResolved::Collection(col))
            }
            Slot::Nested => Ok(EditResolved::View(BuilderEditView::new(
                &mut *self.builder,
                self.path.child_attr(name),
            ))),
            Slot::OverlayLeaf => {
                let value = self
                    .builder
                    .overlay_at(&self.path)
                    .and_then(|ov| ov.get_field(name))
                    .ok_or_else(|| Error::NoSuchField(name.to_string()))?;
                Ok(EditResolved::Value(value))
            }
            Slot::BaseLeaf => {
                let value = self
                    .builder
                    .base_value_at(&self.path)
                    .and_then(|b| b.get_field(name))
                    .ok_or_else(|| Error::NoSuchField(name.to_string()))?;
                Ok(EditResolved::Value(value))
            }
            Slot::Missing => Err(Error::NoSuchField(format!("{} at {}", name, self.path))),
        }
    }

    /// Write `name` through to the overlay or base that owns it.
    ///
    /// Precedence: overlay with an existing attribute, base with an existing
    /// attribute, overlay (dynamic attribute), base (dynamic attribute).
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        // 1. Overlay registered here that already exposes the attribute.
        if let Some(overlay) = self.builder.overlay_at_mut(&self.path) {
            if overlay.get_field(name).is_some() {
                overlay.set_field(name, value);
                return Ok(());
            }
        }
        // 2. Base node that already exposes the attribute.
        if let Some(base) = self.builder.base_value_at_mut(&self.path) {
            if base.get_field(name).is_some() {
                base.set_field(name, value);
                return Ok(());
            }
        }
        // 3. Overlay registered here: create the attribute dynamically.
        if let Some(overlay) = self.builder.overlay_at_mut(&self.path) {
            return if overlay.set_field(name, value) {
                Ok(())
            } else {
                Err(Error::NotAStruct(format!(
                    "overlay at {} cannot take field {}",
                    self.path, name
                )))
            };
        }
        // 4. Base node: create the attribute dynamically.
        if let Some(base) = self.builder.base_value_at_mut(&self.path) {
            return if base.set_field(name, value) {
                Ok(())
            } else {
                Err(Error::NotAStruct(format!(
                    "base at {} cannot take field {}",
                    self.path, name
                )))
            };
        }
        Err(Error::NoSuchField(format!(
            "no overlay or base node at {}",
            self.path
        )))
    }

    /// Child view scoped one attribute deeper. No existence check; resolution
    /// happens on the next get/set.
    pub fn child(&mut self, name: &str) -> BuilderEditView<'_> {
        BuilderEditView::new(&mut *self.builder, self.path.child_attr(name))
    }
}

/// Owning handle around an in-progress builder.
///
/// Produced by the writer adapter's `new_combined`; hands out edit views and
/// unwraps back to the builder at publication time.
#[derive(Debug, Default)]
pub struct CombinedEditHandle {
    builder: CombinedBuilder,
}

impl CombinedEditHandle {
    /// Wrap a builder.
    pub fn new(builder: CombinedBuilder) -> Self {
        Self { builder }
    }

    /// Underlying builder.
    pub fn builder(&self) -> &CombinedBuilder {
        &self.builder
    }

    /// Mutable underlying builder.
    pub fn builder_mut(&mut self) -> &mut CombinedBuilder {
        &mut self.builder
    }

    /// Consume the handle, yielding the builder.
    pub fn into_builder(self) -> CombinedBuilder {
        self.builder
    }

    /// Root edit view.
    pub fn edit(&mut self) -> BuilderEditView<'_> {
        BuilderEditView::new(&mut self.builder, Path::root())
    }

    /// Edit view rooted at `path`.
    pub fn edit_at(&mut self, path: Path) -> BuilderEditView<'_> {
        BuilderEditView::new(&mut self.builder, path)
    }

    /// Shorthand for a root-level field write.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        self.edit().set(name, value)
    }
}

/// A mutable scope some editor can be anchored at: an edit handle at the
/// root, or an element handle at its element path.
pub trait EditScope {
    /// Builder the scope mutates.
    fn scope_builder_mut(&mut self) -> &mut CombinedBuilder;
    /// Absolute path the scope is anchored at.
    fn scope_path(&self) -> Path;
}

impl EditScope for CombinedEditHandle {
    fn scope_builder_mut(&mut self) -> &mut CombinedBuilder {
        &mut self.builder
    }

    fn scope_path(&self) -> Path {
        Path::root()
    }
}

impl EditScope for CombinedBuilder {
    fn scope_builder_mut(&mut self) -> &mut CombinedBuilder {
        self
    }

    fn scope_path(&self) -> Path {
        Path::root()
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
    fn set_prefers_existing_overlay_attribute() {
        let mut builder = CombinedBuilder::new(obj(&[("speed", 1.0f64.into())]));
        builder.add_overlay_at(Path::root(), obj(&[("speed", 2.0f64.into())]));

        let mut handle = CombinedEditHandle::new(builder);
        handle.set("speed", 5.0f64.into()).expect("write-through");

        let builder = handle.into_builder();
        // Overlay took the write; base is untouched.
        assert_eq!(
            builder
                .overlay_at(&Path::root())
                .and_then(|ov| ov.get_field("speed"))
                .and_then(Value::as_f64),
            Some(5.0)
        );
        assert_eq!(
            builder.base().get_field("speed").and_then(Value::as_f64),
            Some(1.0)
        );
    }

    #[test]
    fn set_falls_through_to_base_attribute() {
        let builder = CombinedBuilder::new(obj(&[("name", "old".into())]));
        let mut handle = CombinedEditHandle::new(builder);
        handle.set("name", "new".into()).expect("write-through");
        assert_eq!(
            handle.builder().base().get_field("name").and_then(Value::as_str),
            Some("new")
        );
    }

    #[test]
    fn set_creates_dynamic_attribute_on_overlay() {
        let mut builder = CombinedBuilder::new(Value::object());
        builder.add_overlay_at(Path::root(), Value::object());
        let mut handle = CombinedEditHandle::new(builder);

        handle.set("fresh", 1i64.into()).expect("dynamic attr");
        assert_eq!(
            handle
                .builder()
                .overlay_at(&Path::root())
                .and_then(|ov| ov.get_field("fresh"))
                .and_then(Value::as_i64),
            Some(1)
        );
        // Base never saw the write.
        assert!(handle.builder().base().get_field("fresh").is_none());
    }

    #[test]
    fn set_creates_dynamic_attribute_on_base_without_overlay() {
        let mut handle = CombinedEditHandle::new(CombinedBuilder::new(Value::object()));
        handle.set("fresh", 2i64.into()).expect("dynamic attr");
        assert_eq!(
            handle.builder().base().get_field("fresh").and_then(Value::as_i64),
            Some(2)
        );
    }

    #[test]
    fn get_mirrors_overlay_precedence() {
        let mut builder = CombinedBuilder::new(obj(&[("speed", 1.0f64.into())]));
        builder.add_overlay_at(Path::root(), obj(&[("speed", 9.0f64.into())]));
        let mut handle = CombinedEditHandle::new(builder);

        let mut view = handle.edit();
        let got = view.get("speed").expect("resolves");
        assert_eq!(got.as_value().and_then(Value::as_f64), Some(9.0));
        assert!(matches!(
            view.get("missing"),
            Err(Error::NoSuchField(_))
        ));
    }

    #[test]
    fn nested_write_lands_in_base_subtree() {
        let base = obj(&[("nav", obj(&[("depth", 1i64.into())]))]);
        let mut handle = CombinedEditHandle::new(CombinedBuilder::new(base));

        let mut root = handle.edit();
        let mut nav = root.get("nav").expect("nested").into_view().expect("view");
        nav.set("depth", 7i64.into()).expect("write-through");

        assert_eq!(
            handle
                .builder()
                .base_value_at(&Path::attr("nav"))
                .and_then(|v| v.get_field("depth"))
                .and_then(Value::as_i64),
            Some(7)
        );
    }

    #[test]
    fn nested_overlay_edit_through_child_view() {
        let mut builder = CombinedBuilder::new(Value::object());
        builder.add_overlay_at(Path::attr("body"), obj(&[("rpm", 1i64.into())]));
        let mut handle = CombinedEditHandle::new(builder);

        let mut root = handle.edit();
        let mut body = root.get("body").expect("overlay deeper").into_view().expect("view");
        body.set("rpm", 8i64.into()).expect("write-through");

        assert_eq!(
            handle
                .builder()
                .overlay_at(&Path::attr("body"))
                .and_then(|ov| ov.get_field("rpm"))
                .and_then(Value::as_i64),
            Some(8)
        );
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field classification for schema shapes.
//!
//! Generated schema types mark three field roles the runtime cares about:
//! large-list metadata, large-set metadata, and generalization slots. The
//! writer adapter uses the classification to pre-create collection bags and
//! to locate the unique generalization field when a specialization target
//! is not given explicitly.

use crate::collection::CollectionKind;
use crate::path::Path;
use crate::value::Value;

/// Recognized field roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Tagged slot a specialization overlay may replace.
    Generalization,
    /// Metadata header of a large-list collection.
    LargeList,
    /// Metadata header of a large-set collection.
    LargeSet,
}

/// Maps a shape to its classified fields, keyed by path relative to the
/// shape's root.
pub trait FieldClassifier: Send + Sync {
    /// Classified fields of `value`, in no particular order.
    fn classify(&self, value: &Value) -> Vec<(Path, FieldClass)>;
}

/// Name-suffix classifier matching the generated schema conventions:
/// `*ListMetadata`, `*SetMetadata`, `*Generalization`.
///
/// Schema code generation could emit a static classification table instead;
/// the suffix scan reproduces the same observable behavior for dynamic
/// values without a registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixClassifier;

impl SuffixClassifier {
    fn walk(value: &Value, prefix: &Path, out: &mut Vec<(Path, FieldClass)>) {
        for (name, field) in value.fields() {
            let path = prefix.child_attr(name.clone());
            if name.ends_with("ListMetadata") {
                out.push((path, FieldClass::LargeList));
            } else if name.ends_with("SetMetadata") {
                out.push((path, FieldClass::LargeSet));
            } else if name.ends_with("Generalization") {
                out.push((path, FieldClass::Generalization));
            } else if field.is_structured() {
                Self::walk(field, &path, out);
            }
        }
    }
}

impl FieldClassifier for SuffixClassifier {
    fn classify(&self, value: &Value) -> Vec<(Path, FieldClass)> {
        let mut out = Vec::new();
        Self::walk(value, &Path::root(), &mut out);
        out
    }
}

/// Collection name and kind implied by a metadata field name.
///
/// `contactsSetMetadata` names the set collection `contacts`;
/// `waypointsListMetadata` names the list collection `waypoints`.
pub fn collection_for_metadata_field(field: &str) -> Option<(&str, CollectionKind)> {
    if let Some(stem) = field.strip_suffix("ListMetadata") {
        return Some((stem, CollectionKind::List));
    }
    if let Some(stem) = field.strip_suffix("SetMetadata") {
        return Some((stem, CollectionKind::Set));
    }
    None
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
    fn classifies_metadata_and_generalization_fields() {
        let shape = obj(&[
            ("contactsSetMetadata", Value::object()),
            ("waypointsListMetadata", Value::object()),
            ("bodyGeneralization", Value::object()),
            ("plain", 1i64.into()),
        ]);

        let mut classes = SuffixClassifier.classify(&shape);
        classes.sort_by(|a, b| format!("{}", a.0).cmp(&format!("{}", b.0)));

        assert_eq!(
            classes,
            vec![
                (Path::attr("bodyGeneralization"), FieldClass::Generalization),
                (Path::attr("contactsSetMetadata"), FieldClass::LargeSet),
                (Path::attr("waypointsListMetadata"), FieldClass::LargeList),
            ]
        );
    }

    #[test]
    fn recurses_into_nested_structs() {
        let shape = obj(&[(
            "nav",
            obj(&[("tracksSetMetadata", Value::object())]),
        )]);
        let classes = SuffixClassifier.classify(&shape);
        assert_eq!(
            classes,
            vec![(
                Path::from_attrs(["nav", "tracksSetMetadata"]),
                FieldClass::LargeSet
            )]
        );
    }

    #[test]
    fn metadata_suffix_decodes_collection_name() {
        assert_eq!(
            collection_for_metadata_field("contactsSetMetadata"),
            Some(("contacts", CollectionKind::Set))
        );
        assert_eq!(
            collection_for_metadata_field("waypointsListMetadata"),
            Some(("waypoints", CollectionKind::List))
        );
        assert_eq!(collection_for_metadata_field("plain"), None);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types for schema-agnostic base and overlay objects.
//!
//! Combined samples and builders carry arbitrary user shapes. Rather than
//! reflecting over native structs, all base/overlay/element payloads are
//! `Value` trees accessed through `get_field`/`set_field`, which keeps the
//! overlay resolution algorithm independent of any concrete schema type.

use crate::guid::Guid;
use std::collections::HashMap;

/// A dynamic value that can hold any wire-level field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// UTF-8 string.
    String(String),
    /// Element/instance identifier.
    Guid(Guid),
    /// Nested object: named fields, the only structured variant.
    Struct(HashMap<String, Value>),
    /// Ordered sequence of values.
    Sequence(Vec<Value>),
    /// Absent/unset value.
    Null,
}

impl Value {
    /// Empty struct value, the starting point for freshly created objects.
    pub fn object() -> Self {
        Self::Struct(HashMap::new())
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Structured values get wrapped into views during navigation;
    /// everything else is returned raw.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64 (accepts i32/i64).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64 (accepts u32/u64).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U32(v) => Some(u64::from(*v)),
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64 (accepts f32/f64).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as GUID.
    pub fn as_guid(&self) -> Option<Guid> {
        match self {
            Self::Guid(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get struct field.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Try to get mutable struct field.
    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Self::Struct(fields) => fields.get_mut(name),
            _ => None,
        }
    }

    /// Set struct field. Returns `false` when the value is not a struct.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self {
            Self::Struct(fields) => {
                fields.insert(name.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Iterate struct fields (empty for non-structs).
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        match self {
            Self::Struct(fields) => Some(fields.iter()),
            _ => None,
        }
        .into_iter()
        .flatten()
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Guid> for Value {
    fn from(v: Guid) -> Self {
        Self::Guid(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_accessors() {
        let v = Value::from(42u32);
        assert_eq!(v.as_u64(), Some(42));
        assert_eq!(v.as_i64(), None);

        let v = Value::from(1.5f32);
        assert_eq!(v.as_f64(), Some(1.5));

        let v = Value::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert!(!v.is_structured());
    }

    #[test]
    fn struct_field_access() {
        let mut v = Value::object();
        assert!(v.set_field("x", 10i32.into()));
        assert!(v.set_field("y", 20i32.into()));

        assert_eq!(v.get_field("x").and_then(Value::as_i64), Some(10));
        assert_eq!(v.get_field("y").and_then(Value::as_i64), Some(20));
        assert!(v.get_field("z").is_none());
        assert!(v.is_structured());
        assert_eq!(v.fields().count(), 2);
    }

    #[test]
    fn set_field_on_leaf_fails() {
        let mut v = Value::from(1i32);
        assert!(!v.set_field("x", Value::Null));
    }

    #[test]
    fn guid_value() {
        let id = Guid::generate();
        let v = Value::from(id);
        assert_eq!(v.as_guid(), Some(id));
        assert!(v.as_str().is_none());
    }
}

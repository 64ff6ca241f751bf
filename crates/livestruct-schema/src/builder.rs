// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for object descriptors.

use crate::{ArrayDescriptor, FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
use std::sync::Arc;

/// Builder for object `TypeDescriptor`s.
///
/// Fields are encoded in the order they are added.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Create a new builder for an object type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind)))
    }

    /// Add a field with a type descriptor.
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a nullable primitive field.
    pub fn nullable_field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind).nullable()))
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    /// Add a signed variable-length integer field.
    pub fn int_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::VarInt { signed: true })
    }

    /// Add an unsigned variable-length integer field.
    pub fn uint_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::VarInt { signed: false })
    }

    /// Add a fixed-width integer field.
    pub fn fixed_int_field(self, name: impl Into<String>, signed: bool, bits: u8) -> Self {
        self.field(name, PrimitiveKind::FixedInt { signed, bits })
    }

    /// Add a float field (32 or 64 bits).
    pub fn float_field(self, name: impl Into<String>, bits: u8) -> Self {
        self.field(name, PrimitiveKind::Float { bits })
    }

    /// Add a complex field (64 or 128 bits).
    pub fn complex_field(self, name: impl Into<String>, bits: u8) -> Self {
        self.field(name, PrimitiveKind::Complex { bits })
    }

    pub fn bool_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::Bool)
    }

    /// Add a variable-length array field.
    pub fn array_field(self, name: impl Into<String>, element_kind: PrimitiveKind) -> Self {
        let element_type = Arc::new(TypeDescriptor::primitive(element_kind));
        let arr_desc = ArrayDescriptor::variable(element_type);
        self.field_with_type(name, Arc::new(TypeDescriptor::new("", TypeKind::Array(arr_desc))))
    }

    /// Add a fixed-length array field.
    pub fn fixed_array_field(
        self,
        name: impl Into<String>,
        element_kind: PrimitiveKind,
        length: usize,
    ) -> Self {
        let element_type = Arc::new(TypeDescriptor::primitive(element_kind));
        let arr_desc = ArrayDescriptor::fixed(element_type, length);
        self.field_with_type(name, Arc::new(TypeDescriptor::new("", TypeKind::Array(arr_desc))))
    }

    /// Add a nested object field.
    pub fn nested_field(self, name: impl Into<String>, nested: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, nested)
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::object(self.name, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let desc = SchemaBuilder::new("Person")
            .string_field("FirstName")
            .string_field("LastName")
            .int_field("Age")
            .float_field("Float1", 32)
            .build();

        let names: Vec<&str> = desc
            .fields()
            .expect("object")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["FirstName", "LastName", "Age", "Float1"]);
        assert_eq!(desc.name, "Person");
        assert!(!desc.nullable);
    }

    #[test]
    fn test_builder_field_kinds() {
        let inner = Arc::new(SchemaBuilder::new("Point").int_field("x").build());
        let desc = SchemaBuilder::new("Mixed")
            .nullable_field("nick", PrimitiveKind::String)
            .array_field("samples", PrimitiveKind::Float { bits: 64 })
            .fixed_array_field("rgb", PrimitiveKind::FixedInt { signed: false, bits: 8 }, 3)
            .nested_field("origin", inner.clone())
            .build();

        assert!(desc.field("nick").expect("nick").type_desc.nullable);
        match &desc.field("samples").expect("samples").type_desc.kind {
            TypeKind::Array(arr) => assert_eq!(arr.length, None),
            other => panic!("expected array, got {:?}", other),
        }
        match &desc.field("rgb").expect("rgb").type_desc.kind {
            TypeKind::Array(arr) => assert_eq!(arr.length, Some(3)),
            other => panic!("expected array, got {:?}", other),
        }
        assert_eq!(desc.field("origin").expect("origin").type_desc, inner);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the static shape of an exported record.

use crate::SchemaError;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    /// Variable-length integer (zig-zag mapped when signed).
    VarInt { signed: bool },
    /// Fixed-width little-endian integer. `bits` is 8, 16, 32 or 64.
    FixedInt { signed: bool, bits: u8 },
    /// IEEE-754 float. `bits` is 32 or 64.
    Float { bits: u8 },
    /// Pair of floats (real, imaginary). `bits` is 64 or 128.
    Complex { bits: u8 },
    String,
}

impl PrimitiveKind {
    /// Encoded size in bytes (None for variable-length kinds).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Bool => Some(1),
            Self::FixedInt { bits, .. } | Self::Float { bits } | Self::Complex { bits } => {
                Some(usize::from(*bits) / 8)
            }
            Self::VarInt { .. } | Self::String => None,
        }
    }

    /// Short name used in error messages and metadata.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::VarInt { .. } | Self::FixedInt { .. } => "int",
            Self::Float { .. } => "float",
            Self::Complex { .. } => "complex",
            Self::String => "string",
        }
    }

    /// Check that the bit width is one the codec supports.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::FixedInt { bits, .. } => matches!(bits, 8 | 16 | 32 | 64),
            Self::Float { bits } => matches!(bits, 32 | 64),
            Self::Complex { bits } => matches!(bits, 64 | 128),
            Self::Bool | Self::VarInt { .. } | Self::String => true,
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Aggregate with ordered named fields.
    Object(Vec<FieldDescriptor>),
    /// Array, fixed or variable length.
    Array(ArrayDescriptor),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name (may be empty for anonymous field types).
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Whether `Value::Null` is a legal value.
    pub nullable: bool,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }

    /// Create an anonymous primitive type descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new("", TypeKind::Primitive(kind))
    }

    /// Create an object type descriptor.
    pub fn object(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Object(fields))
    }

    /// Mark as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// Check if this is an object type.
    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object(_))
    }

    /// Get fields if this is an object.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }

    /// Short name of the kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            TypeKind::Primitive(p) => p.type_name(),
            TypeKind::Object(_) => "object",
            TypeKind::Array(_) => "array",
        }
    }

    /// Minimum encoded size (variable parts counted as one byte).
    ///
    /// Saturates at `usize::MAX` for very large fixed arrays.
    pub fn min_size(&self) -> usize {
        if self.nullable {
            return 1;
        }
        match &self.kind {
            TypeKind::Primitive(p) => p.size().unwrap_or(1),
            TypeKind::Object(fields) => fields
                .iter()
                .fold(0usize, |acc, f| acc.saturating_add(f.type_desc.min_size())),
            TypeKind::Array(arr) => match arr.length {
                Some(len) => arr.element_type.min_size().saturating_mul(len),
                None => 1,
            },
        }
    }

    /// Check the whole tree against what the codec supports.
    ///
    /// Rejects unsupported bit widths, duplicate or empty field names, and
    /// array elements that encode to zero bytes (their count could not be
    /// bounded by the input when decoding).
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_at("")
    }

    fn validate_at(&self, path: &str) -> Result<(), SchemaError> {
        let invalid = |reason: String| SchemaError::InvalidDescriptor {
            path: crate::error::display_path(path),
            reason,
        };

        match &self.kind {
            TypeKind::Primitive(p) => {
                if !p.is_valid() {
                    return Err(invalid(format!("unsupported bit width for {}", p.type_name())));
                }
            }
            TypeKind::Object(fields) => {
                for (i, field) in fields.iter().enumerate() {
                    if field.name.is_empty() {
                        return Err(invalid(format!("field {} has no name", i)));
                    }
                    if fields[..i].iter().any(|f| f.name == field.name) {
                        return Err(invalid(format!("duplicate field {}", field.name)));
                    }
                    let field_path = if path.is_empty() {
                        field.name.clone()
                    } else {
                        format!("{}.{}", path, field.name)
                    };
                    field.type_desc.validate_at(&field_path)?;
                }
            }
            TypeKind::Array(arr) => {
                let element_path = format!("{}[]", path);
                arr.element_type.validate_at(&element_path)?;
                if arr.element_type.min_size() == 0 {
                    return Err(invalid("array element encodes to zero bytes".into()));
                }
            }
        }
        Ok(())
    }
}

/// Field descriptor for object members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Fixed length (None = variable, count-prefixed).
    pub length: Option<usize>,
}

impl ArrayDescriptor {
    /// Create variable-length array.
    pub fn variable(element_type: Arc<TypeDescriptor>) -> Self {
        Self {
            element_type,
            length: None,
        }
    }

    /// Create fixed-length array.
    pub fn fixed(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length: Some(length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveKind::Bool.size(), Some(1));
        assert_eq!(
            PrimitiveKind::FixedInt {
                signed: false,
                bits: 32
            }
            .size(),
            Some(4)
        );
        assert_eq!(PrimitiveKind::Float { bits: 64 }.size(), Some(8));
        assert_eq!(PrimitiveKind::Complex { bits: 128 }.size(), Some(16));
        assert_eq!(PrimitiveKind::VarInt { signed: true }.size(), None);
        assert_eq!(PrimitiveKind::String.size(), None);
    }

    #[test]
    fn test_primitive_validity() {
        assert!(PrimitiveKind::Float { bits: 32 }.is_valid());
        assert!(!PrimitiveKind::Float { bits: 16 }.is_valid());
        assert!(!PrimitiveKind::Complex { bits: 32 }.is_valid());
        assert!(!PrimitiveKind::FixedInt {
            signed: true,
            bits: 24
        }
        .is_valid());
    }

    #[test]
    fn test_object_descriptor() {
        let text = Arc::new(TypeDescriptor::primitive(PrimitiveKind::String));
        let age = Arc::new(TypeDescriptor::primitive(PrimitiveKind::VarInt {
            signed: true,
        }));

        let desc = TypeDescriptor::object(
            "Person",
            vec![
                FieldDescriptor::new("FirstName", text),
                FieldDescriptor::new("Age", age),
            ],
        );
        assert!(desc.is_object());
        assert_eq!(desc.fields().map(|f| f.len()), Some(2));
        assert_eq!(desc.field_index("Age"), Some(1));
        assert!(desc.field("LastName").is_none());
        assert_eq!(desc.min_size(), 2);
    }

    #[test]
    fn test_array_descriptor() {
        let byte = Arc::new(TypeDescriptor::primitive(PrimitiveKind::FixedInt {
            signed: false,
            bits: 8,
        }));

        let variable = ArrayDescriptor::variable(byte.clone());
        assert!(variable.length.is_none());

        let fixed = ArrayDescriptor::fixed(byte, 4);
        assert_eq!(fixed.length, Some(4));
        let desc = TypeDescriptor::new("", TypeKind::Array(fixed));
        assert_eq!(desc.min_size(), 4);
        assert_eq!(desc.type_name(), "array");
    }

    #[test]
    fn test_min_size_saturates() {
        let wide = Arc::new(TypeDescriptor::primitive(PrimitiveKind::Float { bits: 64 }));
        let huge = Arc::new(TypeDescriptor::new(
            "",
            TypeKind::Array(ArrayDescriptor::fixed(wide, usize::MAX / 2)),
        ));
        assert_eq!(huge.min_size(), usize::MAX);

        let desc = TypeDescriptor::object(
            "Huge",
            vec![
                FieldDescriptor::new("a", huge.clone()),
                FieldDescriptor::new("b", huge),
            ],
        );
        assert_eq!(desc.min_size(), usize::MAX);
    }

    #[test]
    fn test_validate_bit_widths() {
        let zero = TypeDescriptor::object(
            "Bad",
            vec![FieldDescriptor::new(
                "x",
                Arc::new(TypeDescriptor::primitive(PrimitiveKind::FixedInt {
                    signed: true,
                    bits: 0,
                })),
            )],
        );
        assert!(matches!(
            zero.validate(),
            Err(SchemaError::InvalidDescriptor { ref path, .. }) if path == "x"
        ));

        let half = TypeDescriptor::primitive(PrimitiveKind::Float { bits: 16 });
        assert!(matches!(
            half.validate(),
            Err(SchemaError::InvalidDescriptor { ref path, .. }) if path == "$"
        ));
    }

    #[test]
    fn test_validate_zero_width_elements() {
        let empty = Arc::new(TypeDescriptor::object("Empty", Vec::new()));
        let desc = TypeDescriptor::new("", TypeKind::Array(ArrayDescriptor::variable(empty)));
        assert!(desc.min_size() > 0);
        assert!(matches!(
            desc.validate(),
            Err(SchemaError::InvalidDescriptor { ref path, .. }) if path == "[]"
        ));

        // An empty fixed array is fine as a field, not as an element.
        let byte = Arc::new(TypeDescriptor::primitive(PrimitiveKind::Bool));
        let none = Arc::new(TypeDescriptor::new(
            "",
            TypeKind::Array(ArrayDescriptor::fixed(byte, 0)),
        ));
        let holder = TypeDescriptor::object("Holder", vec![FieldDescriptor::new("none", none.clone())]);
        assert!(holder.validate().is_ok());
        let nested = TypeDescriptor::new("", TypeKind::Array(ArrayDescriptor::variable(none)));
        assert!(nested.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_fields() {
        let text = Arc::new(TypeDescriptor::primitive(PrimitiveKind::String));
        let desc = TypeDescriptor::object(
            "Twice",
            vec![
                FieldDescriptor::new("name", text.clone()),
                FieldDescriptor::new("name", text),
            ],
        );
        assert!(desc.validate().is_err());
    }
}

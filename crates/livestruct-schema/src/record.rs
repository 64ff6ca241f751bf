// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed records: statically declared shape plus value conversion.

use crate::{Complex, SchemaError, TypeDescriptor, Value};

/// An application record that can be exported.
///
/// The shape is declared once in [`Record::type_descriptor`]; it must not
/// depend on the current field values.
pub trait Record {
    /// Static field-descriptor list for this type.
    fn type_descriptor() -> TypeDescriptor;

    /// Current field values, in the shape of `type_descriptor()`.
    fn to_value(&self) -> Value;
}

/// Conversion back from a decoded [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, SchemaError>;
}

/// Read a named field of an object value.
pub fn field<T: FromValue>(value: &Value, name: &str) -> Result<T, SchemaError> {
    let field_value = value
        .get_field(name)
        .ok_or_else(|| SchemaError::MissingField(name.to_string()))?;
    T::from_value(field_value).map_err(|e| match e {
        SchemaError::TypeMismatch {
            expected, found, ..
        } => SchemaError::TypeMismatch {
            path: name.to_string(),
            expected,
            found,
        },
        other => other,
    })
}

fn mismatch(expected: &str, found: &Value) -> SchemaError {
    SchemaError::mismatch("", expected, found)
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        value.as_f64().ok_or_else(|| mismatch("float", value))
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| mismatch("float", value))
    }
}

impl FromValue for Complex {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        value.as_complex().ok_or_else(|| mismatch("complex", value))
    }
}

macro_rules! from_value_signed {
    ($($t:ty),*) => {$(
        impl FromValue for $t {
            fn from_value(value: &Value) -> Result<Self, SchemaError> {
                value
                    .as_i64()
                    .and_then(|v| <$t>::try_from(v).ok())
                    .ok_or_else(|| mismatch(stringify!($t), value))
            }
        }
    )*};
}

macro_rules! from_value_unsigned {
    ($($t:ty),*) => {$(
        impl FromValue for $t {
            fn from_value(value: &Value) -> Result<Self, SchemaError> {
                value
                    .as_u64()
                    .and_then(|v| <$t>::try_from(v).ok())
                    .ok_or_else(|| mismatch(stringify!($t), value))
            }
        }
    )*};
}

from_value_signed!(i8, i16, i32, i64);
from_value_unsigned!(u8, u16, u32, u64);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        value
            .as_array()
            .ok_or_else(|| mismatch("array", value))?
            .iter()
            .map(T::from_value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaBuilder;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
        label: Option<String>,
    }

    impl Record for Point {
        fn type_descriptor() -> TypeDescriptor {
            SchemaBuilder::new("Point")
                .int_field("x")
                .int_field("y")
                .nullable_field("label", crate::PrimitiveKind::String)
                .build()
        }

        fn to_value(&self) -> Value {
            Value::object([
                ("x", self.x.into()),
                ("y", self.y.into()),
                ("label", self.label.clone().into()),
            ])
        }
    }

    impl FromValue for Point {
        fn from_value(value: &Value) -> Result<Self, SchemaError> {
            Ok(Self {
                x: field(value, "x")?,
                y: field(value, "y")?,
                label: field(value, "label")?,
            })
        }
    }

    #[test]
    fn test_record_value_round_trip() {
        let p = Point {
            x: 3,
            y: -4,
            label: None,
        };
        assert_eq!(Point::from_value(&p.to_value()).expect("from_value"), p);
    }

    #[test]
    fn test_field_errors() {
        let v = Value::object([("x", Value::from("three"))]);
        let err = field::<i32>(&v, "x").expect_err("mismatch");
        assert_eq!(
            err.to_string(),
            "Type mismatch at x: expected i32, found string"
        );

        let err = field::<i32>(&v, "y").expect_err("missing");
        assert!(matches!(err, SchemaError::MissingField(ref n) if n == "y"));

        let big = Value::object([("x", Value::Int(1 << 40))]);
        assert!(field::<i32>(&big, "x").is_err());
        assert_eq!(field::<i64>(&big, "x").expect("i64"), 1 << 40);
    }

    #[test]
    fn test_vec_and_option() {
        let v = Value::from(vec![Some(1u8), None, Some(3)]);
        let out = Vec::<Option<u8>>::from_value(&v).expect("vec");
        assert_eq!(out, [Some(1), None, Some(3)]);
    }
}

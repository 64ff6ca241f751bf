// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schemas for exported records
//!
//! Describes the shape of a record at runtime and encodes its values into a
//! compact binary form that a remote reader can decode with nothing but the
//! JSON metadata of the schema.
//!
//! # Features
//!
//! - **TypeDescriptor**: static shape (primitives, objects, arrays, nullability)
//! - **Value**: type-erased field values
//! - **Builder API**: fluent construction of object descriptors
//! - **Codec**: varint/zig-zag binary encoding and decoding
//! - **Metadata**: self-describing JSON form of a schema
//!
//! # Example
//!
//! ```rust
//! use livestruct_schema::{Record, Schema, SchemaBuilder, TypeDescriptor, Value};
//!
//! struct Person {
//!     first_name: String,
//!     age: i64,
//! }
//!
//! impl Record for Person {
//!     fn type_descriptor() -> TypeDescriptor {
//!         SchemaBuilder::new("Person")
//!             .string_field("FirstName")
//!             .int_field("Age")
//!             .build()
//!     }
//!
//!     fn to_value(&self) -> Value {
//!         Value::object([
//!             ("FirstName", self.first_name.as_str().into()),
//!             ("Age", self.age.into()),
//!         ])
//!     }
//! }
//!
//! let schema = Schema::of::<Person>().unwrap();
//! let person = Person { first_name: "ben".into(), age: 42 };
//!
//! let bytes = schema.encode_record(&person).unwrap();
//! assert_eq!(bytes, [3, b'b', b'e', b'n', 84]);
//!
//! let decoded = schema.decode(&bytes).unwrap();
//! assert_eq!(decoded.get_field("Age").and_then(Value::as_i64), Some(42));
//! ```

mod builder;
mod codec;
mod descriptor;
mod error;
mod metadata;
mod record;
mod schema;
mod value;

pub use builder::SchemaBuilder;
pub use codec::{decode, encode, encode_to_vec};
pub use descriptor::{ArrayDescriptor, FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
pub use error::SchemaError;
pub use metadata::{from_metadata, to_metadata};
pub use record::{field, FromValue, Record};
pub use schema::Schema;
pub use value::{Complex, Value};

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable, shareable schema root.

use crate::{codec, metadata, FromValue, Record, SchemaError, TypeDescriptor, Value};
use std::io::Write;
use std::sync::Arc;

/// An immutable schema. Cloning shares the descriptor tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    root: Arc<TypeDescriptor>,
}

impl Schema {
    /// Wrap a root descriptor after validating the whole tree.
    pub fn new(root: TypeDescriptor) -> Result<Self, SchemaError> {
        root.validate()?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Derive the schema of a record type from its static descriptor.
    pub fn of<R: Record>() -> Result<Self, SchemaError> {
        Self::new(R::type_descriptor())
    }

    /// Parse a schema from JSON metadata.
    pub fn from_metadata(bytes: &[u8]) -> Result<Self, SchemaError> {
        let root = metadata::from_metadata(bytes)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Root descriptor.
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.root
    }

    /// Serialize to self-describing JSON metadata.
    pub fn to_metadata(&self) -> Result<Vec<u8>, SchemaError> {
        metadata::to_metadata(&self.root)
    }

    /// Encode `value` into `sink`.
    ///
    /// On error, `sink` may hold a partial encoding; callers that need
    /// all-or-nothing output should encode into a buffer first.
    pub fn encode<W: Write>(&self, value: &Value, sink: &mut W) -> Result<(), SchemaError> {
        codec::encode(&self.root, value, sink)
    }

    /// Encode `value` into a new buffer.
    pub fn encode_to_vec(&self, value: &Value) -> Result<Vec<u8>, SchemaError> {
        codec::encode_to_vec(&self.root, value)
    }

    /// Encode a typed record.
    pub fn encode_record<R: Record>(&self, record: &R) -> Result<Vec<u8>, SchemaError> {
        self.encode_to_vec(&record.to_value())
    }

    /// Decode a value; the whole buffer must be consumed.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value, SchemaError> {
        codec::decode(&self.root, bytes)
    }

    /// Decode straight into a typed record.
    pub fn decode_record<R: FromValue>(&self, bytes: &[u8]) -> Result<R, SchemaError> {
        R::from_value(&self.decode(bytes)?)
    }
}

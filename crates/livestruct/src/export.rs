// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Export service: schema and data reads against the record store.

use crate::store::RecordStore;
use axum::body::Bytes;
use livestruct_schema::{Record, Schema, SchemaError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request-level export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Request used a method other than GET. Nothing was touched.
    #[error("Invalid Invocation")]
    MethodNotAllowed,

    /// The schema descriptor could not be serialized.
    #[error("internal error: schema serialization failed: {0}")]
    SchemaSerialization(#[source] SchemaError),

    /// The record's current value could not be encoded. The lock has
    /// already been released when this is returned.
    #[error("internal error: encoding failed: {0}")]
    Encoding(#[source] SchemaError),
}

/// Serves the schema and consistent encoded snapshots of one record.
pub struct ExportService<R> {
    store: Arc<RecordStore<R>>,
    schema: Schema,
}

impl<R: Record> ExportService<R> {
    /// Derive the schema of `R` once and bind it to `store`.
    ///
    /// Fails if `R` declares a descriptor the codec cannot encode.
    pub fn new(store: Arc<RecordStore<R>>) -> Result<Self, SchemaError> {
        let schema = Schema::of::<R>()?;
        info!(
            "Export schema derived: {} ({} fields)",
            schema.descriptor().name,
            schema.descriptor().fields().map_or(0, |f| f.len())
        );
        Ok(Self { store, schema })
    }

    /// The schema derived at construction.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The store this service reads from.
    pub fn store(&self) -> &Arc<RecordStore<R>> {
        &self.store
    }

    /// Serialized schema metadata. Does not touch the record lock.
    pub fn schema_metadata(&self) -> Result<Bytes, ExportError> {
        let bytes = self
            .schema
            .to_metadata()
            .map_err(ExportError::SchemaSerialization)?;
        debug!("Schema metadata: {} bytes", bytes.len());
        Ok(Bytes::from(bytes))
    }

    /// Encode the record's current value.
    ///
    /// The lock is held for the whole read-and-encode and released before
    /// returning, on success and on failure alike. The caller writes the
    /// bytes to the network without holding it.
    pub fn encode_current(&self) -> Result<Bytes, ExportError> {
        let encoded = {
            let record = self.store.acquire();
            self.schema.encode_record(&*record)
        };
        let bytes = encoded.map_err(ExportError::Encoding)?;
        debug!("Encoded snapshot: {} bytes", bytes.len());
        Ok(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livestruct_schema::{SchemaBuilder, TypeDescriptor, Value};

    /// Record whose `level` can be forced out of the declared range.
    #[derive(Debug, Clone)]
    struct Gauge {
        label: String,
        level: i64,
    }

    impl Record for Gauge {
        fn type_descriptor() -> TypeDescriptor {
            SchemaBuilder::new("Gauge")
                .string_field("label")
                .fixed_int_field("level", true, 8)
                .build()
        }

        fn to_value(&self) -> Value {
            Value::object([
                ("label", self.label.as_str().into()),
                ("level", self.level.into()),
            ])
        }
    }

    fn service(level: i64) -> ExportService<Gauge> {
        let store = Arc::new(RecordStore::new(Gauge {
            label: "tank".into(),
            level,
        }));
        ExportService::new(store).expect("valid schema")
    }

    #[test]
    fn test_encode_current() {
        let service = service(7);
        let bytes = service.encode_current().expect("encode");
        assert_eq!(&bytes[..], &[4, b't', b'a', b'n', b'k', 7]);
        assert!(!service.store().is_locked());
    }

    #[test]
    fn test_encoding_error_releases_lock() {
        let service = service(1000);
        let err = service.encode_current().expect_err("1000 does not fit in i8");
        assert!(matches!(err, ExportError::Encoding(_)));
        assert!(err.to_string().starts_with("internal error: encoding failed"));
        assert!(!service.store().is_locked());

        service.store().update(|g| g.level = -3);
        let bytes = service.encode_current().expect("encode after fix");
        assert_eq!(bytes.last(), Some(&0xfd));
    }

    #[test]
    fn test_schema_metadata_ignores_record_lock() {
        let service = service(0);
        let first = service.schema_metadata().expect("metadata");

        // Holding the record lock must not block schema reads.
        let guard = service.store().acquire();
        let second = service.schema_metadata().expect("metadata");
        drop(guard);

        assert_eq!(first, second);
        let json: serde_json::Value = serde_json::from_slice(&first).expect("json");
        assert_eq!(json["name"], "Gauge");
        assert_eq!(json["fields"][1]["bits"], 8);
    }

    /// Record declaring a fixed int with no width.
    struct Widthless;

    impl Record for Widthless {
        fn type_descriptor() -> TypeDescriptor {
            SchemaBuilder::new("Widthless")
                .fixed_int_field("x", true, 0)
                .build()
        }

        fn to_value(&self) -> Value {
            Value::object([("x", 1i64.into())])
        }
    }

    /// Record declaring a float width no reader can parse.
    struct HalfFloat;

    impl Record for HalfFloat {
        fn type_descriptor() -> TypeDescriptor {
            SchemaBuilder::new("HalfFloat").float_field("f", 16).build()
        }

        fn to_value(&self) -> Value {
            Value::object([("f", 1.0f64.into())])
        }
    }

    #[test]
    fn test_unsupported_descriptor_rejected_at_construction() {
        let err = ExportService::new(Arc::new(RecordStore::new(Widthless)))
            .err()
            .expect("zero-width int");
        assert!(matches!(
            err,
            SchemaError::InvalidDescriptor { ref path, .. } if path == "x"
        ));

        let err = ExportService::new(Arc::new(RecordStore::new(HalfFloat)))
            .err()
            .expect("16-bit float");
        assert!(matches!(err, SchemaError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_method_not_allowed_message() {
        assert_eq!(ExportError::MethodNotAllowed.to_string(), "Invalid Invocation");
    }
}

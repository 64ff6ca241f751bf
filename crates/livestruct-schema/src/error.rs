// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema engine errors.

use thiserror::Error;

/// Errors raised while encoding, decoding or (de)serializing a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Unexpected null at {0} (type is not nullable)")]
    UnexpectedNull(String),

    #[error("Value out of range at {path}: {value} does not fit in {bits} bits")]
    ValueOutOfRange {
        path: String,
        value: String,
        bits: u8,
    },

    #[error("Array length mismatch at {path}: expected {expected}, got {got}")]
    LengthMismatch {
        path: String,
        expected: usize,
        got: usize,
    },

    #[error("Truncated input: need {need} bytes at offset {offset}, have {have}")]
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("Invalid null flag {flag:#04x} at offset {offset}")]
    InvalidNullFlag { offset: usize, flag: u8 },

    #[error("Varint too long at offset {0}")]
    VarIntOverflow(usize),

    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Trailing bytes after value: {0}")]
    TrailingBytes(usize),

    #[error("Invalid type descriptor at {path}: {reason}")]
    InvalidDescriptor { path: String, reason: String },

    #[error("Invalid schema metadata: {0}")]
    InvalidMetadata(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub(crate) fn mismatch(path: &str, expected: impl Into<String>, found: &crate::Value) -> Self {
        Self::TypeMismatch {
            path: display_path(path),
            expected: expected.into(),
            found: found.kind_name().to_string(),
        }
    }
}

/// Root values have an empty path; show them as `$`.
pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

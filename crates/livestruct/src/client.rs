// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reader client for a running export server.
//!
//! Fetches the schema metadata once, then decodes any number of data
//! snapshots against it. The client needs no compile-time knowledge of the
//! exported record.

use crate::http::{DATA_PATH, SCHEMA_PATH};
use livestruct_schema::{FromValue, Schema, SchemaError, Value};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// HTTP client for the schema and data endpoints.
#[derive(Debug, Clone)]
pub struct ExportClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExportClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and parse the schema metadata.
    pub async fn fetch_schema(&self) -> Result<Schema, ClientError> {
        let body = self.get(SCHEMA_PATH).await?;
        Ok(Schema::from_metadata(&body)?)
    }

    /// Fetch the raw bytes of the current record.
    pub async fn fetch_raw(&self) -> Result<Vec<u8>, ClientError> {
        self.get(DATA_PATH).await
    }

    /// Fetch the current record and decode it against `schema`.
    pub async fn fetch_data(&self, schema: &Schema) -> Result<Value, ClientError> {
        let body = self.fetch_raw().await?;
        Ok(schema.decode(&body)?)
    }

    /// Fetch the current record as a typed value.
    pub async fn fetch_record<T: FromValue>(&self, schema: &Schema) -> Result<T, ClientError> {
        let value = self.fetch_data(schema).await?;
        Ok(T::from_value(&value)?)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, message });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ExportClient::new("http://127.0.0.1:8080/").expect("client");
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_status_error_message() {
        let err = ClientError::Status {
            status: StatusCode::NOT_FOUND,
            message: "Invalid Invocation".into(),
        };
        assert_eq!(
            err.to_string(),
            "Server returned 404 Not Found: Invalid Invocation"
        );
    }
}

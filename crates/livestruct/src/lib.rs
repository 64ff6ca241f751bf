// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! livestruct - Live record export over HTTP
//!
//! Exposes one in-process record, mutated concurrently by a background
//! updater, to remote readers as a JSON schema plus compact binary snapshots.
//!
//! # Architecture
//!
//! ```text
//! updater ──update()──► RecordStore ◄──acquire()── ExportService ◄── axum router
//!                        (one lock)                (schema, once)     /get-schema/
//!                                                                     /get-data/
//! ```
//!
//! Every data request holds the lock for the whole read-and-encode and
//! releases it before the response is written.
//!
//! # Example
//!
//! ```rust,no_run
//! use livestruct::{demo::Person, http, spawn_updater, AppState, ExportService, RecordStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RecordStore::new(Person::default()));
//! let updater = spawn_updater(store.clone(), Duration::from_secs(1), Person::tick);
//!
//! let state = AppState::new(ExportService::new(store)?).with_updater(updater);
//! let app = http::router(Arc::new(state));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod demo;
pub mod export;
pub mod http;
pub mod store;
pub mod updater;

pub use client::{ClientError, ExportClient};
pub use config::{ConfigError, ServerConfig};
pub use export::{ExportError, ExportService};
pub use http::{router, AppState};
pub use store::{RecordGuard, RecordStore};
pub use updater::{spawn_updater, UpdaterHandle};

pub use livestruct_schema as schema;

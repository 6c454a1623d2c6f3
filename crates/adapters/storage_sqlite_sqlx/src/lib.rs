//! # heimhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using sqlx.
//!
//! Implements the [`HistorySink`](heimhub_app::ports::HistorySink) port:
//! a write-through mirror of the device registry plus append-only history
//! tables. The database is never read at runtime — the in-memory registry
//! stays the source of truth and a failed write is logged by the caller
//! and dropped.
//!
//! ## Dependency rule
//! Depends on `heimhub-app` and `heimhub-domain`; never the other way
//! around.

pub mod error;
pub mod history_sink;
pub mod pool;

pub use error::StorageError;
pub use history_sink::SqliteHistorySink;
pub use pool::{Config, Database};

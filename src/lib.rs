//! Generated-key and row-mapping helpers for SQLite in the Runar ecosystem.
//!
//! # Intention
//!
//! - Make it cheap to get database-generated keys back after single-row and
//!   batch inserts.
//! - Map query rows into [`ResultMap`]s or typed values without boilerplate.
//!
//! # Architectural Boundaries
//!
//! - Thin helpers over `rusqlite` only. Connections, statements and cursors
//!   stay owned by the caller.
//! - No connection pooling, schema management or query templating.

pub mod batch;
pub mod config;
pub mod error;
pub mod generated_keys;
pub mod key_holder;
pub mod result_set;
pub mod value;

pub use batch::{
    batch_insert, batch_insert_with_config, supports_batch_updates, BatchSetter, ValueBatch,
};
pub use config::{BatchInsertConfig, BatchMode};
pub use error::{Error, Result};
pub use generated_keys::{
    insert_with_keys, prepare_with_generated_keys, with_returning_clause, GeneratedKeysExt,
};
pub use key_holder::KeyHolder;
pub use result_set::{query_for_maps, query_mapped, RowExt, RowMapper, RowsExt};
pub use value::{FromValue, ResultMap, Value};

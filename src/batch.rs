//! Batch inserts that hand back the generated keys.
//!
//! Only use these when the keys are actually needed; a plain
//! `Statement::execute` loop is cheaper otherwise.

use crate::config::{BatchInsertConfig, BatchMode};
use crate::error::Result;
use crate::generated_keys::prepare_with_generated_keys;
use crate::key_holder::KeyHolder;
use crate::result_set::RowExt;
use crate::value::{ResultMap, Value};
use rusqlite::{Connection, Statement};
use tracing::{debug, trace};

/// First SQLite release with `RETURNING` (3.35.0).
const RETURNING_MIN_VERSION: i32 = 3_035_000;

/// Feeds the parameters of each batch entry into the prepared statement.
pub trait BatchSetter {
    /// Number of entries in the batch.
    fn batch_size(&self) -> usize;

    /// Binds the parameters of entry `i`.
    fn set_values(&mut self, stmt: &mut Statement<'_>, i: usize) -> rusqlite::Result<()>;

    /// Checked right after entry `i` was bound. `true` stops the batch
    /// without executing entry `i`.
    fn is_batch_exhausted(&self, _i: usize) -> bool {
        false
    }

    /// Called once the batch is done, whether it succeeded or not.
    fn cleanup_parameters(&mut self) {}
}

/// A [`BatchSetter`] over pre-built rows of positional parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValueBatch {
    rows: Vec<Vec<Value>>,
}

impl ValueBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }
}

impl From<Vec<Vec<Value>>> for ValueBatch {
    fn from(rows: Vec<Vec<Value>>) -> Self {
        Self { rows }
    }
}

impl BatchSetter for ValueBatch {
    fn batch_size(&self) -> usize {
        self.rows.len()
    }

    fn set_values(&mut self, stmt: &mut Statement<'_>, i: usize) -> rusqlite::Result<()> {
        stmt.clear_bindings();
        let Some(row) = self.rows.get(i) else {
            return Ok(());
        };
        for (index, value) in row.iter().enumerate() {
            stmt.raw_bind_parameter(index + 1, value)?;
        }
        Ok(())
    }
}

/// Whether the linked SQLite can run a batch and return its keys (`RETURNING`).
pub fn supports_batch_updates() -> bool {
    rusqlite::version_number() >= RETURNING_MIN_VERSION
}

/// [`batch_insert_with_config`] with the default configuration.
pub fn batch_insert<S>(
    conn: &Connection,
    sql: &str,
    setter: &mut S,
    key_holder: &mut KeyHolder,
) -> Result<Vec<usize>>
where
    S: BatchSetter + ?Sized,
{
    batch_insert_with_config(conn, sql, &BatchInsertConfig::default(), setter, key_holder)
}

/// Executes `sql` once per batch entry and collects the generated keys into `key_holder`.
///
/// The holder is cleared first. Returns the affected row count of every
/// executed entry.
///
/// Entries that insert nothing report `0` and add no key row.
///
/// In batched mode all entries run as one unit: inside a new transaction on
/// an autocommit connection, or inside the caller's open transaction. Keys
/// reach the holder only once the whole batch succeeded. In row-by-row mode
/// each entry runs on its own and an inserting entry contributes one key row holding
/// `last_insert_rowid()` under the first configured key column (`rowid` if
/// none is configured).
pub fn batch_insert_with_config<S>(
    conn: &Connection,
    sql: &str,
    config: &BatchInsertConfig,
    setter: &mut S,
    key_holder: &mut KeyHolder,
) -> Result<Vec<usize>>
where
    S: BatchSetter + ?Sized,
{
    debug!("Executing SQL batch update [{}]", sql);
    key_holder.clear();

    let batched = match config.mode {
        BatchMode::Auto => supports_batch_updates(),
        BatchMode::Batched => true,
        BatchMode::RowByRow => false,
    };

    let result = if batched {
        execute_batched(conn, sql, config, setter, key_holder)
    } else {
        execute_row_by_row(conn, sql, config, setter, key_holder)
    };
    setter.cleanup_parameters();

    if let Ok(counts) = &result {
        trace!(
            "Batch executed {} of {} entries (batched: {}), {} key rows",
            counts.len(),
            setter.batch_size(),
            batched,
            key_holder.len()
        );
    }
    result
}

fn execute_batched<S>(
    conn: &Connection,
    sql: &str,
    config: &BatchInsertConfig,
    setter: &mut S,
    key_holder: &mut KeyHolder,
) -> Result<Vec<usize>>
where
    S: BatchSetter + ?Sized,
{
    let mut keys = Vec::new();
    let counts = if conn.is_autocommit() {
        let tx = conn.unchecked_transaction()?;
        let counts = add_batch(&tx, sql, config, setter, &mut keys)?;
        tx.commit()?;
        counts
    } else {
        add_batch(conn, sql, config, setter, &mut keys)?
    };

    for row in keys {
        key_holder.push(row);
    }
    Ok(counts)
}

fn add_batch<S>(
    conn: &Connection,
    sql: &str,
    config: &BatchInsertConfig,
    setter: &mut S,
    keys: &mut Vec<ResultMap>,
) -> Result<Vec<usize>>
where
    S: BatchSetter + ?Sized,
{
    let mut stmt = prepare_with_generated_keys(conn, sql, &config.key_column_refs())?;
    let batch_size = setter.batch_size();
    let mut counts = Vec::with_capacity(batch_size);

    for i in 0..batch_size {
        setter.set_values(&mut stmt, i)?;
        if setter.is_batch_exhausted(i) {
            break;
        }
        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            keys.push(row.to_result_map()?);
        }
        counts.push(conn.changes() as usize);
    }
    Ok(counts)
}

fn execute_row_by_row<S>(
    conn: &Connection,
    sql: &str,
    config: &BatchInsertConfig,
    setter: &mut S,
    key_holder: &mut KeyHolder,
) -> Result<Vec<usize>>
where
    S: BatchSetter + ?Sized,
{
    let key_name = config.key_columns.first().map_or("rowid", String::as_str);
    let mut stmt = conn.prepare(sql)?;
    let batch_size = setter.batch_size();
    let mut counts = Vec::with_capacity(batch_size);

    for i in 0..batch_size {
        setter.set_values(&mut stmt, i)?;
        if setter.is_batch_exhausted(i) {
            break;
        }
        let affected = stmt.raw_execute()?;
        counts.push(affected);
        // last_insert_rowid() still holds the previous row when nothing was inserted.
        if affected > 0 {
            key_holder.push(ResultMap::from([(
                key_name.to_string(),
                Value::Integer(conn.last_insert_rowid()),
            )]));
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_sqlite_supports_returning() {
        assert!(supports_batch_updates());
    }

    #[test]
    fn value_batch_sizes_by_rows() {
        let batch = ValueBatch::new().with_row(["Z"]).with_row(["Y"]);
        assert_eq!(batch.batch_size(), 2);
        assert!(!batch.is_batch_exhausted(0));
    }
}

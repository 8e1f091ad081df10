//! Generated keys of a single statement.
//!
//! SQLite hands back generated keys through a `RETURNING` clause. An insert
//! prepared with [`prepare_with_generated_keys`] yields a key cursor when
//! queried, and [`GeneratedKeysExt`] reads typed keys from that cursor.

use crate::error::Result;
use crate::key_holder::KeyHolder;
use crate::result_set::{RowExt, RowsExt};
use crate::value::FromValue;
use rusqlite::{Connection, Params, RowIndex, Rows, Statement};
use tracing::debug;

/// Appends a `RETURNING` clause for `key_columns` (or `*` when empty) to `sql`.
///
/// Statements that already return something are left untouched.
pub fn with_returning_clause(sql: &str, key_columns: &[&str]) -> String {
    let sql = sql.trim_end().trim_end_matches(';').trim_end();
    if has_returning_clause(sql) {
        return sql.to_string();
    }
    let columns = if key_columns.is_empty() {
        "*".to_string()
    } else {
        key_columns.join(", ")
    };
    format!("{sql} RETURNING {columns}")
}

/// Whether `RETURNING` appears as a keyword, outside of literals, quoted
/// identifiers and comments.
fn has_returning_clause(sql: &str) -> bool {
    let mut code = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' | '[' => {
                let close = if c == '[' { ']' } else { c };
                for inner in chars.by_ref() {
                    if inner == close {
                        break;
                    }
                }
                code.push(' ');
            }
            '-' if chars.peek() == Some(&'-') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
                code.push(' ');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = ' ';
                for inner in chars.by_ref() {
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
                code.push(' ');
            }
            _ => code.push(c),
        }
    }
    code.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| word.eq_ignore_ascii_case("returning"))
}

/// Prepares `sql` so that executing it returns the generated keys.
pub fn prepare_with_generated_keys<'conn>(
    conn: &'conn Connection,
    sql: &str,
    key_columns: &[&str],
) -> rusqlite::Result<Statement<'conn>> {
    conn.prepare(&with_returning_clause(sql, key_columns))
}

/// Typed access to a generated-key cursor.
pub trait GeneratedKeysExt {
    /// The `column` (name or index) of the first key row.
    ///
    /// `None` if there is no key row, no such column, a `NULL` or a value
    /// that is not an `R`.
    fn single_generated_key<R, I>(&mut self, column: I) -> rusqlite::Result<Option<R>>
    where
        R: FromValue,
        I: RowIndex;

    /// The `column` of every remaining key row, in order.
    fn generated_keys<R, I>(&mut self, column: I) -> rusqlite::Result<Vec<Option<R>>>
    where
        R: FromValue,
        I: RowIndex + Copy;
}

impl GeneratedKeysExt for Rows<'_> {
    fn single_generated_key<R, I>(&mut self, column: I) -> rusqlite::Result<Option<R>>
    where
        R: FromValue,
        I: RowIndex,
    {
        match self.next()? {
            Some(row) => Ok(row.value(column)?.as_ref().and_then(R::from_value)),
            None => Ok(None),
        }
    }

    fn generated_keys<R, I>(&mut self, column: I) -> rusqlite::Result<Vec<Option<R>>>
    where
        R: FromValue,
        I: RowIndex + Copy,
    {
        self.map_rows(|row| Ok(row.value(column)?.as_ref().and_then(R::from_value)))
    }
}

/// Executes a single insert and stores its generated keys in `key_holder`.
///
/// The holder is cleared first. Returns the number of inserted rows as
/// reported by `sqlite3_changes`.
pub fn insert_with_keys<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    key_columns: &[&str],
    key_holder: &mut KeyHolder,
) -> Result<usize> {
    debug!("Executing SQL update and returning generated keys [{}]", sql);
    key_holder.clear();

    let mut stmt = prepare_with_generated_keys(conn, sql, key_columns)?;
    let mut rows = stmt.query(params)?;
    while let Some(row) = rows.next()? {
        key_holder.push(row.to_result_map()?);
    }
    Ok(conn.changes() as usize)
}

//! Mapping of cursor rows into [`ResultMap`]s and typed values.

use crate::error::Result;
use crate::value::{ResultMap, Value};
use rusqlite::{Connection, Params, Row, RowIndex, Rows};

/// Maps one row of a query to a typed value. `row_num` starts at 0.
pub trait RowMapper<T> {
    fn map_row(&self, row: &Row<'_>, row_num: usize) -> rusqlite::Result<T>;
}

impl<T, F> RowMapper<T> for F
where
    F: Fn(&Row<'_>, usize) -> rusqlite::Result<T>,
{
    fn map_row(&self, row: &Row<'_>, row_num: usize) -> rusqlite::Result<T> {
        self(row, row_num)
    }
}

pub trait RowExt {
    /// Every column of the row, keyed by column name.
    fn to_result_map(&self) -> rusqlite::Result<ResultMap>;

    /// The value of `column` (name or 0-based index), `None` if the row has no such column.
    fn value<I: RowIndex>(&self, column: I) -> rusqlite::Result<Option<Value>>;
}

impl RowExt for Row<'_> {
    fn to_result_map(&self) -> rusqlite::Result<ResultMap> {
        let stmt = self.as_ref();
        let mut map = ResultMap::with_capacity(stmt.column_count());
        for i in 0..stmt.column_count() {
            let name = stmt.column_name(i)?.to_string();
            map.insert(name, Value::from(self.get_ref(i)?));
        }
        Ok(map)
    }

    fn value<I: RowIndex>(&self, column: I) -> rusqlite::Result<Option<Value>> {
        match self.get_ref(column) {
            Ok(value) => Ok(Some(Value::from(value))),
            Err(rusqlite::Error::InvalidColumnName(_) | rusqlite::Error::InvalidColumnIndex(_)) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

pub trait RowsExt {
    /// Applies `f` to each remaining row and collects the results in row order.
    fn map_rows<T, F>(&mut self, f: F) -> rusqlite::Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>;
}

impl RowsExt for Rows<'_> {
    fn map_rows<T, F>(&mut self, mut f: F) -> rusqlite::Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut result = Vec::new();
        while let Some(row) = self.next()? {
            result.push(f(row)?);
        }
        Ok(result)
    }
}

/// Runs `sql` and returns one [`ResultMap`] per row.
pub fn query_for_maps<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<ResultMap>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let maps = rows.map_rows(|row| row.to_result_map())?;
    Ok(maps)
}

/// Runs `sql` and maps every row through `mapper`.
pub fn query_mapped<T, P, M>(conn: &Connection, sql: &str, params: P, mapper: M) -> Result<Vec<T>>
where
    P: Params,
    M: RowMapper<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut row_num = 0;
    let mapped = rows.map_rows(|row| {
        let item = mapper.map_row(row, row_num);
        row_num += 1;
        item
    })?;
    Ok(mapped)
}

use crate::error::{Error, Result};
use crate::value::{FromValue, ResultMap};

/// Collects the generated-key rows of an insert, one [`ResultMap`] per row.
///
/// Insert helpers clear the holder before they run, so it only ever reflects
/// the most recent operation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeyHolder {
    key_list: Vec<ResultMap>,
}

impl KeyHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_list(&self) -> &[ResultMap] {
        &self.key_list
    }

    pub fn len(&self) -> usize {
        self.key_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_list.is_empty()
    }

    pub fn clear(&mut self) {
        self.key_list.clear();
    }

    pub fn push(&mut self, keys: ResultMap) {
        self.key_list.push(keys);
    }

    /// The `name` column of every key row, `None` where it is absent or not an `R`.
    pub fn extract<R: FromValue>(&self, name: &str) -> Vec<Option<R>> {
        self.key_list
            .iter()
            .map(|keys| keys.get(name).and_then(R::from_value))
            .collect()
    }

    /// The only key row, or `None` if nothing was generated.
    pub fn keys(&self) -> Result<Option<&ResultMap>> {
        match self.key_list.as_slice() {
            [] => Ok(None),
            [keys] => Ok(Some(keys)),
            many => Err(Error::IncorrectKeyCount {
                rows: many.len(),
                columns: many[0].len(),
            }),
        }
    }

    /// The only generated key value.
    ///
    /// Fails unless the single row holds exactly one column.
    pub fn key<R: FromValue>(&self) -> Result<Option<R>> {
        let Some(keys) = self.keys()? else {
            return Ok(None);
        };
        let mut values = keys.values();
        match (values.next(), values.next()) {
            (Some(value), None) => Ok(R::from_value(value)),
            _ => Err(Error::IncorrectKeyCount {
                rows: 1,
                columns: keys.len(),
            }),
        }
    }
}

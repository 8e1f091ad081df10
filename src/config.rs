use serde::{Deserialize, Serialize};

/// How a batch insert is executed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// Batched when SQLite supports `RETURNING`, row by row otherwise.
    #[default]
    Auto,
    /// Always batched, keys come from a `RETURNING` clause.
    Batched,
    /// One statement per entry, keys come from `last_insert_rowid()`.
    RowByRow,
}

/// Batch insert configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchInsertConfig {
    /// Columns returned as generated keys. Empty means every column in
    /// batched mode and `rowid` in row-by-row mode.
    pub key_columns: Vec<String>,
    pub mode: BatchMode,
}

impl BatchInsertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a generated-key column
    pub fn with_key_column(mut self, name: &str) -> Self {
        self.key_columns.push(name.to_string());
        self
    }

    pub fn with_mode(mut self, mode: BatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub(crate) fn key_column_refs(&self) -> Vec<&str> {
        self.key_columns.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let config = BatchInsertConfig::new().with_key_column("id");
        assert_eq!(config.key_columns, vec!["id".to_string()]);
        assert_eq!(config.mode, BatchMode::Auto);
    }

    #[test]
    fn deserializes_from_partial_json() {
        let config: BatchInsertConfig = serde_json::from_str(r#"{"mode": "row_by_row"}"#).unwrap();
        assert_eq!(config.mode, BatchMode::RowByRow);
        assert!(config.key_columns.is_empty());

        let json = serde_json::to_string(&config.with_key_column("id")).unwrap();
        assert_eq!(json, r#"{"key_columns":["id"],"mode":"row_by_row"}"#);
    }
}

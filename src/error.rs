use thiserror::Error;

/// Errors returned by the key and row helpers.
///
/// Driver failures are passed through untouched in [`Error::Sqlite`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("expected a single generated key, but found {rows} row(s) with {columns} column(s)")]
    IncorrectKeyCount { rows: usize, columns: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

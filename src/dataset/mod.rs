//! Dataset, row and column contracts consumed by the evaluation engine.
//!
//! A [`Dataset`] exposes its column structure and exactly one traversal of its
//! rows. Every call to [`Dataset::row_iterator`] hands back the same iterator,
//! so rows consumed through one handle are gone for every other handle.

pub mod column;
pub mod memory;
pub mod row;

use std::sync::Arc;

use thiserror::Error;

pub use column::{Column, ColumnKind, Headers};
pub use memory::{InMemoryDataset, SingleRowDataset};
pub use row::{Row, RowProjection, Value};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Invalid value for column {column}: {message}")]
    InvalidValue { column: String, message: String },
    #[error("Row has {found} values but the headers declare {expected} columns")]
    RowLength { expected: usize, found: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Single-pass source of rows.
pub trait RowIterator: Iterator<Item = DatasetResult<Row>> + Send {}

impl<T> RowIterator for T where T: Iterator<Item = DatasetResult<Row>> + Send {}

pub trait Dataset: Send {
    fn headers(&self) -> &Arc<Headers>;

    /// The dataset's only traversal.
    fn row_iterator(&mut self) -> &mut dyn RowIterator;
}

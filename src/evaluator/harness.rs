use std::sync::Arc;

use tracing::trace;

use crate::dataset::{Dataset, DatasetResult, Headers, Row, RowIterator};

use super::RowCallback;

/// Dataset wrapper that reports every row to a callback as it is delivered.
///
/// The wrapped iterator is built once, in [`RowHarness::new`], and every
/// [`Dataset::row_iterator`] call returns that same iterator: the underlying
/// dataset allows a single traversal. The callback runs inline, right after a
/// row is fetched and before it is handed to the caller.
pub struct RowHarness<'a> {
    headers: Arc<Headers>,
    rows: HarnessedRows<'a>,
}

impl<'a> RowHarness<'a> {
    pub fn new(dataset: &'a mut dyn Dataset, callback: RowCallback<'a>) -> Self {
        let headers = dataset.headers().clone();
        Self {
            headers,
            rows: HarnessedRows {
                inner: dataset.row_iterator(),
                callback,
                delivered: 0,
                exhausted: false,
            },
        }
    }

    /// Rows handed out so far.
    pub fn delivered(&self) -> usize {
        self.rows.delivered
    }

    pub fn is_exhausted(&self) -> bool {
        self.rows.exhausted
    }
}

impl Dataset for RowHarness<'_> {
    fn headers(&self) -> &Arc<Headers> {
        &self.headers
    }

    fn row_iterator(&mut self) -> &mut dyn RowIterator {
        &mut self.rows
    }
}

struct HarnessedRows<'a> {
    inner: &'a mut dyn RowIterator,
    callback: RowCallback<'a>,
    delivered: usize,
    // once the traversal ended the inner iterator is never polled again
    exhausted: bool,
}

impl Iterator for HarnessedRows<'_> {
    type Item = DatasetResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.inner.next() {
            Some(Ok(row)) => {
                (self.callback)(&row);
                self.delivered += 1;
                trace!("harness delivered row {}", self.delivered);
                Some(Ok(row))
            }
            Some(Err(e)) => Some(Err(e)),
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

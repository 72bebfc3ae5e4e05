use std::io::Read;
use std::iter::Map;
use std::sync::Arc;
use std::vec::IntoIter;

use serde::Deserialize;
use tracing::debug;

use super::{
    ColumnKind, Dataset, DatasetError, DatasetResult, Headers, Row, RowIterator, Value,
};

type OwnedRows = Map<IntoIter<Row>, fn(Row) -> DatasetResult<Row>>;

/// Dataset over rows held in memory. Like every dataset it can be traversed
/// once.
pub struct InMemoryDataset {
    headers: Arc<Headers>,
    rows: OwnedRows,
}

impl InMemoryDataset {
    pub fn new(headers: Arc<Headers>, rows: Vec<Row>) -> Self {
        Self {
            headers,
            rows: rows.into_iter().map(Ok as fn(Row) -> DatasetResult<Row>),
        }
    }

    /// Reads `{ "headers": [...], "rows": [{ "values": [...], "weight": 1.0 }] }`.
    ///
    /// Categorical values are given by label, numeric values as numbers and
    /// missing values as `null`.
    pub fn from_json_reader<R: Read>(reader: R) -> DatasetResult<Self> {
        let raw: RawDataset =
            serde_json::from_reader(reader).map_err(|e| DatasetError::Parse(e.to_string()))?;
        let headers = Arc::new(raw.headers);
        let rows = raw
            .rows
            .into_iter()
            .map(|row| row.into_row(&headers))
            .collect::<DatasetResult<Vec<_>>>()?;
        debug!("loaded {} rows over [{}]", rows.len(), headers);
        Ok(Self::new(headers, rows))
    }

    pub fn from_json_str(s: &str) -> DatasetResult<Self> {
        Self::from_json_reader(s.as_bytes())
    }
}

impl Dataset for InMemoryDataset {
    fn headers(&self) -> &Arc<Headers> {
        &self.headers
    }

    fn row_iterator(&mut self) -> &mut dyn RowIterator {
        &mut self.rows
    }
}

/// Batch of exactly one row, as handed to a learner by the prequential
/// protocol.
pub struct SingleRowDataset {
    headers: Arc<Headers>,
    row: std::option::IntoIter<DatasetResult<Row>>,
}

impl SingleRowDataset {
    pub fn new(row: Row) -> Self {
        Self {
            headers: row.headers().clone(),
            row: Some(Ok(row)).into_iter(),
        }
    }
}

impl Dataset for SingleRowDataset {
    fn headers(&self) -> &Arc<Headers> {
        &self.headers
    }

    fn row_iterator(&mut self) -> &mut dyn RowIterator {
        &mut self.row
    }
}

#[derive(Deserialize)]
struct RawDataset {
    headers: Headers,
    rows: Vec<RawRow>,
}

#[derive(Deserialize)]
struct RawRow {
    values: Vec<serde_json::Value>,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl RawRow {
    fn into_row(self, headers: &Arc<Headers>) -> DatasetResult<Row> {
        if self.values.len() != headers.len() {
            return Err(DatasetError::RowLength {
                expected: headers.len(),
                found: self.values.len(),
            });
        }
        let values = self
            .values
            .into_iter()
            .zip(headers.columns())
            .map(|(raw, column)| match (raw, &column.kind) {
                (serde_json::Value::Null, _) => Ok(None),
                (serde_json::Value::Number(n), ColumnKind::Numeric) => n
                    .as_f64()
                    .map(|n| Some(Value::Number(n)))
                    .ok_or_else(|| DatasetError::InvalidValue {
                        column: column.name.clone(),
                        message: format!("{} is not representable as f64", n),
                    }),
                (serde_json::Value::String(label), ColumnKind::Categorical { values }) => values
                    .iter()
                    .position(|v| *v == label)
                    .map(|i| Some(Value::Category(i)))
                    .ok_or_else(|| DatasetError::InvalidValue {
                        column: column.name.clone(),
                        message: format!("unknown category '{}'", label),
                    }),
                (other, _) => Err(DatasetError::InvalidValue {
                    column: column.name.clone(),
                    message: format!("unexpected value {}", other),
                }),
            })
            .collect::<DatasetResult<Vec<_>>>()?;
        Ok(Row::new(headers.clone(), values)?.with_weight(self.weight))
    }
}

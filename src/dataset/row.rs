use std::sync::Arc;

use super::{Column, ColumnKind, DatasetError, DatasetResult, Headers};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    /// Index into the column's category list
    Category(usize),
}

impl Value {
    pub fn as_category(&self) -> Option<usize> {
        match self {
            Value::Category(index) => Some(*index),
            Value::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Category(_) => None,
        }
    }

    fn check(&self, column: &Column) -> DatasetResult<()> {
        match (self, &column.kind) {
            (Value::Number(_), ColumnKind::Numeric) => Ok(()),
            (Value::Category(index), ColumnKind::Categorical { values }) => {
                if *index < values.len() {
                    Ok(())
                } else {
                    Err(DatasetError::InvalidValue {
                        column: column.name.clone(),
                        message: format!(
                            "category index {} out of range for {} categories",
                            index,
                            values.len()
                        ),
                    })
                }
            }
            (value, kind) => Err(DatasetError::InvalidValue {
                column: column.name.clone(),
                message: format!("{:?} does not fit column kind {:?}", value, kind),
            }),
        }
    }
}

/// One instance of a dataset. A `None` slot is a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    headers: Arc<Headers>,
    values: Vec<Option<Value>>,
    weight: f64,
}

impl Row {
    pub fn new(headers: Arc<Headers>, values: Vec<Option<Value>>) -> DatasetResult<Self> {
        if values.len() != headers.len() {
            return Err(DatasetError::RowLength {
                expected: headers.len(),
                found: values.len(),
            });
        }
        for (value, column) in values.iter().zip(headers.columns()) {
            if let Some(value) = value {
                value.check(column)?;
            }
        }
        Ok(Self {
            headers,
            values,
            weight: 1.0,
        })
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn headers(&self) -> &Arc<Headers> {
        &self.headers
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn get_value(&self, name: &str) -> DatasetResult<Option<&Value>> {
        let index = self
            .headers
            .index_of(name)
            .ok_or_else(|| DatasetError::UnknownColumn(name.to_string()))?;
        Ok(self.values[index].as_ref())
    }

    /// Category index held in the named column; `None` when missing.
    pub fn class_index(&self, name: &str) -> DatasetResult<Option<usize>> {
        match self.get_value(name)? {
            None => Ok(None),
            Some(value) => value.as_category().map(Some).ok_or_else(|| {
                DatasetError::InvalidValue {
                    column: name.to_string(),
                    message: "expected a categorical value".to_string(),
                }
            }),
        }
    }

    pub fn matches(&self, headers: &Headers) -> bool {
        self.headers.matches(headers)
    }

    /// Read-only view restricted to `columns`.
    pub fn project(&self, columns: &[String]) -> DatasetResult<RowProjection<'_>> {
        let indices = columns
            .iter()
            .map(|name| {
                self.headers
                    .index_of(name)
                    .ok_or_else(|| DatasetError::UnknownColumn(name.clone()))
            })
            .collect::<DatasetResult<Vec<_>>>()?;
        Ok(RowProjection { row: self, indices })
    }
}

/// Read-only view over a row exposing only a declared subset of its columns.
#[derive(Debug, Clone)]
pub struct RowProjection<'a> {
    row: &'a Row,
    indices: Vec<usize>,
}

impl RowProjection<'_> {
    pub fn weight(&self) -> f64 {
        self.row.weight
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.indices
            .iter()
            .map(move |&i| &self.row.headers.columns()[i])
    }

    pub fn get_value(&self, name: &str) -> DatasetResult<Option<&Value>> {
        self.indices
            .iter()
            .find(|&&i| self.row.headers.columns()[i].name == name)
            .map(|&i| self.row.values[i].as_ref())
            .ok_or_else(|| DatasetError::UnknownColumn(name.to_string()))
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    /// Nominal column; values are stored as indices into `values`.
    Categorical { values: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

impl Column {
    pub fn numeric<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
        }
    }

    pub fn categorical<S: Into<String>>(name: S, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    /// Number of categories, `None` for numeric columns.
    pub fn num_classes(&self) -> Option<usize> {
        match &self.kind {
            ColumnKind::Categorical { values } => Some(values.len()),
            ColumnKind::Numeric => None,
        }
    }

    pub fn labels(&self) -> &[String] {
        match &self.kind {
            ColumnKind::Categorical { values } => values,
            ColumnKind::Numeric => &[],
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ColumnKind::Numeric => write!(f, "{}:numeric", self.name),
            ColumnKind::Categorical { values } => {
                write!(f, "{}:{{{}}}", self.name, values.join(","))
            }
        }
    }
}

/// Ordered column structure of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    columns: Vec<Column>,
}

impl Headers {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Structural equality: same columns, same kinds, same order.
    pub fn matches(&self, other: &Headers) -> bool {
        self.columns == other.columns
    }

    /// Headers restricted to the named columns, in the given order.
    pub fn select(&self, names: &[String]) -> Option<Headers> {
        names
            .iter()
            .map(|name| self.column(name).cloned())
            .collect::<Option<Vec<_>>>()
            .map(Headers::new)
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", columns.join(", "))
    }
}

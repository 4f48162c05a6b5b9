use anyhow::{Result, anyhow};

/// One column of the working table. Numeric columns use NaN for missing
/// values so arithmetic propagates gaps without branching everywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Number(Vec<f64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(values) => values.len(),
            Column::Number(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Column-major table with a fixed row count across all columns.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl Frame {
    pub fn new(row_count: usize) -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            row_count,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if column.len() != self.row_count {
            return Err(anyhow!(
                "column '{name}' has {} rows, table has {}",
                column.len(),
                self.row_count
            ));
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[idx])
    }

    /// Numeric column lookup; a missing or text column is a hard error so a
    /// formula referencing an absent stat surfaces as a failure, not a zero.
    pub fn numbers(&self, name: &str) -> Result<&[f64]> {
        match self.get(name) {
            Some(Column::Number(values)) => Ok(values),
            Some(Column::Text(_)) => Err(anyhow!("column '{name}' is not numeric")),
            None => Err(anyhow!("column '{name}' is missing")),
        }
    }

    pub fn texts(&self, name: &str) -> Result<&[String]> {
        match self.get(name) {
            Some(Column::Text(values)) => Ok(values),
            Some(Column::Number(_)) => Err(anyhow!("column '{name}' is not text")),
            None => Err(anyhow!("column '{name}' is missing")),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Column)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter_mut())
    }
}

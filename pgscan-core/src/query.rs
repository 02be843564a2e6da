use crate::{Error, Result, ScanTarget, Value};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    /// Value of the first column labeled `name`.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }

    /// Moves the column values into `targets`, in column order.
    ///
    /// The number of targets must match the number of columns. On a
    /// conversion failure the targets before the failing column keep the
    /// values already written.
    pub fn scan(self, targets: &mut [&mut dyn ScanTarget]) -> Result<()> {
        if targets.len() != self.values.len() {
            return Err(Error::msg(format!(
                "The row has {} columns ({}) but {} scan targets were provided",
                self.values.len(),
                self.labels.join(", "),
                targets.len()
            )));
        }
        let labels = self.labels;
        for (i, (value, target)) in self
            .values
            .into_vec()
            .into_iter()
            .zip(targets.iter_mut())
            .enumerate()
        {
            target.scan_value(value).map_err(|e| {
                e.context(format!(
                    "While scanning column {} `{}`",
                    i,
                    labels.get(i).map(String::as_str).unwrap_or_default()
                ))
            })?;
        }
        Ok(())
    }
}

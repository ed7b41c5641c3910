//! Execution boundary and tabular result handle.
//!
//! The engine does not talk to a database itself: a finished SQL string is
//! handed to an [`Executor`] supplied by the embedding application, which
//! returns either a tabular result or an affected-row outcome. Cancellation
//! and timeout semantics belong entirely to the executor.

use std::error::Error;

use indexmap::IndexMap;

use crate::value::Value;

/// Query-execution collaborator.
///
/// Implementations wrap a concrete driver connection. Errors are reported
/// as boxed driver errors; the connection layer wraps them together with
/// the offending SQL text.
pub trait Executor {
    /// Execute one finished SQL statement.
    fn execute(&mut self, sql: &str) -> Result<ExecOutcome, Box<dyn Error>>;
}

/// What an executed statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// A result set (SELECT and friends).
    Rows(ResultSet),
    /// An affected-row count (INSERT / UPDATE / DELETE).
    Affected(u64),
}

impl ExecOutcome {
    /// The result set, if this outcome carries one.
    pub fn into_rows(self) -> Option<ResultSet> {
        match self {
            ExecOutcome::Rows(rows) => Some(rows),
            ExecOutcome::Affected(_) => None,
        }
    }

    /// The affected-row count, if this outcome carries one.
    pub fn affected_rows(&self) -> Option<u64> {
        match self {
            ExecOutcome::Affected(n) => Some(*n),
            ExecOutcome::Rows(_) => None,
        }
    }
}

/// A fully materialized query result: column headers plus rows of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }

    /// Number of rows in the result.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Iterate rows as value slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// All rows as ordered column-name → value maps.
    ///
    /// Columns beyond the header count are dropped; missing trailing
    /// columns are simply absent from the map.
    pub fn fetch_assoc(&self) -> Vec<IndexMap<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row)
                    .map(|(h, v)| (h.clone(), v.clone()))
                    .collect()
            })
            .collect()
    }

    /// First cell of the first row, for single-value queries.
    pub fn one(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }
}

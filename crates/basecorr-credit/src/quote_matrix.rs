//! Live correlation quotes arranged by loss level and tenor.

use std::fmt;
use std::sync::{Arc, Weak};

use basecorr_core::observer::Observer;
use basecorr_core::quotes::Quote;
use ndarray::Array2;

use crate::error::{CorrelationError, CorrelationResult};

/// Maps surface columns onto quote table columns.
///
/// The quote table is sized to the full tenor list while the surface only
/// keeps the live tenors, which are always a suffix of that list. Surface
/// column `j` therefore reads quote column `offset + j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAlignment {
    offset: usize,
    live_columns: usize,
}

impl ColumnAlignment {
    /// Aligns `live_columns` surface columns to the tail of a table with
    /// `quote_columns` columns, after `expired_count` tenors were dropped.
    ///
    /// # Errors
    ///
    /// Returns `CorrelationError::InvalidInput` if the table does not have
    /// exactly `expired_count + live_columns` columns.
    pub fn new(
        quote_columns: usize,
        live_columns: usize,
        expired_count: usize,
    ) -> CorrelationResult<Self> {
        if live_columns == 0 {
            return Err(CorrelationError::invalid_input("no live tenor columns"));
        }
        if live_columns > quote_columns || quote_columns - live_columns != expired_count {
            return Err(CorrelationError::invalid_input(format!(
                "quote table has {quote_columns} tenor columns, expected {} ({expired_count} expired + {live_columns} live)",
                expired_count + live_columns
            )));
        }
        Ok(Self {
            offset: expired_count,
            live_columns,
        })
    }

    /// Quote table column read by surface column `column`.
    #[must_use]
    pub fn quote_column(&self, column: usize) -> usize {
        self.offset + column
    }

    /// Number of leading quote columns skipped.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of surface columns.
    #[must_use]
    pub fn live_columns(&self) -> usize {
        self.live_columns
    }
}

/// A rectangular table of shared quotes, `[loss_row][tenor_column]`.
///
/// Values are read through on every access; nothing is cached.
#[derive(Clone)]
pub struct QuoteMatrix {
    quotes: Vec<Vec<Arc<dyn Quote>>>,
    columns: usize,
}

impl QuoteMatrix {
    /// Creates a matrix from rows of quotes.
    ///
    /// # Errors
    ///
    /// Returns `CorrelationError::InvalidInput` for an empty or ragged table.
    pub fn new(quotes: Vec<Vec<Arc<dyn Quote>>>) -> CorrelationResult<Self> {
        let columns = quotes.first().map_or(0, Vec::len);
        if columns == 0 {
            return Err(CorrelationError::invalid_input("empty correlation quote table"));
        }
        if let Some(i) = quotes.iter().position(|row| row.len() != columns) {
            return Err(CorrelationError::invalid_input(format!(
                "quote table row {i} has {} columns, expected {columns}",
                quotes[i].len()
            )));
        }
        Ok(Self { quotes, columns })
    }

    /// Number of loss level rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.quotes.len()
    }

    /// Number of tenor columns in the table, expired ones included.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The quote at `(row, column)`.
    #[must_use]
    pub fn handle(&self, row: usize, column: usize) -> Option<&Arc<dyn Quote>> {
        self.quotes.get(row).and_then(|r| r.get(column))
    }

    /// Current value of the quote at `(row, column)`.
    ///
    /// # Errors
    ///
    /// Returns `CorrelationError::InvalidInput` for an index outside the
    /// table, and the quote's own error if it has no valid value.
    pub fn value(&self, row: usize, column: usize) -> CorrelationResult<f64> {
        let quote = self.handle(row, column).ok_or_else(|| {
            CorrelationError::invalid_input(format!(
                "quote ({row}, {column}) outside a {}x{} table",
                self.rows(),
                self.columns
            ))
        })?;
        Ok(quote.value()?)
    }

    /// Registers `observer` with every quote in the table.
    pub fn subscribe_all(&self, observer: &Weak<dyn Observer>) {
        for quote in self.quotes.iter().flatten() {
            quote.subscribe(observer.clone());
        }
    }

    /// Reads the live columns into a `(rows, live_columns)` matrix.
    ///
    /// # Errors
    ///
    /// Propagates the first quote error.
    pub fn snapshot(&self, alignment: &ColumnAlignment) -> CorrelationResult<Array2<f64>> {
        let mut values = Array2::zeros((self.rows(), alignment.live_columns()));
        for ((i, j), cell) in values.indexed_iter_mut() {
            *cell = self.value(i, alignment.quote_column(j))?;
        }
        Ok(values)
    }
}

impl fmt::Debug for QuoteMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteMatrix")
            .field("rows", &self.rows())
            .field("columns", &self.columns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basecorr_core::quotes::SimpleQuote;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn table(values: &[&[f64]]) -> (Vec<Vec<Arc<SimpleQuote>>>, QuoteMatrix) {
        let quotes: Vec<Vec<Arc<SimpleQuote>>> = values
            .iter()
            .map(|row| row.iter().map(|v| SimpleQuote::shared(*v)).collect())
            .collect();
        let handles = quotes
            .iter()
            .map(|row| row.iter().map(|q| Arc::clone(q) as Arc<dyn Quote>).collect())
            .collect();
        (quotes, QuoteMatrix::new(handles).unwrap())
    }

    #[test]
    fn test_alignment_offset() {
        let alignment = ColumnAlignment::new(3, 2, 1).unwrap();
        assert_eq!(alignment.offset(), 1);
        assert_eq!(alignment.quote_column(0), 1);
        assert_eq!(alignment.quote_column(1), 2);

        let full = ColumnAlignment::new(3, 3, 0).unwrap();
        assert_eq!(full.quote_column(2), 2);
    }

    #[test]
    fn test_alignment_divergence_is_rejected() {
        assert!(ColumnAlignment::new(4, 2, 1).is_err());
        assert!(ColumnAlignment::new(2, 3, 0).is_err());
        assert!(ColumnAlignment::new(3, 0, 3).is_err());
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(QuoteMatrix::new(vec![]).is_err());
        assert!(QuoteMatrix::new(vec![vec![]]).is_err());

        let q = |v: f64| -> Arc<dyn Quote> { SimpleQuote::shared(v) };
        let ragged = vec![vec![q(0.1), q(0.2)], vec![q(0.3)]];
        let err = QuoteMatrix::new(ragged).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 columns"));
    }

    #[test]
    fn test_values_are_live() {
        let (quotes, matrix) = table(&[&[0.10, 0.20], &[0.30, 0.40]]);
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.columns(), 2);
        assert_eq!(matrix.value(1, 0).unwrap(), 0.30);

        quotes[1][0].set_value(0.35);
        assert_eq!(matrix.value(1, 0).unwrap(), 0.35);

        assert!(matrix.value(2, 0).is_err());
    }

    #[test]
    fn test_unset_quote_is_an_error() {
        let (quotes, matrix) = table(&[&[0.10]]);
        quotes[0][0].reset();
        assert!(matches!(matrix.value(0, 0), Err(CorrelationError::Core(_))));
    }

    #[test]
    fn test_snapshot_reads_tail_columns() {
        let (_quotes, matrix) = table(&[&[0.1, 0.2, 0.3], &[0.4, 0.5, 0.6]]);
        let alignment = ColumnAlignment::new(matrix.columns(), 2, 1).unwrap();
        let snapshot = matrix.snapshot(&alignment).unwrap();

        assert_eq!(snapshot.dim(), (2, 2));
        assert_eq!(snapshot[[0, 0]], 0.2);
        assert_eq!(snapshot[[1, 1]], 0.6);
    }

    #[test]
    fn test_subscribe_all() {
        #[derive(Default)]
        struct Counter(AtomicUsize);
        impl Observer for Counter {
            fn update(&self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let (quotes, matrix) = table(&[&[0.1, 0.2], &[0.3, 0.4]]);
        let counter = Arc::new(Counter::default());
        let observer: Arc<dyn Observer> = counter.clone();
        matrix.subscribe_all(&Arc::downgrade(&observer));

        quotes[0][1].set_value(0.25);
        quotes[1][0].set_value(0.35);
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use ndarray::Array2;
use tracing::{debug, instrument};

use crate::error::LookbackError;

/// The immutable time-indexed table the pipeline works from.
///
/// Rows are strictly time-ascending with no duplicate timestamps. Uniform
/// sampling with no gaps is a documented precondition of the windowing
/// arithmetic and is not checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    values: Array2<f64>,
    index: Vec<NaiveDateTime>,
}

impl RawTable {
    /**
    Reads a headerless delimited file into a raw table.

    Each row must hold a date (`%Y-%m-%d`), a time (`%H:%M:%S`) and at
    least one numeric measurement. Rows are sorted into ascending time
    order; duplicate timestamps are rejected. A file with no data rows or
    no measurement columns fails with `EmptyTable`.
    */
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, LookbackError> {
        debug!("Start reading data");
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path.as_ref())?;

        let mut rows: Vec<(NaiveDateTime, Vec<f64>)> = Vec::new();
        let mut width: Option<usize> = None;
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let line = i + 1;
            if record.len() < 3 {
                return Err(LookbackError::RaggedRow {
                    line,
                    got: record.len(),
                    expected: width.map(|m| m + 2).unwrap_or(3),
                });
            }
            if let Some(m) = width {
                if record.len() != m + 2 {
                    return Err(LookbackError::RaggedRow {
                        line,
                        got: record.len(),
                        expected: m + 2,
                    });
                }
            } else {
                width = Some(record.len() - 2);
            }

            let date = NaiveDate::parse_from_str(&record[0], "%Y-%m-%d")?;
            let time = NaiveTime::parse_from_str(&record[1], "%H:%M:%S")?;
            let measurements = record
                .iter()
                .enumerate()
                .skip(2)
                .map(|(column, value)| {
                    value
                        .parse::<f64>()
                        .map_err(|_| LookbackError::ParseValueError {
                            value: value.to_string(),
                            column,
                            line,
                        })
                })
                .collect::<Result<Vec<f64>, LookbackError>>()?;
            rows.push((NaiveDateTime::new(date, time), measurements));
        }
        debug!("End reading data: {} rows", rows.len());

        rows.sort_by_key(|(datetime, _)| *datetime);
        let index: Vec<NaiveDateTime> = rows.iter().map(|(datetime, _)| *datetime).collect();
        let values: Vec<f64> = rows.into_iter().flat_map(|(_, row)| row).collect();
        Self::from_parts_inner(values, index, width.unwrap_or(0))
    }

    /// Builds a raw table from an already-parsed value matrix and its time
    /// index, for callers that do their own file handling.
    ///
    /// The index must match the matrix row count and be strictly ascending.
    pub fn from_parts(
        values: Array2<f64>,
        index: Vec<NaiveDateTime>,
    ) -> Result<Self, LookbackError> {
        if index.len() != values.nrows() {
            return Err(LookbackError::InvalidParameter(format!(
                "index length {} does not match row count {}",
                index.len(),
                values.nrows()
            )));
        }
        let (rows, series) = values.dim();
        let flat = values.into_iter().collect();
        Self::from_parts_inner(flat, index, if rows == 0 { 0 } else { series })
    }

    fn from_parts_inner(
        values: Vec<f64>,
        index: Vec<NaiveDateTime>,
        series: usize,
    ) -> Result<Self, LookbackError> {
        if index.is_empty() || series == 0 {
            return Err(LookbackError::EmptyTable(format!(
                "{} rows, {} series",
                index.len(),
                series
            )));
        }
        for pair in index.windows(2) {
            if pair[0] == pair[1] {
                return Err(LookbackError::DuplicateTimestamp {
                    timestamp: pair[1].to_string(),
                });
            }
            if pair[0] > pair[1] {
                return Err(LookbackError::InvalidParameter(format!(
                    "time index is not ascending at {}",
                    pair[1]
                )));
            }
        }
        let values = Array2::from_shape_vec((index.len(), series), values)?;
        Ok(Self { values, index })
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Number of time steps (T).
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of parallel series (M).
    pub fn series(&self) -> usize {
        self.values.ncols()
    }

    /// Number of rows whose date falls on or before `cutoff`.
    ///
    /// The cutoff is a whole day: every timestamp within that day counts.
    pub fn cutoff_count(&self, cutoff: NaiveDate) -> usize {
        self.index
            .partition_point(|datetime| datetime.date() <= cutoff)
    }
}

use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use tracing::{debug, info, instrument};

use crate::{
    config::LookbackConfig,
    data::{
        loader::RawTable,
        normalize::{normalize, ScaleMode},
        split::{split, SplitRanges},
        window::{extract, Dataset},
    },
    error::LookbackError,
};

/**
The full preparation pipeline: raw table in, three supervised datasets out.

Construction sequences loading, normalisation, splitting and window
extraction. It either fully succeeds, leaving every field populated and
immutable, or fails with an error and no observable partial state. Every
sample `(x, y)` pairs `window` consecutive past rows with the row `horizon`
steps after the window's end, and the three datasets partition the usable
target indices chronologically so no future data leaks into training.
*/
#[derive(Debug)]
pub struct Pipeline {
    raw: RawTable,
    data: Array2<f64>,
    scale: Array1<f64>,
    window: usize,
    horizon: usize,
    ranges: SplitRanges,
    train: Dataset,
    valid: Dataset,
    test: Dataset,
}

impl Pipeline {
    /// Loads the source table named by the configuration and prepares the
    /// three datasets.
    #[instrument(skip(config), fields(source = %config.source.display()))]
    pub fn load(config: &LookbackConfig) -> Result<Self, LookbackError> {
        let raw = RawTable::from_csv(&config.source)?;
        Self::from_table(
            raw,
            config.train_cutoff()?,
            config.window,
            config.horizon,
            config.scale_mode()?,
        )
    }

    /// Prepares the three datasets from an already-loaded table.
    pub fn from_table(
        raw: RawTable,
        train_cutoff: NaiveDate,
        window: usize,
        horizon: usize,
        mode: ScaleMode,
    ) -> Result<Self, LookbackError> {
        if window == 0 {
            return Err(LookbackError::InvalidParameter(
                "window must be at least 1".to_string(),
            ));
        }
        if horizon == 0 {
            return Err(LookbackError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }

        debug!(
            "Preparing pipeline: {} rows, {} series, window {}, horizon {}",
            raw.rows(),
            raw.series(),
            window,
            horizon
        );
        let (data, scale) = normalize(raw.values(), mode)?;

        let cutoff_count = raw.cutoff_count(train_cutoff);
        let ranges = split(cutoff_count, raw.rows(), window, horizon);
        info!(
            "Splitting data into training ({}), validation ({}) and testing ({}) samples",
            ranges.train.len(),
            ranges.valid.len(),
            ranges.test.len()
        );

        let train = extract(&data, &ranges.train_targets(), window, horizon)?;
        let valid = extract(&data, &ranges.valid_targets(), window, horizon)?;
        let test = extract(&data, &ranges.test_targets(), window, horizon)?;

        Ok(Self {
            raw,
            data,
            scale,
            window,
            horizon,
            ranges,
            train,
            valid,
            test,
        })
    }

    pub fn raw(&self) -> &RawTable {
        &self.raw
    }

    /// The normalised working table that windows were cut from.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Per-series divisor for mapping predictions back to original units.
    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of time steps (T).
    pub fn rows(&self) -> usize {
        self.raw.rows()
    }

    /// Number of parallel series (M).
    pub fn series(&self) -> usize {
        self.raw.series()
    }

    pub fn ranges(&self) -> &SplitRanges {
        &self.ranges
    }

    pub fn train(&self) -> &Dataset {
        &self.train
    }

    pub fn valid(&self) -> &Dataset {
        &self.valid
    }

    pub fn test(&self) -> &Dataset {
        &self.test
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeDelta};

    fn hourly_index(start: &str, rows: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
        (0..rows)
            .map(|i| start + TimeDelta::hours(i as i64))
            .collect()
    }

    fn table(rows: usize, series: usize) -> RawTable {
        let values = Array2::from_shape_fn((rows, series), |(r, c)| {
            (r * series + c) as f64 + 1.0
        });
        RawTable::from_parts(values, hourly_index("2014-01-01 00:00:00", rows)).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_zero_window_rejected() {
        let result = Pipeline::from_table(
            table(10, 2),
            date("2014-01-01"),
            0,
            1,
            ScaleMode::Off,
        );
        assert!(matches!(result, Err(LookbackError::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let result = Pipeline::from_table(
            table(10, 2),
            date("2014-01-01"),
            2,
            0,
            ScaleMode::Off,
        );
        assert!(matches!(result, Err(LookbackError::InvalidParameter(_))));
    }

    #[test]
    fn test_degenerate_series_fails_construction() {
        let values = Array2::from_shape_fn((10, 2), |(r, c)| if c == 1 { 0.0 } else { r as f64 });
        let raw = RawTable::from_parts(values, hourly_index("2014-01-01 00:00:00", 10)).unwrap();
        let result = Pipeline::from_table(raw, date("2014-01-01"), 2, 1, ScaleMode::PerSeries);
        assert!(matches!(
            result,
            Err(LookbackError::DegenerateSeries { series: 1 })
        ));
    }

    #[test]
    fn test_window_exceeding_table_yields_empty_datasets() {
        // window + horizon - 1 >= rows: every block is empty, not an error.
        let pipeline = Pipeline::from_table(
            table(5, 1),
            date("2014-01-02"),
            5,
            2,
            ScaleMode::Off,
        )
        .unwrap();
        assert!(pipeline.train().is_empty());
        assert!(pipeline.valid().is_empty());
        assert!(pipeline.test().is_empty());
    }
}

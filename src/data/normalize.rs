use std::fmt;

use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

use crate::error::LookbackError;

/// How the raw table is rescaled before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Mode 0: no scaling; the working table equals the raw table.
    Off,
    /// Mode 1: divide the whole table by its single global maximum.
    ///
    /// The per-series scale vector is left at 1.0 in this mode, so
    /// de-normalising predictions back to original units is not supported.
    Global,
    /// Mode 2: divide each series by its own maximum absolute value.
    #[default]
    PerSeries,
}

impl TryFrom<u8> for ScaleMode {
    type Error = LookbackError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ScaleMode::Off),
            1 => Ok(ScaleMode::Global),
            2 => Ok(ScaleMode::PerSeries),
            other => Err(LookbackError::UnknownScaleMode(other)),
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleMode::Off => write!(f, "off"),
            ScaleMode::Global => write!(f, "global"),
            ScaleMode::PerSeries => write!(f, "per-series"),
        }
    }
}

/**
Rescales the raw table into the working table that windowing operates on.

Returns the working table together with the per-series scale vector. The
scale vector holds the divisor applied to each series so predictions can be
mapped back to original units; it stays at 1.0 for every series under `Off`
and `Global`.

## Arguments
* `raw` - The raw table (rows: time steps, columns: series).
* `mode` - The scaling policy.

## Returns
`(working, scale)` or a `LookbackError`. A series whose maximum absolute
value is zero fails the whole call with `DegenerateSeries` rather than
producing NaN columns.
*/
pub fn normalize(
    raw: &Array2<f64>,
    mode: ScaleMode,
) -> Result<(Array2<f64>, Array1<f64>), LookbackError> {
    if raw.nrows() == 0 || raw.ncols() == 0 {
        return Err(LookbackError::EmptyTable(format!(
            "cannot normalise a {}x{} table",
            raw.nrows(),
            raw.ncols()
        )));
    }
    debug!("Normalise: {}", mode);

    let mut scale = Array1::<f64>::ones(raw.ncols());
    let working = match mode {
        ScaleMode::Off => raw.clone(),
        ScaleMode::Global => {
            // Signed maximum over the whole table, one divisor for every series.
            let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max == 0.0 {
                return Err(LookbackError::EmptyTable(
                    "global maximum of the table is zero".to_string(),
                ));
            }
            warn!(
                "Global scaling keeps the scale vector at 1.0; predictions cannot be de-normalised in this mode"
            );
            raw.mapv(|v| v / max)
        }
        ScaleMode::PerSeries => {
            let mut working = Array2::<f64>::zeros(raw.raw_dim());
            for (j, column) in raw.axis_iter(Axis(1)).enumerate() {
                let divisor = column.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
                if divisor == 0.0 {
                    return Err(LookbackError::DegenerateSeries { series: j });
                }
                scale[j] = divisor;
                working
                    .index_axis_mut(Axis(1), j)
                    .assign(&column.mapv(|v| v / divisor));
            }
            working
        }
    };

    Ok((working, scale))
}

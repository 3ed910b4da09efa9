use ndarray::{s, Array2, Array3};
use tracing::debug;

use crate::error::LookbackError;

/// One supervised dataset: stacked input windows and their target rows.
///
/// `x` has shape `[samples, window, series]` and `y` has shape
/// `[samples, series]`. `x[i]` is the window of past rows ending `horizon`
/// steps before target `i`; `y[i]` is the working-table row at the target
/// index itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array3<f64>,
    y: Array2<f64>,
    targets: Vec<usize>,
}

impl Dataset {
    pub fn x(&self) -> &Array3<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    /// The time-indices whose rows serve as prediction targets, in order.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Returns the number of samples in the dataset.
    pub fn len(&self) -> usize {
        self.x.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/**
Builds one (X, Y) dataset from a set of target indices.

For each target `t` the input window covers working-table rows
`[t - horizon + 1 - window, t - horizon + 1)` and the label is row `t`.
Callers normally pass ranges produced by [`split`](crate::data::split::split),
whose lower bound keeps every window inside the table, but arbitrary index
sets are checked anyway: a window that would start before row 0, or a target
at or beyond the last row, fails with `IndexOutOfBounds`. Rows are never
clamped or zero-padded, since that would fabricate data.

An empty target set yields an empty dataset, not an error.
*/
pub fn extract(
    working: &Array2<f64>,
    targets: &[usize],
    window: usize,
    horizon: usize,
) -> Result<Dataset, LookbackError> {
    let (rows, series) = working.dim();
    let mut x = Array3::<f64>::zeros((targets.len(), window, series));
    let mut y = Array2::<f64>::zeros((targets.len(), series));

    for (i, &t) in targets.iter().enumerate() {
        let out_of_bounds = || LookbackError::IndexOutOfBounds {
            target: t,
            window,
            horizon,
            rows,
        };
        if t >= rows {
            return Err(out_of_bounds());
        }
        // end = t - horizon + 1, start = end - window, both checked so a
        // window can never reach before row 0.
        let end = (t + 1).checked_sub(horizon).ok_or_else(out_of_bounds)?;
        let start = end.checked_sub(window).ok_or_else(out_of_bounds)?;

        x.slice_mut(s![i, .., ..])
            .assign(&working.slice(s![start..end, ..]));
        y.row_mut(i).assign(&working.row(t));
    }

    debug!(
        "Extracted dataset: X {:?} | Y {:?}",
        x.shape(),
        y.shape()
    );
    Ok(Dataset {
        x,
        y,
        targets: targets.to_vec(),
    })
}

use std::ops::Range;

use tracing::debug;

/// The three chronological blocks of target indices produced by a split.
///
/// The blocks are disjoint and ordered: training first, validation second,
/// testing last. Together with the discarded warm-up prefix
/// `[0, window + horizon - 1)` they cover every row of the table. A block
/// may be empty; iterating an empty `Range` simply yields no targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRanges {
    pub train: Range<usize>,
    pub valid: Range<usize>,
    pub test: Range<usize>,
}

impl SplitRanges {
    pub fn train_targets(&self) -> Vec<usize> {
        self.train.clone().collect()
    }

    pub fn valid_targets(&self) -> Vec<usize> {
        self.valid.clone().collect()
    }

    pub fn test_targets(&self) -> Vec<usize> {
        self.test.clone().collect()
    }
}

/**
Partitions the valid target indices into train, validation and test blocks.

`cutoff_count` is the number of rows whose date falls on or before the
training cutoff. The training block takes `floor(cutoff_count * 0.8)` and
validation `floor(cutoff_count * 0.2)`; the two floors are computed
independently and need not reconstruct `cutoff_count` exactly, so any
leftover rows fall into the test block. The first `window + horizon - 1`
rows cannot anchor a full window and are discarded from every block, so each
block's start is clamped to that boundary.

A degenerate geometry (e.g. `window + horizon - 1 >= train`) produces empty
blocks rather than an error.
*/
pub fn split(
    cutoff_count: usize,
    total_rows: usize,
    window: usize,
    horizon: usize,
) -> SplitRanges {
    let train = (cutoff_count as f64 * 0.8).floor() as usize;
    let valid = (cutoff_count as f64 * 0.2).floor() as usize;
    // Targets below this cannot anchor a full window; every block starts at
    // or after it so no emitted index ever underflows the table.
    let first = window + horizon - 1;

    let valid_start = train.max(first).min(total_rows);
    let valid_end = (train + valid).clamp(valid_start, total_rows);
    let test_start = (train + valid).max(first).min(total_rows);
    let ranges = SplitRanges {
        train: first.min(train)..train,
        valid: valid_start..valid_end,
        test: test_start..total_rows,
    };
    debug!(
        "Split: train {} samples, valid {} samples, test {} samples",
        ranges.train.len(),
        ranges.valid.len(),
        ranges.test.len()
    );
    ranges
}

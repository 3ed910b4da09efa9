#[derive(Debug, thiserror::Error)]
pub enum LookbackError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Failed to parse date: {0}")]
    ParseDateError(#[from] chrono::ParseError),
    #[error("Source table is unusable: {0}")]
    EmptyTable(String),
    #[error("Failed to parse value '{value}' in column {column} on line {line}.")]
    ParseValueError {
        value: String,
        column: usize,
        line: usize,
    },
    #[error("Row on line {line} has {got} columns, expected {expected}.")]
    RaggedRow {
        line: usize,
        got: usize,
        expected: usize,
    },
    #[error("Duplicate timestamp {timestamp} in source table.")]
    DuplicateTimestamp { timestamp: String },
    #[error("Series {series} has zero maximum absolute value and cannot be scaled.")]
    DegenerateSeries { series: usize },
    #[error(
        "Window for target index {target} is out of bounds (window: {window}, horizon: {horizon}, rows: {rows})."
    )]
    IndexOutOfBounds {
        target: usize,
        window: usize,
        horizon: usize,
        rows: usize,
    },
    #[error("Unknown normalisation mode: {0} (expected 0, 1 or 2).")]
    UnknownScaleMode(u8),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Shape Error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
    #[error("Serde YAML Error: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unrecognized {kind} {value:?}")]
    InvalidSelector { kind: &'static str, value: String },

    #[error("start time {value:?} at row {row} is not a valid timestamp")]
    InvalidTimestamp { value: String, row: usize },

    #[error("cannot compute {0} over zero rows")]
    EmptyAggregation(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

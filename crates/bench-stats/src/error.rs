use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchStatsError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown outlier policy: {0} (expected mad, iqr or none)")]
    UnknownPolicy(String),

    #[error("Unknown output format: {0} (expected console, markdown, json or json-pretty)")]
    UnknownFormat(String),

    #[error("Expected {expected} input(s), got {actual}")]
    InputCount { expected: usize, actual: usize },
}

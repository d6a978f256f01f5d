use std::collections::TryReserveError;

/// Errors reported by matcher construction and the line scanner.
///
/// Filter degradation is deliberately not represented here: when an alphabet
/// filter cannot be built within its limits it is switched off instead, since
/// correctness never depends on the filters.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// An allocation for an alphabet bitmap could not be reserved.
    #[error("out of memory: {0}")]
    MemoryExhausted(#[from] TryReserveError),

    /// A requested operation does not fit the matcher's configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The line source failed to open or read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A candidate line exceeds the scanner's line buffer.
    #[error("line {line} is {length} bytes, longer than the maximum of {limit}")]
    LineTooLong {
        line: usize,
        length: usize,
        limit: usize,
    },
}

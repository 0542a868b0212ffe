//! Error types for the Trax engine
//!
//! Every fallible operation reachable from outside the crate reports its
//! failure through [`TraxError`]. Callers driving a search are expected to
//! skip illegal candidates rather than abort.

/// Engine errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TraxError {
    /// Notation is malformed, ambiguous, or names a cell that cannot be played
    #[error("cannot parse move \"{notation}\": {reason}")]
    Parse { notation: String, reason: String },

    /// Coordinate/piece combination outside the legal set
    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: String, reason: String },

    /// Cell lies outside the ring of cells adjacent to the bounding box
    #[error("cell ({x}, {y}) is out of range")]
    OutOfRange { x: i32, y: i32 },

    /// Hand-built board is inconsistent
    #[error("invalid setup: {0}")]
    InvalidSetup(String),

    /// A searcher broke the self-play contract
    #[error("searcher {name}: {reason}")]
    Searcher { name: String, reason: String },
}

impl TraxError {
    pub(crate) fn parse(notation: &str, reason: impl Into<String>) -> Self {
        TraxError::Parse {
            notation: notation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal(mv: impl ToString, reason: impl Into<String>) -> Self {
        TraxError::IllegalMove {
            mv: mv.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations
pub type TraxResult<T> = Result<T, TraxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TraxError::parse("Q", "missing row");
        assert_eq!(err.to_string(), "cannot parse move \"Q\": missing row");

        let err = TraxError::OutOfRange { x: 5, y: -3 };
        assert_eq!(err.to_string(), "cell (5, -3) is out of range");
    }
}

/// Crate-level error type for motion alignment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A required size is zero or invalid.
    #[error("invalid size for `{name}`: {value} ({reason})")]
    InvalidSize {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    /// Two frames or series do not have comparable structure.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Timestamps decrease somewhere in a sequence.
    #[error("timestamps of `{sequence}` decrease at index {index}")]
    NonMonotonicTimestamps {
        sequence: &'static str,
        index: usize,
    },

    /// Timestamps contain NaN or infinite values.
    #[error("timestamps of `{sequence}` contain a non-finite value at index {index}")]
    NonFiniteTimestamp {
        sequence: &'static str,
        index: usize,
    },

    /// The cost matrix would exceed the configured cell budget.
    #[error("alignment of {base_len} x {target_len} samples exceeds the limit of {max_cells} cells")]
    AlignmentTooLarge {
        base_len: usize,
        target_len: usize,
        max_cells: usize,
    },

    /// A scene id was not found among the supplied scenes.
    #[error("unknown scene `{0}`")]
    UnknownScene(String),
}

/// Convenience Result type for motion_warp operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_names_sizes() {
        let err = Error::AlignmentTooLarge {
            base_len: 3000,
            target_len: 2000,
            max_cells: 1000,
        };
        let msg = err.to_string();
        assert!(msg.contains("3000"));
        assert!(msg.contains("2000"));
        assert!(msg.contains("1000"));
    }

    #[test]
    fn timestamp_errors_name_the_sequence() {
        let err = Error::NonMonotonicTimestamps {
            sequence: "target",
            index: 4,
        };
        assert_eq!(err.to_string(), "timestamps of `target` decrease at index 4");
    }
}

use std::path::PathBuf;

use crate::types::Tier;

/// Result type alias for lumen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lumen operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration rejected at construction time
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },

    /// A single entry is larger than the configured per-entry limit
    #[error("entry '{key}' of {requested_mb:.2} MB exceeds the {limit_mb:.2} MB limit")]
    CapacityExceeded {
        key: String,
        requested_mb: f64,
        limit_mb: f64,
        recovery_hint: RecoveryHint,
    },

    /// Eviction could not free enough memory within its iteration bound
    #[error(
        "could not free {requested_mb:.2} MB for '{key}' after {iterations} eviction rounds \
         ({current_mb:.2}/{max_mb:.2} MB in use)"
    )]
    EvictionExhausted {
        key: String,
        requested_mb: f64,
        current_mb: f64,
        max_mb: f64,
        iterations: usize,
        recovery_hint: RecoveryHint,
    },

    /// The tier refused the entry outright (for example a zero-capacity tier)
    #[error("tier {tier} cannot hold '{key}': {reason}")]
    TierUnavailable {
        key: String,
        tier: Tier,
        reason: String,
    },

    /// The decode collaborator reported a failure
    #[error("failed to decode '{path}' with strategy {strategy}: {message}")]
    Decode {
        path: String,
        strategy: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Every strategy of the foreground fallback chain failed
    #[error("all decode strategies failed for '{path}' (tried: {})", .attempts.join(", "))]
    DecodeExhausted { path: String, attempts: Vec<String> },

    /// Background work finished after the navigation generation moved on
    #[error("result for '{key}' belongs to generation {expected}, current is {current}")]
    StaleGeneration {
        key: String,
        expected: u64,
        current: u64,
    },

    /// Requested item is not part of the current item list
    #[error("item '{key}' not found")]
    NotFound { key: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryHint {
    /// Increase the memory budget
    IncreaseCapacity { suggested_mb: f64 },

    /// Clear the cache and retry
    ClearAndRetry,

    /// Use a default value
    UseDefault { value: String },

    /// No automated recovery possible
    Manual { instructions: String },
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Fix the configuration value and rebuild the component".to_string(),
            },
        }
    }

    /// Create a configuration error that suggests a default
    #[must_use]
    pub fn configuration_with_default(message: impl Into<String>, default: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::UseDefault {
                value: default.into(),
            },
        }
    }

    /// Create a decode error without an underlying source
    #[must_use]
    pub fn decode(
        path: impl Into<String>,
        strategy: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Decode {
            path: path.into(),
            strategy: strategy.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a decode error wrapping the collaborator's error
    #[must_use]
    pub fn decode_with_source(
        path: impl Into<String>,
        strategy: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Decode {
            path: path.into(),
            strategy: strategy.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Get the recovery hint for this error, if it carries one
    #[must_use]
    pub fn recovery_hint(&self) -> Option<&RecoveryHint> {
        match self {
            Self::Configuration { recovery_hint, .. }
            | Self::CapacityExceeded { recovery_hint, .. }
            | Self::EvictionExhausted { recovery_hint, .. } => Some(recovery_hint),
            _ => None,
        }
    }

    /// Check if this error is transient and the operation may succeed later
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::EvictionExhausted { .. } | Self::StaleGeneration { .. } => true,
            Self::Io { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Whether the error came from the decode collaborator
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::DecodeExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = Error::CapacityExceeded {
            key: "big.tif".to_string(),
            requested_mb: 120.0,
            limit_mb: 100.0,
            recovery_hint: RecoveryHint::IncreaseCapacity { suggested_mb: 120.0 },
        };
        let text = err.to_string();
        assert!(text.contains("big.tif"));
        assert!(text.contains("120.00"));
        assert!(text.contains("100.00"));
    }

    #[test]
    fn exhausted_lists_attempts() {
        let err = Error::DecodeExhausted {
            path: "a.jpg".to_string(),
            attempts: vec!["fast".to_string(), "auto".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "all decode strategies failed for 'a.jpg' (tried: fast, auto)"
        );
        assert!(err.is_decode_failure());
    }

    #[test]
    fn transient_classification() {
        let timed_out = Error::from(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow disk"));
        assert!(timed_out.is_transient());

        let missing = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(!missing.is_transient());

        assert!(!Error::configuration("bad").is_transient());
        assert!(Error::StaleGeneration {
            key: "k".into(),
            expected: 1,
            current: 2
        }
        .is_transient());
    }

    #[test]
    fn configuration_hint_suggests_default() {
        let err = Error::configuration_with_default("unknown eviction policy: mru", "lru");
        assert_eq!(
            err.recovery_hint(),
            Some(&RecoveryHint::UseDefault {
                value: "lru".to_string()
            })
        );
    }
}

//! Error types for lapse.
//!
//! The taxonomy is deliberately small: a cell can only fail at construction
//! (bad configuration) or while running a lazy producer.

use std::error::Error as StdError;

use thiserror::Error;

/// Result type alias using `LapseError`.
pub type Result<T> = std::result::Result<T, LapseError>;

/// Boxed error type a producer's error is carried in.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The error a lazy producer returned, kept as-is.
///
/// It is the `source()` of [`LapseError::ProducerFailed`], so walking the
/// error chain reaches the producer's own type.
pub type ProducerError = BoxError;

/// Main error type for all lapse operations.
#[derive(Debug, Error)]
pub enum LapseError {
    /// Invalid TTL or other construction-time configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The lazy producer of a cell failed.
    #[error("Producer failed")]
    ProducerFailed(#[source] ProducerError),
}

impl LapseError {
    /// Wraps a producer's error.
    pub fn producer<E>(err: E) -> Self
    where
        E: Into<ProducerError>,
    {
        LapseError::ProducerFailed(err.into())
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, LapseError::ConfigError(_))
    }

    /// Returns true if this error came from a lazy producer.
    pub fn is_producer_error(&self) -> bool {
        matches!(self, LapseError::ProducerFailed(_))
    }

    /// Returns the producer's error, if this is one.
    pub fn producer_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            LapseError::ProducerFailed(err) => Some(err.as_ref()),
            LapseError::ConfigError(_) => None,
        }
    }

    /// Attempts to view the producer's error as a concrete type.
    pub fn downcast_producer_error<E: StdError + 'static>(&self) -> Option<&E> {
        self.producer_error()?.downcast_ref::<E>()
    }

    /// Consumes the error and returns the producer's error, if this is one.
    pub fn into_producer_error(self) -> Option<ProducerError> {
        match self {
            LapseError::ProducerFailed(err) => Some(err),
            LapseError::ConfigError(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, PartialEq, Eq)]
    struct Backend(u16);

    impl fmt::Display for Backend {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "backend returned {}", self.0)
        }
    }

    impl StdError for Backend {}

    fn chain(err: &(dyn StdError + 'static)) -> Vec<String> {
        let mut messages = vec![err.to_string()];
        let mut current = err.source();
        while let Some(source) = current {
            messages.push(source.to_string());
            current = source.source();
        }
        messages
    }

    #[test]
    fn test_error_display() {
        let err = LapseError::ConfigError("ttl must not be negative".into());
        assert!(err.to_string().contains("ttl must not be negative"));

        let err = LapseError::producer(Backend(503));
        assert_eq!(err.to_string(), "Producer failed");
    }

    #[test]
    fn test_error_classification() {
        assert!(LapseError::ConfigError("x".into()).is_config_error());
        assert!(!LapseError::ConfigError("x".into()).is_producer_error());
        assert!(LapseError::ConfigError("x".into()).producer_error().is_none());

        let err = LapseError::producer(Backend(500));
        assert!(err.is_producer_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_producer_message_appears_once_in_chain() {
        let err = LapseError::producer(Backend(503));
        let messages = chain(&err);
        assert_eq!(messages, vec!["Producer failed", "backend returned 503"]);
    }

    #[test]
    fn test_producer_error_reachable_by_source() {
        let err = LapseError::producer(Backend(404));
        let source = StdError::source(&err).unwrap();
        assert_eq!(source.downcast_ref::<Backend>(), Some(&Backend(404)));
        assert_eq!(err.downcast_producer_error::<Backend>(), Some(&Backend(404)));
    }

    #[test]
    fn test_into_producer_error() {
        let err = LapseError::producer("plain message");
        let inner = err.into_producer_error().unwrap();
        assert_eq!(inner.to_string(), "plain message");
    }
}

//! Error types for the Indigo record store.

use thiserror::Error;

/// Unified error type for store, index and facade operations.
#[derive(Debug, Error)]
pub enum IndigoError {
    /// Unknown index id, or a record id absent from storage
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad caller input: search term too short, invalid store id, bad builder options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A transaction attempt would exceed the backend's write limit
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Any other backend failure (I/O, locking, contention)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored value couldn't be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IndigoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndigoError::NotFound(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, IndigoError::InvalidArgument(_))
    }

    /// True when the caller may retry with a smaller unit of work.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, IndigoError::ResourceExhausted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndigoError::NotFound("Entity 7 doesn't exist".to_string());
        assert_eq!(err.to_string(), "Not found: Entity 7 doesn't exist");

        let err = IndigoError::ResourceExhausted("too many writes".to_string());
        assert_eq!(err.to_string(), "Resource exhausted: too many writes");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(IndigoError::NotFound(String::new()).is_not_found());
        assert!(IndigoError::InvalidArgument(String::new()).is_invalid_argument());
        assert!(IndigoError::ResourceExhausted(String::new()).is_resource_exhausted());
        assert!(!IndigoError::Storage(String::new()).is_not_found());
    }
}

//! Error types for the activity feed

pub type Result<T> = std::result::Result<T, ActivityError>;

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    /// A precondition was violated while constructing a value
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An object graph could not be converted into a context map
    #[error("Cannot serialize value with type {type_name} because: {message}")]
    SerializationFailure { type_name: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A sink failed while emitting an activity
    #[error("Sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },
}

impl ActivityError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ActivityError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a serialization failure for a value of the given type
    pub fn serialization(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        ActivityError::SerializationFailure {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        ActivityError::Sink {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Whether this error reports a violated construction precondition
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ActivityError::InvalidArgument { .. })
    }

    /// Whether this error reports a failed context serialization
    pub fn is_serialization_failure(&self) -> bool {
        matches!(self, ActivityError::SerializationFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ActivityError::invalid_argument("Activity identifier cannot be blank");
        assert!(err.is_invalid_argument());

        let err = ActivityError::serialization("app::Node", "recursion limit exceeded");
        assert!(err.is_serialization_failure());

        let err = ActivityError::sink("json", "writer closed");
        assert!(matches!(err, ActivityError::Sink { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = ActivityError::invalid_argument("Recorders list cannot be empty");
        assert_eq!(err.to_string(), "Invalid argument: Recorders list cannot be empty");

        let err = ActivityError::serialization("app::Node", "recursion limit of 64 exceeded");
        assert_eq!(
            err.to_string(),
            "Cannot serialize value with type app::Node because: recursion limit of 64 exceeded"
        );

        let err = ActivityError::sink("console", "stdout closed");
        assert_eq!(err.to_string(), "Sink 'console' failed: stdout closed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: ActivityError = io_err.into();

        assert!(matches!(err, ActivityError::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }
}

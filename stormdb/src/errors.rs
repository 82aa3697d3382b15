use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for StormDB operations.
///
/// Each kind names a category of failure so callers can tell a corrupt
/// payload apart from a failing backend or a misused path.
///
/// # Examples
///
/// ```rust
/// use stormdb::errors::{ErrorKind, StormError, StormResult};
///
/// fn example() -> StormResult<()> {
///     Err(StormError::new("payload is not valid json", ErrorKind::DeserializationError))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::DeserializationError);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Payload codec errors
    /// A stored payload could not be turned into a document
    DeserializationError,
    /// A document could not be turned into a payload
    SerializationError,
    /// Stored bytes are not valid UTF-8 text
    EncodingError,

    // IO and storage errors
    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,
    /// Error from a key-value storage backend
    BackendError,

    // Path and accessor errors
    /// A path segment is empty or otherwise unusable
    InvalidFieldName,
    /// A path does not fit the shape of the document
    ValidationError,
    /// The value at a path has the wrong type for the operation
    InvalidDataType,

    // Configuration errors
    /// The operation or configuration is not valid
    InvalidOperation,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DeserializationError => write!(f, "Deserialization error"),
            ErrorKind::SerializationError => write!(f, "Serialization error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom StormDB error type.
///
/// `StormError` carries a message, a kind, an optional cause and the
/// backtrace captured where it was created.
///
/// # Examples
///
/// ```rust
/// use stormdb::errors::{ErrorKind, StormError};
///
/// let cause = StormError::new("disk unplugged", ErrorKind::IOError);
/// let err = StormError::new_with_cause("save failed", ErrorKind::IOError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct StormError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StormError>>,
    backtrace: Atomic<Backtrace>,
}

impl StormError {
    /// Creates a new `StormError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StormError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `StormError` wrapping the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StormError) -> Self {
        StormError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StormError> {
        self.cause.as_deref()
    }
}

impl Display for StormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // message with stack trace, or message followed by the cause chain
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for StormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for StormDB operations.
pub type StormResult<T> = Result<T, StormError>;

impl From<std::io::Error> for StormError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        StormError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<std::string::FromUtf8Error> for StormError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        StormError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<serde_json::Error> for StormError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json reports io failures through the same type
        let error_kind = if err.is_io() {
            ErrorKind::IOError
        } else if err.is_data() || err.is_syntax() || err.is_eof() {
            ErrorKind::DeserializationError
        } else {
            ErrorKind::SerializationError
        };
        StormError::new(&format!("JSON error: {}", err), error_kind)
    }
}

impl From<String> for StormError {
    fn from(msg: String) -> Self {
        StormError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for StormError {
    fn from(msg: &str) -> Self {
        StormError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storm_error_new_creates_error() {
        let error = StormError::new("An error occurred", ErrorKind::IOError);
        assert_eq!(error.message(), "An error occurred");
        assert_eq!(error.kind(), &ErrorKind::IOError);
        assert!(error.cause().is_none());
    }

    #[test]
    fn storm_error_new_with_cause_keeps_chain() {
        let cause = StormError::new("disk full", ErrorKind::IOError);
        let error = StormError::new_with_cause("save failed", ErrorKind::IOError, cause);
        assert_eq!(error.cause().map(|c| c.message()), Some("disk full"));
        assert!(error.source().is_some());
    }

    #[test]
    fn storm_error_display_is_message_only() {
        let error = StormError::new("bad payload", ErrorKind::DeserializationError);
        assert_eq!(format!("{}", error), "bad payload");
    }

    #[test]
    fn storm_error_debug_includes_cause() {
        let cause = StormError::new("inner", ErrorKind::IOError);
        let error = StormError::new_with_cause("outer", ErrorKind::IOError, cause);
        let debug = format!("{:?}", error);
        assert!(debug.contains("outer"));
        assert!(debug.contains("Caused by: inner"));
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::DeserializationError.to_string(), "Deserialization error");
        assert_eq!(ErrorKind::BackendError.to_string(), "Backend error");
        assert_eq!(ErrorKind::InvalidFieldName.to_string(), "Invalid field name");
    }

    #[test]
    fn io_not_found_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: StormError = io.into();
        assert_eq!(error.kind(), &ErrorKind::FileNotFound);
    }

    #[test]
    fn io_permission_denied_maps_to_permission_denied() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let error: StormError = io.into();
        assert_eq!(error.kind(), &ErrorKind::PermissionDenied);
    }

    #[test]
    fn io_other_maps_to_io_error() {
        let error: StormError = std::io::Error::other("boom").into();
        assert_eq!(error.kind(), &ErrorKind::IOError);
        assert!(error.message().contains("boom"));
    }

    #[test]
    fn utf8_error_maps_to_encoding_error() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let error: StormError = bad.into();
        assert_eq!(error.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn json_syntax_error_maps_to_deserialization_error() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: StormError = bad.into();
        assert_eq!(error.kind(), &ErrorKind::DeserializationError);
    }

    #[test]
    fn string_conversions_are_internal_errors() {
        let from_string: StormError = String::from("oops").into();
        let from_str: StormError = "oops".into();
        assert_eq!(from_string.kind(), &ErrorKind::InternalError);
        assert_eq!(from_str.kind(), &ErrorKind::InternalError);
    }
}

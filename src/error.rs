use std::fmt;

/// Unified error type for store, parsing and persistence operations
#[derive(Debug)]
pub enum TrackerError {
    /// A candidate item failed validation (blank name, unparseable number,
    /// non-positive stack size or weight)
    Validation(String),
    /// Another item already uses this name (case-insensitive)
    DuplicateName(String),
    /// Operation referenced a stale or out-of-range index
    IndexOutOfBounds { index: usize, len: usize },
    /// File I/O error while loading or saving the item file
    Io(std::io::Error),
    /// The item file exists but contains malformed JSON
    Parse(serde_json::Error),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Validation(msg) => write!(f, "Validation error: {}", msg),
            TrackerError::DuplicateName(name) => {
                write!(f, "An item named '{}' already exists", name)
            }
            TrackerError::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds (collection holds {})", index, len)
            }
            TrackerError::Io(e) => write!(f, "I/O error: {}", e),
            TrackerError::Parse(e) => write!(f, "Malformed item file: {}", e),
        }
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackerError::Io(e) => Some(e),
            TrackerError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Io(err)
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Parse(err)
    }
}

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

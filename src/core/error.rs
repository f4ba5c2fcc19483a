use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    InvalidInput,
    Internal,
    InvalidState,
    /// The index has not been committed yet, or is otherwise not searchable
    IndexUnavailable,
    /// A query or lookup named a field the schema does not define
    UnknownField,
    /// Highlight spans were unsorted, overlapping, empty or out of range
    MalformedMatchSpan,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn index_unavailable(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::IndexUnavailable, context.into())
    }

    pub fn unknown_field(field: &str) -> Self {
        Error::new(ErrorKind::UnknownField, format!("Unknown field '{}'", field))
    }

    pub fn malformed_span(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::MalformedMatchSpan, context.into())
    }

    /// Errors raised by the index layer rather than by the caller's input
    pub fn is_index_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::IndexUnavailable | ErrorKind::UnknownField)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

impl From<fst::Error> for Error {
    fn from(err: fst::Error) -> Self {
        Error {
            kind: ErrorKind::Internal,
            context: format!("FST error: {}", err),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error {
            kind: ErrorKind::InvalidInput,
            context: format!("Invalid term pattern: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

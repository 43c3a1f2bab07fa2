use quarry_workflow::ContextError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn no_element() -> Error {
        Error(ErrorKind::NoElement.into())
    }

    pub fn index_out_of_range(index: usize) -> Error {
        Error(ErrorKind::IndexOutOfRange { index }.into())
    }

    pub fn not_exactly_one(found: Cardinality) -> Error {
        Error(ErrorKind::NotExactlyOne { found }.into())
    }

    pub fn empty_collection(operation: &'static str) -> Error {
        Error(ErrorKind::EmptyCollection { operation }.into())
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn decode(source: serde_json::Error) -> Error {
        Error(ErrorKind::Decode { source }.into())
    }

    pub fn encode(source: serde_json::Error) -> Error {
        Error(ErrorKind::Encode { source }.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    /// Returns `true` if the error reports cancellation or an expired deadline.
    pub fn is_interrupted(&self) -> bool {
        matches!(self.kind(), ErrorKind::Interrupted(_))
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("sequence contains no element")]
    NoElement,

    #[error("index {index} is out of range")]
    IndexOutOfRange { index: usize },

    #[error("expected exactly one element, found {found}")]
    NotExactlyOne { found: Cardinality },

    #[error("{operation} requires a non-empty sequence")]
    EmptyCollection { operation: &'static str },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("failed to decode sequence: {source}")]
    Decode { source: serde_json::Error },

    #[error("failed to encode sequence: {source}")]
    Encode { source: serde_json::Error },

    #[error("interrupted: {0}")]
    Interrupted(#[from] ContextError),

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

/// How many elements a single-element accessor actually found when it did not
/// find exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Zero,
    Many,
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::Zero => write!(f, "none"),
            Cardinality::Many => write!(f, "more than one"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<ContextError> for Error {
    fn from(e: ContextError) -> Self {
        ErrorKind::Interrupted(e).into()
    }
}

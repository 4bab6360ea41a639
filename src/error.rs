use core::fmt;

/// Result alias for `syncat`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the induction pipeline and its stages.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty where at least one element is required.
    EmptyInput,

    /// The corpus contained no sentences or no tokens.
    EmptyCorpus,

    /// A corpus token could not be used as a word form.
    MalformedCorpus {
        /// Index of the offending sentence.
        sentence: usize,
        /// The offending token.
        token: String,
    },

    /// Matrix dimension mismatch.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Generic error with message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::EmptyCorpus => write!(f, "corpus contains no tokens"),
            Error::MalformedCorpus { sentence, token } => {
                write!(f, "malformed token {token:?} in sentence {sentence}")
            }
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

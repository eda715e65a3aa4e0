use std::fmt::{Debug, Display};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An empty password, or a salt source that produced nothing.
    InvalidArgument(&'static str),
    /// A work factor triple outside the guarded bounds.
    InvalidParameter(&'static str),
    /// A hash string that does not match any of the envelope grammars.
    InvalidEnvelope(&'static str),
    /// The work factor table could not be allocated.
    OutOfMemory,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::InvalidParameter(what) => write!(f, "invalid parameters: {what}"),
            Self::InvalidEnvelope(what) => write!(f, "invalid envelope: {what}"),
            Self::OutOfMemory => f.write_str("not enough memory for the work factor table"),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

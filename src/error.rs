/// Signal raised by a [`ByteInput`](crate::input::ByteInput) when a read cannot be satisfied.
///
/// Neither variant means the data is malformed. `Incomplete` asks the caller to replay the
/// attempt once more bytes arrive, `TooLarge` ends the attempt for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ::thiserror::Error)]
pub enum InputError {
    /// The window does not hold enough bytes yet.
    #[error("need {needed} readable bytes, only {available} available")]
    Incomplete { needed: usize, available: usize },

    /// Satisfying the read would exceed the size budget of the current object.
    #[error("object too big to unmarshal (limit: {limit} bytes)")]
    TooLarge { limit: usize },
}

/// Error type for this crate, shared by the serializer, deserializer and decoder.
#[derive(Debug, ::thiserror::Error)]
pub enum Error {
    /// Errors that don't fit into any other category.
    #[error("{0}")]
    Generic(String),

    /// Errors related to usage of unsupported types.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Errors related to values that are not valid for the given type.
    #[error("invalid {0}")]
    Invalid(String),

    /// A bounded read failed. Carried through the deserializer untouched.
    #[error(transparent)]
    Input(#[from] InputError),

    /// An object exceeded the configured maximum size. The connection is closed.
    #[error("frame too long: object exceeds {limit} bytes")]
    FrameTooLong { limit: usize },

    /// The stream ended in the middle of an object.
    #[error("stream ended with {remaining} bytes of an incomplete object")]
    TruncatedStream { remaining: usize },

    /// The decoder was used after it failed or finished.
    #[error("closed")]
    Closed,
}

impl Error {
    /// Whether this is the distinguished size-overflow protocol error.
    pub fn is_frame_too_long(&self) -> bool {
        matches!(self, Self::FrameTooLong { .. })
    }

    /// Whether this only asks for more input.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Input(InputError::Incomplete { .. }))
    }
}

/// Result type for this crate.
pub type Result<T> = ::std::result::Result<T, Error>;

impl ::serde::de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Generic(msg.to_string())
    }
}

impl ::serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Generic(msg.to_string())
    }
}

//! Error types for document traversal and UUID transcoding.
//!
//! This module contains the [`Error`] type which represents every failure the
//! reader, the cursor and the UUID transcoder can report. None of them are
//! recoverable locally: they describe a caller-side contract violation and
//! are returned unchanged.
//!
//! # Example
//!
//! ```
//! use na_bson::{BsonDocumentReader, Document, Error};
//!
//! let doc: Document = [("a", 1)].into_iter().collect();
//! let mut reader = BsonDocumentReader::new(&doc);
//! reader.read_start_document().unwrap();
//!
//! match reader.read_string() {
//!     Err(Error::TypeMismatch { expected, actual, .. }) => {
//!         println!("wanted {expected:?}, found {actual:?}");
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::fmt::{self, Display};

use crate::{BsonType, ContextType, State};

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// This type represents all possible errors of the reader and the UUID
/// transcoder.
///
/// # Variants
///
/// - [`Message`](Error::Message) - a custom message raised by a serde visitor
/// - [`InvalidState`](Error::InvalidState) - an operation was called in the wrong reader state
/// - [`TypeMismatch`](Error::TypeMismatch) - a typed accessor disagrees with the stored type
/// - [`ContextMismatch`](Error::ContextMismatch) - the context stack has an unexpected shape
/// - [`Exhausted`](Error::Exhausted) - a cursor was advanced past its last element
/// - [`MarkAlreadySet`](Error::MarkAlreadySet) - a second mark was requested while one is outstanding
/// - [`NoMark`](Error::NoMark) - a reset was requested without an outstanding mark
/// - [`InvalidBsonType`](Error::InvalidBsonType) - a byte is not a known BSON type tag
/// - [`Serialization`](Error::Serialization) - a UUID payload has the wrong length
/// - [`InvalidOperation`](Error::InvalidOperation) - a UUID cannot be transcoded with the representation
/// - [`Configuration`](Error::Configuration) - a representation is unknown or unusable for the encoder
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Message(String),

    /// A read, enter or exit operation was invoked in a state that does not
    /// allow it.
    InvalidState {
        method: &'static str,
        expected: &'static [State],
        actual: State,
    },

    /// A scalar accessor was invoked against a value of a different type.
    TypeMismatch {
        method: &'static str,
        expected: BsonType,
        actual: BsonType,
    },

    /// An exit found the wrong kind of frame on top of the context stack, or
    /// a reset could not find the frame it was marked on.
    ContextMismatch {
        method: &'static str,
        expected: &'static [ContextType],
        actual: ContextType,
    },

    /// `next` was called with neither buffered nor source elements left.
    Exhausted,

    /// `mark` was called while another mark is outstanding.
    MarkAlreadySet,

    /// `reset` was called without an outstanding mark.
    NoMark,

    /// An unknown BSON type byte.
    InvalidBsonType(u8),

    /// A binary payload could not be interpreted, e.g. a UUID that is not 16
    /// bytes long.
    Serialization(String),

    /// The operation cannot be performed with the given arguments.
    InvalidOperation(&'static str),

    /// The configuration selects something the operation has no rule for.
    Configuration(String),
}

#[cfg(feature = "serde")]
impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Message(message) => formatter.write_str(message),
            Error::InvalidState {
                method,
                expected,
                actual,
            } => {
                write!(formatter, "{method} can only be called when state is ")?;
                write_alternatives(formatter, expected)?;
                write!(formatter, ", not when state is {actual}")
            }
            Error::TypeMismatch {
                method,
                expected,
                actual,
            } => write!(
                formatter,
                "{method} can only be called when current type is {expected:?}, not when current type is {actual:?}"
            ),
            Error::ContextMismatch {
                method,
                expected,
                actual,
            } => {
                write!(formatter, "{method} can only be called when context is ")?;
                write_alternatives(formatter, expected)?;
                write!(formatter, ", not when context is {actual}")
            }
            Error::Exhausted => formatter.write_str("no more elements in sequence"),
            Error::MarkAlreadySet => formatter
                .write_str("a mark already exists, it must be cleared before creating a new one"),
            Error::NoMark => formatter.write_str("reset called without an outstanding mark"),
            Error::InvalidBsonType(tag) => write!(formatter, "invalid BSON type: {tag:#04x}"),
            Error::Serialization(message) => formatter.write_str(message),
            Error::InvalidOperation(message) => formatter.write_str(message),
            Error::Configuration(message) => formatter.write_str(message),
        }
    }
}

fn write_alternatives<T: Display>(formatter: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            formatter.write_str(if i + 1 == items.len() { " or " } else { ", " })?;
        }
        write!(formatter, "{item}")?;
    }
    Ok(())
}

impl std::error::Error for Error {}

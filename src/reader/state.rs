use std::fmt;

use crate::{BsonType, BsonValue};

/// Lifecycle state of a [`BsonDocumentReader`](crate::BsonDocumentReader).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum State {
    /// Nothing read yet; the next element is the implied top-level document.
    Initial,
    /// The next call reads a type tag.
    Type,
    /// A type has been read inside a document, its name is pending.
    Name,
    /// A value is pending.
    Value,
    /// The implied scope document of a code-with-scope value is pending.
    ScopeDocument,
    EndOfDocument,
    EndOfArray,
    /// The top-level document has been fully read.
    Done,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Initial => "INITIAL",
            State::Type => "TYPE",
            State::Name => "NAME",
            State::Value => "VALUE",
            State::ScopeDocument => "SCOPE_DOCUMENT",
            State::EndOfDocument => "END_OF_DOCUMENT",
            State::EndOfArray => "END_OF_ARRAY",
            State::Done => "DONE",
        })
    }
}

/// The kind of container a context frame traverses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ContextType {
    TopLevel,
    Document,
    Array,
    /// The scope document of a code-with-scope value.
    ScopeDocument,
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContextType::TopLevel => "TOP_LEVEL",
            ContextType::Document => "DOCUMENT",
            ContextType::Array => "ARRAY",
            ContextType::ScopeDocument => "SCOPE_DOCUMENT",
        })
    }
}

/// Reader-visible position captured by `mark` and restored by `reset`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReaderSnapshot<'a> {
    pub(crate) state: State,
    pub(crate) current_type: Option<BsonType>,
    pub(crate) current_name: Option<&'a str>,
    pub(crate) current_value: Option<&'a BsonValue>,
    pub(crate) context_type: ContextType,
    /// Index of the marked frame on the context stack.
    pub(crate) frame_index: usize,
}

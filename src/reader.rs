//! Pull-style reader over an in-memory BSON document.
//!
//! [`BsonDocumentReader`] walks a borrowed [`Document`] the way a decoder
//! walks a byte stream: it asks for the next type tag, then the name, then
//! the value, entering and leaving nested documents and arrays explicitly.
//!
//! ```text
//! Initial ──read_bson_type──▶ Value ──read_start_document──▶ Type
//!   Type ──read_bson_type──▶ Name (document) │ Value (array) │ EndOfDocument │ EndOfArray
//!   Name ──read_name──▶ Value ──read_*──▶ Type
//!   EndOfDocument ──read_end_document──▶ Type │ Done
//! ```
//!
//! A decoder that has to look ahead before committing calls
//! [`mark`](BsonDocumentReader::mark), reads freely, and then either
//! [`reset`](BsonDocumentReader::reset)s to replay exactly what it consumed
//! or [`clear_mark`](BsonDocumentReader::clear_mark)s to keep going.
//!
//! # Example
//!
//! ```
//! use na_bson::{BsonDocumentReader, BsonType, Document, State};
//!
//! let doc = Document::new().with("a", 1).with("b", vec![2, 3]);
//! let mut reader = BsonDocumentReader::new(&doc);
//!
//! reader.read_start_document()?;
//! assert_eq!(reader.read_bson_type()?, BsonType::Int32);
//! assert_eq!(reader.read_name()?, "a");
//! assert_eq!(reader.read_int32()?, 1);
//!
//! assert_eq!(reader.read_bson_type()?, BsonType::Array);
//! reader.read_start_array()?;
//! assert_eq!(reader.read_int32()?, 2);
//! assert_eq!(reader.read_int32()?, 3);
//! reader.read_end_array()?;
//!
//! reader.read_end_document()?;
//! assert_eq!(reader.state(), State::Done);
//! # Ok::<(), na_bson::Error>(())
//! ```

use crate::{
    Binary, BinarySubtype, BsonType, BsonValue, DbPointer, Document, Error, ObjectId,
    RegularExpression, Result, Timestamp, cold_path,
};

pub(crate) mod context;
pub(crate) mod markable;
pub(crate) mod state;

use context::{Context, ContextStack};
use state::ReaderSnapshot;
pub use state::{ContextType, State};

/// The mark currently outstanding on the reader.
struct OutstandingMark<'a> {
    frame_index: usize,
    context_type: ContextType,
    /// The marked frame, kept alive after the caller exited it.
    detached: Option<Context<'a>>,
}

/// A reader that traverses a borrowed [`Document`] through a type-tagged
/// cursor interface.
///
/// The reader is not thread-safe in the sense of concurrent use: every
/// operation takes `&mut self`.
pub struct BsonDocumentReader<'a> {
    document: &'a Document,
    state: State,
    current_type: Option<BsonType>,
    current_name: Option<&'a str>,
    /// `None` stands for the top-level document itself.
    current_value: Option<&'a BsonValue>,
    contexts: ContextStack<'a>,
    mark: Option<OutstandingMark<'a>>,
}

const TYPE_STATES: &[State] = &[State::Initial, State::ScopeDocument, State::Type];
const DOCUMENT_CONTEXTS: &[ContextType] = &[ContextType::Document, ContextType::ScopeDocument];

impl<'a> BsonDocumentReader<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            state: State::Initial,
            current_type: None,
            current_name: None,
            current_value: None,
            contexts: ContextStack::new(Context::document(ContextType::TopLevel, document)),
            mark: None,
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// The type tag most recently read, if any.
    #[inline]
    pub fn current_bson_type(&self) -> Option<BsonType> {
        self.current_type
    }

    /// The name of the current element when inside a document.
    #[inline]
    pub fn current_name(&self) -> Option<&'a str> {
        self.current_name
    }

    /// The kind of the innermost container being read.
    #[inline]
    pub fn context_type(&self) -> ContextType {
        self.contexts.top().kind()
    }

    /// Number of containers entered and not yet exited.
    #[inline]
    pub fn depth(&self) -> usize {
        self.contexts.top_index()
    }

    /// Returns `true` while a mark is outstanding.
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.mark.is_some()
    }

    /// Reads the type tag of the next element.
    ///
    /// The top level and the scope of a code-with-scope value have no tag of
    /// their own; for them [`BsonType::Document`] is implied. At the end of a
    /// document or array [`BsonType::EndOfDocument`] is returned once and the
    /// reader waits for the matching `read_end_*` call.
    pub fn read_bson_type(&mut self) -> Result<BsonType> {
        if matches!(self.state, State::Initial | State::ScopeDocument) {
            self.current_type = Some(BsonType::Document);
            self.state = State::Value;
            return Ok(BsonType::Document);
        }

        if self.state != State::Type {
            cold_path();
            return Err(self.invalid_state("read_bson_type", TYPE_STATES));
        }

        let context = self.contexts.top_mut();
        let value = match context.kind() {
            ContextType::Array => match context.next_value()? {
                Some(value) => {
                    self.state = State::Value;
                    value
                }
                None => {
                    self.state = State::EndOfArray;
                    self.current_type = Some(BsonType::EndOfDocument);
                    return Ok(BsonType::EndOfDocument);
                }
            },
            ContextType::Document | ContextType::ScopeDocument | ContextType::TopLevel => {
                match context.next_element()? {
                    Some((name, value)) => {
                        self.current_name = Some(name);
                        self.state = State::Name;
                        value
                    }
                    None => {
                        self.state = State::EndOfDocument;
                        self.current_type = Some(BsonType::EndOfDocument);
                        return Ok(BsonType::EndOfDocument);
                    }
                }
            }
        };

        let bson_type = value.bson_type();
        self.current_value = Some(value);
        self.current_type = Some(bson_type);
        Ok(bson_type)
    }

    /// Reads the name of the current element, reading its type first if
    /// that has not happened yet.
    pub fn read_name(&mut self) -> Result<&'a str> {
        if self.state == State::Type {
            self.read_bson_type()?;
        }
        if self.state != State::Name {
            cold_path();
            return Err(self.invalid_state("read_name", &[State::Name]));
        }
        self.state = State::Value;
        match self.current_name {
            Some(name) => Ok(name),
            None => {
                cold_path();
                Err(self.invalid_state("read_name", &[State::Name]))
            }
        }
    }

    pub fn skip_name(&mut self) -> Result<()> {
        if self.state != State::Name {
            cold_path();
            return Err(self.invalid_state("skip_name", &[State::Name]));
        }
        self.state = State::Value;
        Ok(())
    }

    /// Skips the current value, nested containers included.
    pub fn skip_value(&mut self) -> Result<()> {
        if self.state != State::Value {
            cold_path();
            return Err(self.invalid_state("skip_value", &[State::Value]));
        }
        self.state = self.next_state();
        Ok(())
    }

    /// Enters the current document, or the scope of the current
    /// code-with-scope value.
    pub fn read_start_document(&mut self) -> Result<()> {
        self.verify_bson_type("read_start_document", BsonType::Document)?;
        let (kind, document) = match self.current_value {
            None => (ContextType::Document, self.document),
            Some(BsonValue::Document(document)) => (ContextType::Document, document),
            Some(BsonValue::JavaScriptWithScope(code)) => (ContextType::ScopeDocument, &code.scope),
            Some(other) => {
                cold_path();
                return Err(Error::TypeMismatch {
                    method: "read_start_document",
                    expected: BsonType::Document,
                    actual: other.bson_type(),
                });
            }
        };
        self.contexts.push(Context::document(kind, document));
        self.state = State::Type;
        Ok(())
    }

    /// Leaves the current document once its end has been reached.
    pub fn read_end_document(&mut self) -> Result<()> {
        let kind = self.contexts.top().kind();
        if !DOCUMENT_CONTEXTS.contains(&kind) {
            cold_path();
            return Err(Error::ContextMismatch {
                method: "read_end_document",
                expected: DOCUMENT_CONTEXTS,
                actual: kind,
            });
        }
        if self.state == State::Type {
            self.read_bson_type()?;
        }
        if self.state != State::EndOfDocument {
            cold_path();
            return Err(self.invalid_state("read_end_document", &[State::EndOfDocument]));
        }
        self.pop_context("read_end_document")
    }

    pub fn read_start_array(&mut self) -> Result<()> {
        self.verify_bson_type("read_start_array", BsonType::Array)?;
        let values = match self.current_value {
            Some(BsonValue::Array(values)) => values,
            other => {
                cold_path();
                return Err(Error::TypeMismatch {
                    method: "read_start_array",
                    expected: BsonType::Array,
                    actual: other.map_or(BsonType::Document, BsonValue::bson_type),
                });
            }
        };
        self.contexts.push(Context::array(values));
        self.state = State::Type;
        Ok(())
    }

    /// Leaves the current array once its end has been reached.
    pub fn read_end_array(&mut self) -> Result<()> {
        let kind = self.contexts.top().kind();
        if kind != ContextType::Array {
            cold_path();
            return Err(Error::ContextMismatch {
                method: "read_end_array",
                expected: &[ContextType::Array],
                actual: kind,
            });
        }
        if self.state == State::Type {
            self.read_bson_type()?;
        }
        if self.state != State::EndOfArray {
            cold_path();
            return Err(self.invalid_state("read_end_array", &[State::EndOfArray]));
        }
        self.pop_context("read_end_array")
    }

    pub fn read_double(&mut self) -> Result<f64> {
        self.read_value("read_double", BsonType::Double, BsonValue::as_double)
    }

    pub fn read_string(&mut self) -> Result<&'a str> {
        self.read_value("read_string", BsonType::String, BsonValue::as_str)
    }

    pub fn read_binary_data(&mut self) -> Result<&'a Binary> {
        self.read_value("read_binary_data", BsonType::Binary, BsonValue::as_binary)
    }

    /// Subtype of the current binary value, without consuming it.
    pub fn peek_binary_subtype(&mut self) -> Result<BinarySubtype> {
        Ok(self.peek_binary("peek_binary_subtype")?.subtype)
    }

    /// Payload length of the current binary value, without consuming it.
    pub fn peek_binary_size(&mut self) -> Result<usize> {
        Ok(self.peek_binary("peek_binary_size")?.len())
    }

    pub fn read_undefined(&mut self) -> Result<()> {
        self.read_value("read_undefined", BsonType::Undefined, |_| Some(()))
    }

    pub fn read_object_id(&mut self) -> Result<ObjectId> {
        self.read_value("read_object_id", BsonType::ObjectId, BsonValue::as_object_id)
    }

    pub fn read_boolean(&mut self) -> Result<bool> {
        self.read_value("read_boolean", BsonType::Boolean, BsonValue::as_boolean)
    }

    /// Milliseconds since the Unix epoch.
    pub fn read_date_time(&mut self) -> Result<i64> {
        self.read_value("read_date_time", BsonType::DateTime, BsonValue::as_date_time)
    }

    pub fn read_null(&mut self) -> Result<()> {
        self.read_value("read_null", BsonType::Null, |_| Some(()))
    }

    pub fn read_regular_expression(&mut self) -> Result<&'a RegularExpression> {
        self.read_value(
            "read_regular_expression",
            BsonType::RegularExpression,
            BsonValue::as_regular_expression,
        )
    }

    pub fn read_db_pointer(&mut self) -> Result<&'a DbPointer> {
        self.read_value("read_db_pointer", BsonType::DbPointer, BsonValue::as_db_pointer)
    }

    pub fn read_javascript(&mut self) -> Result<&'a str> {
        self.read_value("read_javascript", BsonType::JavaScript, BsonValue::as_javascript)
    }

    /// Reads the code of a code-with-scope value.
    ///
    /// The reader is left in [`State::ScopeDocument`]: the scope must be read
    /// next, starting with [`read_start_document`](Self::read_start_document).
    pub fn read_javascript_with_scope(&mut self) -> Result<&'a str> {
        const METHOD: &str = "read_javascript_with_scope";
        self.verify_bson_type(METHOD, BsonType::JavaScriptWithScope)?;
        let code = self.current_value.and_then(BsonValue::as_javascript_with_scope);
        let Some(code) = code else {
            cold_path();
            return Err(self.type_mismatch(METHOD, BsonType::JavaScriptWithScope));
        };
        self.state = State::ScopeDocument;
        Ok(&code.code)
    }

    pub fn read_symbol(&mut self) -> Result<&'a str> {
        self.read_value("read_symbol", BsonType::Symbol, BsonValue::as_symbol)
    }

    pub fn read_int32(&mut self) -> Result<i32> {
        self.read_value("read_int32", BsonType::Int32, BsonValue::as_int32)
    }

    pub fn read_timestamp(&mut self) -> Result<Timestamp> {
        self.read_value("read_timestamp", BsonType::Timestamp, BsonValue::as_timestamp)
    }

    pub fn read_int64(&mut self) -> Result<i64> {
        self.read_value("read_int64", BsonType::Int64, BsonValue::as_int64)
    }

    pub fn read_min_key(&mut self) -> Result<()> {
        self.read_value("read_min_key", BsonType::MinKey, |_| Some(()))
    }

    pub fn read_max_key(&mut self) -> Result<()> {
        self.read_value("read_max_key", BsonType::MaxKey, |_| Some(()))
    }

    /// Marks the current position so it can be returned to with
    /// [`reset`](Self::reset).
    ///
    /// Only one mark may be outstanding; a second call fails with
    /// [`Error::MarkAlreadySet`] and leaves the first mark in place.
    pub fn mark(&mut self) -> Result<()> {
        if self.mark.is_some() {
            cold_path();
            return Err(Error::MarkAlreadySet);
        }
        let frame_index = self.contexts.top_index();
        let context_type = self.contexts.top().kind();
        let snapshot = ReaderSnapshot {
            state: self.state,
            current_type: self.current_type,
            current_name: self.current_name,
            current_value: self.current_value,
            context_type,
            frame_index,
        };
        self.contexts.top_mut().mark(snapshot)?;
        self.mark = Some(OutstandingMark {
            frame_index,
            context_type,
            detached: None,
        });
        Ok(())
    }

    /// Returns to the marked position.
    ///
    /// Everything consumed in the marked container since the mark is read
    /// again, in the same order. Containers entered after the mark are
    /// abandoned; the marked container is restored even if it was exited.
    /// The mark is spent afterwards.
    pub fn reset(&mut self) -> Result<()> {
        let Some(mark) = self.mark.as_mut() else {
            cold_path();
            return Err(Error::NoMark);
        };
        let frame_index = mark.frame_index;

        while self.contexts.top_index() > frame_index {
            if self.contexts.pop().is_none() {
                break;
            }
        }

        let top_index = self.contexts.top_index();
        if !(top_index == frame_index && self.contexts.top().is_marked()) {
            match mark.detached.take() {
                Some(frame) if top_index == frame_index => {
                    self.contexts.replace_top(frame);
                }
                Some(frame) if top_index + 1 == frame_index => {
                    self.contexts.push(frame);
                }
                detached => {
                    cold_path();
                    mark.detached = detached;
                    let expected: &'static [ContextType] = match mark.context_type {
                        ContextType::TopLevel => &[ContextType::TopLevel],
                        ContextType::Document => &[ContextType::Document],
                        ContextType::Array => &[ContextType::Array],
                        ContextType::ScopeDocument => &[ContextType::ScopeDocument],
                    };
                    return Err(Error::ContextMismatch {
                        method: "reset",
                        expected,
                        actual: self.contexts.top().kind(),
                    });
                }
            }
        }

        let snapshot = self.contexts.top_mut().reset()?;
        self.mark = None;
        self.state = snapshot.state;
        self.current_type = snapshot.current_type;
        self.current_name = snapshot.current_name;
        self.current_value = snapshot.current_value;
        debug_assert_eq!(snapshot.frame_index, self.contexts.top_index());
        debug_assert_eq!(snapshot.context_type, self.contexts.top().kind());
        Ok(())
    }

    /// Drops the outstanding mark, if any, without moving.
    pub fn clear_mark(&mut self) {
        if let Some(mark) = self.mark.take()
            && let Some(frame) = self.contexts.get_mut(mark.frame_index)
            && frame.is_marked()
        {
            frame.clear_mark();
        }
    }

    fn read_value<T>(
        &mut self,
        method: &'static str,
        expected: BsonType,
        get: impl FnOnce(&'a BsonValue) -> Option<T>,
    ) -> Result<T> {
        self.verify_bson_type(method, expected)?;
        let Some(value) = self.current_value.and_then(get) else {
            cold_path();
            return Err(self.type_mismatch(method, expected));
        };
        self.state = self.next_state();
        Ok(value)
    }

    fn peek_binary(&mut self, method: &'static str) -> Result<&'a Binary> {
        self.verify_bson_type(method, BsonType::Binary)?;
        match self.current_value.and_then(BsonValue::as_binary) {
            Some(binary) => Ok(binary),
            None => {
                cold_path();
                Err(self.type_mismatch(method, BsonType::Binary))
            }
        }
    }

    /// Brings the reader to [`State::Value`] holding a value of `required`
    /// type, reading the type tag and skipping the name as needed.
    fn verify_bson_type(&mut self, method: &'static str, required: BsonType) -> Result<()> {
        if TYPE_STATES.contains(&self.state) {
            self.read_bson_type()?;
        }
        if self.state == State::Name {
            self.skip_name()?;
        }
        if self.state != State::Value {
            cold_path();
            return Err(self.invalid_state(method, &[State::Value]));
        }
        if self.current_type != Some(required) {
            cold_path();
            return Err(self.type_mismatch(method, required));
        }
        Ok(())
    }

    fn next_state(&self) -> State {
        match self.contexts.top().kind() {
            ContextType::Array | ContextType::Document | ContextType::ScopeDocument => State::Type,
            ContextType::TopLevel => State::Done,
        }
    }

    fn pop_context(&mut self, method: &'static str) -> Result<()> {
        let popped_index = self.contexts.top_index();
        let Some(frame) = self.contexts.pop() else {
            cold_path();
            return Err(Error::ContextMismatch {
                method,
                expected: DOCUMENT_CONTEXTS,
                actual: ContextType::TopLevel,
            });
        };
        if let Some(mark) = self.mark.as_mut()
            && mark.frame_index == popped_index
            && frame.is_marked()
        {
            mark.detached = Some(frame);
        }
        self.state = self.next_state();
        Ok(())
    }

    fn invalid_state(&self, method: &'static str, expected: &'static [State]) -> Error {
        Error::InvalidState {
            method,
            expected,
            actual: self.state,
        }
    }

    fn type_mismatch(&self, method: &'static str, expected: BsonType) -> Error {
        Error::TypeMismatch {
            method,
            expected,
            actual: self.current_type.unwrap_or(BsonType::EndOfDocument),
        }
    }
}

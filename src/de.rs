//! Serde deserializer driven by [`BsonDocumentReader`].
//!
//! The deserializer only talks to the reader's pull interface, so it works
//! the same on any reader position: the top-level document, a nested
//! document, or a value the caller has already typed and named.
//!
//! # Quick Start
//!
//! ```
//! use na_bson::{Document, de::from_document};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Player<'a> {
//!     name: &'a str,
//!     health: f64,
//!     inventory: Vec<i32>,
//! }
//!
//! let doc = Document::new()
//!     .with("name", "Steve")
//!     .with("health", 20.0)
//!     .with("inventory", vec![1, 2, 3]);
//!
//! let player: Player = from_document(&doc)?;
//! assert_eq!(player.name, "Steve");
//! assert_eq!(player.inventory, [1, 2, 3]);
//! # Ok::<(), na_bson::Error>(())
//! ```
//!
//! # BSON to Rust Type Mapping
//!
//! | BSON Type | Rust Types |
//! |-----------|------------|
//! | `Double` | `f64`, `f32` |
//! | `String`, `Symbol`, `JavaScript` | `&str`, `String` |
//! | `Document` | structs, maps, enums `{ "Variant": value }` |
//! | `Array` | `Vec<T>`, tuples, `[T; N]` |
//! | `Binary` | `&[u8]`, `Vec<u8>` (with `serde_bytes`) |
//! | `Boolean` | `bool` |
//! | `Int32`, `Int64`, `DateTime` | integers |
//! | `Timestamp` | `u64` |
//! | `ObjectId` | `String` (hex) |
//! | `RegularExpression` | map `{ "$regex", "$options" }` |
//! | `DbPointer` | map `{ "$ref", "$id" }` |
//! | `Null`, `Undefined`, `MinKey`, `MaxKey` | `()`, `None` |
//!
//! # Look-ahead
//!
//! Before handing a document or an array to a visitor the deserializer marks
//! the reader, walks the container to count its elements, and resets. The
//! count becomes the exact `size_hint`, so collections allocate once. When the
//! caller already holds a mark the count is skipped and no hint is given.

use serde::{
    Deserialize,
    de::{self, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess},
};
use tracing::trace;

use crate::{BsonDocumentReader, BsonType, ContextType, Document, Error, Result, State, cold_path};

/// Deserializer reading from a borrowed [`BsonDocumentReader`].
pub struct Deserializer<'r, 'de> {
    reader: &'r mut BsonDocumentReader<'de>,
}

impl<'r, 'de> Deserializer<'r, 'de> {
    #[inline]
    pub fn new(reader: &'r mut BsonDocumentReader<'de>) -> Self {
        Self { reader }
    }

    /// Reads the type of the pending value, typing and naming it first if the
    /// reader is still in front of it.
    fn peek_type(&mut self) -> Result<BsonType> {
        if matches!(self.reader.state(), State::Initial | State::ScopeDocument | State::Type) {
            self.reader.read_bson_type()?;
        }
        if self.reader.state() == State::Name {
            self.reader.skip_name()?;
        }
        match self.reader.current_bson_type() {
            Some(bson_type) if self.reader.state() == State::Value => Ok(bson_type),
            _ => {
                cold_path();
                Err(Error::InvalidState {
                    method: "deserialize",
                    expected: &[State::Value],
                    actual: self.reader.state(),
                })
            }
        }
    }

    /// Counts the elements of the pending container, leaving the reader where
    /// it was.
    fn look_ahead_len(&mut self, bson_type: BsonType) -> Result<Option<usize>> {
        if self.reader.is_marked() {
            return Ok(None);
        }
        self.reader.mark()?;
        let counted = self.count_elements(bson_type);
        self.reader.reset()?;
        let len = counted?;
        trace!(?bson_type, len, "counted elements ahead");
        Ok(Some(len))
    }

    fn count_elements(&mut self, bson_type: BsonType) -> Result<usize> {
        let mut len = 0;
        if bson_type == BsonType::Array {
            self.reader.read_start_array()?;
            while self.reader.read_bson_type()? != BsonType::EndOfDocument {
                self.reader.skip_value()?;
                len += 1;
            }
            self.reader.read_end_array()?;
        } else {
            self.reader.read_start_document()?;
            while self.reader.read_bson_type()? != BsonType::EndOfDocument {
                self.reader.skip_name()?;
                self.reader.skip_value()?;
                len += 1;
            }
            self.reader.read_end_document()?;
        }
        Ok(len)
    }

    /// Consumes whatever a visitor left unread in the current container and
    /// leaves it.
    fn finish_container(&mut self) -> Result<()> {
        let mut drained = 0usize;
        if self.reader.state() == State::Value {
            self.reader.skip_value()?;
            drained += 1;
        }
        let in_array = self.reader.context_type() == ContextType::Array;
        if self.reader.state() == State::Type {
            while self.reader.read_bson_type()? != BsonType::EndOfDocument {
                if !in_array {
                    self.reader.skip_name()?;
                }
                self.reader.skip_value()?;
                drained += 1;
            }
        }
        if drained > 0 {
            trace!(in_array, drained, "drained unread elements");
        }
        if in_array {
            self.reader.read_end_array()
        } else {
            self.reader.read_end_document()
        }
    }

    fn visit_document<V: de::Visitor<'de>>(&mut self, visitor: V) -> Result<V::Value> {
        let remaining = self.look_ahead_len(BsonType::Document)?;
        self.reader.read_start_document()?;
        let depth = self.reader.depth();
        let value = visitor.visit_map(DocumentAccess {
            de: &mut *self,
            remaining,
            finished: false,
        })?;
        if self.reader.depth() == depth {
            self.finish_container()?;
        }
        Ok(value)
    }

    fn visit_array<V: de::Visitor<'de>>(&mut self, visitor: V) -> Result<V::Value> {
        let remaining = self.look_ahead_len(BsonType::Array)?;
        self.reader.read_start_array()?;
        let depth = self.reader.depth();
        let value = visitor.visit_seq(ArrayAccess {
            de: &mut *self,
            remaining,
            finished: false,
        })?;
        if self.reader.depth() == depth {
            self.finish_container()?;
        }
        Ok(value)
    }
}

/// Deserializes a `T` from a whole document.
///
/// # Errors
///
/// Returns whatever the reader reports, typically
/// [`Error::TypeMismatch`] when a field holds a type `T` cannot accept, or
/// [`Error::Message`] from the visitor.
pub fn from_document<'de, T>(document: &'de Document) -> Result<T>
where
    T: Deserialize<'de>,
{
    let mut reader = BsonDocumentReader::new(document);
    from_bson_reader(&mut reader)
}

/// Deserializes a `T` from the reader's pending value.
pub fn from_bson_reader<'de, T>(reader: &mut BsonDocumentReader<'de>) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(&mut Deserializer::new(reader))
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'_, 'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let bson_type = self.peek_type()?;
        match bson_type {
            BsonType::EndOfDocument => {
                cold_path();
                Err(Error::InvalidBsonType(BsonType::EndOfDocument as u8))
            }
            BsonType::Double => visitor.visit_f64(self.reader.read_double()?),
            BsonType::String => visitor.visit_borrowed_str(self.reader.read_string()?),
            BsonType::Document => self.visit_document(visitor),
            BsonType::Array => self.visit_array(visitor),
            BsonType::Binary => {
                visitor.visit_borrowed_bytes(&self.reader.read_binary_data()?.bytes)
            }
            BsonType::Undefined => {
                self.reader.read_undefined()?;
                visitor.visit_unit()
            }
            BsonType::ObjectId => visitor.visit_string(self.reader.read_object_id()?.to_string()),
            BsonType::Boolean => visitor.visit_bool(self.reader.read_boolean()?),
            BsonType::DateTime => visitor.visit_i64(self.reader.read_date_time()?),
            BsonType::Null => {
                self.reader.read_null()?;
                visitor.visit_unit()
            }
            BsonType::RegularExpression => {
                let regex = self.reader.read_regular_expression()?;
                visitor.visit_map(de::value::MapDeserializer::new(
                    [
                        ("$regex", regex.pattern.as_str()),
                        ("$options", regex.options.as_str()),
                    ]
                    .into_iter(),
                ))
            }
            BsonType::DbPointer => {
                let pointer = self.reader.read_db_pointer()?;
                visitor.visit_map(de::value::MapDeserializer::new(
                    [
                        ("$ref", pointer.namespace.clone()),
                        ("$id", pointer.id.to_string()),
                    ]
                    .into_iter(),
                ))
            }
            BsonType::JavaScript => visitor.visit_borrowed_str(self.reader.read_javascript()?),
            BsonType::Symbol => visitor.visit_borrowed_str(self.reader.read_symbol()?),
            BsonType::JavaScriptWithScope => {
                let code = self.reader.read_javascript_with_scope()?;
                self.reader.read_start_document()?;
                self.finish_container()?;
                visitor.visit_borrowed_str(code)
            }
            BsonType::Int32 => visitor.visit_i32(self.reader.read_int32()?),
            BsonType::Timestamp => visitor.visit_u64(self.reader.read_timestamp()?.value()),
            BsonType::Int64 => visitor.visit_i64(self.reader.read_int64()?),
            BsonType::MinKey => {
                self.reader.read_min_key()?;
                visitor.visit_unit()
            }
            BsonType::MaxKey => {
                self.reader.read_max_key()?;
                visitor.visit_unit()
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.peek_type()? {
            BsonType::Null => {
                self.reader.read_null()?;
                visitor.visit_none()
            }
            BsonType::Undefined => {
                self.reader.read_undefined()?;
                visitor.visit_none()
            }
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.peek_type()? {
            BsonType::String => {
                let variant = self.reader.read_string()?;
                visitor.visit_enum(variant.into_deserializer())
            }
            BsonType::Document => {
                self.reader.read_start_document()?;
                if self.reader.read_bson_type()? == BsonType::EndOfDocument {
                    cold_path();
                    return Err(Error::Message(
                        "expected a document with a single variant key".into(),
                    ));
                }
                let variant = self.reader.read_name()?;
                let value = visitor.visit_enum(VariantAccessor {
                    de: &mut *self,
                    variant,
                })?;
                if self.reader.read_bson_type()? != BsonType::EndOfDocument {
                    cold_path();
                    return Err(Error::Message(
                        "expected a document with a single variant key".into(),
                    ));
                }
                self.reader.read_end_document()?;
                Ok(value)
            }
            actual => {
                cold_path();
                Err(Error::TypeMismatch {
                    method: "deserialize_enum",
                    expected: BsonType::Document,
                    actual,
                })
            }
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.peek_type()?;
        self.reader.skip_value()?;
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string bytes byte_buf unit unit_struct
        seq tuple tuple_struct map struct identifier
    }
}

struct DocumentAccess<'d, 'r, 'de> {
    de: &'d mut Deserializer<'r, 'de>,
    remaining: Option<usize>,
    finished: bool,
}

impl<'de> MapAccess<'de> for DocumentAccess<'_, '_, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if self.finished {
            return Ok(None);
        }
        if self.de.reader.read_bson_type()? == BsonType::EndOfDocument {
            self.finished = true;
            self.de.reader.read_end_document()?;
            return Ok(None);
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        let name = self.de.reader.read_name()?;
        seed.deserialize(de::value::BorrowedStrDeserializer::new(name))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining
    }
}

struct ArrayAccess<'d, 'r, 'de> {
    de: &'d mut Deserializer<'r, 'de>,
    remaining: Option<usize>,
    finished: bool,
}

impl<'de> SeqAccess<'de> for ArrayAccess<'_, '_, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if self.finished {
            return Ok(None);
        }
        if self.de.reader.read_bson_type()? == BsonType::EndOfDocument {
            self.finished = true;
            self.de.reader.read_end_array()?;
            return Ok(None);
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining
    }
}

struct VariantAccessor<'d, 'r, 'de> {
    de: &'d mut Deserializer<'r, 'de>,
    variant: &'de str,
}

impl<'de> EnumAccess<'de> for VariantAccessor<'_, '_, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(de::value::BorrowedStrDeserializer::<Error>::new(
            self.variant,
        ))?;
        Ok((variant, self))
    }
}

impl<'de> VariantAccess<'de> for VariantAccessor<'_, '_, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Deserialize::deserialize(&mut *self.de)
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(&mut *self.de, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(&mut *self.de, visitor)
    }
}

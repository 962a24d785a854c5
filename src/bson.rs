use crate::Error;

pub mod subtype;

/// The type tag of a BSON element, with its wire byte as discriminant.
///
/// [`BsonType::EndOfDocument`] never describes a stored value: the reader
/// returns it as the end-of-sequence sentinel for both documents and arrays.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BsonType {
    EndOfDocument = 0x00,
    Double = 0x01,
    String = 0x02,
    Document = 0x03,
    Array = 0x04,
    Binary = 0x05,
    Undefined = 0x06,
    ObjectId = 0x07,
    Boolean = 0x08,
    DateTime = 0x09,
    Null = 0x0A,
    RegularExpression = 0x0B,
    DbPointer = 0x0C,
    JavaScript = 0x0D,
    Symbol = 0x0E,
    JavaScriptWithScope = 0x0F,
    Int32 = 0x10,
    Timestamp = 0x11,
    Int64 = 0x12,
    MaxKey = 0x7F,
    MinKey = 0xFF,
}

impl BsonType {
    /// Returns `true` if values of this type are traversed by entering them.
    ///
    /// # Example
    ///
    /// ```
    /// use na_bson::BsonType;
    ///
    /// assert!(BsonType::Document.is_container());
    /// assert!(BsonType::Array.is_container());
    /// assert!(BsonType::JavaScriptWithScope.is_container());
    /// assert!(!BsonType::Int32.is_container());
    /// ```
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Document | Self::Array | Self::JavaScriptWithScope
        )
    }

    /// Returns `true` for the types that carry no payload at all.
    pub const fn is_unit(self) -> bool {
        matches!(
            self,
            Self::Undefined | Self::Null | Self::MinKey | Self::MaxKey
        )
    }

    /// Returns `true` for fixed-width numeric types.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Double | Self::Int32 | Self::Int64)
    }
}

impl TryFrom<u8> for BsonType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::EndOfDocument,
            0x01 => Self::Double,
            0x02 => Self::String,
            0x03 => Self::Document,
            0x04 => Self::Array,
            0x05 => Self::Binary,
            0x06 => Self::Undefined,
            0x07 => Self::ObjectId,
            0x08 => Self::Boolean,
            0x09 => Self::DateTime,
            0x0A => Self::Null,
            0x0B => Self::RegularExpression,
            0x0C => Self::DbPointer,
            0x0D => Self::JavaScript,
            0x0E => Self::Symbol,
            0x0F => Self::JavaScriptWithScope,
            0x10 => Self::Int32,
            0x11 => Self::Timestamp,
            0x12 => Self::Int64,
            0x7F => Self::MaxKey,
            0xFF => Self::MinKey,
            _ => {
                crate::cold_path();
                return Err(Error::InvalidBsonType(value));
            }
        })
    }
}

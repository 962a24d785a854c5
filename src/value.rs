use crate::BsonType;

mod document;
mod types;

pub use document::*;
pub use types::*;

/// An owned BSON value.
///
/// The reader borrows a tree of these and never mutates it; replaying a mark
/// only hands out the same references again.
#[derive(Clone, Debug, PartialEq)]
pub enum BsonValue {
    Double(f64),
    String(String),
    Document(Document),
    Array(Vec<BsonValue>),
    Binary(Binary),
    Undefined,
    ObjectId(ObjectId),
    Boolean(bool),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Null,
    RegularExpression(RegularExpression),
    DbPointer(DbPointer),
    JavaScript(String),
    Symbol(String),
    JavaScriptWithScope(JavaScriptWithScope),
    Int32(i32),
    Timestamp(Timestamp),
    Int64(i64),
    MinKey,
    MaxKey,
}

macro_rules! copy_accessor {
    ($($as:ident, $is:ident => $variant:ident($t:ty);)*) => {
        $(
            #[inline]
            pub fn $as(&self) -> Option<$t> {
                match self {
                    BsonValue::$variant(value) => Some(*value),
                    _ => None,
                }
            }

            #[inline]
            pub fn $is(&self) -> bool {
                matches!(self, BsonValue::$variant(_))
            }
        )*
    };
}

macro_rules! ref_accessor {
    ($($as:ident, $is:ident => $variant:ident($t:ty);)*) => {
        $(
            #[inline]
            pub fn $as(&self) -> Option<&$t> {
                match self {
                    BsonValue::$variant(value) => Some(value),
                    _ => None,
                }
            }

            #[inline]
            pub fn $is(&self) -> bool {
                matches!(self, BsonValue::$variant(_))
            }
        )*
    };
}

impl BsonValue {
    #[inline]
    pub fn bson_type(&self) -> BsonType {
        match self {
            BsonValue::Double(_) => BsonType::Double,
            BsonValue::String(_) => BsonType::String,
            BsonValue::Document(_) => BsonType::Document,
            BsonValue::Array(_) => BsonType::Array,
            BsonValue::Binary(_) => BsonType::Binary,
            BsonValue::Undefined => BsonType::Undefined,
            BsonValue::ObjectId(_) => BsonType::ObjectId,
            BsonValue::Boolean(_) => BsonType::Boolean,
            BsonValue::DateTime(_) => BsonType::DateTime,
            BsonValue::Null => BsonType::Null,
            BsonValue::RegularExpression(_) => BsonType::RegularExpression,
            BsonValue::DbPointer(_) => BsonType::DbPointer,
            BsonValue::JavaScript(_) => BsonType::JavaScript,
            BsonValue::Symbol(_) => BsonType::Symbol,
            BsonValue::JavaScriptWithScope(_) => BsonType::JavaScriptWithScope,
            BsonValue::Int32(_) => BsonType::Int32,
            BsonValue::Timestamp(_) => BsonType::Timestamp,
            BsonValue::Int64(_) => BsonType::Int64,
            BsonValue::MinKey => BsonType::MinKey,
            BsonValue::MaxKey => BsonType::MaxKey,
        }
    }

    copy_accessor! {
        as_double, is_double => Double(f64);
        as_object_id, is_object_id => ObjectId(ObjectId);
        as_boolean, is_boolean => Boolean(bool);
        as_date_time, is_date_time => DateTime(i64);
        as_int32, is_int32 => Int32(i32);
        as_timestamp, is_timestamp => Timestamp(Timestamp);
        as_int64, is_int64 => Int64(i64);
    }

    ref_accessor! {
        as_document, is_document => Document(Document);
        as_array, is_array => Array(Vec<BsonValue>);
        as_binary, is_binary => Binary(Binary);
        as_regular_expression, is_regular_expression => RegularExpression(RegularExpression);
        as_db_pointer, is_db_pointer => DbPointer(DbPointer);
        as_javascript_with_scope, is_javascript_with_scope => JavaScriptWithScope(JavaScriptWithScope);
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BsonValue::String(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_javascript(&self) -> Option<&str> {
        match self {
            BsonValue::JavaScript(code) => Some(code),
            _ => None,
        }
    }

    #[inline]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            BsonValue::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, BsonValue::Null)
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for BsonValue {
                #[inline]
                fn from(value: $t) -> Self {
                    BsonValue::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    f64 => Double,
    String => String,
    Document => Document,
    Binary => Binary,
    ObjectId => ObjectId,
    bool => Boolean,
    RegularExpression => RegularExpression,
    DbPointer => DbPointer,
    JavaScriptWithScope => JavaScriptWithScope,
    i32 => Int32,
    Timestamp => Timestamp,
    i64 => Int64,
);

impl From<&str> for BsonValue {
    #[inline]
    fn from(value: &str) -> Self {
        BsonValue::String(value.to_owned())
    }
}

impl<T: Into<BsonValue>> From<Vec<T>> for BsonValue {
    #[inline]
    fn from(values: Vec<T>) -> Self {
        BsonValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<BsonValue>> From<Option<T>> for BsonValue {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(BsonValue::Null, Into::into)
    }
}

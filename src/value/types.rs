use std::{fmt, str::FromStr};

use crate::{BinarySubtype, Document, Error};

/// A binary payload together with its subtype byte.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binary {
    pub subtype: BinarySubtype,
    pub bytes: Vec<u8>,
}

impl Binary {
    #[inline]
    pub fn new(subtype: BinarySubtype, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            subtype,
            bytes: bytes.into(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A 12-byte object identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId(pub [u8; 12]);

impl ObjectId {
    #[inline]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Seconds since the Unix epoch stored in the leading four bytes.
    #[inline]
    pub const fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    /// Parses the 24-character hexadecimal form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            crate::cold_path();
            return Err(Error::Serialization(format!(
                "invalid hexadecimal object id: {s:?}"
            )));
        }
        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| {
                crate::cold_path();
                Error::Serialization(format!("invalid hexadecimal object id: {s:?}"))
            })?;
        }
        Ok(Self(bytes))
    }
}

/// Replication timestamp: seconds plus an ordinal within the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    pub time: u32,
    pub increment: u32,
}

impl Timestamp {
    #[inline]
    pub const fn new(time: u32, increment: u32) -> Self {
        Self { time, increment }
    }

    /// The combined 64-bit value as stored on the wire.
    #[inline]
    pub const fn value(&self) -> u64 {
        ((self.time as u64) << 32) | self.increment as u64
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegularExpression {
    pub pattern: String,
    pub options: String,
}

impl RegularExpression {
    /// Options are kept sorted, the canonical BSON form.
    pub fn new(pattern: impl Into<String>, options: impl AsRef<str>) -> Self {
        let mut options: Vec<char> = options.as_ref().chars().collect();
        options.sort_unstable();
        Self {
            pattern: pattern.into(),
            options: options.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DbPointer {
    pub namespace: String,
    pub id: ObjectId,
}

impl DbPointer {
    #[inline]
    pub fn new(namespace: impl Into<String>, id: ObjectId) -> Self {
        Self {
            namespace: namespace.into(),
            id,
        }
    }
}

/// JavaScript code with a document of variable bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct JavaScriptWithScope {
    pub code: String,
    pub scope: Document,
}

impl JavaScriptWithScope {
    #[inline]
    pub fn new(code: impl Into<String>, scope: Document) -> Self {
        Self {
            code: code.into(),
            scope,
        }
    }
}

//! UUID values and the byte layouts the different drivers store them in.
//!
//! A UUID travels as a 16-byte binary payload. The canonical layout writes
//! the most significant half big-endian, then the least significant half
//! big-endian. Older drivers each had their own order:
//!
//! | Representation | Payload relative to the canonical layout |
//! |----------------|------------------------------------------|
//! | `Standard` | identical |
//! | `JavaLegacy` | bytes `0..8` and `8..16` each reversed |
//! | `CSharpLegacy` | bytes `0..4`, `4..6` and `6..8` each reversed |
//! | `PythonLegacy` | identical, only the binary subtype differs |
//! | `Unspecified` | cannot be transcoded |
//!
//! Every rule only reverses disjoint ranges, so applying it twice restores
//! the original: the same table serves encoding and decoding.
//!
//! # Example
//!
//! ```
//! use na_bson::{Uuid, UuidRepresentation, decode_uuid, encode_uuid};
//!
//! let uuid = Uuid::new(0x0102030405060708, 0x090A0B0C0D0E0F10);
//! let bytes = encode_uuid(uuid, UuidRepresentation::JavaLegacy)?;
//! assert_eq!(
//!     bytes,
//!     [8, 7, 6, 5, 4, 3, 2, 1, 0x10, 0x0F, 0x0E, 0x0D, 0x0C, 0x0B, 0x0A, 9]
//! );
//! assert_eq!(decode_uuid(&bytes, UuidRepresentation::JavaLegacy)?, uuid);
//! # Ok::<(), na_bson::Error>(())
//! ```

use std::{fmt, ops::Range, str::FromStr};

use zerocopy::byteorder::{BigEndian, U64};

use crate::{BinarySubtype, Error, Result, cold_path};

pub mod codec;

/// A 128-bit identifier held as two 64-bit halves.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Uuid {
    most_significant_bits: u64,
    least_significant_bits: u64,
}

impl Uuid {
    pub const NIL: Uuid = Uuid::new(0, 0);

    #[inline]
    pub const fn new(most_significant_bits: u64, least_significant_bits: u64) -> Self {
        Self {
            most_significant_bits,
            least_significant_bits,
        }
    }

    #[inline]
    pub const fn from_u128(value: u128) -> Self {
        Self::new((value >> 64) as u64, value as u64)
    }

    #[inline]
    pub const fn as_u128(&self) -> u128 {
        ((self.most_significant_bits as u128) << 64) | self.least_significant_bits as u128
    }

    #[inline]
    pub const fn most_significant_bits(&self) -> u64 {
        self.most_significant_bits
    }

    #[inline]
    pub const fn least_significant_bits(&self) -> u64 {
        self.least_significant_bits
    }
}

impl From<u128> for Uuid {
    #[inline]
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<Uuid> for u128 {
    #[inline]
    fn from(value: Uuid) -> Self {
        value.as_u128()
    }
}

impl fmt::Display for Uuid {
    /// The hyphenated `8-4-4-4-12` form, lowercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msb = self.most_significant_bits;
        let lsb = self.least_significant_bits;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            msb >> 32,
            (msb >> 16) & 0xFFFF,
            msb & 0xFFFF,
            lsb >> 48,
            lsb & 0xFFFF_FFFF_FFFF
        )
    }
}

impl FromStr for Uuid {
    type Err = Error;

    /// Accepts the hyphenated form or 32 bare hex digits.
    fn from_str(s: &str) -> Result<Self> {
        let hyphenated = s.len() == 36
            && s.char_indices()
                .all(|(i, c)| matches!(i, 8 | 13 | 18 | 23) == (c == '-'));
        let digits: String = if hyphenated {
            s.chars().filter(|&c| c != '-').collect()
        } else {
            s.to_owned()
        };
        if digits.len() != 32 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            cold_path();
            return Err(Error::Serialization(format!("invalid UUID string: {s:?}")));
        }
        u128::from_str_radix(&digits, 16)
            .map(Uuid::from_u128)
            .map_err(|_| Error::Serialization(format!("invalid UUID string: {s:?}")))
    }
}

/// The byte layout used when a UUID is stored as a binary payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UuidRepresentation {
    /// No layout chosen; transcoding is refused.
    Unspecified,
    /// The canonical layout, binary subtype `0x04`.
    Standard,
    /// The legacy layout of the C# driver.
    CSharpLegacy,
    /// The legacy layout of the Java driver.
    JavaLegacy,
    /// The canonical layout under the legacy subtype `0x03`.
    PythonLegacy,
}

impl UuidRepresentation {
    pub const ALL: [UuidRepresentation; 5] = [
        UuidRepresentation::Unspecified,
        UuidRepresentation::Standard,
        UuidRepresentation::CSharpLegacy,
        UuidRepresentation::JavaLegacy,
        UuidRepresentation::PythonLegacy,
    ];

    /// The configuration name of this representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            UuidRepresentation::Unspecified => "unspecified",
            UuidRepresentation::Standard => "standard",
            UuidRepresentation::CSharpLegacy => "cSharpLegacy",
            UuidRepresentation::JavaLegacy => "javaLegacy",
            UuidRepresentation::PythonLegacy => "pythonLegacy",
        }
    }

    /// The binary subtype a UUID is written with, `None` for
    /// [`Unspecified`](Self::Unspecified).
    pub const fn binary_subtype(self) -> Option<BinarySubtype> {
        match self {
            UuidRepresentation::Standard => Some(BinarySubtype::Uuid),
            UuidRepresentation::CSharpLegacy
            | UuidRepresentation::JavaLegacy
            | UuidRepresentation::PythonLegacy => Some(BinarySubtype::UuidLegacy),
            UuidRepresentation::Unspecified => None,
        }
    }
}

impl fmt::Display for UuidRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UuidRepresentation {
    type Err = Error;

    /// Case-insensitive; `_` and `-` separators are ignored, so
    /// `"JAVA_LEGACY"`, `"java-legacy"` and `"javaLegacy"` all match.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "unspecified" => Ok(UuidRepresentation::Unspecified),
            "standard" => Ok(UuidRepresentation::Standard),
            "csharplegacy" => Ok(UuidRepresentation::CSharpLegacy),
            "javalegacy" => Ok(UuidRepresentation::JavaLegacy),
            "pythonlegacy" => Ok(UuidRepresentation::PythonLegacy),
            _ => {
                cold_path();
                Err(Error::Configuration(format!(
                    "unknown UUID representation: {s:?}"
                )))
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UuidRepresentation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UuidRepresentation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RepresentationVisitor;

        impl serde::de::Visitor<'_> for RepresentationVisitor {
            type Value = UuidRepresentation;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a UUID representation name")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(RepresentationVisitor)
    }
}

const IDENTITY: &[Range<usize>] = &[];
const JAVA_LEGACY: &[Range<usize>] = &[0..8, 8..16];
const C_SHARP_LEGACY: &[Range<usize>] = &[0..4, 4..6, 6..8];

/// The ranges of the canonical payload that `representation` stores
/// reversed, `None` if it has no layout.
const fn reversed_ranges(representation: UuidRepresentation) -> Option<&'static [Range<usize>]> {
    match representation {
        UuidRepresentation::Standard | UuidRepresentation::PythonLegacy => Some(IDENTITY),
        UuidRepresentation::JavaLegacy => Some(JAVA_LEGACY),
        UuidRepresentation::CSharpLegacy => Some(C_SHARP_LEGACY),
        UuidRepresentation::Unspecified => None,
    }
}

#[inline]
fn transform(bytes: &mut [u8; 16], ranges: &[Range<usize>]) {
    for range in ranges {
        bytes[range.clone()].reverse();
    }
}

/// Decodes a 16-byte payload stored under `representation`.
///
/// # Errors
///
/// - [`Error::Serialization`] if `bytes` is not exactly 16 bytes long
/// - [`Error::InvalidOperation`] for [`UuidRepresentation::Unspecified`]
pub fn decode_uuid(bytes: &[u8], representation: UuidRepresentation) -> Result<Uuid> {
    let Ok(mut payload) = <[u8; 16]>::try_from(bytes) else {
        cold_path();
        return Err(Error::Serialization(format!(
            "expected length to be 16, not {}",
            bytes.len()
        )));
    };
    let Some(ranges) = reversed_ranges(representation) else {
        cold_path();
        return Err(Error::InvalidOperation(
            "unable to convert byte array to UUID because the representation is unspecified",
        ));
    };
    transform(&mut payload, ranges);
    let [high, low]: [U64<BigEndian>; 2] = zerocopy::transmute!(payload);
    Ok(Uuid::new(high.get(), low.get()))
}

/// Encodes `uuid` into the 16-byte payload of `representation`.
///
/// # Errors
///
/// [`Error::Configuration`] for [`UuidRepresentation::Unspecified`], which
/// has no layout to encode into.
pub fn encode_uuid(uuid: Uuid, representation: UuidRepresentation) -> Result<[u8; 16]> {
    let Some(ranges) = reversed_ranges(representation) else {
        cold_path();
        return Err(Error::Configuration("unexpected UUID representation".into()));
    };
    let halves = [
        U64::<BigEndian>::new(uuid.most_significant_bits),
        U64::<BigEndian>::new(uuid.least_significant_bits),
    ];
    let mut payload: [u8; 16] = zerocopy::transmute!(halves);
    transform(&mut payload, ranges);
    Ok(payload)
}

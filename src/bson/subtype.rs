/// The subtype byte of a BSON binary value.
///
/// [`UserDefined`](Self::UserDefined) and [`Reserved`](Self::Reserved) are
/// meant to be built through `From<u8>`, which only produces them for bytes
/// without a named variant. Building one by hand around such a byte, e.g.
/// `UserDefined(0x03)`, does not survive a round trip through `u8`:
///
/// ```
/// use na_bson::BinarySubtype;
///
/// assert_eq!(BinarySubtype::from(0x90), BinarySubtype::UserDefined(0x90));
/// assert_eq!(BinarySubtype::from(u8::from(BinarySubtype::UserDefined(0x03))), BinarySubtype::UuidLegacy);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BinarySubtype {
    Generic,
    Function,
    OldBinary,
    /// UUID in one of the legacy driver byte orders (`0x03`).
    UuidLegacy,
    /// UUID in the standard byte order (`0x04`).
    Uuid,
    Md5,
    /// `0x80..=0xFF`, reserved for applications.
    UserDefined(u8),
    /// `0x06..=0x7F` bytes without a named variant.
    Reserved(u8),
}

impl BinarySubtype {
    /// Returns `true` for both UUID subtypes.
    ///
    /// ```
    /// use na_bson::BinarySubtype;
    ///
    /// assert!(BinarySubtype::Uuid.is_uuid());
    /// assert!(BinarySubtype::UuidLegacy.is_uuid());
    /// assert!(!BinarySubtype::Generic.is_uuid());
    /// ```
    pub const fn is_uuid(self) -> bool {
        matches!(self, Self::Uuid | Self::UuidLegacy)
    }

    /// Returns `false` for a hand-built `UserDefined` or `Reserved` whose byte
    /// `From<u8>` maps to another variant.
    pub const fn is_canonical(self) -> bool {
        match self {
            Self::UserDefined(byte) => byte >= 0x80,
            Self::Reserved(byte) => byte >= 0x06 && byte < 0x80,
            _ => true,
        }
    }
}

impl From<u8> for BinarySubtype {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Generic,
            0x01 => Self::Function,
            0x02 => Self::OldBinary,
            0x03 => Self::UuidLegacy,
            0x04 => Self::Uuid,
            0x05 => Self::Md5,
            0x80..=0xFF => Self::UserDefined(value),
            _ => Self::Reserved(value),
        }
    }
}

impl From<BinarySubtype> for u8 {
    fn from(value: BinarySubtype) -> Self {
        match value {
            BinarySubtype::Generic => 0x00,
            BinarySubtype::Function => 0x01,
            BinarySubtype::OldBinary => 0x02,
            BinarySubtype::UuidLegacy => 0x03,
            BinarySubtype::Uuid => 0x04,
            BinarySubtype::Md5 => 0x05,
            BinarySubtype::UserDefined(byte) | BinarySubtype::Reserved(byte) => byte,
        }
    }
}

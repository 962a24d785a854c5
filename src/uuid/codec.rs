use tracing::trace;

use crate::{
    Binary, BsonDocumentReader, BsonValue, Decoder, DecoderContext, Encoder, EncoderContext,
    Result, Uuid, UuidRepresentation, decode_uuid, encode_uuid,
};

/// Converts between [`Uuid`] and binary values.
///
/// By default the representation comes from the context of each call. A codec
/// can pin either direction instead, which is how a migration reads legacy
/// data and writes the standard layout:
///
/// ```
/// use na_bson::{
///     BinarySubtype, BsonValue, Encoder, EncoderContext, Uuid, UuidCodec, UuidRepresentation,
/// };
///
/// let codec = UuidCodec::new()
///     .with_decoder_representation(UuidRepresentation::JavaLegacy)
///     .with_encoder_representation(UuidRepresentation::Standard);
///
/// let value = codec.encode(&Uuid::from_u128(1), &EncoderContext::default())?;
/// let BsonValue::Binary(binary) = value else { unreachable!() };
/// assert_eq!(binary.subtype, BinarySubtype::Uuid);
/// # Ok::<(), na_bson::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UuidCodec {
    encoder_representation: Option<UuidRepresentation>,
    decoder_representation: Option<UuidRepresentation>,
}

impl UuidCodec {
    #[inline]
    pub const fn new() -> Self {
        Self {
            encoder_representation: None,
            decoder_representation: None,
        }
    }

    #[inline]
    pub const fn with_encoder_representation(mut self, representation: UuidRepresentation) -> Self {
        self.encoder_representation = Some(representation);
        self
    }

    #[inline]
    pub const fn with_decoder_representation(mut self, representation: UuidRepresentation) -> Self {
        self.decoder_representation = Some(representation);
        self
    }

    /// Encodes into a binary value whose subtype follows the representation.
    pub fn encode_binary(&self, uuid: Uuid, context: &EncoderContext) -> Result<Binary> {
        let representation = self
            .encoder_representation
            .unwrap_or(context.uuid_representation());
        let bytes = encode_uuid(uuid, representation)?;
        let Some(subtype) = representation.binary_subtype() else {
            crate::cold_path();
            return Err(crate::Error::Configuration(
                "unexpected UUID representation".into(),
            ));
        };
        trace!(%uuid, %representation, ?subtype, "encoded uuid");
        Ok(Binary::new(subtype, bytes))
    }

    /// Decodes a binary value regardless of its subtype.
    pub fn decode_binary(&self, binary: &Binary, context: &DecoderContext) -> Result<Uuid> {
        let representation = self
            .decoder_representation
            .unwrap_or(context.uuid_representation());
        let uuid = decode_uuid(&binary.bytes, representation)?;
        trace!(%uuid, %representation, subtype = ?binary.subtype, "decoded uuid");
        Ok(uuid)
    }
}

impl Encoder<Uuid> for UuidCodec {
    fn encode(&self, value: &Uuid, context: &EncoderContext) -> Result<BsonValue> {
        self.encode_binary(*value, context).map(BsonValue::Binary)
    }
}

impl Decoder<Uuid> for UuidCodec {
    /// Reads the current binary value and decodes it.
    fn decode(&self, reader: &mut BsonDocumentReader<'_>, context: &DecoderContext) -> Result<Uuid> {
        let binary = reader.read_binary_data()?;
        self.decode_binary(binary, context)
    }
}

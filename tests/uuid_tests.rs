use na_bson::{
    Binary, BinarySubtype, BsonDocumentReader, BsonValue, Decoder, DecoderContext, Document,
    Encoder, EncoderContext, Error, Uuid, UuidCodec, UuidRepresentation, decode_uuid, encode_uuid,
};

const SAMPLE: Uuid = Uuid::new(0x0102030405060708, 0x090A0B0C0D0E0F10);
const CANONICAL: [u8; 16] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10,
];

const TRANSCODABLE: [UuidRepresentation; 4] = [
    UuidRepresentation::Standard,
    UuidRepresentation::CSharpLegacy,
    UuidRepresentation::JavaLegacy,
    UuidRepresentation::PythonLegacy,
];

// ============ Layouts ============

#[test]
fn test_java_legacy_layout() {
    let bytes = encode_uuid(SAMPLE, UuidRepresentation::JavaLegacy).unwrap();
    assert_eq!(
        bytes,
        [
            0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, 0x10, 0x0F, 0x0E, 0x0D, 0x0C, 0x0B,
            0x0A, 0x09
        ]
    );
}

#[test]
fn test_standard_and_python_layouts_are_canonical() {
    assert_eq!(encode_uuid(SAMPLE, UuidRepresentation::Standard).unwrap(), CANONICAL);
    assert_eq!(encode_uuid(SAMPLE, UuidRepresentation::PythonLegacy).unwrap(), CANONICAL);
}

#[test]
fn test_csharp_legacy_layout() {
    let bytes = encode_uuid(SAMPLE, UuidRepresentation::CSharpLegacy).unwrap();
    assert_eq!(
        bytes,
        [
            0x04, 0x03, 0x02, 0x01, 0x06, 0x05, 0x08, 0x07, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
            0x0F, 0x10
        ]
    );
}

#[test]
fn test_decode_java_legacy() {
    let bytes = [
        0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, 0x10, 0x0F, 0x0E, 0x0D, 0x0C, 0x0B, 0x0A,
        0x09,
    ];
    let uuid = decode_uuid(&bytes, UuidRepresentation::JavaLegacy).unwrap();
    assert_eq!(uuid.most_significant_bits(), 0x0102030405060708);
    assert_eq!(uuid.least_significant_bits(), 0x090A0B0C0D0E0F10);
}

#[test]
fn test_round_trip_every_representation() {
    let samples = [Uuid::NIL, SAMPLE, Uuid::from_u128(u128::MAX), Uuid::from_u128(0xDEAD_BEEF)];
    for representation in TRANSCODABLE {
        for uuid in samples {
            let bytes = encode_uuid(uuid, representation).unwrap();
            assert_eq!(decode_uuid(&bytes, representation).unwrap(), uuid, "{representation}");
        }
    }
}

#[test]
fn test_java_and_standard_layouts_differ() {
    let java = encode_uuid(SAMPLE, UuidRepresentation::JavaLegacy).unwrap();
    let standard = encode_uuid(SAMPLE, UuidRepresentation::Standard).unwrap();
    assert_ne!(java, standard);
}

// ============ Failures ============

#[test]
fn test_unspecified_decode_fails() {
    assert!(matches!(
        decode_uuid(&CANONICAL, UuidRepresentation::Unspecified),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn test_unspecified_encode_fails() {
    assert!(matches!(
        encode_uuid(SAMPLE, UuidRepresentation::Unspecified),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_wrong_length_fails_for_every_representation() {
    for representation in UuidRepresentation::ALL {
        for len in [0, 15, 17, 32] {
            let bytes = vec![0u8; len];
            match decode_uuid(&bytes, representation) {
                Err(Error::Serialization(message)) => {
                    assert_eq!(message, format!("expected length to be 16, not {len}"));
                }
                other => panic!("{representation} with {len} bytes: {other:?}"),
            }
        }
    }
}

// ============ Text forms ============

#[test]
fn test_uuid_display_and_parse() {
    assert_eq!(SAMPLE.to_string(), "01020304-0506-0708-090a-0b0c0d0e0f10");
    assert_eq!("01020304-0506-0708-090a-0b0c0d0e0f10".parse::<Uuid>().unwrap(), SAMPLE);
    assert_eq!("0102030405060708090A0B0C0D0E0F10".parse::<Uuid>().unwrap(), SAMPLE);
    assert!("0102030405060708090a0b0c0d0e0f1".parse::<Uuid>().is_err());
    assert!("01020304-0506-0708-090a-0b0c0d0e0f1g".parse::<Uuid>().is_err());
    assert!("0102030-40506-0708-090a-0b0c0d0e0f10".parse::<Uuid>().is_err());
}

#[test]
fn test_uuid_u128_conversions() {
    let value = 0x0102030405060708_090A0B0C0D0E0F10u128;
    assert_eq!(Uuid::from(value), SAMPLE);
    assert_eq!(u128::from(SAMPLE), value);
}

#[test]
fn test_representation_names() {
    for representation in UuidRepresentation::ALL {
        let parsed: UuidRepresentation = representation.as_str().parse().unwrap();
        assert_eq!(parsed, representation);
    }
    assert_eq!(
        "JAVA_LEGACY".parse::<UuidRepresentation>().unwrap(),
        UuidRepresentation::JavaLegacy
    );
    assert_eq!(
        "c-sharp-legacy".parse::<UuidRepresentation>().unwrap(),
        UuidRepresentation::CSharpLegacy
    );
    let err = "little_endian".parse::<UuidRepresentation>().unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(err.to_string(), "unknown UUID representation: \"little_endian\"");
}

#[test]
fn test_representation_subtypes() {
    assert_eq!(UuidRepresentation::Standard.binary_subtype(), Some(BinarySubtype::Uuid));
    for representation in [
        UuidRepresentation::CSharpLegacy,
        UuidRepresentation::JavaLegacy,
        UuidRepresentation::PythonLegacy,
    ] {
        assert_eq!(representation.binary_subtype(), Some(BinarySubtype::UuidLegacy));
    }
    assert_eq!(UuidRepresentation::Unspecified.binary_subtype(), None);
}

// ============ Codec ============

#[test]
fn test_contexts_default_to_java_legacy() {
    assert_eq!(
        DecoderContext::default().uuid_representation(),
        UuidRepresentation::JavaLegacy
    );
    assert_eq!(
        EncoderContext::default().uuid_representation(),
        UuidRepresentation::JavaLegacy
    );
}

#[test]
fn test_codec_encodes_with_context_representation() {
    let codec = UuidCodec::new();
    let standard = EncoderContext::builder()
        .uuid_representation(UuidRepresentation::Standard)
        .build();

    let binary = codec.encode_binary(SAMPLE, &standard).unwrap();
    assert_eq!(binary, Binary::new(BinarySubtype::Uuid, CANONICAL));

    let binary = codec.encode_binary(SAMPLE, &EncoderContext::default()).unwrap();
    assert_eq!(binary.subtype, BinarySubtype::UuidLegacy);
    assert_eq!(binary.bytes[0], 0x08);
}

#[test]
fn test_codec_encode_unspecified_fails() {
    let context = EncoderContext::builder()
        .uuid_representation(UuidRepresentation::Unspecified)
        .build();
    assert!(matches!(
        UuidCodec::new().encode(&SAMPLE, &context),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_codec_asymmetric_migration() {
    let codec = UuidCodec::new()
        .with_decoder_representation(UuidRepresentation::JavaLegacy)
        .with_encoder_representation(UuidRepresentation::Standard);

    let legacy = encode_uuid(SAMPLE, UuidRepresentation::JavaLegacy).unwrap();
    let doc = Document::new().with("_id", Binary::new(BinarySubtype::UuidLegacy, legacy));
    let mut reader = BsonDocumentReader::new(&doc);
    reader.read_start_document().unwrap();

    let standard_context = DecoderContext::builder()
        .uuid_representation(UuidRepresentation::Standard)
        .build();
    let uuid = codec.decode(&mut reader, &standard_context).unwrap();
    assert_eq!(uuid, SAMPLE);
    reader.read_end_document().unwrap();

    let written = codec.encode(&uuid, &EncoderContext::default()).unwrap();
    assert_eq!(
        written,
        BsonValue::Binary(Binary::new(BinarySubtype::Uuid, CANONICAL))
    );
}

#[test]
fn test_codec_decode_ignores_subtype() {
    let binary = Binary::new(BinarySubtype::Generic, CANONICAL);
    let context = DecoderContext::builder()
        .uuid_representation(UuidRepresentation::Standard)
        .build();
    assert_eq!(UuidCodec::new().decode_binary(&binary, &context).unwrap(), SAMPLE);
}

#[test]
fn test_codec_decode_wrong_type() {
    let doc = Document::new().with("_id", "not a uuid");
    let mut reader = BsonDocumentReader::new(&doc);
    reader.read_start_document().unwrap();
    assert!(matches!(
        UuidCodec::new().decode(&mut reader, &DecoderContext::default()),
        Err(Error::TypeMismatch { .. })
    ));
}

use na_bson::{
    Binary, BinarySubtype, BsonType, BsonValue, DbPointer, Document, Error, JavaScriptWithScope,
    ObjectId, RegularExpression, Timestamp,
};
use pretty_assertions::assert_eq;

#[test]
fn test_document_insert_replaces_in_place() {
    let mut doc = Document::new();
    assert_eq!(doc.insert("a", 1), None);
    assert_eq!(doc.insert("b", 2), None);
    assert_eq!(doc.insert("a", "changed"), Some(BsonValue::Int32(1)));
    assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(doc["a"], BsonValue::String("changed".into()));
    assert_eq!(doc.len(), 2);
}

#[test]
fn test_document_remove_and_lookup() {
    let mut doc: Document = [("x", 1.0), ("y", 2.0)].into_iter().collect();
    assert!(doc.contains_key("x"));
    assert_eq!(doc.remove("x"), Some(BsonValue::Double(1.0)));
    assert_eq!(doc.remove("x"), None);
    assert!(!doc.contains_key("x"));
    assert_eq!(doc.get("y").and_then(BsonValue::as_double), Some(2.0));
    assert!(doc.get("missing").is_none());
}

#[test]
fn test_document_iterators() {
    let doc = Document::new().with("one", 1).with("two", 2i64).with("three", true);
    let forward: Vec<_> = doc.iter().map(|(name, _)| name).collect();
    let backward: Vec<_> = doc.iter().rev().map(|(name, _)| name).collect();
    assert_eq!(forward, ["one", "two", "three"]);
    assert_eq!(backward, ["three", "two", "one"]);
    assert_eq!(doc.iter().len(), 3);

    let types: Vec<_> = doc.values().map(BsonValue::bson_type).collect();
    assert_eq!(types, [BsonType::Int32, BsonType::Int64, BsonType::Boolean]);

    let owned: Vec<(String, BsonValue)> = doc.clone().into_iter().collect();
    assert_eq!(owned[2], ("three".to_owned(), BsonValue::Boolean(true)));
}

#[test]
fn test_document_extend() {
    let mut doc = Document::with_capacity(2);
    assert!(doc.is_empty());
    doc.extend([("a", 1), ("b", 2), ("a", 3)]);
    assert_eq!(doc, Document::new().with("a", 3).with("b", 2));
}

#[test]
#[should_panic]
fn test_document_index_missing_key_panics() {
    let doc = Document::new();
    let _ = &doc["missing"];
}

#[test]
fn test_value_types() {
    let oid = ObjectId::from_bytes([0; 12]);
    let cases: Vec<(BsonValue, BsonType)> = vec![
        (1.0.into(), BsonType::Double),
        ("s".into(), BsonType::String),
        (Document::new().into(), BsonType::Document),
        (vec![1, 2].into(), BsonType::Array),
        (Binary::new(BinarySubtype::Md5, vec![0; 16]).into(), BsonType::Binary),
        (BsonValue::Undefined, BsonType::Undefined),
        (oid.into(), BsonType::ObjectId),
        (true.into(), BsonType::Boolean),
        (BsonValue::DateTime(0), BsonType::DateTime),
        (Option::<i32>::None.into(), BsonType::Null),
        (RegularExpression::new("a", "").into(), BsonType::RegularExpression),
        (DbPointer::new("ns", oid).into(), BsonType::DbPointer),
        (BsonValue::JavaScript("1".into()), BsonType::JavaScript),
        (BsonValue::Symbol("s".into()), BsonType::Symbol),
        (
            JavaScriptWithScope::new("x", Document::new()).into(),
            BsonType::JavaScriptWithScope,
        ),
        (5.into(), BsonType::Int32),
        (Timestamp::new(1, 2).into(), BsonType::Timestamp),
        (5i64.into(), BsonType::Int64),
        (BsonValue::MinKey, BsonType::MinKey),
        (BsonValue::MaxKey, BsonType::MaxKey),
    ];
    for (value, expected) in cases {
        assert_eq!(value.bson_type(), expected, "{value:?}");
    }
}

#[test]
fn test_accessors_return_none_on_other_types() {
    let value = BsonValue::Int32(3);
    assert_eq!(value.as_int32(), Some(3));
    assert!(value.is_int32());
    assert_eq!(value.as_int64(), None);
    assert_eq!(value.as_str(), None);
    assert!(value.as_document().is_none());
    assert!(!value.is_null());

    let code = BsonValue::JavaScript("f()".into());
    assert_eq!(code.as_javascript(), Some("f()"));
    assert_eq!(code.as_symbol(), None);
    assert_eq!(code.as_str(), None);
}

#[test]
fn test_object_id_hex() {
    let oid: ObjectId = "507f1f77bcf86cd799439011".parse().unwrap();
    assert_eq!(oid.to_string(), "507f1f77bcf86cd799439011");
    assert_eq!(oid.timestamp(), 0x507f1f77);
    assert_eq!(oid.bytes()[11], 0x11);
    assert!(matches!(
        "507f1f77bcf86cd79943901".parse::<ObjectId>(),
        Err(Error::Serialization(_))
    ));
    assert!("507f1f77bcf86cd79943901z".parse::<ObjectId>().is_err());
    assert!("+07f1f77bcf86cd799439011".parse::<ObjectId>().is_err());
}

#[test]
fn test_timestamp_value() {
    let ts = Timestamp::new(1, 2);
    assert_eq!(ts.value(), (1u64 << 32) | 2);
    assert!(Timestamp::new(1, 3) > ts);
}

#[test]
fn test_regular_expression_sorts_options() {
    let regex = RegularExpression::new("^x", "xsmi");
    assert_eq!(regex.options, "imsx");
}

#[test]
fn test_binary_subtype_bytes() {
    for byte in [0x00u8, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x42, 0x80, 0xFF] {
        assert_eq!(u8::from(BinarySubtype::from(byte)), byte);
    }
    assert_eq!(BinarySubtype::from(0x90), BinarySubtype::UserDefined(0x90));
    assert_eq!(BinarySubtype::from(0x07), BinarySubtype::Reserved(0x07));
    assert!(BinarySubtype::Uuid.is_uuid());
    assert!(BinarySubtype::UuidLegacy.is_uuid());
    assert!(!BinarySubtype::Generic.is_uuid());
}

#[test]
fn test_binary_subtype_from_byte_is_canonical() {
    for byte in 0..=u8::MAX {
        let subtype = BinarySubtype::from(byte);
        assert!(subtype.is_canonical(), "{byte:#04x}");
        assert_eq!(BinarySubtype::from(u8::from(subtype)), subtype);
    }
}

#[test]
fn test_hand_built_subtype_with_named_byte() {
    let subtype = BinarySubtype::UserDefined(0x03);
    assert!(!subtype.is_canonical());
    assert_eq!(BinarySubtype::from(u8::from(subtype)), BinarySubtype::UuidLegacy);
    assert!(!BinarySubtype::Reserved(0x04).is_canonical());
    assert!(!BinarySubtype::Reserved(0x80).is_canonical());
    assert!(BinarySubtype::Reserved(0x06).is_canonical());
}

#[test]
fn test_bson_type_tags() {
    for byte in 0x00..=0x12u8 {
        let bson_type = BsonType::try_from(byte).unwrap();
        assert_eq!(bson_type as u8, byte);
    }
    assert_eq!(BsonType::try_from(0x7F).unwrap(), BsonType::MaxKey);
    assert_eq!(BsonType::try_from(0xFF).unwrap(), BsonType::MinKey);
    assert_eq!(BsonType::try_from(0x13).unwrap_err(), Error::InvalidBsonType(0x13));
    assert!(BsonType::Null.is_unit());
    assert!(BsonType::Int64.is_numeric());
    assert!(!BsonType::String.is_container());
}

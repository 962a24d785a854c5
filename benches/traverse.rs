use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use na_bson::{
    BsonDocumentReader, BsonType, Document, Uuid, UuidRepresentation, decode_uuid, encode_uuid,
};

fn build_document(fields: usize) -> Document {
    (0..fields)
        .map(|i| {
            let value: na_bson::BsonValue = match i % 3 {
                0 => (i as i32).into(),
                1 => format!("value-{i}").into(),
                _ => vec![i as i64, -(i as i64)].into(),
            };
            (format!("field{i}"), value)
        })
        .collect()
}

fn walk(reader: &mut BsonDocumentReader<'_>) -> usize {
    let mut count = 0;
    reader.read_start_document().unwrap();
    loop {
        match reader.read_bson_type().unwrap() {
            BsonType::EndOfDocument => break,
            BsonType::Array => {
                reader.skip_name().unwrap();
                reader.read_start_array().unwrap();
                while reader.read_bson_type().unwrap() != BsonType::EndOfDocument {
                    black_box(reader.read_int64().unwrap());
                    count += 1;
                }
                reader.read_end_array().unwrap();
            }
            _ => {
                black_box(reader.read_name().unwrap());
                reader.skip_value().unwrap();
            }
        }
        count += 1;
    }
    reader.read_end_document().unwrap();
    count
}

fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");
    for fields in [16, 256, 4096] {
        let doc = build_document(fields);
        group.throughput(Throughput::Elements(fields as u64));
        group.bench_with_input(BenchmarkId::new("walk", fields), &doc, |b, doc| {
            b.iter(|| walk(&mut BsonDocumentReader::new(black_box(doc))))
        });
        group.bench_with_input(BenchmarkId::new("mark_walk_reset", fields), &doc, |b, doc| {
            b.iter(|| {
                let mut reader = BsonDocumentReader::new(black_box(doc));
                reader.mark().unwrap();
                let first = walk(&mut reader);
                reader.reset().unwrap();
                first + walk(&mut reader)
            })
        });
    }
    group.finish();
}

fn bench_uuid(c: &mut Criterion) {
    let uuid = Uuid::from_u128(0x0102030405060708_090A0B0C0D0E0F10);
    let mut group = c.benchmark_group("uuid");
    for representation in [
        UuidRepresentation::Standard,
        UuidRepresentation::JavaLegacy,
        UuidRepresentation::CSharpLegacy,
    ] {
        let bytes = encode_uuid(uuid, representation).unwrap();
        group.bench_function(BenchmarkId::new("encode", representation), |b| {
            b.iter(|| encode_uuid(black_box(uuid), representation).unwrap())
        });
        group.bench_function(BenchmarkId::new("decode", representation), |b| {
            b.iter(|| decode_uuid(black_box(&bytes), representation).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_traverse, bench_uuid);
criterion_main!(benches);

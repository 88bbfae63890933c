use std::io::{Cursor, Read};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use xsm_decoder::DecoderReader;
use xsm_wire::{decode_message, encode_message, read_message};

fn bench_decode_small(c: &mut Criterion) {
    let encoded = encode_message(b"hello world test data!");

    c.bench_function("decode_small", |b| b.iter(|| decode_message(&encoded).unwrap()));
}

fn bench_validate_only(c: &mut Criterion) {
    let encoded = encode_message(&b"structured message payload\n".repeat(1024));

    c.bench_function("validate_27kb", |b| {
        b.iter(|| read_message(&encoded).unwrap().payload_len());
    });
}

fn bench_decoder_reader(c: &mut Criterion) {
    let payload = b"structured message payload\n".repeat(1024);
    let encoded = encode_message(&payload);
    let expected = payload.len() as u64;

    c.bench_function("decoder_reader_27kb", |b| {
        b.iter(|| {
            let mut reader = DecoderReader::new(Cursor::new(&encoded), expected).unwrap();
            let mut out = Vec::with_capacity(payload.len());
            reader.read_to_end(&mut out).unwrap();
            out
        });
    });
}

fn bench_decode_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_throughput");

    for size_kb in [1, 10, 100] {
        let encoded = encode_message(&vec![b'x'; size_kb * 1024]);
        group.throughput(Throughput::Bytes((size_kb * 1024) as u64));
        group.bench_with_input(
            BenchmarkId::new("decode", format!("{size_kb}kb")),
            &encoded,
            |b, encoded| b.iter(|| decode_message(encoded).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_decode_small,
    bench_validate_only,
    bench_decoder_reader,
    bench_decode_throughput
);
criterion_main!(benches);

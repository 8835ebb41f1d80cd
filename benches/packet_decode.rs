//! Benchmarks for the per-packet decode path
//!
//! Covers:
//! - Header and checksum validation on their own
//! - Full decode of a small and a pod-sized schema
//! - Early rejection of corrupted packets
//! - Decoding through a shared `Unpacker`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pod_telemetry::codec::{self, verify_checksum, verify_header};
use pod_telemetry::test_utils::{PacketBuilder, pod_schema, telemetry_schema};
use pod_telemetry::{CodecConfig, Endianness, Unpacker, compile};
use std::hint::black_box;

fn pod_packet(endianness: Endianness) -> Vec<u8> {
    let width = compile(&pod_schema()).expect("fixture compiles").plan().total_width();
    let payload: Vec<u8> = (0..width).map(|i| i as u8).collect();
    PacketBuilder::new(endianness).metadata(&[0, 0, 0, 1]).payload(&payload).build()
}

fn bench_validation(c: &mut Criterion) {
    let packet = pod_packet(Endianness::Big);

    let mut group = c.benchmark_group("validation");
    group.throughput(Throughput::Bytes(packet.len() as u64));

    group.bench_function("header", |b| {
        b.iter(|| black_box(verify_header(black_box(&packet), Endianness::Big)))
    });

    group.bench_function("crc32", |b| {
        b.iter(|| black_box(verify_checksum(black_box(&packet), Endianness::Big)))
    });

    group.finish();
}

fn bench_full_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_decode");

    let small = compile(&telemetry_schema()).expect("fixture compiles");
    let small_packet = PacketBuilder::new(Endianness::Big)
        .metadata(&[0, 0, 0, 1])
        .payload(&[0x00, 0x2A, 0x01, 0x00])
        .build();

    for endianness in [Endianness::Big, Endianness::Little] {
        let config = CodecConfig::default().with_endianness(endianness);
        let pod = compile(&pod_schema()).expect("fixture compiles");
        let packet = pod_packet(endianness);

        group.throughput(Throughput::Bytes(packet.len() as u64));
        let id = BenchmarkId::new("pod", format!("{endianness:?}"));
        group.bench_with_input(id, &packet, |b, packet| {
            b.iter(|| black_box(codec::decode(black_box(packet), &pod, &config)))
        });
    }

    let config = CodecConfig::default();
    group.throughput(Throughput::Bytes(small_packet.len() as u64));
    group.bench_function("telemetry", |b| {
        b.iter(|| black_box(codec::decode(black_box(&small_packet), &small, &config)))
    });

    group.finish();
}

fn bench_rejection(c: &mut Criterion) {
    let schema = compile(&pod_schema()).expect("fixture compiles");
    let config = CodecConfig::default();

    let mut bad_header = pod_packet(Endianness::Big);
    bad_header[0] = 0;
    let mut bad_crc = pod_packet(Endianness::Big);
    let last = bad_crc.len() - 1;
    bad_crc[last] ^= 0xFF;

    let mut group = c.benchmark_group("rejection");

    group.bench_function("bad_header", |b| {
        b.iter(|| black_box(codec::decode(black_box(&bad_header), &schema, &config)))
    });

    group.bench_function("bad_checksum", |b| {
        b.iter(|| black_box(codec::decode(black_box(&bad_crc), &schema, &config)))
    });

    group.finish();
}

fn bench_unpacker(c: &mut Criterion) {
    let unpacker = Unpacker::new(CodecConfig::default()).expect("default config is valid");
    unpacker.install(&pod_schema()).expect("fixture compiles");
    let packet = pod_packet(Endianness::Big);

    c.bench_function("unpacker_decode", |b| {
        b.iter(|| black_box(unpacker.decode(black_box(&packet)).expect("schema installed")))
    });
}

criterion_group!(benches, bench_validation, bench_full_decode, bench_rejection, bench_unpacker);
criterion_main!(benches);

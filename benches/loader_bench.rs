use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use tabchat::cache::{decode, encode};
use tabchat::table::{FileKind, SAMPLE_BYTES, load_upload, sniff_delimiter};
use tabchat::testutil::generate_csv;

const ROW_COUNTS: &[usize] = &[1_000, 10_000, 100_000];

fn bench_sniff(c: &mut Criterion) {
    let mut group = c.benchmark_group("sniff");
    for delimiter in [b',', b';', b'\t'] {
        let data = generate_csv(100, delimiter);
        let sample = &data[..SAMPLE_BYTES.min(data.len())];
        group.bench_with_input(
            BenchmarkId::new("delimiter", delimiter as char),
            &sample,
            |b, sample| b.iter(|| sniff_delimiter(black_box(sample)).unwrap()),
        );
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_csv");
    for &num_rows in ROW_COUNTS {
        let data = generate_csv(num_rows, b';');
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", num_rows), &data, |b, data| {
            b.iter(|| load_upload(FileKind::Csv, black_box(data)).unwrap())
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_codec");
    for &num_rows in ROW_COUNTS {
        let table = load_upload(FileKind::Csv, &generate_csv(num_rows, b',')).unwrap();
        group.throughput(Throughput::Elements(num_rows as u64));
        group.bench_with_input(BenchmarkId::new("round_trip", num_rows), &table, |b, t| {
            b.iter(|| decode(&encode(black_box(t)).unwrap()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sniff, bench_load, bench_codec);
criterion_main!(benches);

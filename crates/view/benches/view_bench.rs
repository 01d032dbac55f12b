//! Benchmarks for viewdex-view using criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use viewdex_core::{Document, Object, Value, ValueShape};
use viewdex_index::KeyRange;
use viewdex_view::{map_fn, Count, Emitter, MapFunction, View};

fn fingerprint(i: u64) -> String {
    format!("fp-{:08x}", i.wrapping_mul(0x9E37_79B9_7F4A_7C15) % 5000)
}

fn documents(count: u64) -> Vec<Document> {
    (0..count)
        .map(|d| {
            let fps: Vec<Value> = (0..4).map(|k| Value::from(fingerprint(d * 4 + k))).collect();
            let mut body = Object::new();
            body.insert("fingerprints", Value::Array(fps));
            Document::new(format!("doc-{}", d), body)
        })
        .collect()
}

fn fingerprint_map() -> impl MapFunction<Key = String, Value = Value> {
    map_fn(ValueShape::Scalar, |doc: &Document, emit: &mut Emitter<String, Value>| {
        for fp in doc.get_array("fingerprints").unwrap_or(&[]).iter().filter_map(Value::as_str) {
            emit.emit(fp.to_string(), Value::from(doc.id()));
        }
    })
}

fn build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_update_batch");

    for size in [1000u64, 10000].iter() {
        let docs = documents(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &docs, |b, docs| {
            b.iter(|| {
                let mut view = View::builder("fps", fingerprint_map()).reduce(Count).build().unwrap();
                black_box(view.update_batch(docs).len())
            });
        });
    }

    group.finish();
}

fn update_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_update_one");
    let docs = documents(10000);

    for held in [false, true] {
        let mut view = View::builder("fps", fingerprint_map()).reduce(Count).build().unwrap();
        view.update_batch(&docs);
        // A held snapshot forces copy-on-write of the shared state
        let snapshot = held.then(|| view.snapshot());
        group.bench_function(if held { "snapshot_held" } else { "exclusive" }, |b| {
            b.iter(|| black_box(view.update(&docs[0]).len()));
        });
        drop(snapshot);
    }

    group.finish();
}

fn query_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_query");
    let mut view = View::builder("fps", fingerprint_map()).reduce(Count).shards(8).build().unwrap();
    view.update_batch(&documents(10000));
    let snapshot = view.snapshot();

    group.bench_function("get", |b| b.iter(|| black_box(snapshot.get(&fingerprint(7)).len())));
    group.bench_function("reduce_grouped_all", |b| {
        b.iter(|| black_box(snapshot.reduce_grouped(&KeyRange::all(), false).unwrap().len()))
    });
    let range = KeyRange::half_open(fingerprint(10), fingerprint(20));
    group.bench_function("reduce_all_bounded", |b| {
        b.iter(|| black_box(snapshot.reduce_all(&range).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, build_benchmark, update_benchmark, query_benchmark);
criterion_main!(benches);

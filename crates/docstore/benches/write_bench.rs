use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use docstore::{DocumentStore, NoopSink, StoreOptions};
use serde_json::json;

fn bench_write_read(c: &mut Criterion) {
    let root = std::env::temp_dir().join(format!("docstore_bench_{}", uuid::Uuid::new_v4()));
    let opts = StoreOptions { sync_writes: false, ..StoreOptions::default() }.with_sink(Arc::new(NoopSink));
    let store = DocumentStore::open_with(&root, opts).unwrap();
    let doc = json!({ "name": "Bench", "age": 30, "address": { "city": "Spa", "country": "Belgium" } });

    c.bench_function("docstore_write", |b| {
        b.iter(|| store.write("bench", "doc", &doc).unwrap());
    });

    c.bench_function("docstore_read", |b| {
        b.iter(|| {
            let _: serde_json::Value = store.read("bench", "doc").unwrap();
        });
    });

    let _ = std::fs::remove_dir_all(&root);
}

criterion_group!(benches, bench_write_read);
criterion_main!(benches);

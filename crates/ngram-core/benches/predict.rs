use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ngram_core::{PredictionEngine, TableBuilder};

const CORPUS: &str = "\
我哋今日去飲茶
我哋聽日去行街
你哋今日食咗飯未
佢哋琴日去咗旅行
今日天氣好好
我想去飲茶食點心
";

fn bench_engine(dir: &std::path::Path) -> PredictionEngine {
    let mut builder = TableBuilder::new(4).unwrap();
    // Repeat with variation so the trie has some fan-out
    for i in 0..200u32 {
        builder.add_text(CORPUS);
        let noise: String = (0..8)
            .map(|j| char::from_u32(0x4E00 + (i * 8 + j) % 2000).unwrap())
            .collect();
        builder.add_text(&format!("我哋{noise}"));
    }
    let path = dir.join("bench.ngram");
    builder.save(&path).unwrap();
    PredictionEngine::open(&path)
}

fn bench_predict(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let engine = bench_engine(dir.path());
    assert!(engine.is_loaded());

    let mut group = c.benchmark_group("predict");
    for context in ["我", "我哋", "我哋今日", "今日天氣", "冇呢個"] {
        group.bench_with_input(BenchmarkId::from_parameter(context), &context, |b, ctx| {
            b.iter(|| engine.predict(ctx))
        });
    }
    group.finish();
}

fn bench_open(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    drop(bench_engine(dir.path()));
    let path = dir.path().join("bench.ngram");
    c.bench_function("open", |b| b.iter(|| PredictionEngine::open(&path)));
}

criterion_group!(benches, bench_predict, bench_open);
criterion_main!(benches);

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use lexical::{LexicalConfig, SequenceEncoder};
use tokio::runtime::Runtime;
use triage::demo_utils::{demo_service, demo_vocabulary};
use triage::TriageConfig;

const CHEST: &str = "My chest really hurts and I can't breathe";
const TUMMY: &str = "my tummy feels like it's on fire";

fn lexical_bench(c: &mut Criterion) {
    let vocab = demo_vocabulary().expect("demo vocabulary");
    let encoder = SequenceEncoder::new(&LexicalConfig::default(), Arc::new(vocab))
        .expect("sequence encoder");

    c.bench_function("encode_text", |b| {
        b.iter(|| {
            let seq = encoder.encode_text(black_box(CHEST));
            black_box(seq);
        });
    });
}

fn assess_bench(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let service = demo_service(&TriageConfig::default()).expect("demo service");
    runtime
        .block_on(service.initialize())
        .expect("engines load");

    c.bench_function("assess_primary_path", |b| {
        b.to_async(&runtime).iter(|| async {
            let assessment = service.assess(black_box(CHEST)).await.expect("assess");
            black_box(assessment);
        });
    });

    c.bench_function("assess_semantic_fallback", |b| {
        b.to_async(&runtime).iter(|| async {
            let assessment = service.assess(black_box(TUMMY)).await.expect("assess");
            black_box(assessment);
        });
    });
}

criterion_group!(benches, lexical_bench, assess_bench);
criterion_main!(benches);

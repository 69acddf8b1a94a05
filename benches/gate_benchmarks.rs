//! Benchmarks for the mutation gate and snapshot serialization.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use inkpad_core::gate;
use inkpad_doc::{Block, BlockKind, Document, Mark, Node, Text, Value};

/// Generates a document of `blocks` paragraphs with a few marked runs each.
fn generate_document(blocks: usize) -> Value {
    let nodes = (0..blocks)
        .map(|i| {
            Node::Block(Block::new(
                if i % 10 == 0 {
                    BlockKind::HeadingTwo
                } else {
                    BlockKind::Paragraph
                },
                vec![
                    Node::Text(Text::new(format!("Paragraph {}: ", i))),
                    Node::Text(Text::with_marks("some bold", [Mark::Bold])),
                    Node::Text(Text::new(" and ")),
                    Node::Text(Text::with_marks("some code", [Mark::Code])),
                ],
            ))
        })
        .collect();
    let mut value = Value::new(Document::new(nodes));
    value.normalize();
    value
}

/// Benchmarks gate evaluation on parsed documents.
fn bench_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate");

    for size in [10, 100, 1000, 10000].iter() {
        let value = generate_document(*size);

        group.bench_with_input(BenchmarkId::new("evaluate", size), &value, |b, value| {
            b.iter(|| black_box(gate::evaluate(black_box(value), *size / 2)))
        });

        let raw: serde_json::Value = match value.to_json() {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => serde_json::Value::Null,
        };
        group.bench_with_input(BenchmarkId::new("accept_raw", size), &raw, |b, raw| {
            b.iter(|| black_box(gate::accept_raw(black_box(raw), *size)))
        });
    }

    group.finish();
}

/// Benchmarks snapshot serialization in both directions.
fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    for size in [10, 100, 1000].iter() {
        let value = generate_document(*size);
        let json = value.to_json().unwrap_or_default();

        group.bench_with_input(BenchmarkId::new("to_json", size), &value, |b, value| {
            b.iter(|| black_box(value.to_json()))
        });

        group.bench_with_input(BenchmarkId::new("from_json", size), &json, |b, json| {
            b.iter(|| black_box(Value::from_json(black_box(json))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gate, bench_serialization);
criterion_main!(benches);

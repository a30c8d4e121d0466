use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wordswap::context::sentence_around;
use wordswap::editor::TextBuffer;
use wordswap::{ContextExtractor, Position};

fn bench_sentence(c: &mut Criterion) {
    let line = "It was the best of times, it was the worst of times. It was the age of wisdom, \
                it was the age of foolishness, it was the epoch of belief!";

    c.bench_function("sentence_around", |b| {
        b.iter(|| sentence_around(black_box(line), black_box(70), black_box(76)))
    });

    let mut buffer = TextBuffer::new(line);
    buffer.set_cursor(Position::new(0, 72));
    c.bench_function("extract_at_cursor", |b| {
        b.iter(|| ContextExtractor::extract(black_box(&buffer)))
    });
}

criterion_group!(benches, bench_sentence);
criterion_main!(benches);

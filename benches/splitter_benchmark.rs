//! Benchmarks for SSE framing and decoding.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use query_agent::sse::{split_events, Utf8StreamDecoder};

/// A stream of token events followed by a final state event.
fn generate_event_stream(tokens: usize) -> String {
    let mut text = String::new();
    for i in 0..tokens {
        text.push_str(&format!(
            "event: streamed_tokens\ndata: {{\"output_type\":\"streamed_tokens\",\"delta\":\"token {} ünïcödé\"}}\n\n",
            i
        ));
    }
    text.push_str("event: final_state\ndata: {\"final_answer\":\"done\"}\n\n");
    text
}

/// Whole buffer framed in one call
fn bench_split_whole_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_whole_buffer");

    for tokens in [10, 100, 1000].iter() {
        let text = generate_event_stream(*tokens);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_events", tokens)),
            &text,
            |b, text| {
                b.iter(|| black_box(split_events(black_box(text), true)));
            },
        );
    }

    group.finish();
}

/// Buffer fed in network-sized chunks, the way the reader sees it
fn bench_split_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_chunked");
    let text = generate_event_stream(500);
    group.throughput(Throughput::Bytes(text.len() as u64));

    for chunk_size in [64, 512, 4096].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_byte_chunks", chunk_size)),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut decoder = Utf8StreamDecoder::new();
                    let mut buffer = String::new();
                    let mut count = 0;
                    for chunk in text.as_bytes().chunks(chunk_size) {
                        buffer.push_str(&decoder.decode(chunk));
                        let outcome = split_events(&buffer, false);
                        count += outcome.events.len();
                        buffer = outcome.remainder;
                    }
                    buffer.push_str(&decoder.finish());
                    count += split_events(&buffer, true).events.len();
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_split_whole_buffer, bench_split_chunked);
criterion_main!(benches);

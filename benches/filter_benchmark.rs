//! Filtering pass benchmarks.
//!
//! A full pass over 5000 records must stay well under 100ms, with and without
//! an active search (cold and warm cache).
//!
//! Run with: cargo bench

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use logsift::filter::{ContentCache, FilterState, FilteringEngine, Selection};
use logsift::model::{
    ContentBlock, EntryUuid, LogRecord, MessageContent, Record, RoleName, ToolCall, ToolName,
    ToolUseId,
};
use serde_json::json;

const NUM_RECORDS: usize = 5_000;

/// Mix of user prompts, assistant tool calls, tool output and prose.
fn generate_records(n: usize) -> Vec<Record> {
    let body = "The quick brown fox jumps over the lazy dog. ".repeat(20);
    (0..n)
        .map(|i| {
            let uuid = EntryUuid::new(format!("bench-{i:06}")).expect("valid uuid");
            let (role, content) = match i % 4 {
                0 => (RoleName::USER, MessageContent::Text(format!("Prompt {i}. {body}"))),
                1 => {
                    let name = if i % 8 == 1 { "Bash" } else { "Read" };
                    let call = ToolCall::new(
                        ToolUseId::new(format!("tool-{i}")).expect("valid tool id"),
                        ToolName::parse(name),
                        json!({ "command": format!("echo {i}") }),
                    );
                    (
                        RoleName::ASSISTANT,
                        MessageContent::Blocks(vec![ContentBlock::ToolUse(call)]),
                    )
                }
                2 => (
                    RoleName::TOOL_RESULT,
                    MessageContent::Text(format!("output line {i}\n{body}")),
                ),
                _ => (
                    RoleName::ASSISTANT,
                    MessageContent::Text(format!("Answer {i}. {body}")),
                ),
            };
            Record::from(LogRecord::new(
                Some(uuid),
                RoleName::new(role).expect("valid role"),
                None,
                content,
            ))
        })
        .collect()
}

fn bench_filtering(c: &mut Criterion) {
    let records = generate_records(NUM_RECORDS);

    let role_only = FilterState::new(
        Selection::only(["user", "assistant"]),
        Selection::Unconstrained,
        "",
    );
    let with_search = FilterState::new(
        Selection::Unconstrained,
        Selection::Unconstrained,
        "LAZY DOG",
    );

    let mut group = c.benchmark_group("filter_5000");

    group.bench_function("role_only", |b| {
        let mut engine = FilteringEngine::default();
        b.iter(|| {
            let result = engine.process_messages(black_box(&records), black_box(&role_only));
            black_box(result.len())
        })
    });

    group.bench_function("search_cold_cache", |b| {
        b.iter_batched(
            || FilteringEngine::new(ContentCache::new(NUM_RECORDS), 100),
            |mut engine| {
                let result = engine.process_messages(black_box(&records), black_box(&with_search));
                black_box(result.len())
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("search_warm_cache", |b| {
        let mut engine = FilteringEngine::new(ContentCache::new(NUM_RECORDS), 100);
        engine.process_messages(&records, &with_search);
        b.iter(|| {
            let result = engine.process_messages(black_box(&records), black_box(&with_search));
            black_box(result.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_filtering);
criterion_main!(benches);

//! Record builders shared by unit tests.

use crate::model::{
    ContentBlock, EntryUuid, LogRecord, MalformedRecord, MessageContent, Record, RoleName,
    ToolCall, ToolName, ToolUseId,
};
use serde_json::json;

/// Plain-text record with a UUID.
pub(crate) fn text_record(uuid: &str, role: &str, text: &str) -> Record {
    Record::from(LogRecord::new(
        Some(EntryUuid::new(uuid).expect("valid test uuid")),
        RoleName::new(role).expect("valid test role"),
        None,
        MessageContent::Text(text.to_string()),
    ))
}

/// Record carrying one `tool_use` block per tool name, with empty inputs.
pub(crate) fn tool_record(uuid: &str, role: &str, tools: &[&str]) -> Record {
    let blocks = tools
        .iter()
        .enumerate()
        .map(|(i, name)| {
            ContentBlock::ToolUse(ToolCall::new(
                ToolUseId::new(format!("{uuid}-tool-{i}")).expect("valid tool use id"),
                ToolName::parse(name),
                json!({}),
            ))
        })
        .collect();
    Record::from(LogRecord::new(
        Some(EntryUuid::new(uuid).expect("valid test uuid")),
        RoleName::new(role).expect("valid test role"),
        None,
        MessageContent::Blocks(blocks),
    ))
}

/// Malformed line placeholder at the given line number.
pub(crate) fn malformed_record(line: usize) -> Record {
    Record::from(MalformedRecord::new(
        line,
        format!("{{\"type\": broken line {line}"),
        "expected value",
    ))
}

/// Deterministic mix of user, assistant (with and without tools) and
/// tool_result records.
pub(crate) fn generated_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let uuid = format!("gen-{i:05}");
            match i % 4 {
                0 => text_record(&uuid, "user", &format!("Question number {i}")),
                1 if i % 8 == 1 => tool_record(&uuid, "assistant", &["Bash"]),
                1 => tool_record(&uuid, "assistant", &["Read"]),
                2 => text_record(&uuid, "tool_result", &format!("output {i}")),
                _ => text_record(&uuid, "assistant", &format!("Answer number {i}")),
            }
        })
        .collect()
}

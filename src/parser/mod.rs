//! JSONL parser for Claude Code log records.
//!
//! Pure functions converting JSONL lines into [`Record`]s. A line that cannot
//! be parsed becomes a [`MalformedRecord`] in place, so original indices stay
//! aligned with the input and the filtering engine decides what to do with it.

use crate::model::{
    ContentBlock, EntryUuid, LogRecord, MalformedRecord, MessageContent, ParseError, Record,
    RoleName, ToolCall, ToolName, ToolUseId,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

// Entry type string constants
const ENTRY_TYPE_USER: &str = "user";
const ENTRY_TYPE_ASSISTANT: &str = "assistant";
const ENTRY_TYPE_SUMMARY: &str = "summary";
const ENTRY_TYPE_SYSTEM: &str = "system";
const ENTRY_TYPE_RESULT: &str = "result";

/// Raw JSON structure for deserializing log lines.
#[derive(Debug, Deserialize)]
struct RawLogEntry {
    #[serde(rename = "type")]
    entry_type: Option<String>,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    // Summary lines
    #[serde(default)]
    summary: Option<String>,
    // System lines
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    content: Option<String>,
    // Result lines
    #[serde(default)]
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    role: Option<String>,
    content: RawMessageContent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessageContent {
    Text(String),
    Blocks(Vec<RawContentBlock>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: Option<RawToolResultContent>,
        #[serde(default)]
        is_error: bool,
    },
    Thinking {
        thinking: String,
    },
    /// Images, documents and future block types carry no searchable text.
    #[serde(other)]
    Unsupported,
}

/// Tool results are either a string or a list of typed parts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawToolResultContent {
    Text(String),
    Parts(Vec<RawToolResultPart>),
}

#[derive(Debug, Deserialize)]
struct RawToolResultPart {
    #[serde(default)]
    text: Option<String>,
}

impl RawToolResultContent {
    fn into_text(self) -> String {
        match self {
            RawToolResultContent::Text(text) => text,
            RawToolResultContent::Parts(parts) => parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Parse a whole JSONL document.
///
/// Blank lines are skipped; every other line yields exactly one record.
pub fn parse_records(input: &str) -> Vec<Record> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_line_graceful(line, i + 1))
        .collect()
}

/// Parse a single JSONL line gracefully.
///
/// Never fails: unparseable lines become [`Record::Malformed`].
///
/// * `line_number` - The line number (1-indexed) for error reporting
pub fn parse_line_graceful(raw: &str, line_number: usize) -> Record {
    match parse_record(raw, line_number) {
        Ok(record) => Record::from(record),
        Err(err) => Record::from(MalformedRecord::new(line_number, raw, err.to_string())),
    }
}

/// Parse a single JSONL line into a [`LogRecord`].
///
/// # Errors
///
/// Returns `ParseError` if:
/// - JSON is malformed
/// - The `type` field is missing or empty
/// - The timestamp is present but invalid
pub fn parse_record(raw: &str, line_number: usize) -> Result<LogRecord, ParseError> {
    let entry: RawLogEntry = serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson {
        line: line_number,
        message: e.to_string(),
    })?;

    let entry_type = entry
        .entry_type
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ParseError::MissingField {
            line: line_number,
            field: "type",
        })?;

    let uuid = entry
        .uuid
        .as_deref()
        .and_then(|u| EntryUuid::new(u).ok());

    let timestamp: Option<DateTime<Utc>> = match &entry.timestamp {
        Some(ts) => Some(ts.parse().map_err(|_| ParseError::InvalidTimestamp {
            line: line_number,
            raw: ts.clone(),
        })?),
        None => None,
    };

    let (role, content) = classify(&entry_type, entry, line_number)?;
    Ok(LogRecord::new(uuid, role, timestamp, content))
}

/// Derive the record role and payload from the entry type.
///
/// User lines that only echo tool output are classified as `tool_result`.
/// Unknown entry types keep their type string as role.
fn classify(
    entry_type: &str,
    entry: RawLogEntry,
    line_number: usize,
) -> Result<(RoleName, MessageContent), ParseError> {
    let role_of = |name: &str| {
        RoleName::new(name).map_err(|_| ParseError::MissingField {
            line: line_number,
            field: "type",
        })
    };

    match entry_type {
        ENTRY_TYPE_SUMMARY => Ok((
            role_of(RoleName::SUMMARY)?,
            MessageContent::Text(entry.summary.unwrap_or_default()),
        )),
        ENTRY_TYPE_SYSTEM => {
            let text = entry.content.or(entry.subtype).unwrap_or_default();
            Ok((role_of(RoleName::SYSTEM)?, MessageContent::Text(text)))
        }
        ENTRY_TYPE_RESULT => Ok((
            role_of(RoleName::RESULT)?,
            MessageContent::Text(entry.result.unwrap_or_default()),
        )),
        ENTRY_TYPE_USER | ENTRY_TYPE_ASSISTANT => {
            let message = entry.message.ok_or(ParseError::MissingField {
                line: line_number,
                field: "message",
            })?;
            let content = parse_content(message.content, line_number)?;
            let role = if content.is_tool_result_only() {
                RoleName::TOOL_RESULT.to_string()
            } else {
                message
                    .role
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| entry_type.to_string())
            };
            Ok((role_of(role.as_str())?, content))
        }
        other => {
            let content = match entry.message {
                Some(message) => parse_content(message.content, line_number)?,
                None => MessageContent::empty(),
            };
            Ok((role_of(other)?, content))
        }
    }
}

fn parse_content(raw: RawMessageContent, line_number: usize) -> Result<MessageContent, ParseError> {
    match raw {
        RawMessageContent::Text(text) => Ok(MessageContent::Text(text)),
        RawMessageContent::Blocks(blocks) => {
            let mut parsed = Vec::with_capacity(blocks.len());
            for block in blocks {
                if let Some(block) = parse_content_block(block, line_number)? {
                    parsed.push(block);
                }
            }
            Ok(MessageContent::Blocks(parsed))
        }
    }
}

fn parse_content_block(
    raw: RawContentBlock,
    line_number: usize,
) -> Result<Option<ContentBlock>, ParseError> {
    let block = match raw {
        RawContentBlock::Text { text } => ContentBlock::Text { text },
        RawContentBlock::Thinking { thinking } => ContentBlock::Thinking { thinking },
        RawContentBlock::ToolUse { id, name, input } => {
            let id = ToolUseId::new(id).map_err(|_| ParseError::MissingField {
                line: line_number,
                field: "tool_use.id",
            })?;
            ContentBlock::ToolUse(ToolCall::new(id, ToolName::parse(&name), input))
        }
        RawContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => {
            let tool_use_id =
                ToolUseId::new(tool_use_id).map_err(|_| ParseError::MissingField {
                    line: line_number,
                    field: "tool_result.tool_use_id",
                })?;
            ContentBlock::ToolResult {
                tool_use_id,
                content: content.map(RawToolResultContent::into_text).unwrap_or_default(),
                is_error,
            }
        }
        RawContentBlock::Unsupported => return Ok(None),
    };
    Ok(Some(block))
}

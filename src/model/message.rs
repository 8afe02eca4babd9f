//! Payload types for Claude Code log records.
//!
//! Types represent the structure of the content carried by one JSONL line.
//! Raw constructors are never exported - use smart constructors only.

use crate::model::ToolUseId;

// ===== MessageContent =====

/// Content of a record in the Claude Code log format.
///
/// Messages can be either plain text (simple user messages) or structured
/// blocks (assistant messages containing text, tool calls, results, and thinking).
/// Sum type ensures exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Plain text content (typically user messages)
    Text(String),
    /// Structured content blocks (assistant messages with tool use)
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Content with no text at all (system and result lines without a message).
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Number of blocks; plain text counts as a single block.
    pub fn block_count(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::Blocks(blocks) => blocks.len(),
        }
    }

    /// Total byte length of the text-bearing fields.
    ///
    /// Cheap to compute (no allocation), used for structural cache keys.
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Blocks(blocks) => blocks.iter().map(ContentBlock::text_len).sum(),
        }
    }

    /// Tool calls in block order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        let blocks: &[ContentBlock] = match self {
            Self::Text(_) => &[],
            Self::Blocks(blocks) => blocks,
        };
        blocks.iter().filter_map(|block| match block {
            ContentBlock::ToolUse(call) => Some(call),
            _ => None,
        })
    }

    /// True when every block is a tool result (a user line echoing tool output).
    pub fn is_tool_result_only(&self) -> bool {
        match self {
            Self::Text(_) => false,
            Self::Blocks(blocks) => {
                !blocks.is_empty()
                    && blocks
                        .iter()
                        .all(|b| matches!(b, ContentBlock::ToolResult { .. }))
            }
        }
    }

    /// Append the lowercase searchable form of this content to `out`.
    ///
    /// Parts are newline-separated so a query never matches across two blocks
    /// by accident of concatenation.
    pub fn write_searchable(&self, out: &mut String) {
        match self {
            Self::Text(text) => push_lower(out, text),
            Self::Blocks(blocks) => {
                for block in blocks {
                    match block {
                        ContentBlock::Text { text } => push_lower(out, text),
                        ContentBlock::Thinking { thinking } => push_lower(out, thinking),
                        ContentBlock::ToolResult { content, .. } => push_lower(out, content),
                        ContentBlock::ToolUse(call) => {
                            push_lower(out, call.name().as_str());
                            if !call.input().is_null() {
                                push_lower(out, &call.input().to_string());
                            }
                        }
                    }
                }
            }
        }
    }
}

fn push_lower(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&text.to_lowercase());
}

// ===== ContentBlock =====

/// Individual content block within a structured message.
///
/// Assistant messages in Claude Code logs consist of heterogeneous blocks:
/// text (visible output), tool_use (tool invocations), tool_result (tool outputs),
/// and thinking (extended reasoning).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Text block containing markdown-formatted assistant output
    Text {
        /// Markdown text content
        text: String,
    },
    /// Tool invocation by the assistant
    ToolUse(ToolCall),
    /// Result returned from a tool execution
    ToolResult {
        /// ID linking this result to the originating tool_use
        tool_use_id: ToolUseId,
        /// Tool output (stdout, file contents, etc.)
        content: String,
        /// Whether the tool execution failed
        is_error: bool,
    },
    /// Extended thinking block
    Thinking {
        /// Thinking text content
        thinking: String,
    },
}

impl ContentBlock {
    fn text_len(&self) -> usize {
        match self {
            Self::Text { text } => text.len(),
            Self::Thinking { thinking } => thinking.len(),
            Self::ToolResult { content, .. } => content.len(),
            Self::ToolUse(call) => call.name().as_str().len(),
        }
    }
}

// ===== ToolCall =====

/// Tool invocation recorded in a Claude Code log.
///
/// The id links to a corresponding ToolResult block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    id: ToolUseId,
    name: ToolName,
    input: serde_json::Value,
}

impl ToolCall {
    /// Assemble a call from its parsed parts.
    pub fn new(id: ToolUseId, name: ToolName, input: serde_json::Value) -> Self {
        Self { id, name, input }
    }

    /// Id linking this call to its result.
    pub fn id(&self) -> &ToolUseId {
        &self.id
    }

    /// Tool invoked.
    pub fn name(&self) -> &ToolName {
        &self.name
    }

    /// Tool-specific input parameters
    pub fn input(&self) -> &serde_json::Value {
        &self.input
    }
}

// ===== ToolName =====

/// Tool names recognized in Claude Code logs.
///
/// Enumerates known tools provided by Claude Code with a fallback variant
/// for custom or future tools (MCP tools land in `Other`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// File read.
    Read,
    /// File write.
    Write,
    /// Single in-place edit.
    Edit,
    /// Batched edits to one file.
    MultiEdit,
    /// Shell command.
    Bash,
    /// Content search.
    Grep,
    /// File name pattern match.
    Glob,
    /// Sub-agent task.
    Task,
    /// Web search.
    WebSearch,
    /// URL fetch.
    WebFetch,
    /// Unknown or custom tool
    Other(String),
}

impl ToolName {
    /// Parse a tool name from the JSONL log.
    ///
    /// Recognizes standard Claude Code tools, wrapping unknown names in `Other`.
    pub fn parse(name: &str) -> Self {
        match name {
            "Read" => Self::Read,
            "Write" => Self::Write,
            "Edit" => Self::Edit,
            "MultiEdit" => Self::MultiEdit,
            "Bash" => Self::Bash,
            "Grep" => Self::Grep,
            "Glob" => Self::Glob,
            "Task" => Self::Task,
            "WebSearch" => Self::WebSearch,
            "WebFetch" => Self::WebFetch,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Edit => "Edit",
            Self::MultiEdit => "MultiEdit",
            Self::Bash => "Bash",
            Self::Grep => "Grep",
            Self::Glob => "Glob",
            Self::Task => "Task",
            Self::WebSearch => "WebSearch",
            Self::WebFetch => "WebFetch",
            Self::Other(s) => s,
        }
    }
}

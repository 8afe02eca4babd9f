//! Log records as consumed by the filtering engine.
//!
//! A record is either a fully parsed [`LogRecord`] or a [`MalformedRecord`]
//! kept in place so original indices stay aligned with input lines.

use crate::model::error::RecordError;
use crate::model::{EntryUuid, MessageContent, RoleName, ToolName};
use chrono::{DateTime, Utc};

/// One entry of the ordered record array.
///
/// Sum type: a record is either valid or malformed, never both.
#[derive(Debug, Clone)]
pub enum Record {
    /// Parsed entry.
    Valid(Box<LogRecord>),
    /// Line kept in place after a parse failure.
    Malformed(MalformedRecord),
}

impl Record {
    /// The parsed entry, unless malformed.
    pub fn as_valid(&self) -> Option<&LogRecord> {
        match self {
            Record::Valid(record) => Some(record),
            Record::Malformed(_) => None,
        }
    }

    /// Role of the record.
    ///
    /// # Errors
    ///
    /// Malformed records have no role and return [`RecordError::Malformed`].
    pub fn role(&self) -> Result<&RoleName, RecordError> {
        match self {
            Record::Valid(record) => Ok(record.role()),
            Record::Malformed(m) => Err(m.to_error()),
        }
    }

    /// Distinct tool tags of the record, in first-seen order.
    ///
    /// # Errors
    ///
    /// Malformed records return [`RecordError::Malformed`].
    pub fn tool_names(&self) -> Result<&[ToolName], RecordError> {
        match self {
            Record::Valid(record) => Ok(record.tool_names()),
            Record::Malformed(m) => Err(m.to_error()),
        }
    }

    /// Build the lowercase searchable text for this record.
    ///
    /// Total: a malformed record contributes its raw line so a user can
    /// still find it by content.
    pub fn searchable_text(&self) -> String {
        let mut out = String::new();
        match self {
            Record::Valid(record) => record.content().write_searchable(&mut out),
            Record::Malformed(m) => out.push_str(&m.raw_line().to_lowercase()),
        }
        out
    }
}

impl From<LogRecord> for Record {
    fn from(record: LogRecord) -> Self {
        Record::Valid(Box::new(record))
    }
}

impl From<MalformedRecord> for Record {
    fn from(record: MalformedRecord) -> Self {
        Record::Malformed(record)
    }
}

// ===== LogRecord =====

/// A successfully parsed log record.
///
/// Immutable after construction; tool tags are derived once from the content.
#[derive(Debug, Clone)]
pub struct LogRecord {
    uuid: Option<EntryUuid>,
    role: RoleName,
    timestamp: Option<DateTime<Utc>>,
    content: MessageContent,
    tools: Vec<ToolName>,
}

impl LogRecord {
    /// Build a record; distinct tool names are collected from `content`.
    pub fn new(
        uuid: Option<EntryUuid>,
        role: RoleName,
        timestamp: Option<DateTime<Utc>>,
        content: MessageContent,
    ) -> Self {
        let mut tools: Vec<ToolName> = Vec::new();
        for call in content.tool_calls() {
            if !tools.contains(call.name()) {
                tools.push(call.name().clone());
            }
        }
        Self {
            uuid,
            role,
            timestamp,
            content,
            tools,
        }
    }

    /// Stable identity, if the line carried one.
    pub fn uuid(&self) -> Option<&EntryUuid> {
        self.uuid.as_ref()
    }

    /// Role of the entry.
    pub fn role(&self) -> &RoleName {
        &self.role
    }

    /// When the entry was written, if recorded.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Message payload.
    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Distinct tools called, in first-use order.
    pub fn tool_names(&self) -> &[ToolName] {
        &self.tools
    }
}

// ===== MalformedRecord =====

/// A JSONL line that could not be parsed into a [`LogRecord`].
#[derive(Debug, Clone)]
pub struct MalformedRecord {
    line_number: usize,
    raw_line: String,
    error_message: String,
}

impl MalformedRecord {
    /// Keep a failed line.
    ///
    /// * `line_number` - The line number in the JSONL file (1-indexed)
    pub fn new(
        line_number: usize,
        raw_line: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            raw_line: raw_line.into(),
            error_message: error_message.into(),
        }
    }

    /// 1-based input line.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The line exactly as read.
    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    /// Why parsing failed.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    fn to_error(&self) -> RecordError {
        RecordError::Malformed {
            line: self.line_number,
            reason: self.error_message.clone(),
        }
    }
}

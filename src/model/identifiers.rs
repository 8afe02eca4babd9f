//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use std::fmt;

/// Stable identity of a log record (the `uuid` field of a JSONL line).
/// NEVER export the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryUuid(String);

impl EntryUuid {
    /// Smart constructor: validates non-empty UUID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidUuid> {
        let s = raw.into();
        if s.is_empty() {
            return Err(InvalidUuid::Empty);
        }
        Ok(Self(s))
    }

    /// Borrow the raw UUID text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tool invocation identifier for linking tool_use to tool_result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolUseId(String);

impl ToolUseId {
    /// Smart constructor: validates non-empty tool use ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidToolUseId> {
        let s = raw.into();
        if s.is_empty() {
            return Err(InvalidToolUseId::Empty);
        }
        Ok(Self(s))
    }

    /// Borrow the raw id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolUseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary category of a record ("user", "assistant", "tool_result", ...).
///
/// Roles are open-ended string identifiers: a log may introduce a role the
/// viewer has never seen, and filtering must treat it like any other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleName(String);

impl RoleName {
    /// Human turn.
    pub const USER: &'static str = "user";
    /// Model turn.
    pub const ASSISTANT: &'static str = "assistant";
    /// User line carrying only tool results.
    pub const TOOL_RESULT: &'static str = "tool_result";
    /// Conversation summary entry.
    pub const SUMMARY: &'static str = "summary";
    /// System notice, e.g. compaction.
    pub const SYSTEM: &'static str = "system";
    /// Final result entry of a headless run.
    pub const RESULT: &'static str = "result";

    /// Smart constructor: validates non-empty role
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRoleName> {
        let s = raw.into();
        if s.trim().is_empty() {
            return Err(InvalidRoleName::Empty);
        }
        Ok(Self(s))
    }

    /// Borrow the role text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== Error Types =====

/// Rejected [`EntryUuid`] input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidUuid {
    /// Empty string.
    #[error("UUID cannot be empty")]
    Empty,
}

/// Rejected [`ToolUseId`] input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidToolUseId {
    /// Empty string.
    #[error("Tool Use ID cannot be empty")]
    Empty,
}

/// Rejected [`RoleName`] input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRoleName {
    /// Empty or whitespace-only string.
    #[error("Role name cannot be empty")]
    Empty,
}

// ===== Tests =====

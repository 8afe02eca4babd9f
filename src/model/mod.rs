//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod message;
pub mod record;

// Re-export for convenience
pub use error::{ParseError, RecordError};
pub use identifiers::{
    EntryUuid, InvalidRoleName, InvalidToolUseId, InvalidUuid, RoleName, ToolUseId,
};
pub use message::{ContentBlock, MessageContent, ToolCall, ToolName};
pub use record::{LogRecord, MalformedRecord, Record};

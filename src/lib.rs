//! logsift
//!
//! Role/tool/search filtering over Claude Code JSONL session logs, with a
//! bounded searchable-text cache and stable index translation between the
//! full record array and the filtered view.
//!
//! The [`filter`] and [`model`] modules form the pure core; [`parser`],
//! [`source`], [`config`], [`logging`] and [`report`] are the thin shell
//! used by the `logsift` binary.

pub mod config;
pub mod filter;
pub mod logging;
pub mod model;
pub mod parser;
pub mod report;
pub mod source;

#[cfg(test)]
mod test_harness;

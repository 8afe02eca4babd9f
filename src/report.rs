//! Plain-text rendering of a [`FilterSession`] for the command line.
//!
//! Output is deterministic (categories in sorted order, no timestamps) so it
//! can be diffed and snapshot-tested.

use crate::filter::FilterSession;
use crate::model::{ContentBlock, MessageContent, Record, ToolName};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

/// Maximum preview width in characters.
pub const PREVIEW_WIDTH: usize = 72;

/// What [`write_report`] emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Emit one line per visible record.
    pub records: bool,
    /// Emit the summary block.
    pub summary: bool,
}

/// One line for a visible record, labelled with its original index.
pub fn record_line(original: usize, record: &Record) -> String {
    let (label, tools, preview) = match record {
        Record::Valid(log) => (
            log.role().as_str().to_string(),
            log.tool_names()
                .iter()
                .map(ToolName::as_str)
                .collect::<Vec<_>>(),
            preview(log.content()),
        ),
        Record::Malformed(bad) => (
            "malformed".to_string(),
            Vec::new(),
            format!("<line {}: {}>", bad.line_number(), bad.error_message()),
        ),
    };

    let mut body = Vec::with_capacity(2);
    if !tools.is_empty() {
        body.push(format!("[{}]", tools.join(", ")));
    }
    if !preview.is_empty() {
        body.push(preview);
    }

    let line = format!("{:<8}{:<12}{}", format!("[{original}]"), label, body.join(" "));
    line.trim_end().to_string()
}

/// First non-blank line of the record's readable text, truncated.
fn preview(content: &MessageContent) -> String {
    let text = match content {
        MessageContent::Text(text) => Some(text.as_str()),
        MessageContent::Blocks(blocks) => blocks.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Thinking { thinking } => Some(thinking.as_str()),
            ContentBlock::ToolResult { content, .. } => Some(content.as_str()),
            ContentBlock::ToolUse(_) => None,
        }),
    };
    let first = text
        .and_then(|t| t.lines().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or_default();
    truncate(first, PREVIEW_WIDTH)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Summary block: visibility counters, category selections and cache stats.
pub fn summary(session: &FilterSession) -> String {
    let stats = session.stats();
    let store = session.store();
    let cache = session.cache_stats();

    let mut out = String::new();
    out.push_str(&format!(
        "visible: {} of {} records\n",
        stats.visible, stats.total
    ));
    out.push_str(&format!(
        "hidden: role {}, tool {}, search {}, malformed {}\n",
        stats.hidden_by_role, stats.hidden_by_tool, stats.hidden_by_search, stats.malformed
    ));
    if store.search_text().is_empty() {
        out.push_str("search: (none)\n");
    } else {
        out.push_str(&format!("search: {:?}\n", store.search_text()));
    }
    push_dimension(&mut out, "roles", store.role_counts(), store.selected_roles());
    push_dimension(&mut out, "tools", store.tool_counts(), store.selected_tools());
    out.push_str(&format!(
        "cache: {}/{} entries, {} hits, {} misses, hit rate {:.1}%, {} eviction batches\n",
        cache.size,
        cache.capacity,
        cache.hits,
        cache.misses,
        cache.hit_rate * 100.0,
        cache.eviction_batches
    ));
    out
}

fn push_dimension(
    out: &mut String,
    title: &str,
    counts: &BTreeMap<String, usize>,
    selected: &BTreeSet<String>,
) {
    if counts.is_empty() {
        out.push_str(&format!("{title}: (none)\n"));
        return;
    }
    out.push_str(&format!("{title}:\n"));
    for (id, count) in counts {
        let mark = if selected.contains(id) { 'x' } else { ' ' };
        out.push_str(&format!("  [{mark}] {id} {count}\n"));
    }
}

/// Write the requested parts of the report.
///
/// # Errors
///
/// Propagates write failures (e.g. a closed pipe).
pub fn write_report<W: Write>(
    out: &mut W,
    session: &FilterSession,
    options: ReportOptions,
) -> io::Result<()> {
    if options.records {
        for (filtered, record) in session.filtered_records().enumerate() {
            let original = session.original_index(filtered).unwrap_or(filtered);
            writeln!(out, "{}", record_line(original, record))?;
        }
    }
    if options.summary {
        if options.records && session.filtered_len() > 0 {
            writeln!(out)?;
        }
        out.write_all(summary(session).as_bytes())?;
    }
    Ok(())
}

//! logsift - Entry Point

use clap::Parser;
use logsift::filter::FilterSession;
use logsift::model::error::AppError;
use logsift::report::{write_report, ReportOptions};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// logsift - filter Claude Code JSONL logs by role, tool and text
#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(version)]
#[command(about = "Filter Claude Code JSONL session logs by role, tool and search text")]
pub struct Args {
    /// Path to JSONL log file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Keep only records with this role (repeatable)
    #[arg(short, long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Keep only tool-bearing records using this tool (repeatable)
    #[arg(short, long = "tool", value_name = "TOOL")]
    pub tools: Vec<String>,

    /// Case-insensitive substring search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Print per-category counts and cache statistics
    #[arg(long)]
    pub stats: bool,

    /// Do not print record lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Searchable-text cache capacity (0 selects the default)
    #[arg(long, value_name = "N")]
    pub cache_capacity: Option<usize>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            records: !self.quiet,
            summary: self.stats,
        }
    }
}

/// Narrow one dimension to `keep` by toggling off every other available id.
///
/// Names that do not occur in the input are ignored with a warning.
fn keep_only<F>(available: &BTreeSet<String>, keep: &[String], dimension: &str, mut toggle: F)
where
    F: FnMut(&str) -> bool,
{
    if keep.is_empty() {
        return;
    }
    for name in keep.iter().filter(|name| !available.contains(*name)) {
        warn!(dimension, name = %name, "Requested category not present in input");
    }
    for id in available.iter().filter(|id| !keep.contains(*id)) {
        toggle(id);
    }
}

fn apply_selections(session: &mut FilterSession, args: &Args) {
    let roles = session.store().available_roles().clone();
    keep_only(&roles, &args.roles, "role", |id| session.toggle_role(id));

    let tools = session.store().available_tools().clone();
    keep_only(&tools, &args.tools, "tool", |id| session.toggle_tool(id));

    if let Some(search) = &args.search {
        session.set_search_text(search.as_str());
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = logsift::config::load_config_with_precedence(args.config.clone())?;
        let merged = logsift::config::merge_config(config_file);
        let with_env = logsift::config::apply_env_overrides(merged);
        logsift::config::apply_cli_overrides(with_env, args.cache_capacity)
    };

    let log_file = logsift::logging::init(&config)?;

    info!(
        config = ?config,
        log_file = %log_file.display(),
        "Configuration loaded and resolved"
    );

    let input_source = logsift::source::detect_input_source(args.file.clone())?;
    let records = input_source.load()?;

    let mut session = FilterSession::new(config.session_config());
    session.load(records);
    apply_selections(&mut session, args);

    let stats = session.stats();
    info!(
        visible = stats.visible,
        total = stats.total,
        malformed = stats.malformed,
        "Filtering complete"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &session, args.report_options())?;
    out.flush()?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    run(&args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift::parser::parse_records;

    const LOG: &str = r#"{"type":"user","message":{"role":"user","content":"run the tests"},"uuid":"u1","timestamp":"2025-12-27T10:00:00Z"}
{"type":"assistant","message":{"role":"assistant","content":[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"cargo test"}}]},"uuid":"a1","timestamp":"2025-12-27T10:00:01Z"}
{"type":"assistant","message":{"role":"assistant","content":[{"type":"tool_use","id":"t2","name":"Read","input":{"file_path":"src/lib.rs"}}]},"uuid":"a2","timestamp":"2025-12-27T10:00:02Z"}
{"type":"assistant","message":{"role":"assistant","content":"All tests pass"},"uuid":"a3","timestamp":"2025-12-27T10:00:03Z"}
"#;

    fn session_for(args: &Args) -> FilterSession {
        let mut session = FilterSession::default();
        session.load(parse_records(LOG));
        apply_selections(&mut session, args);
        session
    }

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["logsift", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["logsift", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["logsift"]);
        assert_eq!(args.file, None);
        assert!(args.roles.is_empty());
        assert!(args.tools.is_empty());
        assert_eq!(args.search, None);
        assert!(!args.stats);
        assert!(!args.quiet);
        assert_eq!(args.cache_capacity, None);
        assert_eq!(args.config, None);
        assert_eq!(
            args.report_options(),
            ReportOptions {
                records: true,
                summary: false
            }
        );
    }

    #[test]
    fn test_file_path_populates_file_field() {
        let args = Args::parse_from(["logsift", "session.jsonl"]);
        assert_eq!(args.file, Some(PathBuf::from("session.jsonl")));
    }

    #[test]
    fn test_role_and_tool_are_repeatable() {
        let args = Args::parse_from([
            "logsift", "-r", "user", "--role", "assistant", "-t", "Bash", "--tool", "Read",
        ]);
        assert_eq!(args.roles, vec!["user", "assistant"]);
        assert_eq!(args.tools, vec!["Bash", "Read"]);
    }

    #[test]
    fn test_cache_capacity_rejects_negative() {
        let result = Args::try_parse_from(["logsift", "--cache-capacity", "-3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_with_stats_prints_summary_only() {
        let args = Args::parse_from(["logsift", "-q", "--stats"]);
        assert_eq!(
            args.report_options(),
            ReportOptions {
                records: false,
                summary: true
            }
        );
    }

    #[test]
    fn test_role_selection_keeps_only_named_roles() {
        let args = Args::parse_from(["logsift", "--role", "user"]);
        let session = session_for(&args);

        assert_eq!(session.filtered_len(), 1);
        assert_eq!(session.original_index(0), Some(0));
    }

    #[test]
    fn test_tool_selection_keeps_plain_records() {
        let args = Args::parse_from(["logsift", "--tool", "Bash"]);
        let session = session_for(&args);

        // Read call hidden; text records are not constrained by tools.
        let visible: Vec<usize> = session.mapping().filtered_to_original().to_vec();
        assert_eq!(visible, vec![0, 1, 3]);
    }

    #[test]
    fn test_unknown_role_name_hides_every_role() {
        let args = Args::parse_from(["logsift", "--role", "wizard"]);
        let session = session_for(&args);

        assert_eq!(session.filtered_len(), 0);
        assert!(session.store().selected_roles().is_empty());
    }

    #[test]
    fn test_search_flag_applies_text_filter() {
        let args = Args::parse_from(["logsift", "--search", "CARGO"]);
        let session = session_for(&args);

        assert_eq!(session.mapping().filtered_to_original(), &[1]);
    }

    #[test]
    fn test_cache_capacity_flows_through_config_precedence_chain() {
        use logsift::config::{apply_cli_overrides, merge_config, ConfigFile};

        let config_file = ConfigFile {
            cache_capacity: Some(50),
            ..ConfigFile::default()
        };
        let merged = merge_config(Some(config_file));
        assert_eq!(merged.cache_capacity, 50);

        let args = Args::parse_from(["logsift", "--cache-capacity", "5"]);
        let resolved = apply_cli_overrides(merged, args.cache_capacity);
        assert_eq!(resolved.session_config().cache_capacity, 5);
    }
}

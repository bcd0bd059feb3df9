use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use quotesync_core::clock::{Clock, SystemClock};
use quotesync_core::config::SyncConfig;
use quotesync_core::db::LibSqlStore;
use quotesync_core::observer::{SyncObserver, TracingObserver};
use quotesync_core::store::QuoteStore;
use quotesync_core::sync::{StoredRemote, SyncOrchestrator};
use quotesync_core::{Conflict, Quote, QuoteId, SyncStatus};
use serde::Serialize;

use crate::error::CliError;

pub type CliOrchestrator = SyncOrchestrator<LibSqlStore, StoredRemote<LibSqlStore>>;

/// Everything a command needs to open the quote database
#[derive(Debug, Clone)]
pub struct RunContext {
    pub db_path: PathBuf,
    pub sync: SyncConfig,
}

impl RunContext {
    pub fn new(db_path: impl Into<PathBuf>, sync: SyncConfig) -> Self {
        Self {
            db_path: db_path.into(),
            sync,
        }
    }
}

/// Prints notifications on stderr so stdout stays machine-readable
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver {
    trace: TracingObserver,
}

impl SyncObserver for ConsoleObserver {
    fn render(&self, quotes: &[Quote]) {
        self.trace.render(quotes);
    }

    fn notify(&self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("Error: {message}");
        } else {
            eprintln!("{message}");
        }
    }

    fn set_status(&self, status: SyncStatus) {
        self.trace.set_status(status);
    }
}

/// Open the local store and the simulated server, seeding both on first run
pub async fn open_orchestrator(context: &RunContext) -> Result<CliOrchestrator, CliError> {
    let kv = LibSqlStore::open(&context.db_path).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store = QuoteStore::initialize(kv.clone(), clock.clone()).await?;
    let remote = StoredRemote::new(kv, clock);
    remote.seed_if_missing().await?;

    Ok(SyncOrchestrator::open(
        store,
        remote,
        context.sync.clone(),
        Box::new(ConsoleObserver::default()),
    )
    .await?)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteListItem {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub category: String,
    pub last_modified: DateTime<Utc>,
    pub relative_time: String,
    pub version: u32,
    pub unsynced: bool,
    pub conflict: bool,
}

pub fn quote_to_list_item(quote: &Quote) -> QuoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    QuoteListItem {
        id: quote.id.get(),
        text: quote.text.clone(),
        author: quote.author.clone(),
        category: quote.category.clone(),
        last_modified: quote.last_modified,
        relative_time: format_relative_time(quote.last_modified.timestamp_millis(), now_ms),
        version: quote.version,
        unsynced: quote.unsynced,
        conflict: quote.conflict,
    }
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    quotes
        .iter()
        .map(|quote| {
            let preview = quote_preview(quote, 40);
            let author = quote_preview_text(&quote.author, 18);
            let relative_time =
                format_relative_time(quote.last_modified.timestamp_millis(), now_ms);
            let marker = quote_marker(quote);

            let line = format!(
                "{:<13}  {preview:<40}  {author:<18}  {:<12}  {relative_time}",
                quote.id, quote.category
            );
            if marker.is_empty() {
                line
            } else {
                format!("{line}  {marker}")
            }
        })
        .collect()
}

/// `[conflict]` wins over `[unsynced]`
pub const fn quote_marker(quote: &Quote) -> &'static str {
    if quote.conflict {
        "[conflict]"
    } else if quote.unsynced {
        "[unsynced]"
    } else {
        ""
    }
}

pub fn format_quote_card(quote: &Quote) -> String {
    format!(
        "\"{}\"\n  - {} ({})",
        quote.text.trim(),
        quote.author,
        quote.category
    )
}

pub fn format_conflict_lines(conflicts: &[Conflict]) -> Vec<String> {
    conflicts
        .iter()
        .map(|conflict| {
            let local_id = conflict
                .local_id()
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            let remote = conflict.remote.as_ref().map_or_else(
                || "(missing on server)".to_string(),
                |quote| format!("server v{} \"{}\"", quote.version, quote_preview(quote, 30)),
            );
            format!("{local_id:<13}  {}  {remote}", conflict.description)
        })
        .collect()
}

pub fn quote_preview(quote: &Quote, max_chars: usize) -> String {
    let first_line = quote.text.lines().next().unwrap_or("").trim();
    quote_preview_text(first_line, max_chars)
}

fn quote_preview_text(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_sync_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || "never".to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn parse_quote_id(id: &str) -> Result<QuoteId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyQuoteId);
    }
    trimmed
        .parse::<QuoteId>()
        .map_err(|_| CliError::InvalidQuoteId(trimmed.to_string()))
}

/// Quote text from arguments, then piped stdin, then `$EDITOR`
pub fn resolve_quote_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    if let Some(text) = capture_editor_input_with_initial("")? {
        return Ok(text);
    }

    Err(CliError::EmptyText)
}

pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text(&buffer))
}

pub fn capture_editor_input_with_initial(
    initial_text: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_quote_file_path();
    std::fs::write(&temp_file, initial_text)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let text = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_text(&text))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(CliError::EditorFailed("empty EDITOR command".into()));
    };

    let status = Command::new(program).args(parts).arg(file_path).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::EditorFailed(format!(
            "`{editor}` exited with status {status}"
        )))
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_quote_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("quotes-{}-{now}.txt", std::process::id()))
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("QUOTES_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("quotesync")
        .join("quotes.db")
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quotesync_core::sync::Resolution;

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Collect quotes and keep them in sync with a simulated server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Treat the client as disconnected; sync cycles are skipped
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new quote
    #[command(alias = "new")]
    Add {
        /// Quote text (read from stdin or $EDITOR when omitted)
        text: Vec<String>,
        /// Quote author
        #[arg(short, long)]
        author: Option<String>,
        /// Quote category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List quotes, optionally filtered by category
    List {
        /// Category to show (`all` for everything); remembered for next time
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the categories in use
    Categories,
    /// Show a random quote
    Random,
    /// Edit an existing quote
    Edit {
        /// Quote ID
        id: String,
        /// New text
        #[arg(long)]
        text: Option<String>,
        /// New author
        #[arg(short, long)]
        author: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete an existing quote
    Delete {
        /// Quote ID
        id: String,
    },
    /// Export quotes
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON file (`-` for stdin)
    Import {
        /// Path to a JSON array of {text, author, category}
        #[arg(value_name = "PATH")]
        input: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Sync local quotes with the simulated server
    Sync {
        #[command(subcommand)]
        command: Option<SyncCommands>,
    },
    /// Inspect or change the simulated server directly
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },
    /// Show or update persisted CLI settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ResolutionArg {
    /// Take the server copy, keeping unpushed local additions
    Remote,
    /// Keep local quotes and overwrite the server
    Local,
    /// Keep the newest copy of each quote
    Merge,
}

impl From<ResolutionArg> for Resolution {
    fn from(value: ResolutionArg) -> Self {
        match value {
            ResolutionArg::Remote => Self::UseRemote,
            ResolutionArg::Local => Self::UseLocal,
            ResolutionArg::Merge => Self::Merge,
        }
    }
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Show sync status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List conflicts waiting for a resolution
    Conflicts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve pending conflicts
    Resolve {
        #[arg(value_enum)]
        resolution: ResolutionArg,
    },
    /// Sync periodically; press Enter to sync immediately, Ctrl-C to stop
    Watch {
        /// Seconds between cycles (defaults to the configured interval)
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum RemoteCommands {
    /// List quotes held by the server
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a quote on the server only
    Add {
        /// Quote text
        text: Vec<String>,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Edit a quote on the server only
    Edit {
        /// Quote ID
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a quote on the server only
    Delete {
        /// Quote ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Update persisted settings
    Set {
        /// Seconds between periodic sync cycles
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Simulated network delay in milliseconds
        #[arg(long, value_name = "MS")]
        network_delay_ms: Option<u64>,
        /// Whether the client starts connected
        #[arg(long, value_name = "BOOL")]
        connected: Option<bool>,
    },
}

use std::path::{Path, PathBuf};

use chrono::Utc;
use quotesync_core::export::{self, render_quotes_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::commands::common::{open_orchestrator, RunContext};
use crate::error::CliError;

impl From<ExportFormat> for export::ExportFormat {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

/// Export the whole local collection. A directory output gets a generated
/// file name inside it.
pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    context: &RunContext,
) -> Result<Option<PathBuf>, CliError> {
    let orchestrator = open_orchestrator(context).await?;
    let format = export::ExportFormat::from(format);
    let rendered = render_quotes_export(orchestrator.store().quotes().as_slice(), format)?;

    let Some(path) = output_path else {
        println!("{rendered}");
        return Ok(None);
    };

    let path = if path.is_dir() {
        path.join(suggested_export_file_name(
            format,
            Utc::now().timestamp_millis(),
        ))
    } else {
        path.to_path_buf()
    };
    std::fs::write(&path, rendered)?;
    println!("{}", path.display());
    Ok(Some(path))
}

//! Writes a finished batch to JSON, CSV or Markdown.

use std::fmt::{self, Write as _};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::result::ModelResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    /// Guesses the format from the file extension.
    ///
    /// Unknown or missing extensions give JSON; the flag is `true` in that
    /// case so the caller can warn.
    pub fn from_path(path: &Path) -> (Self, bool) {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => (Self::Json, false),
            Some("csv") => (Self::Csv, false),
            Some("md") | Some("markdown") => (Self::Markdown, false),
            _ => (Self::Json, true),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("unknown export format '{other}' (expected json, csv or markdown)")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
        })
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Permission denied when writing to {}", .path.display())]
    PermissionDenied { path: PathBuf },
    #[error("Failed to write to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Document layout of a JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonExport {
    /// Local time, RFC 3339
    pub timestamp: String,
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub results: Vec<ModelResult>,
}

const CSV_HEADER: [&str; 11] = [
    "Timestamp",
    "Prompt",
    "System Prompt",
    "Model",
    "Response",
    "Response Time (s)",
    "Prompt Tokens",
    "Completion Tokens",
    "Total Tokens",
    "Estimated Cost (USD)",
    "Error",
];

/// Writes `results` with the prompt that produced them to `path`.
///
/// Missing parent directories are created. An existing file is replaced.
pub fn export_results(
    results: &[ModelResult],
    prompt: &str,
    system_prompt: Option<&str>,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }

    let export = ComparisonExport {
        timestamp: chrono::Local::now().to_rfc3339(),
        prompt: prompt.to_string(),
        system_prompt: system_prompt.map(str::to_string),
        results: results.to_vec(),
    };

    match format {
        ExportFormat::Json => {
            let body = serde_json::to_string_pretty(&export)?;
            fs::write(path, body).map_err(|e| ExportError::io(path, e))?;
        }
        ExportFormat::Csv => write_csv(&export, path)?,
        ExportFormat::Markdown => {
            fs::write(path, render_markdown(&export)).map_err(|e| ExportError::io(path, e))?;
        }
    }
    log::info!(
        "Exported {} results as {format} to {}",
        results.len(),
        path.display()
    );
    Ok(())
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_csv(export: &ComparisonExport, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(CSV_HEADER)?;

    let system_prompt = export.system_prompt.as_deref().unwrap_or_default();
    for result in &export.results {
        wtr.write_record([
            export.timestamp.clone(),
            export.prompt.clone(),
            system_prompt.to_string(),
            result.model().to_string(),
            cell(result.response()),
            cell(result.response_time()),
            cell(result.prompt_tokens()),
            cell(result.completion_tokens()),
            cell(result.total_tokens()),
            cell(result.estimated_cost()),
            cell(result.error()),
        ])?;
    }

    wtr.flush().map_err(|e| ExportError::io(path, e))?;
    Ok(())
}

fn render_markdown(export: &ComparisonExport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_markdown(&mut out, export);
    out
}

fn write_markdown(out: &mut String, export: &ComparisonExport) -> fmt::Result {
    writeln!(out, "# LLM Model Comparison Results\n")?;
    writeln!(out, "**Timestamp:** {}\n", export.timestamp)?;
    writeln!(out, "**Prompt:** {}\n", export.prompt)?;
    if let Some(system) = export.system_prompt.as_deref().filter(|s| !s.is_empty()) {
        writeln!(out, "**System Prompt:** {system}\n")?;
    }
    writeln!(out, "---\n")?;

    for (i, result) in export.results.iter().enumerate() {
        writeln!(out, "## Model {}: {}\n", i + 1, result.model())?;
        if let Some(time) = result.response_time() {
            writeln!(out, "**Response Time:** {time:.2}s\n")?;
        }
        if let Some(total) = result.total_tokens() {
            writeln!(
                out,
                "**Token Usage:** {total} total (prompt: {}, completion: {})\n",
                result
                    .prompt_tokens()
                    .map_or_else(|| "N/A".to_string(), |t| t.to_string()),
                result
                    .completion_tokens()
                    .map_or_else(|| "N/A".to_string(), |t| t.to_string()),
            )?;
        }
        if let Some(cost) = result.estimated_cost() {
            writeln!(out, "**Estimated Cost:** ${cost:.6}\n")?;
        }
        match (result.error(), result.response()) {
            (Some(error), _) => writeln!(out, "**Error:** {error}\n")?,
            (None, response) => {
                writeln!(out, "**Response:**\n\n{}\n", response.unwrap_or_default())?
            }
        }
        writeln!(out, "---\n")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;

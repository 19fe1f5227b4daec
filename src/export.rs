// Export serialization: plain text, CSV and JSON

use crate::task::{TIMESTAMP_FORMAT, Task, Urgency};
use chrono::Local;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Csv,
    Json,
}

impl ExportFormat {
    /// Map a menu digit (1-3) to a format.
    pub fn from_menu_choice(choice: u32) -> Option<ExportFormat> {
        match choice {
            1 => Some(ExportFormat::Text),
            2 => Some(ExportFormat::Csv),
            3 => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Json => write!(f, "JSON"),
        }
    }
}

/// Top-level JSON export document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    pub tasks: Vec<ExportedTask>,
    pub exported_at: String,
}

/// One task as it appears in the JSON export. Timestamps are rendered
/// strings, urgency its uppercase name.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedTask {
    pub id: u64,
    pub description: String,
    pub urgency: Urgency,
    pub created: String,
    pub completed: bool,
}

impl From<&Task> for ExportedTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            description: task.description.clone(),
            urgency: task.urgency,
            created: task.created_str(),
            completed: task.completed,
        }
    }
}

/// Write `tasks` to `path` in the given format.
///
/// Fails only when the destination cannot be created or written.
pub fn write_export(format: ExportFormat, tasks: &[Task], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Text => write_text(&mut writer, tasks)?,
        ExportFormat::Csv => write_csv(&mut writer, tasks)?,
        ExportFormat::Json => write_json(&mut writer, tasks)?,
    }

    writer.flush()?;
    debug!(?format, count = tasks.len(), path = ?path, "Export written");
    Ok(())
}

fn now_str() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn write_text<W: Write>(w: &mut W, tasks: &[Task]) -> Result<()> {
    writeln!(w, "TODO APP EXPORT - {}", now_str())?;
    writeln!(w, "{}", "=".repeat(50))?;

    for task in tasks {
        writeln!(w, "ID: {}", task.id)?;
        writeln!(w, "Description: {}", task.description)?;
        writeln!(w, "Urgency: {}", task.urgency)?;
        writeln!(w, "Created: {}", task.created_str())?;
        writeln!(w, "Status: {}", task.status_str())?;
        writeln!(w, "{}", "-".repeat(30))?;
    }

    Ok(())
}

fn write_csv<W: Write>(w: &mut W, tasks: &[Task]) -> Result<()> {
    writeln!(w, "ID,Description,Urgency,Created,Status")?;

    for task in tasks {
        // Description is quoted verbatim; embedded quotes are not escaped
        writeln!(
            w,
            "{},\"{}\",{},{},{}",
            task.id,
            task.description,
            task.urgency,
            task.created_str(),
            task.status_str()
        )?;
    }

    Ok(())
}

fn write_json<W: Write>(w: &mut W, tasks: &[Task]) -> Result<()> {
    let document = ExportDocument {
        tasks: tasks.iter().map(ExportedTask::from).collect(),
        exported_at: now_str(),
    };

    serde_json::to_writer_pretty(&mut *w, &document).context("Failed to serialize JSON export")?;
    writeln!(w)?;
    Ok(())
}

/// Parse a JSON export back into its document form.
pub fn read_json_export(path: &Path) -> Result<ExportDocument> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let document = serde_json::from_reader(file).context("Failed to parse JSON export")?;
    Ok(document)
}

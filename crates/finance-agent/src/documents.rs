//! Uploaded document listing and upload validation
//!
//! Parsing happens on the platform after upload; locally we only check that a
//! file is a type the upload function accepts and is under the size limit.

use serde::Deserialize;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::constants;
use crate::platform::PlatformError;

/// Document as returned by the list-documents function
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default, alias = "created_at")]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub document: Option<Document>,
    #[serde(default)]
    pub error: Option<String>,
}

/// MIME type for an uploadable file, based on its extension
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "csv" => Some("text/csv"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "xls" => Some("application/vnd.ms-excel"),
        _ => None,
    }
}

/// Check type and size before uploading; returns the content type to send
pub fn validate_upload(path: &Path, size: u64) -> Result<&'static str, PlatformError> {
    let invalid = |reason: &str| PlatformError::InvalidUpload {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let content_type = content_type_for(path)
        .ok_or_else(|| invalid("Invalid file type. Only PDF, CSV, and XLSX are allowed."))?;

    if size > constants::MAX_UPLOAD_BYTES {
        return Err(invalid("File size exceeds 50MB limit."));
    }

    Ok(content_type)
}

/// Human-readable size, e.g. "12.3 KB"
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "File")]
    file_name: String,
    #[tabled(rename = "Type")]
    file_type: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Uploaded")]
    uploaded_at: String,
}

pub fn render_documents(documents: &[Document]) -> String {
    let rows = documents.iter().map(|doc| DocumentRow {
        id: doc.id.clone(),
        file_name: doc.file_name.clone(),
        file_type: doc
            .file_type
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| "-".to_string()),
        size: doc.file_size.map(format_size).unwrap_or_else(|| "-".to_string()),
        uploaded_at: doc
            .uploaded_at
            .as_deref()
            .map(|d| d.chars().take(10).collect())
            .unwrap_or_else(|| "-".to_string()),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn print_documents(documents: &[Document]) {
    if documents.is_empty() {
        println!("No documents uploaded yet.");
        println!("\nUse 'finance-agent documents upload <file>' to add one");
        return;
    }

    println!("{}", render_documents(documents));
    println!("\n{} document(s)", documents.len());
}

/// Ask before deleting a document. `assume_yes` skips the prompt.
/// Anything other than `y`/`yes` cancels.
pub fn confirm_delete<R: BufRead, W: Write>(
    document_id: &str,
    assume_yes: bool,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    write!(
        output,
        "Delete document {}? This cannot be undone and also deletes all associated data \
         (chunks, financial data, etc.). [y/N] ",
        document_id
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

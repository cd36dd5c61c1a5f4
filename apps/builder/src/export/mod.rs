//! Export Invoker — hands the current rendered document to a converter.
//!
//! Word export needs no converter: the preview markup wrapped in a minimal
//! HTML page opens in word processors as a `.doc`. PDF export goes through a
//! [`DocumentConverter`]; without one configured it reports the converter as
//! unavailable and the document is unaffected.

use std::io;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::document::model::DocumentModel;
use crate::render::html::to_container_html;
use crate::render::project;

const FALLBACK_FILENAME: &str = "resume";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format '{0}'")]
    UnknownFormat(String),

    #[error("No document converter is available for {0} export")]
    ConverterUnavailable(&'static str),

    #[error("Document converter failed: {0}")]
    ConverterFailed(String),

    #[error("I/O error during export: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Word,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Word => "doc",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Word => "application/msword",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "doc" | "word" => Ok(ExportFormat::Word),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// `<name with whitespace replaced by '_'>.<ext>`, `resume.<ext>` when unnamed.
/// Control characters are dropped from the name.
pub fn export_filename(model: &DocumentModel, format: ExportFormat) -> String {
    let stem = model
        .name
        .as_deref()
        .map(|n| {
            n.chars()
                .filter(|c| !c.is_control())
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect::<String>()
        })
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
    format!("{stem}.{}", format.extension())
}

/// Standalone HTML page around the preview markup.
pub fn word_document(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset='utf-8'><title>Resume</title></head><body>{body}</body></html>"
    )
}

/// HTML page → paginated binary document.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, html: &str) -> Result<Vec<u8>, ExportError>;
}

/// Runs an external command as `<program> [args..] <input.html> <output.pdf>`.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    /// Splits a command line on whitespace. `None` when it is blank.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl DocumentConverter for CommandConverter {
    async fn convert(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("resume.html");
        let output = workdir.path().join("resume.pdf");
        tokio::fs::write(&input, html).await?;

        let result = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(&input)
            .arg(&output)
            .output()
            .await;

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(program = %self.program, "PDF converter not found");
                return Err(ExportError::ConverterUnavailable("pdf"));
            }
            Err(e) => return Err(e.into()),
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            return Err(ExportError::ConverterFailed(if stderr.is_empty() {
                format!("exited with {}", out.status)
            } else {
                stderr
            }));
        }

        Ok(tokio::fs::read(&output).await?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// `attachment` header value. The quoted `filename` is ASCII only; when that
    /// loses characters the exact name follows as RFC 5987 `filename*`.
    pub fn content_disposition(&self) -> String {
        let ascii: String = self
            .filename
            .chars()
            .map(|c| match c {
                '"' | '\\' => '_',
                c if c.is_ascii() && !c.is_ascii_control() => c,
                _ => '_',
            })
            .collect();
        if ascii == self.filename {
            format!("attachment; filename=\"{ascii}\"")
        } else {
            format!(
                "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
                urlencoding::encode(&self.filename)
            )
        }
    }
}

#[derive(Clone, Default)]
pub struct ExportInvoker {
    pdf: Option<Arc<dyn DocumentConverter>>,
}

impl ExportInvoker {
    pub fn new(pdf: Option<Arc<dyn DocumentConverter>>) -> Self {
        Self { pdf }
    }

    pub fn pdf_available(&self) -> bool {
        self.pdf.is_some()
    }

    /// Renders `model` as it is now and converts it.
    pub async fn export(
        &self,
        model: &DocumentModel,
        format: ExportFormat,
    ) -> Result<ExportArtifact, ExportError> {
        let page = word_document(&to_container_html(&project(model)));
        let bytes = match format {
            ExportFormat::Word => page.into_bytes(),
            ExportFormat::Pdf => {
                let converter = self
                    .pdf
                    .as_ref()
                    .ok_or(ExportError::ConverterUnavailable("pdf"))?;
                converter.convert(&page).await?
            }
        };

        let filename = export_filename(model, format);
        info!(%filename, bytes = bytes.len(), "Document exported");
        Ok(ExportArtifact {
            filename,
            content_type: format.content_type(),
            bytes,
        })
    }
}

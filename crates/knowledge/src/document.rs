//! Source document loading and text extraction.
//!
//! A source is either a local file (UTF-8 text, markdown, or HTML) or an
//! http(s) URL. Loading produces immutable [`Document`] values; a source
//! that yields no usable text is reported as a load failure by the index
//! builder, never silently indexed as empty.

use chrono::{DateTime, Utc};
use polyfaq_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An immutable source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: String,

    /// Origin identifier (file path or URL)
    pub origin: String,

    /// Extracted text content
    pub text: String,

    /// Metadata (origin, content type)
    pub metadata: serde_json::Value,

    /// When this document was loaded
    pub loaded_at: DateTime<Utc>,
}

/// Reference to a document source.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    /// Local file path
    File(PathBuf),

    /// http(s) URL
    Url(String),
}

impl DocumentSource {
    /// Parse a source reference string into a file path or URL.
    pub fn parse(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Url(reference.to_string())
        } else {
            Self::File(PathBuf::from(reference))
        }
    }

    /// Origin identifier for metadata and logging.
    pub fn origin(&self) -> String {
        match self {
            Self::File(path) => path.to_string_lossy().to_string(),
            Self::Url(url) => url.clone(),
        }
    }

    /// Load and extract the document(s) behind this source.
    ///
    /// Documents whose extracted text is empty are dropped, so an
    /// unreadable or empty source yields an empty vector.
    pub async fn load(&self) -> AppResult<Vec<Document>> {
        let text = match self {
            Self::File(path) => match ContentType::from_path(path) {
                // PDF is binary; extraction replaces the text pipeline
                ContentType::Pdf => extract_pdf(path)?,
                content_type => extract_text(&load_file(path)?, content_type),
            },
            Self::Url(url) => extract_text(&fetch_url(url).await?, ContentType::Html),
        };

        if text.trim().is_empty() {
            tracing::warn!("Source {} yielded no text", self.origin());
            return Ok(Vec::new());
        }

        let origin = self.origin();
        let document = Document {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: serde_json::json!({ "origin": origin }),
            origin,
            text,
            loaded_at: Utc::now(),
        };

        Ok(vec![document])
    }
}

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    Html,
    Pdf,
    PlainText,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("html") | Some("htm") => Self::Html,
            Some("pdf") => Self::Pdf,
            _ => Self::PlainText,
        }
    }
}

fn load_file(path: &Path) -> AppResult<String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Load(format!("Failed to read {:?}: {}", path, e)))?;

    if raw.contains('\0') {
        return Err(AppError::Load(format!(
            "Binary file not supported: {:?}",
            path
        )));
    }

    Ok(raw)
}

async fn fetch_url(url: &str) -> AppResult<String> {
    tracing::info!("Fetching document from {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| AppError::Load(format!("Failed to fetch {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(AppError::Load(format!(
            "Fetch failed for {} ({})",
            url,
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| AppError::Load(format!("Failed to read body of {}: {}", url, e)))
}

fn extract_pdf(path: &Path) -> AppResult<String> {
    pdf_extract::extract_text(path)
        .map_err(|e| AppError::Load(format!("Failed to extract text from {:?}: {}", path, e)))
}

fn extract_text(raw: &str, content_type: ContentType) -> String {
    match content_type {
        ContentType::Markdown => clean_markdown(raw),
        ContentType::Html => clean_html(raw),
        // PDF extraction happens on the binary file, before this point
        ContentType::Pdf | ContentType::PlainText => raw.to_string(),
    }
}

/// Clean markdown by removing structural formatting.
fn clean_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim_start_matches('#').trim();

        // Skip horizontal rules and code fences
        if trimmed.starts_with("---") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        if !trimmed.is_empty() {
            result.push_str(trimmed);
            result.push('\n');
        }
    }

    result.trim().to_string()
}

/// Clean HTML by stripping tags and script/style bodies.
fn clean_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    // Tag names are ASCII, so a case-insensitive prefix check on the
    // original slice avoids byte-offset drift from lowercasing the
    // whole input (some characters change length when lowercased).
    let tag_at = |i: usize, tag: &str| {
        text[i..]
            .get(..tag.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(tag))
    };

    for (i, ch) in text.char_indices() {
        if ch == '<' {
            in_tag = true;

            if tag_at(i, "<script") {
                in_script = true;
            } else if tag_at(i, "</script") {
                in_script = false;
            } else if tag_at(i, "<style") {
                in_style = true;
            } else if tag_at(i, "</style") {
                in_style = false;
            }
        } else if ch == '>' {
            in_tag = false;
        } else if !in_tag && !in_script && !in_style {
            result.push(ch);
        }
    }

    // Collapse whitespace
    result
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

//! Document text extraction.

use docqa_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    Html,
    PlainText,
    /// Binary formats that need an external extractor (PDF, DOCX)
    Binary,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("html") | Some("htm") => Self::Html,
            Some("txt") | Some("text") => Self::PlainText,
            Some("pdf") | Some("docx") | Some("doc") => Self::Binary,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::PlainText => "text",
            Self::Binary => "binary",
            Self::Unknown => "unknown",
        }
    }
}

/// Read a document and return its cleaned text.
///
/// Runs of spaces and tabs collapse to one space and runs of blank lines to a
/// single paragraph break, so sentence expansion can still stop at paragraphs.
pub fn parse_file(path: &Path) -> AppResult<String> {
    let content_type = ContentType::from_path(path);

    if content_type == ContentType::Binary {
        return Err(AppError::UnsupportedDocument(format!(
            "{:?} needs an external text extractor; convert it to .txt first",
            path
        )));
    }

    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => {
            AppError::UnsupportedDocument(format!("{:?} is not UTF-8 text", path))
        }
        _ => AppError::Io(e),
    })?;

    if raw.contains('\0') {
        return Err(AppError::UnsupportedDocument(format!(
            "{:?} looks like a binary file",
            path
        )));
    }

    let cleaned = match content_type {
        ContentType::Markdown => clean_whitespace(&clean_markdown(&raw)),
        ContentType::Html => clean_whitespace(&clean_html(&raw)),
        _ => clean_whitespace(&raw),
    };

    if cleaned.is_empty() {
        return Err(AppError::EmptyDocument);
    }

    tracing::debug!(
        "Parsed {:?} as {} ({} bytes)",
        path,
        content_type.as_str(),
        cleaned.len()
    );

    Ok(cleaned)
}

/// Collapse intra-line whitespace and blank-line runs.
pub fn clean_whitespace(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(collapsed);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join("\n\n")
}

/// Strip markdown headers, rules and code fences.
fn clean_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim_start_matches('#').trim();

        if trimmed.starts_with("---") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        result.push_str(trimmed);
        result.push('\n');
    }

    result
}

/// Strip HTML tags, dropping script and style bodies.
fn clean_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    for (i, ch) in text.char_indices() {
        if ch == '<' {
            in_tag = true;
            let rest = &text[i..];
            if starts_with_ignore_case(rest, "<script") {
                in_script = true;
            } else if starts_with_ignore_case(rest, "</script") {
                in_script = false;
            } else if starts_with_ignore_case(rest, "<style") {
                in_style = true;
            } else if starts_with_ignore_case(rest, "</style") {
                in_style = false;
            } else if starts_with_ignore_case(rest, "<p")
                || starts_with_ignore_case(rest, "<br")
                || starts_with_ignore_case(rest, "<div")
                || starts_with_ignore_case(rest, "<h")
                || starts_with_ignore_case(rest, "<li")
            {
                result.push_str("\n\n");
            }
        } else if ch == '>' {
            in_tag = false;
        } else if !in_tag && !in_script && !in_style {
            result.push(ch);
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

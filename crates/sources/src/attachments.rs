//! Attachment handling: loading text files and rendering them as a prompt
//! fragment.

use std::path::Path;

use async_trait::async_trait;
use bizpilot_core::{Attachment, AttachmentProcessor, SourceError};

/// Largest file `load_attachment` will read (10 MB).
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Characters of each attachment shown in the prompt.
pub const PREVIEW_CHARS: usize = 1_000;

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "csv", "json", "js", "ts", "jsx", "tsx", "html", "htm", "xml", "css", "py",
    "java", "c", "cpp", "h", "php", "rb", "go", "rs", "sql", "sh", "yml", "yaml", "toml", "ini",
    "conf", "config", "env", "log",
];

/// Best-effort MIME type from a file name.
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "log" | "ini" | "conf" | "config" | "env" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "xml" => "application/xml",
        "css" => "text/css",
        "js" | "jsx" => "text/javascript",
        "yml" | "yaml" => "application/yaml",
        "toml" => "application/toml",
        "pdf" => "application/pdf",
        _ if TEXT_EXTENSIONS.contains(&ext.as_str()) => "text/plain",
        _ => "application/octet-stream",
    }
}

fn is_text_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| TEXT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Read a local file into an attachment descriptor.
///
/// Oversized and non-text files still produce a descriptor, with `error`
/// set, so the model can be told what it cannot see.
pub async fn load_attachment(path: &Path) -> Result<Attachment, SourceError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();
    let mime_type = mime_for(&name).to_string();

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| SourceError::Attachment(format!("{}: {e}", path.display())))?;
    let size = metadata.len();

    let rejected = |reason: String| Attachment {
        name: name.clone(),
        mime_type: mime_type.clone(),
        text_preview: None,
        size_bytes: Some(size),
        error: Some(reason),
    };

    if size > MAX_ATTACHMENT_BYTES {
        return Ok(rejected(format!(
            "File too large: {}MB exceeds 10MB limit",
            size / 1024 / 1024
        )));
    }
    if !is_text_file(&name) {
        return Ok(rejected(format!("Unsupported file type: {mime_type}")));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SourceError::Attachment(format!("{}: {e}", path.display())))?;

    Ok(Attachment {
        name,
        mime_type,
        text_preview: Some(content),
        size_bytes: Some(size),
        error: None,
    })
}

/// Renders attachments as a numbered markdown section with content stats
/// and a truncated preview.
#[derive(Debug, Clone)]
pub struct TextAttachmentSummarizer {
    preview_chars: usize,
}

impl TextAttachmentSummarizer {
    pub fn new() -> Self {
        Self {
            preview_chars: PREVIEW_CHARS,
        }
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    fn render_preview(&self, content: &str) -> String {
        let lines = content.lines().count().max(1);
        let words = content.split_whitespace().count();
        let chars = content.chars().count();

        let mut out = format!("*Stats: {lines} lines, {words} words, {chars} characters*\n\n");
        if chars > self.preview_chars {
            let cut: String = content.chars().take(self.preview_chars).collect();
            out.push_str(&format!("**Content Preview:**\n```\n{cut}...\n```\n"));
            out.push_str(&format!(
                "*[Content truncated - full {chars} characters available]*"
            ));
        } else {
            out.push_str(&format!("**Full Content:**\n```\n{content}\n```"));
        }
        out
    }
}

impl Default for TextAttachmentSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentProcessor for TextAttachmentSummarizer {
    async fn summarize(&self, attachments: &[Attachment]) -> Result<String, SourceError> {
        if attachments.is_empty() {
            return Ok(String::new());
        }

        let mut summary = format!("## Attached Files ({})\n\n", attachments.len());
        for (i, a) in attachments.iter().enumerate() {
            summary.push_str(&format!("### {}. {}\n", i + 1, a.name));
            summary.push_str(&format!("- **Type**: {}\n", a.mime_type));
            if let Some(size) = a.size_bytes {
                summary.push_str(&format!("- **Size**: {}KB\n", (size + 512) / 1024));
            }
            match &a.error {
                Some(err) => summary.push_str(&format!("- **Status**: Not processed ({err})\n")),
                None => summary.push_str("- **Status**: Processed\n"),
            }
            if let Some(preview) = a.text_preview.as_deref().filter(|p| !p.is_empty()) {
                summary.push('\n');
                summary.push_str(&self.render_preview(preview));
                summary.push('\n');
            }
            summary.push_str("\n---\n\n");
        }

        Ok(summary.trim_end().to_string())
    }
}

//! Typed response body for the requested output format.

use bizpilot_core::{MarkdownSection, OutputFormat, ResponseBody};
use tracing::debug;

/// Contents of the first fenced code block, or the whole text.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    // Skip the info string (e.g. `json`) on the opening line.
    let body = after.split_once('\n').map_or("", |(_, rest)| rest);
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Split on ATX headings. Text before the first heading becomes a
/// section with an empty heading.
pub fn markdown_sections(text: &str) -> Vec<MarkdownSection> {
    let mut sections = Vec::new();
    let mut heading = String::new();
    let mut content: Vec<&str> = Vec::new();
    let mut in_fence = false;

    let mut flush = |heading: &mut String, content: &mut Vec<&str>| {
        let body = content.join("\n").trim().to_string();
        if !heading.is_empty() || !body.is_empty() {
            sections.push(MarkdownSection {
                heading: std::mem::take(heading),
                content: body,
            });
        }
        content.clear();
    };

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        let hashes = line.chars().take_while(|c| *c == '#').count();
        let is_heading = !in_fence
            && (1..=6).contains(&hashes)
            && line[hashes..].starts_with([' ', '\t']);
        if is_heading {
            flush(&mut heading, &mut content);
            heading = line[hashes..].trim().to_string();
        } else {
            content.push(line);
        }
    }
    flush(&mut heading, &mut content);
    sections
}

/// Build the body. `raw` is the model text before the tone pass (JSON is
/// parsed from it), `polished` is the text after it.
pub fn build(format: OutputFormat, raw: &str, polished: &str, action_items: &[String]) -> ResponseBody {
    match format {
        OutputFormat::Text => ResponseBody::text(polished),
        OutputFormat::Json => match serde_json::from_str(strip_fence(raw)) {
            Ok(data) => ResponseBody::Json { data },
            Err(e) => {
                debug!(error = %e, "JSON output requested but response did not parse, returning text");
                ResponseBody::text(polished)
            }
        },
        OutputFormat::Markdown => ResponseBody::Markdown {
            sections: markdown_sections(polished),
        },
        OutputFormat::ActionItems => ResponseBody::ActionItems {
            items: action_items.to_vec(),
        },
    }
}

//! Human-readable views of lifelog entries.

use serde_json::Value;

use crate::client::LifelogEntry;

/// Markdown lines shown under each entry in the text dump.
const MARKDOWN_PREVIEW_LINES: usize = 5;

/// Multi-line summary of one entry.
pub fn format_entry(entry: &LifelogEntry) -> String {
    let mut lines = vec![
        format!("ID: {}", entry.id),
        format!("Title: {}", entry.title),
        format!(
            "Window: {} -> {}",
            entry.start_time.to_rfc3339(),
            entry.end_time.to_rfc3339()
        ),
        format!("Starred: {}", entry.is_starred),
        format!("Updated: {}", entry.updated_at.to_rfc3339()),
    ];

    if let Some(markdown) = entry.markdown.as_deref().filter(|m| !m.trim().is_empty()) {
        lines.push("Markdown (first lines):".into());
        lines.extend(
            markdown
                .trim()
                .lines()
                .take(MARKDOWN_PREVIEW_LINES)
                .map(|line| format!("  {line}")),
        );
    }

    lines.join("\n")
}

/// Render entries as a markdown transcript, one `# title` section per entry.
pub fn entries_to_markdown(entries: &[LifelogEntry]) -> String {
    let mut out = String::new();

    for entry in entries {
        let title = if entry.title.is_empty() {
            "Untitled Session"
        } else {
            entry.title.as_str()
        };
        out.push_str(&format!("# {title}\n\n"));

        for block in &entry.contents {
            let Some(content) = block.get("content").and_then(content_text) else {
                continue;
            };

            let speaker = block
                .get("speakerName")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(|s| format!("**{s}**: "))
                .unwrap_or_default();

            let line = match block.get("type").and_then(Value::as_str) {
                Some("heading1") => format!("## {content}"),
                Some("heading2") => format!("### {content}"),
                Some("blockquote") => format!("- {speaker}{content}"),
                _ => format!("{speaker}{content}"),
            };
            out.push_str(&line);
            out.push_str("\n\n");
        }

        out.push_str("---\n\n");
    }

    out
}

/// Text of a block's `content`, or `None` for empty, null, zero or `false`.
fn content_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

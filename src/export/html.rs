//! Standalone HTML document generation
//!
//! The exported page carries its own stylesheet and follows the reader's
//! light/dark preference through `prefers-color-scheme`, so it looks right
//! regardless of the editor theme it was exported from.

use crate::markdown::render_html;

/// Title used when the document has no heading.
const DEFAULT_TITLE: &str = "Untitled";

/// Wrap the rendered Markdown in a complete HTML page.
pub fn generate_html_document(markdown: &str, title: Option<&str>) -> String {
    let title = title
        .map(str::to_string)
        .or_else(|| document_title(markdown))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Marknote">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
</body>
</html>"#,
        title = html_escape(&title),
        css = DOCUMENT_CSS,
        body = render_html(markdown),
    )
}

/// Text of the first ATX heading, if any.
pub fn document_title(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .map(str::trim_start)
        .find(|line| line.starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim().to_string())
        .filter(|title| !title.is_empty())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const DOCUMENT_CSS: &str = r#"
:root {
    color-scheme: light dark;
    --text: #24292f;
    --bg: #ffffff;
    --muted: #57606a;
    --border: #d0d7de;
    --code-bg: #f6f8fa;
    --link: #0969da;
}

@media (prefers-color-scheme: dark) {
    :root {
        --text: #c9d1d9;
        --bg: #0d1117;
        --muted: #8b949e;
        --border: #30363d;
        --code-bg: #161b22;
        --link: #58a6ff;
    }
}

body {
    margin: 0;
    background: var(--bg);
    color: var(--text);
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}

.markdown-body {
    max-width: 860px;
    margin: 0 auto;
    padding: 32px 24px;
}

.markdown-body h1, .markdown-body h2 {
    border-bottom: 1px solid var(--border);
    padding-bottom: 0.3em;
}

.markdown-body a { color: var(--link); }

.markdown-body blockquote {
    margin: 0 0 16px 0;
    padding: 0 1em;
    color: var(--muted);
    border-left: 4px solid var(--border);
}

.markdown-body code {
    font-family: 'JetBrains Mono', 'Fira Code', Consolas, monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
    background: var(--code-bg);
}

.markdown-body pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
    background: var(--code-bg);
}

.markdown-body pre code { padding: 0; background: transparent; }

.markdown-body table { border-collapse: collapse; margin-bottom: 16px; }

.markdown-body th, .markdown-body td {
    padding: 6px 12px;
    border: 1px solid var(--border);
}

.markdown-body img { max-width: 100%; }

.markdown-body hr { border: none; height: 1px; background: var(--border); }
"#;

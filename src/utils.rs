use std::path::PathBuf;

/// Configuration required to run the export process.
/// This decouples the logic from how the arguments were parsed (CLI/env/config file).
#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub db_path: PathBuf,
    pub target_dir: PathBuf,
    pub table_prefix: String,
}

/// Escape the characters HTML treats specially: `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make a title safe for an unquoted `title:` front-matter line.
/// Colons are percent-encoded after escaping.
pub fn sanitize_title(title: &str) -> String {
    escape_html(title).replace(':', "%3A")
}

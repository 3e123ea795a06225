//! Markdown rendering utilities.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

/// Render Markdown to an HTML fragment.
pub fn render_markdown(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Render source code as a fenced, language-tagged block.
///
/// Used for every non-Markdown file so code gets the same article styling
/// and syntax-highlighting hooks Markdown code blocks get.
pub fn render_source_as_markdown(source: &str, language: &str) -> String {
    let fenced = format!("~~~~~~~~~~~~{language}\n{source}\n~~~~~~~~~~~~");
    render_markdown(&fenced)
}

/// Syntax highlighting language for a file path, by extension.
pub fn language_for_path(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext.to_lowercase().as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" | "jsx" | "mjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "sh" | "bash" | "zsh" => "bash",
        "yml" | "yaml" => "yaml",
        "json" => "json",
        "xml" => "xml",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" | "sass" => "scss",
        "sql" => "sql",
        "md" | "markdown" => "markdown",
        "toml" => "toml",
        _ => "plaintext",
    }
}

/// Pull a page title out of Markdown source.
///
/// A `title:` entry in a leading front-matter block wins; otherwise the
/// text of the first level-one heading.
pub fn extract_title(source: &str) -> Option<String> {
    if let Some(title) = front_matter_title(source) {
        return Some(title);
    }
    first_heading_text(source)
}

fn front_matter_title(source: &str) -> Option<String> {
    let rest = source.strip_prefix("---")?;
    let (block, _) = rest.split_once("\n---")?;
    for line in block.lines() {
        if let Some(value) = line.strip_prefix("title:") {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_owned());
            }
        }
    }
    None
}

fn first_heading_text(source: &str) -> Option<String> {
    let parser = Parser::new(source);
    let mut inside_heading = false;
    let mut title = String::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => inside_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                if inside_heading {
                    let trimmed = title.trim();
                    if trimmed.is_empty() {
                        return None;
                    }
                    return Some(trimmed.to_owned());
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if inside_heading {
                    title.push_str(&text);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown() {
        let md = "# Hello\n\nThis is **bold** and a task:\n\n- [x] done";
        let html = render_markdown(md);
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_render_source_as_markdown() {
        let html = render_source_as_markdown("fn main() {}", "rust");
        assert!(html.contains("language-rust"));
        assert!(html.contains("fn main()"));
    }

    #[test]
    fn test_language_for_path() {
        assert_eq!(language_for_path("src/main.rs"), "rust");
        assert_eq!(language_for_path("app.TS"), "typescript");
        assert_eq!(language_for_path("unknown.xyz"), "plaintext");
    }

    #[test]
    fn test_extract_title_prefers_front_matter() {
        let source = "---\ntitle: \"From Front Matter\"\ndate: 2021-05-01\n---\n\n# Heading";
        assert_eq!(extract_title(source).as_deref(), Some("From Front Matter"));
    }

    #[test]
    fn test_extract_title_falls_back_to_heading() {
        let source = "Intro text.\n\n# The *Actual* Title\n\nBody.";
        assert_eq!(extract_title(source).as_deref(), Some("The Actual Title"));
    }

    #[test]
    fn test_extract_title_none_without_headings() {
        assert_eq!(extract_title("plain paragraph"), None);
    }
}

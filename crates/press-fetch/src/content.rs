//! Closed content classifications returned to handlers.

use bytes::Bytes;

/// Fetched file content, already classified.
///
/// Handlers branch on this closed set instead of sniffing shapes: textual
/// paths decode to `Text` (lossily, upstream occasionally mislabels
/// encodings), everything else stays `Binary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Renderable text.
    Text(String),
    /// Raw bytes passed through with their content type.
    Binary(Bytes),
}

impl Content {
    /// Classifies `bytes` according to the caller's path-based judgement.
    pub fn classify(bytes: Bytes, is_text: bool) -> Self {
        if is_text {
            Content::Text(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            Content::Binary(bytes)
        }
    }

    /// The text content, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Binary(_) => None,
        }
    }
}

/// A flat listing of every file path in a repo tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    files: Vec<String>,
}

impl FileListing {
    /// Wraps repo-relative file paths (no leading slash).
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    /// All file paths in the tree.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Direct entries under `prefix`: file paths as-is, directories as the
    /// prefix plus the next segment with a trailing `/`, deduplicated, in
    /// listing order. `prefix` is either empty or ends with `/`.
    pub fn entries_under(&self, prefix: &str) -> Vec<String> {
        let mut entries: Vec<String> = Vec::new();

        for file in &self.files {
            let Some(rest) = file.strip_prefix(prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let entry = match rest.split_once('/') {
                Some((dir, _)) => format!("{prefix}{dir}/"),
                None => file.clone(),
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_text() {
        let content = Content::classify(Bytes::from_static(b"# hi"), true);
        assert_eq!(content.as_text(), Some("# hi"));
    }

    #[test]
    fn test_classify_binary() {
        let content = Content::classify(Bytes::from_static(&[0, 159, 146]), false);
        assert_eq!(content.as_text(), None);
    }

    #[test]
    fn test_entries_under_root() {
        let listing = FileListing::new(vec![
            "README.md".to_owned(),
            "docs/api.md".to_owned(),
            "docs/guide/intro.md".to_owned(),
            "src/lib.rs".to_owned(),
        ]);
        assert_eq!(
            listing.entries_under(""),
            vec!["README.md", "docs/", "src/"]
        );
    }

    #[test]
    fn test_entries_under_prefix() {
        let listing = FileListing::new(vec![
            "docs/api.md".to_owned(),
            "docs/guide/intro.md".to_owned(),
            "docs/guide/setup.md".to_owned(),
            "src/lib.rs".to_owned(),
        ]);
        assert_eq!(
            listing.entries_under("docs/"),
            vec!["docs/api.md", "docs/guide/"]
        );
    }

    #[test]
    fn test_entries_under_missing_prefix() {
        let listing = FileListing::new(vec!["src/lib.rs".to_owned()]);
        assert!(listing.entries_under("missing/").is_empty());
    }
}

//! MIME classification for fetched file paths.

/// Best-effort MIME type for a path.
///
/// `mime_guess` covers the common cases; TypeScript and Swift get explicit
/// types it does not know about.
pub fn mime_for_path(path: &str) -> Option<String> {
    if path.ends_with(".ts") {
        return Some("application/typescript".to_owned());
    }
    if path.ends_with(".swift") {
        return Some("text/swift".to_owned());
    }

    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_owned())
}

/// Whether a path's content should be treated as renderable text.
pub fn path_is_text(path: &str) -> bool {
    let Some(mime) = mime_for_path(path) else {
        return false;
    };

    mime.starts_with("text/")
        || mime == "application/json"
        || mime == "application/javascript"
        || mime == "application/typescript"
        || mime.ends_with("+json")
        || mime.ends_with("+xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_overrides() {
        assert_eq!(
            mime_for_path("src/index.ts").as_deref(),
            Some("application/typescript")
        );
        assert_eq!(mime_for_path("App.swift").as_deref(), Some("text/swift"));
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for_path("readme.md").as_deref(), Some("text/markdown"));
        assert_eq!(mime_for_path("logo.png").as_deref(), Some("image/png"));
    }

    #[test]
    fn test_path_is_text() {
        assert!(path_is_text("readme.md"));
        assert!(path_is_text("package.json"));
        assert!(path_is_text("icon.svg"));
        assert!(path_is_text("src/index.ts"));
        assert!(!path_is_text("logo.png"));
        assert!(!path_is_text("no-extension"));
    }
}

//! Breadcrumb navigation trails.

/// Renders a `<nav>` trail where each path component links to its prefix
/// under `prefix`.
pub fn breadcrumbs(prefix: &str, path: &str) -> String {
    let mut html = String::from("<nav><ul>");
    let mut so_far = String::new();

    for component in path.split('/').filter(|c| !c.is_empty()) {
        if !so_far.is_empty() {
            so_far.push('/');
        }
        so_far.push_str(component);
        html.push_str(&format!(
            r#"<li><a href="{prefix}/{so_far}"><code>{component}</code></a>"#
        ));
    }

    html.push_str("</ul></nav>");
    html
}

/// Breadcrumbs for a versioned repo view: a bold `owner/repo` root link,
/// then one link per path component.
pub fn repo_breadcrumbs(owner: &str, repo: &str, sha: &str, path: &str) -> String {
    let root = format!("/github/{owner}/{repo}@{sha}");
    let mut html = format!(
        r#"<nav><ul><li><a href="{root}/" style="font-weight: bold"><code>{owner}/{repo}</code></a>"#
    );

    let mut so_far = String::new();
    for component in path.split('/').filter(|c| !c.is_empty()) {
        if !so_far.is_empty() {
            so_far.push('/');
        }
        so_far.push_str(component);
        html.push_str(&format!(
            r#"<li><a href="{root}/{so_far}"><code>{component}</code></a>"#
        ));
    }

    html.push_str("</ul></nav>");
    html
}

//! The derived "site" view of a repository.
//!
//! A repo becomes a small website: `README.md` is the home page, any
//! `{path}.md` or `{path}/README.md` is an article, and a directory
//! without either becomes an index of the articles inside it. All relative
//! links are rebased under `/github-site/{owner}/{repo}/`.

use axum::response::Response;
use once_cell::sync::Lazy;
use press_fetch::FileListing;
use press_render::{extract_title, render_markdown, rewrite_relative_links, styled_page};
use regex::Regex;

use crate::error::ServerError;
use crate::handlers::head_sha;
use crate::respond;
use crate::service::AppState;

static PRIMARY_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<h1>(.*?)</h1>").expect("valid literal pattern"));

/// Serves one site page.
pub async fn serve(
    state: &AppState,
    owner: &str,
    repo: &str,
    path: &str,
    limit: usize,
) -> Result<Response, ServerError> {
    let head = head_sha(state, owner, repo).await?;
    let sha = head.sha.as_str();
    let base = format!("/github-site/{owner}/{repo}/");

    let listing = state
        .client
        .list_repo_files(owner, repo, sha)
        .await
        .unwrap_or_default();

    let header_html = header_html(state, owner, repo, sha, &base, &listing).await;
    let main_html = main_html(state, owner, repo, sha, path, &base, &listing, limit).await?;

    state.assets.ensure_loaded(&state.client).await;
    let html = styled_page(
        &state.assets.stylesheet_hrefs(),
        &[
            "<header role=banner>".to_owned(),
            header_html,
            "</header>".to_owned(),
            "<main>".to_owned(),
            main_html,
            "</main>".to_owned(),
        ],
    );
    Ok(respond::html(html))
}

/// The banner: the repo's `_header.md` when it has one, otherwise a nav
/// built from the top-level directories.
async fn header_html(
    state: &AppState,
    owner: &str,
    repo: &str,
    sha: &str,
    base: &str,
    listing: &FileListing,
) -> String {
    let inner = match state
        .client
        .fetch_repo_file(owner, repo, sha, "_header.md")
        .await
    {
        Ok(file) => {
            let html = render_markdown(&String::from_utf8_lossy(&file.bytes));
            rewrite_relative_links(&html, base)
        }
        Err(_) => {
            let nav_source: String = listing
                .entries_under("")
                .into_iter()
                .filter(|entry| entry.ends_with('/'))
                .map(|dir| {
                    let name = dir.trim_end_matches('/');
                    format!("- [{name}]({base}{name})\n")
                })
                .collect();
            render_markdown(&nav_source)
        }
    };
    format!("<nav>{inner}</nav>")
}

#[allow(clippy::too_many_arguments)]
async fn main_html(
    state: &AppState,
    owner: &str,
    repo: &str,
    sha: &str,
    path: &str,
    base: &str,
    listing: &FileListing,
    limit: usize,
) -> Result<String, ServerError> {
    if path.is_empty() {
        return Ok(match fetch_text(state, owner, repo, sha, "README.md").await {
            Some(markdown) => {
                let html = rewrite_relative_links(&render_markdown(&markdown), base);
                format!("<article>{html}</article>")
            }
            None => "Add a `README.md` file to your repo to create a home page.".to_owned(),
        });
    }

    // An article: "{path}/README.md" first, then "{path}.md".
    let article = match fetch_text(state, owner, repo, sha, &format!("{path}/README.md")).await {
        Some(markdown) => Some(markdown),
        None => fetch_text(state, owner, repo, sha, &format!("{path}.md")).await,
    };
    if let Some(markdown) = article {
        let html = rewrite_relative_links(&render_markdown(&markdown), base);
        return Ok(primary_article(&html, &format!("{base}{path}")));
    }

    // Neither exists: index the directory's articles.
    let prefix = format!("{path}/");
    let mut entries = listing.entries_under(&prefix);
    if entries.is_empty() {
        return Ok(format!("Not found. path: {path} repo: {owner}/{repo}@{sha}"));
    }
    // Date-prefixed filenames list newest first.
    entries.reverse();
    entries.truncate(limit);

    let mut items = Vec::new();
    for entry in entries {
        if let Some(dir) = entry.strip_suffix('/') {
            let name = dir.strip_prefix(&prefix).unwrap_or(dir);
            items.push(format!("<li><a href=\"{base}{dir}\">{name}</a>"));
        } else {
            let name = entry.strip_prefix(&prefix).unwrap_or(&entry);
            let slug = format!("{path}/{}", name.trim_end_matches(".md"));
            let title = fetch_text(state, owner, repo, sha, &entry)
                .await
                .and_then(|markdown| extract_title(&markdown))
                .unwrap_or_else(|| name.to_owned());
            items.push(format!("<li><a href=\"{base}{slug}\">{title}</a>"));
        }
    }

    Ok(format!(
        "<h1>Articles</h1>\n<nav><ul>{}</ul></nav>",
        items.join("\n")
    ))
}

async fn fetch_text(
    state: &AppState,
    owner: &str,
    repo: &str,
    sha: &str,
    path: &str,
) -> Option<String> {
    state
        .client
        .fetch_repo_file(owner, repo, sha, path)
        .await
        .ok()
        .map(|file| String::from_utf8_lossy(&file.bytes).into_owned())
}

/// Turns the article's first `<h1>` into a link to its own page.
fn primary_article(html: &str, href: &str) -> String {
    let linked = PRIMARY_HEADING.replacen(html, 1, format!(r#"<h1><a href="{href}">$1</a></h1>"#));
    format!("<article>{linked}</article>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_article_links_first_heading() {
        let html = "<h1>Title</h1><p>body</p><h1>Second</h1>";
        let article = primary_article(html, "/github-site/a/b/post");
        assert!(article.contains(r#"<h1><a href="/github-site/a/b/post">Title</a></h1>"#));
        // Only the first heading is linked.
        assert!(article.contains("<h1>Second</h1>"));
    }
}

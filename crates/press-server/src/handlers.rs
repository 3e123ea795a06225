//! One handler per matched endpoint.
//!
//! Handlers run after dispatch, do the upstream I/O, and build responses.
//! They receive the parsed query parameters and the request headers; the
//! router itself never sees either.

use std::collections::HashMap;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use press_fetch::Content;
use press_git::{decode_refs, find_branch, find_head, HeadRef, RefRecord};
use press_render::{
    language_for_path, mime_for_path, path_is_text, render_markdown, render_source_as_markdown,
    repo_breadcrumbs, styled_page,
};
use serde_json::json;

use crate::endpoint::{Endpoint, RepoFile, S3Key, Source};
use crate::error::ServerError;
use crate::respond;
use crate::service::AppState;
use crate::site;

/// Query parameters, already parsed by the HTTP layer.
pub type Params = HashMap<String, String>;

/// The file the health check renders, pinned so the response is stable.
const HEALTH_FILE: (&str, &str, &str, &str) = (
    "collectedpress",
    "press",
    "6d4c5f2a9f3b1e8d7c6b5a4938271605f4e3d2c1",
    "README.md",
);

/// Executes a matched endpoint.
pub async fn handle(
    state: &AppState,
    endpoint: Endpoint,
    params: &Params,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    match endpoint {
        Endpoint::Health => health(state, params).await,
        Endpoint::Home => home(state).await,
        Endpoint::Doc { name } => doc(state, &name).await,
        Endpoint::Site { owner, repo, path } => {
            let limit = params
                .get("limit")
                .and_then(|value| value.parse().ok())
                .unwrap_or(100);
            site::serve(state, &owner, &repo, &path, limit).await
        }
        Endpoint::GistFile {
            owner,
            gist_id,
            path,
        } => gist_file(state, params, &owner, &gist_id, &path).await,
        Endpoint::Gist { owner, gist_id } => gist_file(state, params, &owner, &gist_id, "").await,
        Endpoint::RenderRepoFile(file) => render_repo_file(state, params, &file).await,
        Endpoint::RepoAbout { owner, repo } => repo_about(state, &owner, &repo).await,
        Endpoint::View(source) => view(state, params, headers, source).await,
        Endpoint::RepoRedirect { owner, repo, path } => {
            repo_redirect(state, &owner, &repo, &path).await
        }
        Endpoint::RepoRefs { owner, repo } => {
            let records = decoded_refs(state, &owner, &repo).await?;
            Ok(respond::json(&records, StatusCode::OK))
        }
        Endpoint::RepoHeadRef { owner, repo } => {
            let records = decoded_refs(state, &owner, &repo).await?;
            match find_head(&records) {
                Some(head) => Ok(respond::json(&head, StatusCode::OK)),
                None => Ok(respond::json(&json!({ "error": true }), StatusCode::NOT_FOUND)),
            }
        }
        Endpoint::RepoBranchRef {
            owner,
            repo,
            branch,
        } => {
            let records = decoded_refs(state, &owner, &repo).await?;
            match find_branch(&records, &branch) {
                Some(found) => Ok(respond::json(&found, StatusCode::OK)),
                None => Ok(respond::json(&json!({ "error": true }), StatusCode::NOT_FOUND)),
            }
        }
        Endpoint::RepoTagRefs { owner, repo } => {
            let records = decoded_refs(state, &owner, &repo).await?;
            let tags: Vec<&RefRecord> = records.iter().filter(|record| record.is_tag()).collect();
            Ok(respond::json(&tags, StatusCode::OK))
        }
        Endpoint::ListFiles {
            owner,
            repo,
            sha,
            path,
        } => {
            let listing = state.client.list_repo_files(&owner, &repo, &sha).await?;
            Ok(respond::json(&listing.entries_under(&path), StatusCode::OK))
        }
        Endpoint::S3Object(key) => s3_object(state, params, &key).await,
        Endpoint::S3Highlight(key) => s3_highlight(state, params, &key).await,
        Endpoint::Analytics => Ok(respond::json(&state.views.snapshot(), StatusCode::OK)),
        Endpoint::Favicon => Ok(respond::plain("", StatusCode::NO_CONTENT)),
        Endpoint::Asset { name } => asset(state, &name),
    }
}

/// Resolves a repo's HEAD via a fresh ref advertisement.
pub(crate) async fn head_sha(
    state: &AppState,
    owner: &str,
    repo: &str,
) -> Result<HeadRef, ServerError> {
    let records = decoded_refs(state, owner, repo).await?;
    find_head(&records)
        .ok_or_else(|| ServerError::NotFound(format!("no HEAD ref for {owner}/{repo}")))
}

async fn decoded_refs(
    state: &AppState,
    owner: &str,
    repo: &str,
) -> Result<Vec<RefRecord>, ServerError> {
    let bytes = state.client.fetch_repo_refs(owner, repo).await?;
    let records = decode_refs(&bytes).collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Renders file text as Markdown, code-fencing anything that is not
/// already Markdown.
pub(crate) fn render_file_markdown(source: &str, path: &str) -> String {
    let fence = match path.rsplit_once('.') {
        Some((stem, extension)) => {
            !stem.is_empty()
                && !extension.is_empty()
                && extension != "md"
                && mime_for_path(path).as_deref() != Some("text/markdown")
        }
        None => false,
    };

    if fence {
        render_source_as_markdown(source, language_for_path(path))
    } else {
        render_markdown(source)
    }
}

/// Wraps a fragment in the styled page shell as a single article.
pub(crate) async fn themed_article(state: &AppState, fragment: &str) -> String {
    state.assets.ensure_loaded(&state.client).await;
    styled_page(
        &state.assets.stylesheet_hrefs(),
        &["<article>", fragment, "</article>"],
    )
}

fn wants_theme(params: &Params) -> bool {
    params.contains_key("theme")
}

async fn health(state: &AppState, params: &Params) -> Result<Response, ServerError> {
    let (owner, repo, sha, path) = HEALTH_FILE;
    let file = state.client.fetch_repo_file(owner, repo, sha, path).await?;
    let text = String::from_utf8_lossy(&file.bytes);
    let html = render_file_markdown(&text, path);
    if wants_theme(params) {
        return Ok(respond::html(themed_article(state, &html).await));
    }
    Ok(respond::html(html))
}

async fn home(state: &AppState) -> Result<Response, ServerError> {
    let owner = state.config.home_owner.clone();
    let repo = state.config.home_repo.clone();
    let head = head_sha(state, &owner, &repo).await?;
    let file = state
        .client
        .fetch_repo_file(&owner, &repo, &head.sha, "README.md")
        .await?;
    let html = render_markdown(&String::from_utf8_lossy(&file.bytes));
    Ok(respond::html(themed_article(state, &html).await))
}

async fn doc(state: &AppState, name: &str) -> Result<Response, ServerError> {
    let owner = state.config.home_owner.clone();
    let repo = state.config.home_repo.clone();
    let Ok(head) = head_sha(state, &owner, &repo).await else {
        return Ok(respond::html_with_status(
            "<p>No content</p>".to_owned(),
            StatusCode::NOT_FOUND,
        ));
    };

    let path = format!("docs/{name}.md");
    let file = state
        .client
        .fetch_repo_file(&owner, &repo, &head.sha, &path)
        .await?;
    let html = render_file_markdown(&String::from_utf8_lossy(&file.bytes), &path);
    Ok(respond::html(themed_article(state, &html).await))
}

async fn gist_file(
    state: &AppState,
    params: &Params,
    owner: &str,
    gist_id: &str,
    path: &str,
) -> Result<Response, ServerError> {
    let source = state.client.fetch_gist_file(owner, gist_id, path).await?;
    let html = render_file_markdown(&source, path);
    if wants_theme(params) {
        return Ok(respond::html(themed_article(state, &html).await));
    }
    Ok(respond::html(html))
}

async fn render_repo_file(
    state: &AppState,
    params: &Params,
    file: &RepoFile,
) -> Result<Response, ServerError> {
    let fetched = state
        .client
        .fetch_repo_file(&file.owner, &file.repo, &file.sha, &file.path)
        .await?;
    let text = String::from_utf8_lossy(&fetched.bytes);
    let html = render_file_markdown(&text, &file.path);
    if wants_theme(params) {
        return Ok(respond::html(themed_article(state, &html).await));
    }
    Ok(respond::html(html))
}

async fn repo_about(state: &AppState, owner: &str, repo: &str) -> Result<Response, ServerError> {
    let records = decoded_refs(state, owner, repo).await?;
    let head = find_head(&records);
    let tags: Vec<&RefRecord> = records
        .iter()
        .filter(|record| record.is_tag() && !record.ref_name.ends_with("^{}"))
        .collect();

    let mut sections = vec![
        "<article>".to_owned(),
        format!("<h1>{owner} / {repo}</h1>"),
        "<h2>Refs</h2>".to_owned(),
        "<ul>".to_owned(),
    ];
    if let Some(head) = &head {
        sections.push(format!(
            r#"<li>{}: <a href="/github/{owner}/{repo}@{}/">{}</a>"#,
            head.head_ref, head.sha, head.sha
        ));
    }
    for tag in tags {
        sections.push(format!(
            r#"<li>{}: <a href="/github/{owner}/{repo}@{}/">{}</a>"#,
            tag.ref_name, tag.oid, tag.oid
        ));
    }
    sections.push("</ul>".to_owned());
    sections.push("</article>".to_owned());

    state.assets.ensure_loaded(&state.client).await;
    let html = styled_page(&state.assets.stylesheet_hrefs(), &sections);
    Ok(respond::html(html))
}

async fn view(
    state: &AppState,
    params: &Params,
    headers: &HeaderMap,
    source: Source,
) -> Result<Response, ServerError> {
    match source {
        Source::RepoFile(file) => view_repo_file(state, headers, &file).await,
        Source::RepoListing {
            owner,
            repo,
            sha,
            path,
        } => view_repo_listing(state, params, &owner, &repo, &sha, &path).await,
        Source::GistFile {
            owner,
            gist_id,
            path,
        } => {
            let source = state.client.fetch_gist_file(&owner, &gist_id, &path).await?;
            let html = render_file_markdown(&source, &path);
            Ok(respond::html(themed_article(state, &html).await))
        }
    }
}

async fn view_repo_file(
    state: &AppState,
    headers: &HeaderMap,
    file: &RepoFile,
) -> Result<Response, ServerError> {
    let fetched = state
        .client
        .fetch_repo_file(&file.owner, &file.repo, &file.sha, &file.path)
        .await?;
    let mime = mime_for_path(&file.path);

    // <img src="…"> requests want the actual image, not a page about it.
    let accepts_image = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("image/"));
    if accepts_image {
        if let Some(mime) = mime.as_deref().filter(|mime| mime.starts_with("image/")) {
            return Ok(respond::bytes(mime, fetched.bytes));
        }
    }

    match Content::classify(fetched.bytes, path_is_text(&file.path)) {
        Content::Text(text) => {
            let breadcrumbs = repo_breadcrumbs(&file.owner, &file.repo, &file.sha, &file.path);
            let article = render_file_markdown(&text, &file.path);
            state.assets.ensure_loaded(&state.client).await;
            let html = styled_page(
                &state.assets.stylesheet_hrefs(),
                &[
                    breadcrumbs.as_str(),
                    "<article>",
                    article.as_str(),
                    "</article>",
                ],
            );
            Ok(respond::html(html))
        }
        Content::Binary(bytes) => {
            let content_type = fetched
                .content_type
                .or(mime)
                .unwrap_or_else(|| "application/octet-stream".to_owned());
            Ok(respond::bytes(&content_type, bytes))
        }
    }
}

async fn view_repo_listing(
    state: &AppState,
    params: &Params,
    owner: &str,
    repo: &str,
    sha: &str,
    path: &str,
) -> Result<Response, ServerError> {
    let listing = state.client.list_repo_files(owner, repo, sha).await?;
    let show_images = params.contains_key("images");

    let mut items = Vec::new();
    for entry in listing.entries_under(path) {
        let href = format!("/github/{owner}/{repo}@{sha}/{entry}");
        let label = entry.strip_prefix(path).unwrap_or(&entry);
        if show_images && entry.ends_with(".svg") {
            let image_url = format!("https://cdn.jsdelivr.net/gh/{owner}/{repo}@{sha}/{entry}");
            items.push(format!(
                r#"<li><a href="{href}"><img width="20" loading=lazy src="{image_url}"> {label}</a>"#
            ));
        } else {
            items.push(format!(r#"<li><a href="{href}">{label}</a>"#));
        }
    }

    let images_checked = if show_images { "checked" } else { "" };
    let form = format!(
        "<form method=GET>\n\
         <div><input type=checkbox name=images id=images-checkbox {images_checked}> \
         <label for=images-checkbox>Images</label></div>\n\
         <button type=submit>Update</button>\n\
         </form>"
    );

    let mut sections = vec![
        repo_breadcrumbs(owner, repo, sha, path),
        "<article><ul>".to_owned(),
    ];
    sections.extend(items);
    sections.push("</ul></article>".to_owned());
    sections.push(form);

    state.assets.ensure_loaded(&state.client).await;
    let html = styled_page(&state.assets.stylesheet_hrefs(), &sections);
    Ok(respond::html(html))
}

async fn repo_redirect(
    state: &AppState,
    owner: &str,
    repo: &str,
    path: &str,
) -> Result<Response, ServerError> {
    match head_sha(state, owner, repo).await {
        Ok(head) => Ok(respond::redirect(&format!(
            "/github/{owner}/{repo}@{}/{path}",
            head.sha
        ))),
        Err(ServerError::NotFound(_)) => {
            Ok(respond::plain("No HEAD ref found.", StatusCode::NOT_FOUND))
        }
        Err(error) => Err(error),
    }
}

async fn s3_object(state: &AppState, params: &Params, key: &S3Key) -> Result<Response, ServerError> {
    let mime = key.mime();
    let bytes = state
        .client
        .fetch_s3_object(&key.region, &key.bucket, &mime, &key.sha256)
        .await?;

    if mime == "text/markdown" {
        let html = render_markdown(&String::from_utf8_lossy(&bytes));
        if wants_theme(params) {
            return Ok(respond::html(themed_article(state, &html).await));
        }
        return Ok(respond::html(html));
    }

    Ok(respond::bytes(&mime, bytes))
}

async fn s3_highlight(
    state: &AppState,
    params: &Params,
    key: &S3Key,
) -> Result<Response, ServerError> {
    let bytes = state
        .client
        .fetch_s3_object(&key.region, &key.bucket, &key.mime(), &key.sha256)
        .await?;
    let source = String::from_utf8_lossy(&bytes);
    let html = render_source_as_markdown(&source, &key.media_subtype);

    if params.get("theme").map(String::as_str) == Some("1") {
        state.assets.ensure_loaded(&state.client).await;
        let html = styled_page(&state.assets.stylesheet_hrefs(), &[html.as_str()]);
        return Ok(respond::html(html));
    }
    Ok(respond::html(html))
}

fn asset(state: &AppState, name: &str) -> Result<Response, ServerError> {
    match state.assets.get(name) {
        Some(asset) => Ok(respond::css_cached(asset.source.clone())),
        None => Ok(respond::plain("Asset not found.", StatusCode::NOT_FOUND)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_file_markdown_fences_code() {
        let html = render_file_markdown("fn main() {}", "src/main.rs");
        assert!(html.contains("language-rust"));
    }

    #[test]
    fn test_render_file_markdown_renders_markdown_directly() {
        let html = render_file_markdown("# Title", "README.md");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(!html.contains("language-"));
    }

    #[test]
    fn test_render_file_markdown_without_extension() {
        let html = render_file_markdown("# Notes", "");
        assert!(html.contains("<h1>Notes</h1>"));
    }
}

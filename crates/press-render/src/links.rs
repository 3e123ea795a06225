//! Anchor rewriting for site views.
//!
//! Rendered site pages come from repos whose Markdown links are written
//! relative to the repo root. When the site is served under a base path
//! (`/github-site/{owner}/{repo}/`), every relative href has to move under
//! that base.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static HREF: Lazy<Regex> = Lazy::new(|| {
    // href="..." attributes inside anchor tags; double quotes only, which
    // is what our own renderer emits.
    Regex::new(r#"(?i)(<a\b[^>]*?\bhref=")([^"]*)(")"#).expect("valid literal pattern")
});

/// Rewrites relative anchor hrefs in `html` to live under `base`.
///
/// Absolute URLs (with a scheme or protocol-relative), fragments, and
/// hrefs already under the base are left alone. `base` must end with `/`.
pub fn rewrite_relative_links(html: &str, base: &str) -> String {
    HREF.replace_all(html, |caps: &Captures<'_>| {
        let href = &caps[2];
        let rewritten = rewrite_href(href, base);
        format!("{}{}{}", &caps[1], rewritten, &caps[3])
    })
    .into_owned()
}

fn rewrite_href(href: &str, base: &str) -> String {
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("//")
        || has_scheme(href)
        || href.starts_with(base)
    {
        return href.to_owned();
    }

    if href == "/" {
        return base.to_owned();
    }

    let relative = href.trim_start_matches('/');
    format!("{base}{relative}")
}

fn has_scheme(href: &str) -> bool {
    href.split_once(':')
        .map(|(scheme, _)| {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        })
        .unwrap_or(false)
}

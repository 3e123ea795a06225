//! The fixed styled-page shell wrapped around rendered content.

const INLINE_STYLE: &str = r#"<style>
:root { --_color_: #0060F2; --shade-color: rgba(0,0,0,0.1); --block-margin-bottom: 1rem; }
body { max-width: 50rem; margin: auto; padding: 3rem 1rem; }
a { color: var(--_color_); }
a:hover { text-decoration: underline; }
p, ul, ol, pre, hr, blockquote, h1, h2, h3, h4, h5, h6 { margin-bottom: var(--block-margin-bottom); }
pre { white-space: pre-wrap; white-space: break-spaces; }
h1 { font-size: 2em; font-weight: 600; }
h2 { font-size: 1.5em; font-weight: 600; }
h3 { font-size: 1.25em; font-weight: 600; }
h4 { font-size: 1em; font-weight: 600; }
h5 { font-size: .875em; font-weight: 600; }
h6 { font-size: .85em; font-weight: 600; }
img { display: inline-block; }
article ul { list-style: inside; }
article ol { list-style: decimal inside; }
article ul ul, article ul ol, article ol ul, article ol ol { --block-margin-bottom: 0; padding-left: 2em; }
article pre { font-size: 90%; }
article code:not(pre *) { font-size: 90%; background-color: var(--shade-color); padding: .175em .375em; border-radius: 0.2em; }
nav ul { display: flex; flex-wrap: wrap; }
nav a { display: inline-block; padding: 0.5em; background: #f5f5f5; }
nav a { border: 1px solid #e5e5e5; }
nav li:not(:first-child) a { border-left: none; }
nav a:hover { background: #e9e9e9; border-color: #ddd; }
form { padding: 1rem; }
form[method="GET"] { display: flex; gap: 1rem; align-items: center; }
form button { padding: 0.25rem 0.75rem; background-color: #0060F224; color: black; border: 0.5px solid var(--_color_); border-radius: 999px; }
footer[role=contentinfo] { margin-top: 3rem; padding-top: 1rem; border-top: 0.25px solid currentColor; font-size: 0.75rem; }
</style>"#;

/// Assembles a full styled HTML page around body sections.
///
/// `stylesheet_hrefs` are the content-addressed asset URLs served by the
/// asset store; empty sections are dropped.
pub fn styled_page<S: AsRef<str>>(stylesheet_hrefs: &[String], sections: &[S]) -> String {
    let mut parts = vec![
        "<!doctype html>".to_owned(),
        "<html lang=en>".to_owned(),
        "<meta charset=utf-8>".to_owned(),
        r#"<meta name=viewport content="width=device-width, initial-scale=1.0">"#.to_owned(),
    ];
    for href in stylesheet_hrefs {
        parts.push(format!(r#"<link href="{href}" rel="stylesheet">"#));
    }
    parts.push(INLINE_STYLE.to_owned());
    parts.push("<body>".to_owned());
    parts.extend(
        sections
            .iter()
            .map(|section| section.as_ref())
            .filter(|section: &&str| !section.is_empty())
            .map(str::to_owned),
    );
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_page_wraps_sections() {
        let page = styled_page(
            &["/assets/base/abc.css".to_owned()],
            &["<article>", "<h1>Hi</h1>", "</article>"],
        );
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains(r#"<link href="/assets/base/abc.css" rel="stylesheet">"#));
        assert!(page.contains("<body>\n<article>\n<h1>Hi</h1>\n</article>"));
    }

    #[test]
    fn test_styled_page_drops_empty_sections() {
        let page = styled_page(&[], &["<main>x</main>", ""]);
        assert!(!page.ends_with('\n'));
        assert!(page.ends_with("<main>x</main>"));
    }
}

//! Rendering for Press: Markdown to HTML, source-code fencing, the styled
//! page shell, breadcrumb navigation, and link rewriting for site views.

mod links;
mod markdown;
mod media;
mod nav;
mod page;

pub use links::rewrite_relative_links;
pub use markdown::{
    extract_title, language_for_path, render_markdown, render_source_as_markdown,
};
pub use media::{mime_for_path, path_is_text};
pub use nav::{breadcrumbs, repo_breadcrumbs};
pub use page::styled_page;

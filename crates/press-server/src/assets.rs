//! Content-addressed stylesheet assets for the page shell.
//!
//! The two upstream stylesheets are fetched once, hashed, and served from
//! `/assets/{name}/{sha256}.css` with a long cache lifetime. Pages link
//! them by hash, so a new upstream version simply becomes a new URL.

use press_fetch::GitHubClient;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

/// The stylesheets every styled page links.
const STYLESHEETS: [(&str, &str); 2] = [
    (
        "tailwindcssbase",
        "https://cdn.jsdelivr.net/npm/tailwindcss@^2/dist/base.min.css",
    ),
    (
        "night-owl",
        "https://cdn.jsdelivr.net/npm/highlight.js@11.2.0/styles/night-owl.css",
    ),
];

/// One fetched stylesheet.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: &'static str,
    pub source: String,
    pub sha256: String,
}

impl Asset {
    /// The content-addressed URL pages link.
    pub fn href(&self) -> String {
        format!("/assets/{}/{}.css", self.name, self.sha256)
    }
}

/// Lazily-filled store of the shell stylesheets.
#[derive(Debug, Default)]
pub struct AssetStore {
    slots: [OnceCell<Asset>; STYLESHEETS.len()],
}

impl AssetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches any stylesheet not yet cached. A failed fetch leaves its
    /// slot empty and is retried on the next call; pages render without
    /// the missing link in the meantime.
    pub async fn ensure_loaded(&self, client: &GitHubClient) {
        for ((name, url), slot) in STYLESHEETS.into_iter().zip(&self.slots) {
            let loaded = slot
                .get_or_try_init(|| async {
                    let source = client.fetch_text_asset(url).await?;
                    let sha256 = hex::encode(Sha256::digest(source.as_bytes()));
                    Ok::<_, press_fetch::FetchError>(Asset {
                        name,
                        source,
                        sha256,
                    })
                })
                .await;
            if let Err(error) = loaded {
                tracing::warn!(asset = name, %error, "stylesheet fetch failed");
            }
        }
    }

    /// Hrefs of every loaded stylesheet, in shell order.
    pub fn stylesheet_hrefs(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter_map(OnceCell::get)
            .map(Asset::href)
            .collect()
    }

    /// Looks up a loaded asset by name.
    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.slots
            .iter()
            .filter_map(OnceCell::get)
            .find(|asset| asset.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_href_is_content_addressed() {
        let asset = Asset {
            name: "night-owl",
            source: "body{}".to_owned(),
            sha256: "ab12".to_owned(),
        };
        assert_eq!(asset.href(), "/assets/night-owl/ab12.css");
    }

    #[test]
    fn test_empty_store_has_no_hrefs() {
        let store = AssetStore::new();
        assert!(store.stylesheet_hrefs().is_empty());
        assert!(store.get("night-owl").is_none());
    }
}

//! The upstream HTTP client.

use bytes::Bytes;
use serde::Deserialize;

use crate::content::FileListing;
use crate::error::FetchError;
use crate::Result;

/// Base URLs of the consumed upstreams. Tests override them to point at a
/// local server; the defaults are the public endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Raw repo file content, `{base}/{owner}/{repo}/{sha}/{path}`.
    pub raw_content: String,
    /// jsdelivr data API, `{base}/v1/package/gh/{owner}/{repo}@{sha}/flat`.
    pub listing: String,
    /// Ref advertisements, `{base}/{owner}/{repo}.git/info/refs?…`.
    pub refs: String,
    /// Raw gist content, `{base}/{owner}/{gist_id}/raw/{path}`.
    pub gist: String,
    /// S3 object template with `{bucket}` and `{region}` placeholders.
    pub s3: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            raw_content: "https://raw.githubusercontent.com".to_owned(),
            listing: "https://data.jsdelivr.com".to_owned(),
            refs: "https://github.com".to_owned(),
            gist: "https://gist.githubusercontent.com".to_owned(),
            s3: "https://{bucket}.s3.{region}.amazonaws.com".to_owned(),
        }
    }
}

/// A fetched repo file: the body plus the content type to serve it under.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Client for every upstream the service reads.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubClient {
    /// Client against the public endpoints.
    pub fn new() -> Self {
        Self::with_endpoints(Endpoints::default())
    }

    /// Client against explicit endpoints.
    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints,
        }
    }

    fn repo_file_url(&self, owner: &str, repo: &str, sha: &str, path: &str) -> String {
        format!("{}/{owner}/{repo}/{sha}/{path}", self.endpoints.raw_content)
    }

    fn listing_url(&self, owner: &str, repo: &str, sha: &str) -> String {
        format!(
            "{}/v1/package/gh/{owner}/{repo}@{sha}/flat",
            self.endpoints.listing
        )
    }

    fn refs_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/{owner}/{repo}.git/info/refs?service=git-upload-pack",
            self.endpoints.refs
        )
    }

    fn gist_url(&self, owner: &str, gist_id: &str, path: &str) -> String {
        format!("{}/{owner}/{gist_id}/raw/{path}", self.endpoints.gist)
    }

    fn s3_url(&self, region: &str, bucket: &str, mime: &str, sha256: &str) -> String {
        let base = self
            .endpoints
            .s3
            .replace("{bucket}", bucket)
            .replace("{region}", region);
        format!("{base}/sha256/{mime}/{sha256}")
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!(%url, "fetching upstream");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(FetchError::UpstreamStatus {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Fetches one file of a repo at an exact commit.
    ///
    /// GitHub labels `.css` as `text/plain` and `.pdf` as
    /// `application/octet-stream`; both get corrected here so browsers
    /// treat them properly.
    pub async fn fetch_repo_file(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        path: &str,
    ) -> Result<FetchedFile> {
        let url = self.repo_file_url(owner, repo, sha, path);
        let response = self.get(&url).await?;

        let content_type = if path.ends_with(".css") {
            Some("text/css;charset=utf-8".to_owned())
        } else if path.ends_with(".pdf") {
            Some("application/pdf".to_owned())
        } else {
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };

        Ok(FetchedFile {
            bytes: response.bytes().await?,
            content_type,
        })
    }

    /// Lists every file path in a repo tree at an exact commit.
    pub async fn list_repo_files(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<FileListing> {
        #[derive(Deserialize)]
        struct FlatListing {
            files: Vec<FlatFile>,
        }
        #[derive(Deserialize)]
        struct FlatFile {
            name: String,
        }

        let url = self.listing_url(owner, repo, sha);
        let listing: FlatListing = self.get(&url).await?.json().await?;
        Ok(FileListing::new(
            listing
                .files
                .into_iter()
                .map(|file| file.name.trim_start_matches('/').to_owned())
                .collect(),
        ))
    }

    /// Fetches the raw ref advertisement bytes for a repo.
    ///
    /// The caller decodes them with `press_git::decode_refs`.
    pub async fn fetch_repo_refs(&self, owner: &str, repo: &str) -> Result<Bytes> {
        let url = self.refs_url(owner, repo);
        Ok(self.get(&url).await?.bytes().await?)
    }

    /// Fetches the latest content of a gist file. An empty `path` loads the
    /// gist's primary file.
    pub async fn fetch_gist_file(&self, owner: &str, gist_id: &str, path: &str) -> Result<String> {
        let url = self.gist_url(owner, gist_id, path);
        Ok(self.get(&url).await?.text().await?)
    }

    /// Fetches a content-addressed object from a public S3 bucket.
    pub async fn fetch_s3_object(
        &self,
        region: &str,
        bucket: &str,
        mime: &str,
        sha256: &str,
    ) -> Result<Bytes> {
        let url = self.s3_url(region, bucket, mime, sha256);
        Ok(self.get(&url).await?.bytes().await?)
    }

    /// Fetches an arbitrary asset URL as text (stylesheets for the page
    /// shell).
    pub async fn fetch_text_asset(&self, url: &str) -> Result<String> {
        Ok(self.get(url).await?.text().await?)
    }
}

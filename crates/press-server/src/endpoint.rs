//! The closed set of endpoints the route table can produce, and the route
//! table itself.
//!
//! Registration order is load-bearing: overlapping patterns (the `/github/…`
//! family in particular) resolve purely by position in this list.

use std::sync::Arc;

use press_route::{Bindings, Pattern, Route, RouteError, Router};

const OWNER: &str = r"(?i)[-_a-z\d]+";
const REPO: &str = r"(?i)[-_.a-z\d]+";
const COMMIT_SHA: &str = r"(?i)[a-f\d]{40}";
const SHA256: &str = r"(?i)[a-f\d]{64}";
const GIST_ID: &str = r"(?i)[a-z\d]+";

/// A repo file pinned to an exact commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    pub path: String,
}

impl RepoFile {
    fn from_bindings(bindings: &Bindings) -> Self {
        Self {
            owner: bound(bindings, "owner"),
            repo: bound(bindings, "repo"),
            sha: bound(bindings, "sha"),
            path: bound(bindings, "path"),
        }
    }
}

/// A content-addressed object in a public S3 bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Key {
    pub region: String,
    pub bucket: String,
    pub media_type: String,
    pub media_subtype: String,
    pub sha256: String,
}

impl S3Key {
    fn from_bindings(bindings: &Bindings) -> Self {
        Self {
            region: bound(bindings, "region"),
            bucket: bound(bindings, "bucket"),
            media_type: bound(bindings, "media_type"),
            media_subtype: bound(bindings, "media_subtype"),
            sha256: bound(bindings, "sha256"),
        }
    }

    /// The full MIME type, `type/subtype`.
    pub fn mime(&self) -> String {
        format!("{}/{}", self.media_type, self.media_subtype)
    }
}

/// What the styled view route is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// One file at an exact commit.
    RepoFile(RepoFile),
    /// A directory listing at an exact commit; `path` is empty or ends
    /// with `/`.
    RepoListing {
        owner: String,
        repo: String,
        sha: String,
        path: String,
    },
    /// One file of a gist.
    GistFile {
        owner: String,
        gist_id: String,
        path: String,
    },
}

/// Everything the router can dispatch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Home,
    Doc {
        name: String,
    },
    Site {
        owner: String,
        repo: String,
        path: String,
    },
    GistFile {
        owner: String,
        gist_id: String,
        path: String,
    },
    Gist {
        owner: String,
        gist_id: String,
    },
    RenderRepoFile(RepoFile),
    RepoAbout {
        owner: String,
        repo: String,
    },
    View(Source),
    RepoRedirect {
        owner: String,
        repo: String,
        path: String,
    },
    RepoRefs {
        owner: String,
        repo: String,
    },
    RepoHeadRef {
        owner: String,
        repo: String,
    },
    RepoBranchRef {
        owner: String,
        repo: String,
        branch: String,
    },
    RepoTagRefs {
        owner: String,
        repo: String,
    },
    ListFiles {
        owner: String,
        repo: String,
        sha: String,
        path: String,
    },
    S3Object(S3Key),
    S3Highlight(S3Key),
    Analytics,
    Favicon,
    Asset {
        name: String,
    },
}

fn bound(bindings: &Bindings, name: &str) -> String {
    bindings.get(name).unwrap_or_default().to_owned()
}

fn owner_repo(bindings: &Bindings) -> (String, String) {
    (bound(bindings, "owner"), bound(bindings, "repo"))
}

/// Builds the full route table, in priority order.
pub fn route_table() -> Result<Router<Endpoint>, RouteError> {
    // "{owner}/{repo}@{sha}/{path}" with a non-slash final character:
    // the shared shape of every versioned file URL.
    let repo_file_at_sha: Arc<Pattern<Endpoint>> = Arc::new(
        Pattern::build()
            .lit("/github/")
            .capture("owner", OWNER)
            .lit("/")
            .capture("repo", REPO)
            .lit("@")
            .capture("sha", COMMIT_SHA)
            .lit("/")
            .capture("path", r".*[^/]$")
            .finish()?,
    );

    let view_repo_file = Pattern::build()
        .fragment(&repo_file_at_sha)
        .produce(|bindings, _| Endpoint::View(Source::RepoFile(RepoFile::from_bindings(bindings))))?;

    let view_repo_listing = Pattern::build()
        .lit("/github/")
        .capture("owner", OWNER)
        .lit("/")
        .capture("repo", REPO)
        .lit("@")
        .capture("sha", COMMIT_SHA)
        .lit("/")
        .capture("path", r"(.+/)?$")
        .produce(|bindings, _| {
            let (owner, repo) = owner_repo(bindings);
            Endpoint::View(Source::RepoListing {
                owner,
                repo,
                sha: bound(bindings, "sha"),
                path: bound(bindings, "path"),
            })
        })?;

    let view_gist_file = Pattern::build()
        .lit("/1/github/gist/")
        .capture("owner", OWNER)
        .lit("/")
        .capture("gist_id", GIST_ID)
        .lit("/")
        .capture("path", r".+$")
        .produce(|bindings, _| {
            Endpoint::View(Source::GistFile {
                owner: bound(bindings, "owner"),
                gist_id: bound(bindings, "gist_id"),
                path: bound(bindings, "path"),
            })
        })?;

    let refs_prefix: Arc<Pattern<Endpoint>> = Arc::new(
        Pattern::build()
            .lit("/1/github/")
            .capture("owner", OWNER)
            .lit("/")
            .capture("repo", REPO)
            .lit("/refs")
            .finish()?,
    );

    let routes = vec![
        Route::new(
            "health",
            Pattern::build()
                .lit("/health")
                .end()
                .produce(|_, _| Endpoint::Health)?,
        )?,
        Route::new(
            "home",
            Pattern::build()
                .lit("/")
                .end()
                .produce(|_, _| Endpoint::Home)?,
        )?,
        Route::new(
            "doc",
            Pattern::build()
                .lit("/docs/")
                .one_of(vec![
                    Pattern::build().capture("name", "api").finish()?,
                    Pattern::build()
                        .capture("name", "stream-what-is-known-upfront")
                        .finish()?,
                ])
                .end()
                .produce(|bindings, _| Endpoint::Doc {
                    name: bound(bindings, "name"),
                })?,
        )?,
        Route::new(
            "site-home",
            Pattern::build()
                .lit("/github-site/")
                .capture("owner", OWNER)
                .lit("/")
                .capture("repo", REPO)
                .one_of(vec![
                    Pattern::build().expect(r"/$").finish()?,
                    Pattern::build().end().finish()?,
                ])
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::Site {
                        owner,
                        repo,
                        path: String::new(),
                    }
                })?,
        )?,
        Route::new(
            "site-subpath",
            Pattern::build()
                .lit("/github-site/")
                .capture("owner", OWNER)
                .lit("/")
                .capture("repo", REPO)
                .lit("/")
                .capture("path", r".*[^/]$")
                .end()
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::Site {
                        owner,
                        repo,
                        path: bound(bindings, "path"),
                    }
                })?,
        )?,
        Route::new(
            "gist-file",
            Pattern::build()
                .lit("/1/github/gist/")
                .capture("owner", OWNER)
                .lit("/")
                .capture("gist_id", GIST_ID)
                .lit("/")
                .capture("path", r".+$")
                .produce(|bindings, _| Endpoint::GistFile {
                    owner: bound(bindings, "owner"),
                    gist_id: bound(bindings, "gist_id"),
                    path: bound(bindings, "path"),
                })?,
        )?,
        Route::new(
            "gist",
            Pattern::build()
                .lit("/1/github/gist/")
                .capture("owner", OWNER)
                .lit("/")
                .capture("gist_id", GIST_ID)
                .end()
                .produce(|bindings, _| Endpoint::Gist {
                    owner: bound(bindings, "owner"),
                    gist_id: bound(bindings, "gist_id"),
                })?,
        )?,
        Route::new(
            "repo-file",
            Pattern::build()
                .lit("/1")
                .fragment(&repo_file_at_sha)
                .produce(|bindings, _| {
                    Endpoint::RenderRepoFile(RepoFile::from_bindings(bindings))
                })?,
        )?,
        Route::new(
            "repo-about",
            Pattern::build()
                .lit("/github/about/")
                .capture("owner", OWNER)
                .lit("/")
                .capture("repo", REPO)
                .end()
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::RepoAbout { owner, repo }
                })?,
        )?,
        Route::new(
            "view-file",
            Pattern::build()
                .one_of(vec![view_repo_file, view_repo_listing, view_gist_file])
                // Every alternative carries its own producer, so the
                // fallback arm is unreachable.
                .produce(|_, inner| inner.unwrap_or(Endpoint::Home))?,
        )?,
        Route::new(
            "repo-redirect",
            Pattern::build()
                .lit("/github/")
                .capture("owner", OWNER)
                .lit("/")
                .capture("repo", REPO)
                .one_of(vec![
                    Pattern::build()
                        .capture_groups(r"/(.*)$", &[(1, "path")])
                        .finish()?,
                    Pattern::build().expect(r"$").finish()?,
                ])
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::RepoRedirect {
                        owner,
                        repo,
                        path: bound(bindings, "path"),
                    }
                })?,
        )?,
        Route::new(
            "repo-refs",
            Pattern::build()
                .fragment(&refs_prefix)
                .end()
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::RepoRefs { owner, repo }
                })?,
        )?,
        Route::new(
            "repo-head-ref",
            Pattern::build()
                .fragment(&refs_prefix)
                .lit("/HEAD")
                .end()
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::RepoHeadRef { owner, repo }
                })?,
        )?,
        Route::new(
            "repo-branch-ref",
            Pattern::build()
                .fragment(&refs_prefix)
                .lit("/heads/")
                .one_of(vec![
                    Pattern::build().capture("branch", "master").finish()?,
                    Pattern::build().capture("branch", "main").finish()?,
                ])
                .end()
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::RepoBranchRef {
                        owner,
                        repo,
                        branch: bound(bindings, "branch"),
                    }
                })?,
        )?,
        Route::new(
            "repo-tag-refs",
            Pattern::build()
                .fragment(&refs_prefix)
                .lit("/tags")
                .end()
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::RepoTagRefs { owner, repo }
                })?,
        )?,
        Route::new(
            "repo-list-files",
            Pattern::build()
                .lit("/list/github/")
                .capture("owner", OWNER)
                .lit("/")
                .capture("repo", REPO)
                .lit("@")
                .capture("sha", COMMIT_SHA)
                .lit("/")
                .capture("path", r"(.+/)?$")
                .produce(|bindings, _| {
                    let (owner, repo) = owner_repo(bindings);
                    Endpoint::ListFiles {
                        owner,
                        repo,
                        sha: bound(bindings, "sha"),
                        path: bound(bindings, "path"),
                    }
                })?,
        )?,
        Route::new(
            "s3-object",
            s3_pattern("/1/s3/object/", &["text", "image", "application"])?
                .produce(|bindings, _| Endpoint::S3Object(S3Key::from_bindings(bindings)))?,
        )?,
        Route::new(
            "s3-highlight",
            s3_pattern("/1/s3/highlight/", &["text", "application"])?
                .produce(|bindings, _| Endpoint::S3Highlight(S3Key::from_bindings(bindings)))?,
        )?,
        Route::new(
            "analytics",
            Pattern::build()
                .lit("/analytics")
                .end()
                .produce(|_, _| Endpoint::Analytics)?,
        )?,
        Route::new(
            "favicon",
            Pattern::build()
                .lit("/favicon.ico")
                .end()
                .produce(|_, _| Endpoint::Favicon)?,
        )?,
        Route::new(
            "asset",
            Pattern::build()
                .lit("/assets/")
                .capture("name", r"(?i)[-a-z\d]+")
                .lit("/")
                .capture("sha256", SHA256)
                .lit(".css")
                .produce(|bindings, _| Endpoint::Asset {
                    name: bound(bindings, "name"),
                })?,
        )?,
    ];

    Ok(Router::new(routes))
}

/// The shared shape of the S3 routes: region, bucket, then a
/// `sha256/{type}/{subtype}/{digest}` object address.
fn s3_pattern(
    prefix: &str,
    media_types: &[&str],
) -> Result<press_route::PatternBuilder<Endpoint>, RouteError> {
    let mut media_alternatives = Vec::with_capacity(media_types.len());
    for media_type in media_types {
        media_alternatives.push(
            Pattern::build()
                .capture("media_type", media_type)
                .finish()?,
        );
    }

    Ok(Pattern::build()
        .lit(prefix)
        .capture("region", r"(?i)[-_a-z\d]+")
        .lit("/")
        .capture("bucket", r"(?i)[-_a-z\d]+")
        .lit("/sha256/")
        .one_of(media_alternatives)
        .lit("/")
        .capture("media_subtype", r"(?i)[-_a-z\d]+")
        .lit("/")
        .capture("sha256", SHA256)
        .end())
}

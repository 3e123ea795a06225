//! Ref records and the queries the edge service runs over them.

use serde::Serialize;

/// One line of a git ref advertisement.
///
/// Records are immutable once decoded; the optional fields carry protocol
/// metadata through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefRecord {
    /// Ref name, e.g. `HEAD`, `refs/heads/main`, `refs/tags/v1`.
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Object id (commit SHA) the ref points at.
    pub oid: String,
    /// `symref-target` capability value.
    #[serde(rename = "target", skip_serializing_if = "Option::is_none")]
    pub symref_target: Option<String>,
    /// `peeled` capability value (annotated tag target).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peeled: Option<String>,
    /// `symref=HEAD` capability value; only the HEAD line carries it.
    #[serde(rename = "HEADRef", skip_serializing_if = "Option::is_none")]
    pub head_ref: Option<String>,
    /// `object-format` capability value.
    #[serde(rename = "objectFormat", skip_serializing_if = "Option::is_none")]
    pub object_format: Option<String>,
    /// `agent` capability value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl RefRecord {
    /// True for branch refs under `refs/heads/`.
    pub fn is_branch(&self) -> bool {
        self.ref_name.starts_with("refs/heads/")
    }

    /// True for tag refs under `refs/tags/`, including peeled `^{}` lines.
    pub fn is_tag(&self) -> bool {
        self.ref_name.starts_with("refs/tags/")
    }
}

/// The resolved HEAD of an advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadRef {
    /// Commit SHA HEAD points at.
    pub sha: String,
    /// The symbolic ref, e.g. `refs/heads/main`.
    #[serde(rename = "HEADRef")]
    pub head_ref: String,
    /// Short branch name, the last segment of the symbolic ref.
    pub branch: String,
}

/// A resolved branch ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRef {
    /// Commit SHA the branch points at.
    pub sha: String,
}

/// Resolves HEAD from an advertisement.
///
/// Servers advertise HEAD as the very first ref, so only the first record
/// is inspected: if it lacks the `symref=HEAD` capability this returns
/// `None` even when a later record carries one.
pub fn find_head<'a>(refs: impl IntoIterator<Item = &'a RefRecord>) -> Option<HeadRef> {
    let first = refs.into_iter().next()?;
    let head_ref = first.head_ref.as_deref()?;
    let branch = head_ref.rsplit('/').next()?.to_owned();
    Some(HeadRef {
        sha: first.oid.clone(),
        head_ref: head_ref.to_owned(),
        branch,
    })
}

/// Finds the ref `refs/heads/<branch>`, scanning the whole sequence.
pub fn find_branch<'a>(
    refs: impl IntoIterator<Item = &'a RefRecord>,
    branch: &str,
) -> Option<BranchRef> {
    let expected = format!("refs/heads/{branch}");
    refs.into_iter()
        .find(|record| record.ref_name == expected)
        .map(|record| BranchRef {
            sha: record.oid.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ref_name: &str, oid: &str) -> RefRecord {
        RefRecord {
            ref_name: ref_name.to_owned(),
            oid: oid.to_owned(),
            ..RefRecord::default()
        }
    }

    #[test]
    fn test_find_head_uses_first_record_only() {
        let mut later = record("refs/heads/main", "b".repeat(40).as_str());
        later.head_ref = Some("refs/heads/main".to_owned());
        let refs = vec![record("refs/heads/dev", "a".repeat(40).as_str()), later];

        // The first record has no symref=HEAD, so HEAD is unresolved even
        // though a later record carries one.
        assert_eq!(find_head(&refs), None);
    }

    #[test]
    fn test_find_head_derives_branch_from_last_segment() {
        let mut head = record("HEAD", "1234");
        head.head_ref = Some("refs/heads/release/2024".to_owned());
        let refs = vec![head];

        let found = find_head(&refs).expect("HEAD resolves");
        assert_eq!(found.sha, "1234");
        assert_eq!(found.head_ref, "refs/heads/release/2024");
        assert_eq!(found.branch, "2024");
    }

    #[test]
    fn test_find_branch_scans_past_first_record() {
        let refs = vec![
            record("HEAD", "aaaa"),
            record("refs/heads/dev", "bbbb"),
            record("refs/heads/main", "cccc"),
        ];

        assert_eq!(
            find_branch(&refs, "main"),
            Some(BranchRef {
                sha: "cccc".to_owned()
            })
        );
        assert_eq!(find_branch(&refs, "missing"), None);
    }

    #[test]
    fn test_ref_classification() {
        assert!(record("refs/heads/main", "a").is_branch());
        assert!(record("refs/tags/v1", "a").is_tag());
        assert!(record("refs/tags/v1^{}", "a").is_tag());
        assert!(!record("HEAD", "a").is_branch());
    }
}

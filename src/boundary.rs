use std::fmt;

/// Non-fatal conditions hit while cutting a release.
/// These are reported to the user but do not abort the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Pushing is disabled; the release refs exist only locally
    PushSkipped { remote: String, refs: Vec<String> },
    /// Version file was rewritten but not committed
    CommitSkipped { path: String },
    /// HEAD is detached, so the bump commit is not on any branch
    DetachedHead { commit_hash: String },
    /// A permissive hook failed after the release was already published
    HookFailed { hook: String, reason: String },
}

fn short_hash(hash: &str) -> &str {
    if hash.len() > 7 {
        &hash[..7]
    } else {
        hash
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::PushSkipped { remote, refs } => {
                write!(
                    f,
                    "Push to '{}' skipped; {} ref(s) exist only locally",
                    remote,
                    refs.len()
                )
            }
            BoundaryWarning::CommitSkipped { path } => {
                write!(f, "'{}' was updated but not committed", path)
            }
            BoundaryWarning::DetachedHead { commit_hash } => {
                write!(
                    f,
                    "HEAD is detached; bump commit {} is not on any branch",
                    short_hash(commit_hash)
                )
            }
            BoundaryWarning::HookFailed { hook, reason } => {
                write!(f, "Hook '{}' failed: {}", hook, reason)
            }
        }
    }
}

//! Git operations abstraction layer
//!
//! The cut workflow only talks to the [Repository] trait. Two implementations
//! exist:
//!
//! - [repository::Git2Repository]: a real repository through the `git2` crate
//! - [mock::MockRepository]: an in-memory recorder for tests
//!
//! ```rust
//! # use release_cut::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> release_cut::Result<()> {
//! let head = repo.head_oid()?;
//! if !repo.branch_exists("v2.3.x")? {
//!     repo.create_branch("v2.3.x", head)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::path::{Path, PathBuf};

/// Fully qualified ref for a local branch
pub fn branch_ref(name: &str) -> String {
    format!("refs/heads/{}", name)
}

/// Fully qualified ref for a tag
pub fn tag_ref(name: &str) -> String {
    format!("refs/tags/{}", name)
}

/// Ref names pushed for a cut, in push order
pub fn cut_refs(release_branch: &str, release_tag: &str, bump_branch: Option<&str>) -> Vec<String> {
    let mut refs = vec![branch_ref(release_branch), tag_ref(release_tag)];
    if let Some(branch) = bump_branch {
        refs.push(branch_ref(branch));
    }
    refs
}

/// The repository operations a release cut needs
///
/// All methods return [crate::error::Result<T>]; implementations map
/// underlying errors to the matching [crate::error::ReleaseCutError] variant.
pub trait Repository: Send + Sync {
    /// Root of the working tree, `None` for bare repositories
    fn workdir(&self) -> Option<PathBuf>;

    /// Commit currently checked out
    fn head_oid(&self) -> Result<Oid>;

    /// Short name of the checked out branch, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    fn branch_exists(&self, name: &str) -> Result<bool>;

    /// Create a local branch at `oid` without checking it out
    ///
    /// Fails if the branch already exists.
    fn create_branch(&self, name: &str, oid: Oid) -> Result<()>;

    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create a lightweight tag at `oid`
    ///
    /// Fails if the tag already exists.
    fn create_tag(&self, name: &str, oid: Oid) -> Result<()>;

    /// Commit `paths` on top of HEAD, advancing the current branch
    ///
    /// The new tree is HEAD's tree with only `paths` replaced. Other staged
    /// changes are left in the index and are not part of the commit.
    ///
    /// # Returns
    /// * `Ok(Oid)` - The new commit
    /// * `Err` - If a path is outside the working tree or the commit fails
    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<Oid>;

    /// Local branch names, sorted
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Tag names, sorted
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Push fully qualified refs (e.g. `refs/tags/v2.3.0`) to the same names on `remote`
    fn push_refs(&self, remote: &str, refs: &[String]) -> Result<()>;
}

use crate::error::{ReleaseCutError, Result};
use crate::git::Repository;
use git2::Oid;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A commit recorded by [MockRepository::commit_paths]
#[derive(Debug, Clone, PartialEq)]
pub struct MockCommit {
    pub oid: Oid,
    pub parent: Oid,
    pub paths: Vec<PathBuf>,
    pub message: String,
}

/// A push recorded by [MockRepository::push_refs]
#[derive(Debug, Clone, PartialEq)]
pub struct MockPush {
    pub remote: String,
    pub refs: Vec<String>,
}

/// Mock repository for testing without actual git operations
///
/// State sits behind mutexes so the `&self` trait methods can record every
/// ref, commit and push for later assertions.
pub struct MockRepository {
    head: Mutex<Oid>,
    current_branch: Option<String>,
    branches: Mutex<BTreeMap<String, Oid>>,
    tags: Mutex<BTreeMap<String, Oid>>,
    remotes: Vec<String>,
    commits: Mutex<Vec<MockCommit>>,
    pushes: Mutex<Vec<MockPush>>,
    next_oid: Mutex<u8>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockRepository {
    /// Create a mock with `main` checked out at a fixed commit and an `origin` remote
    pub fn new() -> Self {
        let head = Oid::from_bytes(&[1; 20]).unwrap_or_else(|_| Oid::zero());
        let mut branches = BTreeMap::new();
        branches.insert("main".to_string(), head);

        MockRepository {
            head: Mutex::new(head),
            current_branch: Some("main".to_string()),
            branches: Mutex::new(branches),
            tags: Mutex::new(BTreeMap::new()),
            remotes: vec!["origin".to_string()],
            commits: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
            next_oid: Mutex::new(2),
        }
    }

    pub fn with_remotes(mut self, remotes: &[&str]) -> Self {
        self.remotes = remotes.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Detach HEAD
    pub fn detached(mut self) -> Self {
        self.current_branch = None;
        self
    }

    /// Add a branch pointing to an OID
    pub fn add_branch(&self, name: impl Into<String>, oid: Oid) {
        lock(&self.branches).insert(name.into(), oid);
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&self, name: impl Into<String>, oid: Oid) {
        lock(&self.tags).insert(name.into(), oid);
    }

    pub fn branch_target(&self, name: &str) -> Option<Oid> {
        lock(&self.branches).get(name).copied()
    }

    pub fn tag_target(&self, name: &str) -> Option<Oid> {
        lock(&self.tags).get(name).copied()
    }

    pub fn commits(&self) -> Vec<MockCommit> {
        lock(&self.commits).clone()
    }

    pub fn pushes(&self) -> Vec<MockPush> {
        lock(&self.pushes).clone()
    }

    fn allocate_oid(&self) -> Oid {
        let mut next = lock(&self.next_oid);
        let n = *next;
        *next = n.wrapping_add(1);
        Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Option<PathBuf> {
        None
    }

    fn head_oid(&self) -> Result<Oid> {
        Ok(*lock(&self.head))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.current_branch.clone())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(lock(&self.branches).contains_key(name))
    }

    fn create_branch(&self, name: &str, oid: Oid) -> Result<()> {
        let mut branches = lock(&self.branches);
        if branches.contains_key(name) {
            return Err(ReleaseCutError::branch(format!(
                "Cannot create branch '{}': already exists",
                name
            )));
        }
        branches.insert(name.to_string(), oid);
        Ok(())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(lock(&self.tags).contains_key(name))
    }

    fn create_tag(&self, name: &str, oid: Oid) -> Result<()> {
        let mut tags = lock(&self.tags);
        if tags.contains_key(name) {
            return Err(ReleaseCutError::tag(format!(
                "Cannot create tag '{}': already exists",
                name
            )));
        }
        tags.insert(name.to_string(), oid);
        Ok(())
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<Oid> {
        let parent = *lock(&self.head);
        let oid = self.allocate_oid();

        lock(&self.commits).push(MockCommit {
            oid,
            parent,
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            message: message.to_string(),
        });
        *lock(&self.head) = oid;
        if let Some(branch) = &self.current_branch {
            lock(&self.branches).insert(branch.clone(), oid);
        }

        Ok(oid)
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        Ok(lock(&self.branches).keys().cloned().collect())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(lock(&self.tags).keys().cloned().collect())
    }

    fn push_refs(&self, remote: &str, refs: &[String]) -> Result<()> {
        if !self.remotes.iter().any(|r| r == remote) {
            return Err(ReleaseCutError::remote(format!(
                "Cannot find remote '{}'",
                remote
            )));
        }

        lock(&self.pushes).push(MockPush {
            remote: remote.to_string(),
            refs: refs.to_vec(),
        });
        Ok(())
    }
}

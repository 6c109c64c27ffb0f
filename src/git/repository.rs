use crate::error::{ReleaseCutError, Result};
use crate::git::tag_ref;
use git2::{BranchType, IndexEntry, IndexTime, Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

const DEFAULT_FILE_MODE: u32 = 0o100644;

/// Wrapper around git2::Repository with our trait interface
///
/// `git2::Repository` is `Send` but not `Sync`, so the handle sits behind a mutex.
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn git(&self) -> MutexGuard<'_, Git2Repo> {
        self.repo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let key_path = home.join(".ssh").join(key);
                        if key_path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &key_path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        callbacks
    }
}

/// Work tree root of a non-bare repository
fn workdir_of(repo: &Git2Repo) -> Result<PathBuf> {
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| ReleaseCutError::branch("Cannot commit in a bare repository"))
}

/// Path of `path` relative to the working tree
fn relative_to_workdir(workdir: &Path, path: &Path) -> Result<PathBuf> {
    if path.is_relative() {
        return Ok(path.to_path_buf());
    }

    let workdir = workdir.canonicalize()?;
    let absolute = path.canonicalize()?;

    absolute
        .strip_prefix(&workdir)
        .map(Path::to_path_buf)
        .map_err(|_| {
            ReleaseCutError::config(format!(
                "{} is outside the repository at {}",
                path.display(),
                workdir.display()
            ))
        })
}

/// Index entry path: UTF-8 with `/` separators
fn entry_path(relative: &Path) -> Result<Vec<u8>> {
    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                ReleaseCutError::config(format!("{} is not valid UTF-8", relative.display()))
            })
        })
        .collect::<Result<Vec<&str>>>()?;
    Ok(parts.join("/").into_bytes())
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Option<PathBuf> {
        self.git().workdir().map(Path::to_path_buf)
    }

    fn head_oid(&self) -> Result<Oid> {
        let repo = self.git();
        let head = repo
            .head()
            .map_err(|e| ReleaseCutError::branch(format!("Cannot resolve HEAD: {}", e)))?;
        let oid = head.peel_to_commit()?.id();
        Ok(oid)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let repo = self.git();
        let head = repo.head()?;
        if head.is_branch() {
            Ok(head.shorthand().map(str::to_string))
        } else {
            Ok(None)
        }
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        match self.git().find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_branch(&self, name: &str, oid: Oid) -> Result<()> {
        let repo = self.git();
        let commit = repo.find_commit(oid)?;

        repo.branch(name, &commit, false)
            .map_err(|e| ReleaseCutError::branch(format!("Cannot create branch '{}': {}", name, e)))?;

        Ok(())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.git().find_reference(&tag_ref(name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(ReleaseCutError::tag(format!(
                "Cannot look up tag '{}': {}",
                name, e
            ))),
        }
    }

    fn create_tag(&self, name: &str, oid: Oid) -> Result<()> {
        let repo = self.git();
        let object = repo
            .find_object(oid, None)
            .map_err(|e| ReleaseCutError::tag(format!("Cannot find object: {}", e)))?;

        repo.tag_lightweight(name, &object, false)
            .map_err(|e| ReleaseCutError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<Oid> {
        let repo = self.git();
        let workdir = workdir_of(&repo)?;
        let parent = repo.head()?.peel_to_commit()?;

        // The commit tree is HEAD's tree plus `paths`; whatever else sits in
        // the index stays staged and out of this commit.
        let mut tree_index = git2::Index::new()?;
        tree_index.read_tree(&parent.tree()?)?;
        let mut work_index = repo.index()?;

        for path in paths {
            let relative = relative_to_workdir(&workdir, path)?;
            let blob = repo.blob_path(&workdir.join(&relative))?;
            let mode = tree_index
                .get_path(&relative, 0)
                .map(|entry| entry.mode)
                .unwrap_or(DEFAULT_FILE_MODE);

            tree_index.add(&IndexEntry {
                ctime: IndexTime::new(0, 0),
                mtime: IndexTime::new(0, 0),
                dev: 0,
                ino: 0,
                mode,
                uid: 0,
                gid: 0,
                file_size: 0,
                id: blob,
                flags: 0,
                flags_extended: 0,
                path: entry_path(&relative)?,
            })?;
            work_index.add_path(&relative)?;
        }

        let tree = repo.find_tree(tree_index.write_tree_to(&repo)?)?;
        let signature = repo.signature()?;

        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        work_index.write()?;

        Ok(oid)
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        let repo = self.git();
        let mut names = Vec::new();
        for branch in repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.git().tag_names(None)?;
        let mut names: Vec<String> = tags.iter().flatten().map(|s| s.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn push_refs(&self, remote: &str, refs: &[String]) -> Result<()> {
        let repo = self.git();
        let mut remote_handle = repo
            .find_remote(remote)
            .map_err(|e| ReleaseCutError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let refspecs: Vec<String> = refs.iter().map(|r| format!("{}:{}", r, r)).collect();
        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(Self::remote_callbacks());

        remote_handle
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    ReleaseCutError::remote(format!("Network error during push: {}", e))
                } else {
                    ReleaseCutError::remote(format!("Push to '{}' failed: {}", remote, e))
                }
            })?;

        Ok(())
    }
}

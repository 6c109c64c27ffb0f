//! Release cut workflow
//!
//! Everything between "read the version of record" and "hand the prefix to
//! the docs publisher" lives here, written against the [Repository] trait so
//! it runs the same on a real repository and on [crate::git::MockRepository].

use git2::Oid;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{ReleasePlan, ReleasePrefix, Version};
use crate::error::{ReleaseCutError, Result};
use crate::git::{cut_refs, Repository};
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::version_file::VersionFile;

/// Arguments for the cut workflow
///
/// Mirrors the CLI flags after they have been merged with the config file,
/// so the workflow can be driven without clap.
#[derive(Debug, Clone, PartialEq)]
pub struct CutWorkflowArgs {
    /// Remote to push the release refs to
    pub remote: String,

    /// Push the release branch, tag and bump commit
    pub push: bool,

    /// Commit the rewritten version file
    pub commit: bool,

    /// Compute and validate only
    pub dry_run: bool,
}

impl CutWorkflowArgs {
    pub fn from_config(config: &Config) -> Self {
        CutWorkflowArgs {
            remote: config.git.remote.clone(),
            push: config.git.push,
            commit: config.git.commit,
            dry_run: false,
        }
    }
}

/// Result of a cut workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct CutOutcome {
    pub plan: ReleasePlan,

    /// Commit the release branch and tag point at
    pub release_commit: Option<Oid>,

    /// Commit carrying the next unstable version
    pub bump_commit: Option<Oid>,

    /// Fully qualified refs pushed to the remote
    pub pushed_refs: Vec<String>,

    pub warnings: Vec<BoundaryWarning>,

    pub dry_run: bool,
}

/// Existing release branches and tags, newest first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseRefs {
    pub branches: Vec<(String, ReleasePrefix)>,
    pub tags: Vec<(String, Version)>,
}

/// Read the version of record and derive the plan, refusing a cut that
/// would collide with an existing release branch or tag.
pub fn prepare_plan<R: Repository>(
    repo: &R,
    config: &Config,
    version_file: &VersionFile,
) -> Result<ReleasePlan> {
    let version = version_file.read()?;
    let plan = ReleasePlan::with_patterns(version, &config.branch_pattern()?, &config.tag_pattern()?)?;

    if repo.branch_exists(&plan.release_branch)? {
        return Err(ReleaseCutError::branch(format!(
            "Release branch '{}' already exists",
            plan.release_branch
        )));
    }
    if repo.tag_exists(&plan.release_tag)? {
        return Err(ReleaseCutError::tag(format!(
            "Release tag '{}' already exists",
            plan.release_tag
        )));
    }

    tracing::info!(
        version = %plan.version,
        branch = %plan.release_branch,
        tag = %plan.release_tag,
        next = %plan.next_version,
        "release plan ready"
    );
    Ok(plan)
}

/// Render the configured bump commit message
pub fn commit_message(template: &str, plan: &ReleasePlan) -> String {
    template
        .replace("{version}", &plan.next_version.to_string())
        .replace("{prefix}", &plan.release_prefix.to_string())
}

/// Run the configured script for `hook_type`, if any
///
/// A failing fatal hook aborts with its error. A permissive one is recorded
/// in `warnings` and the workflow carries on.
fn run_hook(
    config: &Config,
    hook_type: HookType,
    plan: &ReleasePlan,
    remote: &str,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<()> {
    let Some(script) = config.hooks.script_for(hook_type) else {
        tracing::debug!(hook = hook_type.name(), "no script configured");
        return Ok(());
    };

    let context = HookContext::from_plan(hook_type, plan, remote);
    match HookExecutor::execute(script, &context) {
        Ok(()) => Ok(()),
        Err(e) if hook_type.is_fatal() => Err(e),
        Err(e) => {
            tracing::warn!(hook = hook_type.name(), error = %e, "hook failed");
            warnings.push(BoundaryWarning::HookFailed {
                hook: hook_type.name().to_string(),
                reason: e.to_string(),
            });
            Ok(())
        }
    }
}

/// Main cut workflow
///
/// 1. Read the version file and build the plan
/// 2. Create the release branch and tag at HEAD
/// 3. Write the next unstable version and commit it
/// 4. Push the release refs and the bump commit
/// 5. Run the docs publisher with the release prefix
///
/// Any error aborts immediately. Nothing already done is rolled back.
pub fn run_cut_workflow<R: Repository>(
    repo: &R,
    config: &Config,
    version_file: &VersionFile,
    args: &CutWorkflowArgs,
) -> Result<CutOutcome> {
    let plan = prepare_plan(repo, config, version_file)?;
    let mut outcome = CutOutcome {
        plan: plan.clone(),
        release_commit: None,
        bump_commit: None,
        pushed_refs: Vec::new(),
        warnings: Vec::new(),
        dry_run: args.dry_run,
    };

    if args.dry_run {
        return Ok(outcome);
    }

    run_hook(config, HookType::PreCut, &plan, &args.remote, &mut outcome.warnings)?;

    let head = repo.head_oid()?;
    repo.create_branch(&plan.release_branch, head)?;
    repo.create_tag(&plan.release_tag, head)?;
    outcome.release_commit = Some(head);
    tracing::info!(branch = %plan.release_branch, tag = %plan.release_tag, commit = %head, "created release refs");

    run_hook(config, HookType::PostTag, &plan, &args.remote, &mut outcome.warnings)?;

    version_file.write(&plan.next_version)?;

    let mut bump_branch = None;
    if args.commit {
        let message = commit_message(&config.git.commit_message, &plan);
        let oid = repo.commit_paths(&[version_file.path()], &message)?;
        outcome.bump_commit = Some(oid);
        tracing::info!(commit = %oid, "committed next unstable version");

        bump_branch = repo.current_branch()?;
        if bump_branch.is_none() {
            outcome.warnings.push(BoundaryWarning::DetachedHead {
                commit_hash: oid.to_string(),
            });
        }
    } else {
        outcome.warnings.push(BoundaryWarning::CommitSkipped {
            path: version_file.path().display().to_string(),
        });
    }

    let refs = cut_refs(&plan.release_branch, &plan.release_tag, bump_branch.as_deref());
    if args.push {
        repo.push_refs(&args.remote, &refs)?;
        tracing::info!(remote = %args.remote, count = refs.len(), "pushed release refs");
        outcome.pushed_refs = refs;
    } else {
        outcome.warnings.push(BoundaryWarning::PushSkipped {
            remote: args.remote.clone(),
            refs,
        });
    }

    run_hook(config, HookType::PublishDocs, &plan, &args.remote, &mut outcome.warnings)?;
    run_hook(config, HookType::PostPush, &plan, &args.remote, &mut outcome.warnings)?;

    Ok(outcome)
}

/// Rewrite the version file with the next unstable version, without touching git.
///
/// Returns the version read and the version written (or that would be written).
pub fn run_bump(version_file: &VersionFile, dry_run: bool) -> Result<(Version, Version)> {
    let current = version_file.read()?;
    let next = current.next_unstable()?;
    if !dry_run {
        version_file.write(&next)?;
    }
    Ok((current, next))
}

/// Collect release branches and tags that match the configured patterns
pub fn list_release_refs<R: Repository>(repo: &R, config: &Config) -> Result<ReleaseRefs> {
    let branch_pattern = config.branch_pattern()?;
    let tag_pattern = config.tag_pattern()?;

    let mut branches: Vec<(String, ReleasePrefix)> = repo
        .list_branches()?
        .into_iter()
        .filter_map(|name| {
            let prefix = ReleasePrefix::parse(branch_pattern.extract(&name)?).ok()?;
            Some((name, prefix))
        })
        .collect();
    branches.sort_by(|a, b| b.1.cmp(&a.1));

    let mut tags: Vec<(String, Version)> = repo
        .list_tags()?
        .into_iter()
        .filter_map(|name| {
            let version = Version::parse(tag_pattern.extract(&name)?).ok()?;
            Some((name, version))
        })
        .collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(ReleaseRefs { branches, tags })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use std::fs;
    use tempfile::TempDir;

    fn setup(version: &str) -> (TempDir, VersionFile) {
        let dir = TempDir::new().unwrap();
        let file = VersionFile::new(dir.path().join("VERSION.txt"));
        fs::write(file.path(), version).unwrap();
        (dir, file)
    }

    fn args() -> CutWorkflowArgs {
        CutWorkflowArgs::from_config(&Config::default())
    }

    #[test]
    fn test_commit_message_template() {
        let plan = ReleasePlan::new(Version::new(2, 3, 0)).unwrap();
        assert_eq!(
            commit_message("Bump to {version} after cutting {prefix}", &plan),
            "Bump to 2.4.0 after cutting 2.3"
        );
    }

    #[test]
    fn test_prepare_plan_refuses_existing_branch() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new();
        repo.add_branch("v2.3.x", repo.head_oid().unwrap());

        let err = prepare_plan(&repo, &Config::default(), &file).unwrap_err();
        assert!(err.to_string().contains("v2.3.x"));
    }

    #[test]
    fn test_prepare_plan_refuses_existing_tag() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new();
        repo.add_tag("v2.3.0", repo.head_oid().unwrap());

        let err = prepare_plan(&repo, &Config::default(), &file).unwrap_err();
        assert!(err.to_string().starts_with("Tag error"));
    }

    #[test]
    fn test_cut_creates_refs_at_pre_bump_head() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new();
        let head = repo.head_oid().unwrap();

        let outcome = run_cut_workflow(&repo, &Config::default(), &file, &args()).unwrap();

        assert_eq!(outcome.release_commit, Some(head));
        assert_eq!(repo.branch_target("v2.3.x"), Some(head));
        assert_eq!(repo.tag_target("v2.3.0"), Some(head));

        let bump = outcome.bump_commit.unwrap();
        assert_ne!(bump, head);
        assert_eq!(repo.branch_target("main"), Some(bump));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "2.4.0\n");

        let commits = repo.commits();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "Bump unstable version to 2.4.0");
        assert_eq!(commits[0].paths, vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_cut_pushes_release_refs_and_bump_branch() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new();

        let outcome = run_cut_workflow(&repo, &Config::default(), &file, &args()).unwrap();

        let expected = vec![
            "refs/heads/v2.3.x".to_string(),
            "refs/tags/v2.3.0".to_string(),
            "refs/heads/main".to_string(),
        ];
        assert_eq!(outcome.pushed_refs, expected);
        assert_eq!(repo.pushes().len(), 1);
        assert_eq!(repo.pushes()[0].remote, "origin");
        assert_eq!(repo.pushes()[0].refs, expected);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_dry_run_has_no_side_effects() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new();
        let mut dry = args();
        dry.dry_run = true;

        let outcome = run_cut_workflow(&repo, &Config::default(), &file, &dry).unwrap();

        assert!(outcome.dry_run);
        assert_eq!(outcome.plan.release_branch, "v2.3.x");
        assert!(!repo.branch_exists("v2.3.x").unwrap());
        assert!(!repo.tag_exists("v2.3.0").unwrap());
        assert!(repo.commits().is_empty());
        assert!(repo.pushes().is_empty());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "2.3.0\n");
    }

    #[test]
    fn test_no_push_no_commit_warns() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new();
        let mut local = args();
        local.push = false;
        local.commit = false;

        let outcome = run_cut_workflow(&repo, &Config::default(), &file, &local).unwrap();

        assert!(repo.pushes().is_empty());
        assert!(repo.commits().is_empty());
        assert_eq!(outcome.bump_commit, None);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "2.4.0\n");
        assert!(matches!(
            outcome.warnings[0],
            BoundaryWarning::CommitSkipped { .. }
        ));
        match &outcome.warnings[1] {
            BoundaryWarning::PushSkipped { remote, refs } => {
                assert_eq!(remote, "origin");
                assert_eq!(refs.len(), 2);
            }
            other => panic!("unexpected warning: {:?}", other),
        }
    }

    #[test]
    fn test_detached_head_warns_and_skips_bump_ref() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new().detached();

        let outcome = run_cut_workflow(&repo, &Config::default(), &file, &args()).unwrap();

        assert_eq!(outcome.pushed_refs.len(), 2);
        assert!(matches!(
            outcome.warnings[0],
            BoundaryWarning::DetachedHead { .. }
        ));
    }

    #[test]
    fn test_malformed_version_aborts_before_any_ref() {
        let (_dir, file) = setup("2.x\n");
        let repo = MockRepository::new();

        let err = run_cut_workflow(&repo, &Config::default(), &file, &args()).unwrap_err();

        assert!(err.is_malformed_version());
        assert_eq!(repo.list_branches().unwrap(), vec!["main".to_string()]);
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_push_failure_is_fatal_after_local_refs() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new().with_remotes(&[]);

        let err = run_cut_workflow(&repo, &Config::default(), &file, &args()).unwrap_err();

        assert!(err.to_string().starts_with("Remote operation failed"));
        assert!(repo.branch_exists("v2.3.x").unwrap());
    }

    #[test]
    fn test_missing_fatal_hook_aborts() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new();
        let mut config = Config::default();
        config.hooks.pre_cut = Some("/nonexistent/pre-cut.sh".to_string());

        let err = run_cut_workflow(&repo, &config, &file, &args()).unwrap_err();

        assert!(err.to_string().contains("Hook script not found"));
        assert!(!repo.branch_exists("v2.3.x").unwrap());
    }

    fn with_missing_script(hook_type: HookType) -> Config {
        let mut config = Config::default();
        let script = Some(format!("/nonexistent/{}.sh", hook_type.name()));
        match hook_type {
            HookType::PreCut => config.hooks.pre_cut = script,
            HookType::PostTag => config.hooks.post_tag = script,
            HookType::PublishDocs => config.hooks.publish_docs = script,
            HookType::PostPush => config.hooks.post_push = script,
        }
        config
    }

    #[test]
    fn test_hook_failure_follows_hook_policy() {
        for hook_type in [
            HookType::PreCut,
            HookType::PostTag,
            HookType::PublishDocs,
            HookType::PostPush,
        ] {
            let (_dir, file) = setup("2.3.0\n");
            let repo = MockRepository::new();
            let config = with_missing_script(hook_type);

            let result = run_cut_workflow(&repo, &config, &file, &args());

            if hook_type.is_fatal() {
                let err = result.unwrap_err();
                assert!(err.to_string().contains("Hook script not found"), "{:?}", hook_type);
            } else {
                let outcome = result.unwrap();
                assert!(
                    outcome.warnings.iter().any(|w| matches!(
                        w,
                        BoundaryWarning::HookFailed { hook, .. } if hook == hook_type.name()
                    )),
                    "{:?}",
                    hook_type
                );
            }
        }
    }

    #[test]
    fn test_failing_post_push_hook_only_warns() {
        let (_dir, file) = setup("2.3.0\n");
        let repo = MockRepository::new();
        let mut config = Config::default();
        config.hooks.post_push = Some("/nonexistent/post-push.sh".to_string());

        let outcome = run_cut_workflow(&repo, &config, &file, &args()).unwrap();

        assert!(matches!(
            &outcome.warnings[0],
            BoundaryWarning::HookFailed { hook, .. } if hook == "post-push"
        ));
    }

    #[test]
    fn test_custom_patterns_flow_through() {
        let (_dir, file) = setup("1.9.4\n");
        let repo = MockRepository::new();
        let config = Config::from_toml(
            r#"
[naming]
branch_pattern = "release/{prefix}"
tag_pattern = "release-{version}"
"#,
        )
        .unwrap();

        let outcome = run_cut_workflow(&repo, &config, &file, &args()).unwrap();

        assert!(repo.branch_exists("release/1.9").unwrap());
        assert!(repo.tag_exists("release-1.9.4").unwrap());
        assert_eq!(outcome.plan.next_version, Version::new(1, 10, 4));
    }

    #[test]
    fn test_run_bump() {
        let (_dir, file) = setup("2.3.0\n");

        let (current, next) = run_bump(&file, true).unwrap();
        assert_eq!((current, next), (Version::new(2, 3, 0), Version::new(2, 4, 0)));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "2.3.0\n");

        run_bump(&file, false).unwrap();
        let (current, next) = run_bump(&file, false).unwrap();
        assert_eq!(current, Version::new(2, 4, 0));
        assert_eq!(next, Version::new(2, 5, 0));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "2.5.0\n");
    }

    #[test]
    fn test_list_release_refs_sorted_newest_first() {
        let repo = MockRepository::new();
        let head = repo.head_oid().unwrap();
        for branch in ["v2.3.x", "v2.10.x", "feature/v2.4.x", "v1.0.x"] {
            repo.add_branch(branch, head);
        }
        for tag in ["v2.3.0", "v2.10.0", "v2.3.0-rc1", "nightly"] {
            repo.add_tag(tag, head);
        }

        let refs = list_release_refs(&repo, &Config::default()).unwrap();

        let branches: Vec<&str> = refs.branches.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(branches, vec!["v2.10.x", "v2.3.x", "v1.0.x"]);
        let tags: Vec<&str> = refs.tags.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(tags, vec!["v2.10.0", "v2.3.0"]);
    }
}

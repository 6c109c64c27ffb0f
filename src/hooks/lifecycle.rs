use crate::domain::ReleasePlan;
use std::collections::HashMap;

/// Points in the cut workflow where a collaborator script may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    PreCut,
    PostTag,
    PublishDocs,
    PostPush,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreCut => "pre-cut",
            HookType::PostTag => "post-tag",
            HookType::PublishDocs => "publish-docs",
            HookType::PostPush => "post-push",
        }
    }

    /// Whether a failing script aborts the workflow
    pub fn is_fatal(&self) -> bool {
        !matches!(self, HookType::PostPush)
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    pub hook_type: HookType,
    pub version: String,
    pub prefix: String,
    pub branch: String,
    pub tag: String,
    pub next_version: String,
    pub remote: String,
}

impl HookContext {
    pub fn from_plan(hook_type: HookType, plan: &ReleasePlan, remote: &str) -> Self {
        HookContext {
            hook_type,
            version: plan.version.to_string(),
            prefix: plan.release_prefix.to_string(),
            branch: plan.release_branch.clone(),
            tag: plan.release_tag.clone(),
            next_version: plan.next_version.to_string(),
            remote: remote.to_string(),
        }
    }

    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to RELEASECUT_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("RELEASECUT_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert("RELEASECUT_VERSION".to_string(), self.version.clone());
        env.insert("RELEASECUT_PREFIX".to_string(), self.prefix.clone());
        env.insert("RELEASECUT_BRANCH".to_string(), self.branch.clone());
        env.insert("RELEASECUT_TAG".to_string(), self.tag.clone());
        env.insert("RELEASECUT_NEXT_VERSION".to_string(), self.next_version.clone());
        env.insert("RELEASECUT_REMOTE".to_string(), self.remote.clone());

        env
    }
}

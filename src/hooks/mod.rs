//! Collaborator scripts run at fixed points of a release cut
//!
//! - pre-cut: before any ref is created
//! - post-tag: after the release branch and tag exist locally
//! - publish-docs: after push, with the release prefix to publish under
//! - post-push: last; failures only warn

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};

//! Domain logic - pure release rules independent of git and the filesystem

pub mod naming;
pub mod transition;
pub mod version;

pub use naming::{NamePattern, PatternKind};
pub use transition::{
    compute_next_unstable_version, compute_release_branch_name, compute_release_prefix,
    compute_release_tag, ReleasePlan,
};
pub use version::{ReleasePrefix, Version};

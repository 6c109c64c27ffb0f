//! Pure formatting functions for UI output.
//!
//! Rendering is split from printing so the text can be asserted on in tests.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::{CutOutcome, ReleaseRefs};
use crate::domain::ReleasePlan;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Lines describing a release plan, labels aligned
pub fn format_plan(plan: &ReleasePlan) -> Vec<String> {
    vec![
        format!("  Current version:  {}", plan.version),
        format!("  Release prefix:   {}", plan.release_prefix),
        format!("  Release branch:   {}", plan.release_branch),
        format!("  Release tag:      {}", plan.release_tag),
        format!("  Next version:     {}", plan.next_version),
    ]
}

/// Display the release plan with a bold heading.
pub fn display_plan(plan: &ReleasePlan) {
    println!("\n{}", style("Release plan:").bold());
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

/// Lines summarising a finished cut
pub fn format_outcome(outcome: &CutOutcome) -> Vec<String> {
    let plan = &outcome.plan;
    if outcome.dry_run {
        return vec![
            format!("Would create branch {} and tag {} at HEAD", plan.release_branch, plan.release_tag),
            format!("Would bump version to {}", plan.next_version),
        ];
    }

    let mut lines = vec![format!(
        "Created branch {} and tag {}",
        plan.release_branch, plan.release_tag
    )];
    match outcome.bump_commit {
        Some(oid) => lines.push(format!("Committed version {} ({})", plan.next_version, &oid.to_string()[..7])),
        None => lines.push(format!("Wrote version {}", plan.next_version)),
    }
    if !outcome.pushed_refs.is_empty() {
        lines.push(format!("Pushed {}", outcome.pushed_refs.join(", ")));
    }
    lines
}

/// Display manual push instruction for refs that stayed local.
pub fn display_manual_push_instruction(refs: &[String], remote: &str) {
    println!(
        "\n{} To push these refs later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, refs.join(" "))).cyan()
    );
}

/// Display existing release branches and tags.
pub fn display_release_refs(refs: &ReleaseRefs) {
    println!("{}", style("Release branches:").bold());
    if refs.branches.is_empty() {
        println!("  (none)");
    }
    for (name, _) in &refs.branches {
        println!("  - {}", name);
    }

    println!("{}", style("Release tags:").bold());
    if refs.tags.is_empty() {
        println!("  (none)");
    }
    for (name, _) in &refs.tags {
        println!("  - {}", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use git2::Oid;

    fn plan() -> ReleasePlan {
        ReleasePlan::new(Version::new(2, 3, 0)).unwrap()
    }

    #[test]
    fn test_format_plan() {
        let lines = format_plan(&plan());
        assert_eq!(lines.len(), 5);
        assert!(lines[1].ends_with("2.3"));
        assert!(lines[2].ends_with("v2.3.x"));
        assert!(lines[4].ends_with("2.4.0"));
    }

    #[test]
    fn test_format_outcome_dry_run() {
        let outcome = CutOutcome {
            plan: plan(),
            release_commit: None,
            bump_commit: None,
            pushed_refs: Vec::new(),
            warnings: Vec::new(),
            dry_run: true,
        };
        let lines = format_outcome(&outcome);
        assert!(lines[0].starts_with("Would create branch v2.3.x"));
    }

    #[test]
    fn test_format_outcome_committed_and_pushed() {
        let oid = Oid::from_str("abcdef1234567890abcdef1234567890abcdef12").unwrap();
        let outcome = CutOutcome {
            plan: plan(),
            release_commit: Some(oid),
            bump_commit: Some(oid),
            pushed_refs: vec!["refs/tags/v2.3.0".to_string()],
            warnings: Vec::new(),
            dry_run: false,
        };
        let lines = format_outcome(&outcome);
        assert_eq!(lines[1], "Committed version 2.4.0 (abcdef1)");
        assert_eq!(lines[2], "Pushed refs/tags/v2.3.0");
    }
}

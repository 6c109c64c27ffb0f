//! User interface module - interaction (prompts) and formatting.
//!
//! - `formatter` - output rendering
//! - this module - interactive prompts

use std::io::{self, Write};

use anyhow::Result;

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_manual_push_instruction, display_plan,
    display_release_refs, display_status, display_success, format_outcome, format_plan,
};

/// Whether a prompt response counts as confirmation
pub fn is_affirmative(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive). Default is "no" if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_affirmative(&input))
}

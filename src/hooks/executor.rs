use crate::error::{ReleaseCutError, Result};
use crate::hooks::HookContext;
use std::path::Path;
use std::process::Command;

/// Executes release-cut hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script is executed with environment variables set from the context.
    /// If the script exits with code 0, the hook succeeds. Any non-zero exit code
    /// is treated as a failure.
    ///
    /// # Arguments
    /// * `script_path` - Path to the hook script (must be executable)
    /// * `context` - Hook context with environment variables
    ///
    /// # Returns
    /// * `Ok(())` if hook succeeds (exit code 0)
    /// * `Err` if script not found, not executable, or returns non-zero exit code
    pub fn execute(script_path: &str, context: &HookContext) -> Result<()> {
        let path = Path::new(script_path);

        if !path.exists() {
            return Err(ReleaseCutError::hook(format!(
                "Hook script not found: {}",
                script_path
            )));
        }

        if !path.is_file() {
            return Err(ReleaseCutError::hook(format!(
                "Hook path is not a file: {}",
                script_path
            )));
        }

        tracing::info!(hook = context.hook_type.name(), script = script_path, "running hook");

        let output = Command::new(script_path)
            .envs(context.to_env_vars())
            .output()
            .map_err(|e| {
                ReleaseCutError::hook(format!("Failed to execute hook {}: {}", script_path, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(ReleaseCutError::hook(format!(
                "Hook {} failed with exit code {}\nStdout: {}\nStderr: {}",
                script_path,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReleasePlan, Version};
    use crate::hooks::HookType;
    use serial_test::serial;

    fn context(hook_type: HookType) -> HookContext {
        let plan = ReleasePlan::new(Version::new(1, 0, 0)).unwrap();
        HookContext::from_plan(hook_type, &plan, "origin")
    }

    #[test]
    fn test_nonexistent_hook_fails() {
        let result = HookExecutor::execute("/nonexistent/path/to/hook.sh", &context(HookType::PreCut));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Hook script not found"));
    }

    #[test]
    fn test_hook_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = HookExecutor::execute(
            dir.path().to_str().unwrap(),
            &context(HookType::PublishDocs),
        );
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a file"));
    }

    #[cfg(unix)]
    #[test]
    #[serial(hook_scripts)]
    fn test_hook_receives_environment() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let script = dir.path().join("hook.sh");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$RELEASECUT_HOOK $RELEASECUT_PREFIX\" > {}\n",
                out.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        HookExecutor::execute(script.to_str().unwrap(), &context(HookType::PublishDocs)).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "publish-docs 1.0\n");
    }

    #[cfg(unix)]
    #[test]
    #[serial(hook_scripts)]
    fn test_hook_nonzero_exit_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "#!/bin/sh\necho nope >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = HookExecutor::execute(script.to_str().unwrap(), &context(HookType::PreCut))
            .unwrap_err()
            .to_string();
        assert!(err.contains("exit code 3"));
        assert!(err.contains("nope"));
    }
}

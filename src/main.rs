use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use release_cut::boundary::BoundaryWarning;
use release_cut::cli::orchestration::{self, CutWorkflowArgs};
use release_cut::config::{self, Config};
use release_cut::git::{Git2Repository, Repository};
use release_cut::logging;
use release_cut::ui;
use release_cut::version_file::VersionFile;

#[derive(Parser)]
#[command(
    name = "release-cut",
    version,
    about = "Cut a minor release: branch, tag, and bump the unstable version"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Version file (overrides the config)")]
    version_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the release plan derived from the version file
    Plan {
        #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
    },
    /// Create the release branch and tag, then bump the version of record
    Cut {
        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        force: bool,

        #[arg(long, help = "Keep the release refs local")]
        no_push: bool,

        #[arg(long, help = "Rewrite the version file without committing it")]
        no_commit: bool,

        #[arg(long, help = "Remote to push to (overrides the config)")]
        remote: Option<String>,
    },
    /// Only rewrite the version file with the next unstable version
    Bump {
        #[arg(long, help = "Print the new version without writing it")]
        dry_run: bool,
    },
    /// List existing release branches and tags
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlanFormat {
    Text,
    Toml,
    Env,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    match args.command {
        Command::Plan { format } => {
            let version_file = version_file_outside_repo(&config, args.version_file.as_deref())?;
            let version = version_file.read()?;
            let plan = release_cut::domain::ReleasePlan::with_patterns(
                version,
                &config.branch_pattern()?,
                &config.tag_pattern()?,
            )?;

            match format {
                PlanFormat::Text => ui::display_plan(&plan),
                PlanFormat::Toml => print!("{}", toml::to_string(&plan)?),
                PlanFormat::Env => {
                    for line in plan.to_env_lines() {
                        println!("{}", line);
                    }
                }
            }
        }
        Command::Bump { dry_run } => {
            let version_file = version_file_outside_repo(&config, args.version_file.as_deref())?;
            let (current, next) = orchestration::run_bump(&version_file, dry_run)?;
            if dry_run {
                ui::display_status(&format!("Would bump {} -> {}", current, next));
            } else {
                ui::display_success(&format!(
                    "Bumped {} -> {} in {}",
                    current,
                    next,
                    version_file.path().display()
                ));
            }
        }
        Command::List => {
            let repo = Git2Repository::open(".").context("Git repository error")?;
            let refs = orchestration::list_release_refs(&repo, &config)?;
            ui::display_release_refs(&refs);
        }
        Command::Cut {
            dry_run,
            force,
            no_push,
            no_commit,
            remote,
        } => {
            let repo = Git2Repository::open(".").context("Git repository error")?;
            let version_file = version_file_in_repo(&repo, &config, args.version_file.as_deref())?;

            let mut workflow_args = CutWorkflowArgs::from_config(&config);
            workflow_args.dry_run = dry_run;
            workflow_args.push &= !no_push;
            workflow_args.commit &= !no_commit;
            if let Some(remote) = remote {
                workflow_args.remote = remote;
            }

            let plan = orchestration::prepare_plan(&repo, &config, &version_file)?;
            ui::display_plan(&plan);

            if !force
                && !dry_run
                && !ui::confirm_action(&format!("Cut release {}?", plan.release_prefix))?
            {
                println!("Release cut cancelled by user.");
                return Ok(());
            }

            let outcome =
                orchestration::run_cut_workflow(&repo, &config, &version_file, &workflow_args)?;

            for line in ui::format_outcome(&outcome) {
                ui::display_success(&line);
            }
            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
                if let BoundaryWarning::PushSkipped { remote, refs } = warning {
                    ui::display_manual_push_instruction(refs, remote);
                }
            }
        }
    }

    Ok(())
}

fn configured_path<'a>(config: &'a Config, cli_override: Option<&'a Path>) -> &'a Path {
    cli_override.unwrap_or(config.version_file.as_path())
}

/// Version file for commands that do not need git: relative to the current directory
fn version_file_outside_repo(config: &Config, cli_override: Option<&Path>) -> Result<VersionFile> {
    let cwd = std::env::current_dir()?;
    Ok(VersionFile::resolve(&cwd, configured_path(config, cli_override)))
}

/// Version file for a cut: a configured path is relative to the repository work tree,
/// a command-line path to the current directory
fn version_file_in_repo<R: Repository>(
    repo: &R,
    config: &Config,
    cli_override: Option<&Path>,
) -> Result<VersionFile> {
    if cli_override.is_some() {
        return version_file_outside_repo(config, cli_override);
    }
    let base = match repo.workdir() {
        Some(workdir) => workdir,
        None => std::env::current_dir()?,
    };
    Ok(VersionFile::resolve(&base, &config.version_file))
}

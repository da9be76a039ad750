//! CLI Adapter.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::app::api;
use crate::app::commands::COMMENT_STATUS_OUTPUT;
use crate::app::config::CURRENT_REPOSITORY_ENV;
use crate::app::output::write_step_output;
use crate::domain::{AppError, RepoName};

#[derive(Parser)]
#[command(name = "syncwith")]
#[command(version)]
#[command(
    about = "Coordinate CI across pull requests synced through a tracking issue",
    long_about = None
)]
struct Cli {
    /// Configuration file (defaults to $SYNCWITH_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish head SHAs of synced PRs as the `prs-shas` step output
    FetchShas {
        /// Repository of the invoking PR, e.g. org/repo
        repo: RepoName,
        /// Pull request number
        pr_number: u64,
    },
    /// Publish merge refs of synced PRs as the `prs-refs` step output
    FetchRefs {
        /// Repository of the invoking PR, e.g. org/repo
        repo: RepoName,
        /// Pull request number
        pr_number: u64,
    },
    /// Print synced PRs with their latest run of a workflow as JSON
    FindPrs {
        /// Repository of the invoking PR, e.g. org/repo
        repo: RepoName,
        /// Pull request number
        pr_number: u64,
        /// GITHUB_WORKFLOW_REF value, e.g. org/repo/.github/workflows/ci.yml@refs/heads/main
        workflow_ref: String,
    },
    /// Create or update the related-PRs comment on the tracking issue
    LinkToIssue {
        /// Repository of the invoking PR, e.g. org/repo
        repo: RepoName,
        /// Pull request number
        pr_number: u64,
    },
    /// Cancel and rerun CI of the other synced PRs
    RerunChecks {
        /// Repository of the invoking PR, e.g. org/repo
        repo: RepoName,
        /// Pull request number
        pr_number: u64,
    },
    /// Check out synced commits in nested git working copies
    CheckoutSynced {
        /// `owner/repo: sha` lines (read from stdin when omitted)
        #[arg(long)]
        repo_data: Option<String>,
        /// Glob of paths to skip, relative to DIR (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result: Result<(), AppError> = match cli.command {
        Commands::FetchShas { repo, pr_number } => {
            run_fetch(config, repo, pr_number, api::FetchKind::Shas)
        }
        Commands::FetchRefs { repo, pr_number } => {
            run_fetch(config, repo, pr_number, api::FetchKind::Refs)
        }
        Commands::FindPrs { repo, pr_number, workflow_ref } => {
            run_find_prs(config, repo, pr_number, workflow_ref)
        }
        Commands::LinkToIssue { repo, pr_number } => run_link(config, repo, pr_number),
        Commands::RerunChecks { repo, pr_number } => run_rerun(config, repo, pr_number),
        Commands::CheckoutSynced { repo_data, exclude, dir } => {
            run_checkout(repo_data, exclude, dir)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_fetch(
    config: Option<&Path>,
    repo: RepoName,
    pr_number: u64,
    kind: api::FetchKind,
) -> Result<(), AppError> {
    let output = api::fetch(config, api::FetchOptions { repo, pr_number, kind })?;
    write_step_output(kind.output_name(), &output.render())
}

fn run_find_prs(
    config: Option<&Path>,
    repo: RepoName,
    pr_number: u64,
    workflow_ref: String,
) -> Result<(), AppError> {
    let output = api::find_prs(config, api::FindPrsOptions { repo, pr_number, workflow_ref })?;
    let json = serde_json::to_string(&output).map_err(|e| AppError::ParseError {
        what: "find-prs output".to_string(),
        details: e.to_string(),
    })?;
    println!("{}", json);
    Ok(())
}

fn run_link(config: Option<&Path>, repo: RepoName, pr_number: u64) -> Result<(), AppError> {
    let output = api::link_to_issue(config, api::LinkOptions { repo, pr_number })?;
    write_step_output(COMMENT_STATUS_OUTPUT, output.status.as_str())?;
    eprintln!("✅ Issue {} comment {}", output.issue, output.status);
    Ok(())
}

fn run_rerun(config: Option<&Path>, repo: RepoName, pr_number: u64) -> Result<(), AppError> {
    let current_repository = std::env::var(CURRENT_REPOSITORY_ENV).ok();
    let options = api::RerunOptions { repo, pr_number, current_repository };
    let output = api::rerun_checks(config, options)?;

    for (repo, ids) in &output.rerun {
        eprintln!("✅ {}: rerun requested for {} run(s)", repo, ids.len());
    }
    for repo in &output.skipped {
        eprintln!("  Skipped {} (current repository)", repo);
    }
    Ok(())
}

fn run_checkout(
    repo_data: Option<String>,
    exclude: Vec<String>,
    dir: PathBuf,
) -> Result<(), AppError> {
    let repo_data = match repo_data {
        Some(data) => data,
        None => {
            let mut data = String::new();
            std::io::stdin().read_to_string(&mut data)?;
            data
        }
    };

    let output = api::checkout_synced(api::CheckoutOptions { root: dir, repo_data, exclude })?;
    eprintln!("✅ Checked out {} repository(ies)", output.checked_out.len());
    if !output.failed.is_empty() {
        eprintln!("⚠️  {} checkout(s) failed", output.failed.len());
    }
    Ok(())
}

//! Cancel, wait for, and rerun the CI runs of a pull request head.

use std::thread;
use std::time::Duration;

use crate::domain::{AppError, RepoName, WorkflowWaitConfig, is_final_status};
use crate::ports::{GitHub, WorkflowRun};

/// Event name of runs triggered by pull request activity.
pub const PULL_REQUEST_EVENT: &str = "pull_request";

/// Polling cadence while waiting for a cancelled run to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl From<&WorkflowWaitConfig> for WaitPolicy {
    fn from(config: &WorkflowWaitConfig) -> Self {
        Self { poll_interval: config.poll_interval(), timeout: config.timeout() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The run reached a terminal status.
    Finished,
    /// Someone already restarted the run while we waited.
    NewAttemptStarted,
}

/// Poll `run` until it is terminal, a new attempt shows up, or the policy times out.
pub fn wait_for_completion(
    github: &impl GitHub,
    repo: &RepoName,
    run: &WorkflowRun,
    policy: WaitPolicy,
) -> Result<WaitOutcome, AppError> {
    let mut waited = Duration::ZERO;
    loop {
        let current = github.get_workflow_run(repo, run.id)?;
        if current.run_attempt > run.run_attempt {
            tracing::info!(
                "Run {} moved to attempt {} while waiting",
                run.id,
                current.run_attempt
            );
            return Ok(WaitOutcome::NewAttemptStarted);
        }
        if is_final_status(&current.status) {
            tracing::debug!("Run {} finished with status {}", run.id, current.status);
            return Ok(WaitOutcome::Finished);
        }
        if waited >= policy.timeout {
            return Err(AppError::WaitTimeout { run_id: run.id, waited_secs: waited.as_secs() });
        }

        tracing::debug!(
            "Run {} is {}; polling again in {:?}",
            run.id,
            current.status,
            policy.poll_interval
        );
        thread::sleep(policy.poll_interval);
        waited += policy.poll_interval;
    }
}

/// Restart every pull-request run for `head_sha` in `repo`.
///
/// Runs still in flight are cancelled and awaited first. Returns the ids of
/// the runs a rerun was requested for.
pub fn rerun_all(
    github: &impl GitHub,
    repo: &RepoName,
    head_sha: &str,
    policy: WaitPolicy,
) -> Result<Vec<u64>, AppError> {
    let runs = github.list_workflow_runs(repo, head_sha, PULL_REQUEST_EVENT)?;
    if runs.is_empty() {
        tracing::info!("No workflow runs for {}@{}", repo, head_sha);
    }

    let mut rerun = Vec::new();
    for run in runs {
        if !is_final_status(&run.status) {
            tracing::info!("Cancelling run {} in {} (status {})", run.id, repo, run.status);
            github.cancel_workflow_run(repo, run.id)?;
            if wait_for_completion(github, repo, &run, policy)? == WaitOutcome::NewAttemptStarted {
                continue;
            }
        }

        tracing::info!("Rerunning run {} in {}", run.id, repo);
        github.rerun_workflow_run(repo, run.id)?;
        rerun.push(run.id);
    }
    Ok(rerun)
}

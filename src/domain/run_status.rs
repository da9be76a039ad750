//! CI workflow run status classification.

/// Statuses from which a run does not move on without external action.
pub const FINAL_STATUSES: [&str; 9] = [
    "completed",
    "action_required",
    "cancelled",
    "failure",
    "neutral",
    "skipped",
    "stale",
    "success",
    "timed_out",
];

/// Whether `status` is terminal; unknown statuses are treated as still running.
pub fn is_final_status(status: &str) -> bool {
    FINAL_STATUSES.contains(&status)
}

//! GitHub Actions step output helper.
//!
//! Values are written as multi-line blocks (`name<<EOF ... EOF`) so newline
//! separated lists survive intact.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::domain::AppError;

/// File that GitHub Actions reads step outputs from.
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

const DELIMITER: &str = "EOF";

/// Format one output as a delimited block.
pub fn format_output_block(name: &str, value: &str) -> String {
    let mut delimiter = DELIMITER.to_string();
    let mut suffix = 0;
    while value.lines().any(|line| line == delimiter) {
        suffix += 1;
        delimiter = format!("{}_{}", DELIMITER, suffix);
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Append an output to the `GITHUB_OUTPUT` file, or print it when unset.
pub fn write_step_output(name: &str, value: &str) -> Result<(), AppError> {
    match std::env::var_os(GITHUB_OUTPUT_ENV).filter(|v| !v.is_empty()) {
        Some(path) => append_step_output(Path::new(&path), name, value),
        None => {
            tracing::warn!("{} is not set; printing step output '{}'", GITHUB_OUTPUT_ENV, name);
            print!("{}", format_output_block(name, value));
            Ok(())
        }
    }
}

/// Append an output block to `path`.
pub fn append_step_output(path: &Path, name: &str, value: &str) -> Result<(), AppError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path).map_err(|e| {
        AppError::config_error(format!("Failed to open {}: {}", GITHUB_OUTPUT_ENV, e))
    })?;
    file.write_all(format_output_block(name, value).as_bytes())?;
    tracing::debug!("Wrote step output '{}'", name);
    Ok(())
}

use std::ffi::OsStr;

use tokio::process::Command;

use super::ExtractionError;

/// Runs an external extraction program and returns its stdout as UTF-8.
///
/// A program that cannot be spawned or that exits non-zero is an error carrying
/// the program name and its stderr.
pub async fn run_to_string<I, S>(program: &str, args: I) -> Result<String, ExtractionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ExtractionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExtractionError::CommandFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8(output.stdout)?)
}

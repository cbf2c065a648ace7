use std::io::{BufRead, Write};
use std::path::Path;

/// What to do about an output file that may already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteDecision {
    Proceed,
    Declined,
}

/// Ask before replacing an existing `path`, unless `overwrite` is set.
///
/// Only an explicit `y` or `yes` (any case) proceeds; an empty answer or EOF
/// declines.
pub fn confirm_overwrite<R, W>(
    path: &Path,
    overwrite: bool,
    mut input: R,
    mut output: W,
) -> std::io::Result<OverwriteDecision>
where
    R: BufRead,
    W: Write,
{
    if overwrite || !path.exists() {
        return Ok(OverwriteDecision::Proceed);
    }

    write!(output, "{} already exists. Overwrite? [y/N] ", path.display())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(OverwriteDecision::Proceed),
        _ => Ok(OverwriteDecision::Declined),
    }
}

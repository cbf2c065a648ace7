use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::cli::Cli;
use crate::data::filter::FilterObserver;
use crate::data::loader::load_scenes;
use crate::data::writer::write_scene_ids;
use crate::prompt::{confirm_overwrite, OverwriteDecision};

// ---------------------------------------------------------------------------
// One batch run: load → filter → write
// ---------------------------------------------------------------------------

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written {
        loaded: usize,
        written: usize,
        output: PathBuf,
    },
    /// The output exists and the user chose not to replace it.
    Declined,
}

/// Run the whole pipeline for the parsed command line.
///
/// The overwrite question is asked on `prompt_in`/`prompt_out` before the
/// input is loaded. Filter progress goes to `observer`.
pub fn run<R, W>(
    cli: &Cli,
    prompt_in: R,
    prompt_out: W,
    observer: &mut dyn FilterObserver,
) -> Result<RunOutcome>
where
    R: BufRead,
    W: Write,
{
    let criteria = cli.criteria();
    criteria.validate()?;
    let options = cli.load_options()?;

    let decision = confirm_overwrite(&cli.output, cli.overwrite, prompt_in, prompt_out)
        .context("asking for overwrite confirmation")?;
    if decision == OverwriteDecision::Declined {
        return Ok(RunOutcome::Declined);
    }

    let table = load_scenes(&cli.filename, &options)?;
    let loaded = table.len();
    if table.is_empty() {
        warn!("{} contains no entries", cli.filename.display());
    }
    if criteria.is_empty() {
        info!("no filters given, keeping all {loaded} entries");
    }

    let table = criteria.apply(table, observer);
    let ids = table.into_entity_ids();
    let written = write_scene_ids(&cli.output, &ids)?;

    Ok(RunOutcome::Written {
        loaded,
        written,
        output: cli.output.clone(),
    })
}

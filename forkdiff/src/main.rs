//! forkdiff: document how a fork diverges from its base branch.
//!
//! # Pipeline
//!
//! 1. Load the page definition (strict schema, fails before touching git).
//! 2. Open the repository and resolve base and target to trees.
//! 3. Diff the trees and index the changes by canonical path.
//! 4. Resolve the section tree against the target's entry listing.
//! 5. Render the whole report in memory, then write it in one step, so a
//!    failure anywhere leaves no partial report behind.

mod cli;
mod render;

use std::io::Write as _;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use forkdiff_core::logging;
use forkdiff_core::patch_index::PatchIndex;
use forkdiff_core::resolver::SectionResolver;
use forkdiff_core::section::Page;
use forkdiff_core::snapshot;
use tracing::{info, warn};

use cli::{Cli, OutputFormat};
use render::Report;

/// Exit status when `--fail-on-unclaimed` is set and coverage is incomplete.
/// Distinct from clap's usage-error status 2 and the generic failure status 1.
const EXIT_UNCLAIMED: u8 = 3;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_format.into(), cli.verbose);

    let unclaimed = run(&cli)?;
    if cli.fail_on_unclaimed && unclaimed > 0 {
        return Ok(ExitCode::from(EXIT_UNCLAIMED));
    }
    Ok(ExitCode::SUCCESS)
}

/// Produces and writes the report. Returns the number of unclaimed files.
fn run(cli: &Cli) -> Result<usize> {
    let page = Page::load(&cli.fork)?;

    let repo = snapshot::open_repository(&cli.repo)?;
    let base = snapshot::resolve_tree(&repo, &cli.base)?;
    let target = snapshot::resolve_tree(&repo, &cli.target)?;
    let changes = snapshot::compute_diff(&repo, &base, &target, &cli.diff_settings())?;
    let entries = snapshot::list_entries(&target, cli.listing_mode())?;

    let index = PatchIndex::build(changes);
    if index.collisions() > 0 {
        warn!(collisions = index.collisions(), "patch index dropped colliding changes");
    }

    let resolution = SectionResolver::new(&entries, &index).resolve_tree(&page.def)?;
    info!(
        base = %cli.base,
        target = %cli.target,
        changed = resolution.total,
        claimed = resolution.claimed_count(),
        unclaimed = resolution.remaining.len(),
        "resolved fork coverage"
    );

    let report = Report {
        page: &page,
        resolution: &resolution,
        index: &index,
        base: &cli.base,
        target: &cli.target,
    };
    let rendered = match cli.output_format() {
        OutputFormat::Markdown => render::markdown::render(&report),
        OutputFormat::Html => render::html::render(&report),
    };
    write_output(cli, &rendered)?;

    Ok(resolution.remaining.len())
}

fn write_output(cli: &Cli, rendered: &str) -> Result<()> {
    if cli.writes_to_stdout() {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .and_then(|()| stdout.flush())
            .context("failed to write report to stdout")?;
        return Ok(());
    }
    std::fs::write(&cli.out, rendered)
        .with_context(|| format!("failed to write report to {:?}", cli.out))?;
    info!(path = %cli.out.display(), bytes = rendered.len(), "wrote report");
    Ok(())
}

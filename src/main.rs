mod cli;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use nicsweep::catalog::{catalog, LocationDescriptor};
use nicsweep::output;
use nicsweep::runner::run_batch;
use nicsweep::snapshot::SnapshotStore;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Locations => {
            for location in catalog() {
                println!("{:<32} {:<16} {}", location.id, location.strategy.kind(), location.path);
            }
            Ok(())
        }
        Command::Scan { store, location, json, guids } => {
            run(store, false, location, json, guids)
        }
        Command::Purge { store, confirm, location, json, guids } => {
            if !confirm && !json {
                output::print_no_confirm_warning();
            }
            run(store, confirm, location, json, guids)
        }
    }
}

fn selected_locations(filter: Option<&str>) -> Result<Vec<LocationDescriptor>> {
    let mut locations = catalog();
    if let Some(filter) = filter {
        locations.retain(|l| l.id.contains(filter));
        if locations.is_empty() {
            bail!("no catalog location matches '{filter}'");
        }
    }
    Ok(locations)
}

fn run(
    store_path: PathBuf,
    apply: bool,
    location: Option<String>,
    json: bool,
    guids: Vec<String>,
) -> Result<()> {
    let mut store = SnapshotStore::load(&store_path)?;
    let locations = selected_locations(location.as_deref())?;
    let dry_run = !apply;

    let summaries = run_batch(&mut store, &locations, &guids, dry_run)?;

    if apply {
        store
            .save(&store_path)
            .context("run applied but snapshot could not be written back")?;
    }

    if json {
        output::print_json(&summaries, dry_run)?;
    } else {
        output::print_banner();
        for summary in &summaries {
            output::print_guid_header(&summary.guid, dry_run);
            for record in &summary.records {
                output::print_record(record);
            }
            output::print_summary(summary, dry_run);
        }
        if dry_run {
            output::print_dry_run_footer();
        }
    }

    // Errors at individual locations are recorded, not fatal; they only
    // decide the exit status once the whole batch has run.
    if summaries.iter().any(|s| s.has_errors()) {
        std::process::exit(1);
    }
    Ok(())
}

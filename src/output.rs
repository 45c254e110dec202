use colored::Colorize;
use serde::Serialize;

use crate::runner::RunSummary;
use crate::strategy::{Action, OutcomeRecord};

pub fn print_banner() {
    println!("{}", "nicsweep - network adapter trace remover".bold().cyan());
    println!();
}

pub fn print_guid_header(guid: &str, dry_run: bool) {
    let mode = if dry_run { " (dry run)" } else { "" };
    println!("{}", format!("=== {guid}{mode} ===").bold().white());
}

pub fn print_record(record: &OutcomeRecord) {
    let detail = record.detail.as_deref().unwrap_or("");
    match record.action {
        Action::NoneFound => {
            println!(
                "  {:<14} {}  {}",
                "not found".dimmed(),
                record.location_id.dimmed(),
                detail.dimmed()
            );
        }
        Action::WouldDeleteNode | Action::WouldClearProperty
        | Action::WouldRemoveListEntries => {
            println!(
                "  {:<14} {}  {}",
                "would remove".yellow(),
                record.location_id,
                detail.yellow()
            );
        }
        Action::DeletedNode => {
            println!(
                "  {:<14} {}  {}",
                "deleted".red(),
                record.location_id,
                detail.dimmed()
            );
        }
        Action::ClearedProperty => {
            println!(
                "  {:<14} {}  {}",
                "cleared".red(),
                record.location_id,
                detail.dimmed()
            );
        }
        Action::RemovedListEntries => {
            println!(
                "  {:<14} {}  {}",
                "removed".red(),
                record.location_id,
                detail.dimmed()
            );
        }
        Action::Error => {
            println!(
                "  {:<14} {}  {}",
                "failed".red().bold(),
                record.location_id,
                detail.red()
            );
        }
    }
}

pub fn print_summary(summary: &RunSummary, dry_run: bool) {
    let removed = if dry_run {
        summary.count(Action::WouldDeleteNode)
            + summary.count(Action::WouldClearProperty)
            + summary.count(Action::WouldRemoveListEntries)
    } else {
        summary.count(Action::DeletedNode)
            + summary.count(Action::ClearedProperty)
            + summary.count(Action::RemovedListEntries)
    };
    let label = if dry_run { "matches:" } else { "removed:" };
    println!("  {} {}", label.bold(), removed.to_string().green());
    let errors = summary.errors().len();
    if errors > 0 {
        println!("  {} {}", "errors:".bold(), errors.to_string().red());
    }
    println!();
}

pub fn print_dry_run_footer() {
    println!(
        "{}",
        "This was a dry run. Run `nicsweep purge --confirm` to remove."
            .yellow()
            .bold()
    );
}

pub fn print_no_confirm_warning() {
    println!(
        "{}",
        "No --confirm flag provided. Running as dry-run scan."
            .yellow()
            .bold()
    );
    println!();
}

#[derive(Serialize)]
struct JsonOut<'a> {
    ok: bool,
    dry_run: bool,
    runs: &'a [RunSummary],
}

pub fn print_json(summaries: &[RunSummary], dry_run: bool) -> anyhow::Result<()> {
    let ok = !summaries.iter().any(|s| s.has_errors());
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok, dry_run, runs: summaries })?
    );
    Ok(())
}

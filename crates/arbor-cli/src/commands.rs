use anyhow::Context;
use arbor_reconcile::{ChangeSet, DocumentSource, ReconcileConfig, Reconciler};
use arbor_types::{ChangeEvent, ChangeKind};
use colored::Colorize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.format),
        Command::Summary(args) => cmd_summary(args, cli.format),
    }
}

fn cmd_diff(args: SnapshotArgs, format: OutputFormat) -> anyhow::Result<()> {
    let changes = reconcile_snapshots(&args)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changes)?),
        OutputFormat::Text if changes.is_empty() => println!("No changes."),
        OutputFormat::Text => {
            for event in &changes {
                println!("{}", render_event(event));
            }
        }
    }
    Ok(())
}

fn cmd_summary(args: SnapshotArgs, format: OutputFormat) -> anyhow::Result<()> {
    let changes = reconcile_snapshots(&args)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary_json(&changes))?),
        OutputFormat::Text => {
            println!("{} events", changes.len().to_string().bold());
            println!("  {} {}", "added:".green(), changes.additions());
            println!("  {} {}", "removed:".red(), changes.removals());
            println!("  {} {}", "changed:".yellow(), changes.modifications());
        }
    }
    Ok(())
}

fn reconcile_snapshots(args: &SnapshotArgs) -> anyhow::Result<ChangeSet> {
    let old_source = DocumentSource::from_arg(&args.old);
    let new_source = DocumentSource::from_arg(&args.new);
    if old_source.is_stdin() && new_source.is_stdin() {
        anyhow::bail!("stdin can supply only one of the two snapshots");
    }

    let mut config = ReconcileConfig::default().with_traversal(args.traversal.into());
    if let Some(root) = &args.root {
        config = config.with_root_str(root)?;
    }

    let old = old_source
        .load()
        .with_context(|| format!("loading old snapshot from {}", old_source.origin()))?;
    let new = new_source
        .load()
        .with_context(|| format!("loading new snapshot from {}", new_source.origin()))?;
    debug!(
        old_nodes = old.node_count(),
        new_nodes = new.node_count(),
        "snapshots loaded"
    );

    Ok(Reconciler::new(config).reconcile(&old, &new))
}

fn render_event(event: &ChangeEvent) -> String {
    let location = event.location.to_string();
    match event.kind {
        ChangeKind::ChildAdded => format!("{} {}", "+".green().bold(), location.green()),
        ChangeKind::ChildRemoved => format!("{} {}", "-".red().bold(), location.red()),
        ChangeKind::ChildChanged => format!("{} {}", "~".yellow().bold(), location),
    }
}

fn summary_json(changes: &ChangeSet) -> serde_json::Value {
    serde_json::json!({
        "events": changes.len(),
        "child_added": changes.additions(),
        "child_removed": changes.removals(),
        "child_changed": changes.modifications(),
    })
}

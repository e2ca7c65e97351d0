use arbor_reconcile::Traversal;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "arbor",
    about = "Arbor: structural change events between two JSON snapshots",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List change events between two snapshots
    Diff(SnapshotArgs),
    /// Count change events by kind
    Summary(SnapshotArgs),
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// Old snapshot: a JSON file, `-` for stdin, or `:absent`
    pub old: String,
    /// New snapshot: a JSON file, `-` for stdin, or `:absent`
    pub new: String,
    /// Pointer prefixed to every reported location, e.g. `/doc/body`
    #[arg(long)]
    pub root: Option<String>,
    #[arg(long, default_value = "recursive")]
    pub traversal: TraversalArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TraversalArg {
    Recursive,
    WorkStack,
}

impl From<TraversalArg> for Traversal {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::Recursive => Traversal::Recursive,
            TraversalArg::WorkStack => Traversal::WorkStack,
        }
    }
}

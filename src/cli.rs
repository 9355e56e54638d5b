//! CLI argument parsing for the pipeline stages.
//!
//! Each stage subcommand is one invocation over one landed file; the
//! orchestrator sequencing them lives outside this binary.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "orderflow",
    version,
    about = "Validate and enrich landed order batches",
    after_help = "Examples:\n  orderflow --root /srv/data validate --bucket orders-input --key customers.json\n  orderflow --root /srv/data validate --bucket orders-input --key customer_orders_001.jsonl\n  orderflow --root /srv/data transform --event event.json\n  orderflow --root /srv/data records --record-id o1",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Directory holding buckets and record tables
    #[arg(
        long,
        value_name = "DIR",
        env = "ORDERFLOW_ROOT",
        default_value = ".",
        global = true
    )]
    pub root: PathBuf,

    /// Pipeline config JSON (defaults apply when omitted)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stage reference files or validate an order batch
    Validate(EventArgs),
    /// Enrich and persist an order batch
    Transform(EventArgs),
    /// Print persisted records
    Records(RecordsArgs),
}

/// The landed file, given directly or as an event document.
#[derive(Args, Debug)]
pub struct EventArgs {
    /// Bucket the file landed in
    #[arg(long, requires = "key", conflicts_with = "event")]
    pub bucket: Option<String>,

    /// Object key of the landed file
    #[arg(long, requires = "bucket", conflicts_with = "event")]
    pub key: Option<String>,

    /// Event JSON file, or '-' for stdin
    #[arg(long, value_name = "PATH", required_unless_present = "bucket")]
    pub event: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RecordsArgs {
    /// Table to read (defaults to the configured table)
    #[arg(long)]
    pub table: Option<String>,

    /// Print a single record
    #[arg(long, value_name = "ID")]
    pub record_id: Option<String>,
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "ssrmix CLI", long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge a subscription with scraped node loads and push the result
    Merge {
        /// base64 subscription payload ("-" for stdin)
        payload: PathBuf,

        /// JSON config with the allow-list (`custom`) and sink settings
        #[arg(long)]
        config: PathBuf,

        /// load table: JSON object `{id: load}`, or status rows with --rows
        #[arg(long)]
        loads: PathBuf,

        /// read --loads as status-page row text, one row per line
        #[arg(long)]
        rows: bool,

        /// append " (<load>)" to remarks (overrides config)
        #[arg(long, conflicts_with = "no_annotate_load")]
        annotate_load: bool,

        /// never append the load to remarks (overrides config)
        #[arg(long)]
        no_annotate_load: bool,

        /// output directory; falls back to `sink.root` from the config
        #[arg(long)]
        out: Option<PathBuf>,

        /// read the expiry as UTC instead of local time
        #[arg(long)]
        utc: bool,
    },

    /// Print the metadata and every node of a subscription payload
    Inspect {
        /// base64 subscription payload ("-" for stdin)
        payload: PathBuf,
    },

    /// Parse a single ssr:// link and print its fields as JSON
    Link { link: String },
}

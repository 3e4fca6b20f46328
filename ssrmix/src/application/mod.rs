pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use ssrmix_core::error::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Merge {
            payload,
            config,
            loads,
            rows,
            annotate_load,
            no_annotate_load,
            out,
            utc,
        } => handlers::handle_merge(handlers::MergeArgs {
            payload,
            config,
            loads,
            rows,
            annotate: match (annotate_load, no_annotate_load) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            out,
            utc,
        }),
        Commands::Inspect { payload } => handlers::handle_inspect(payload),
        Commands::Link { link } => handlers::handle_link(&link),
    }
}

use std::io::Read;
use std::path::{Path, PathBuf};

use ssrmix_core::error::Result;
use ssrmix_core::merge::decode_lines;
use ssrmix_core::node::NodeDescriptor;
use ssrmix_core::sink::{SinkParams, SubscriptionSink};
use ssrmix_core::sink_factory::{Backend, open_sink};
use ssrmix_core::{Config, ExpiryZone, LoadTable, MergeOptions, merge_with};
use time::UtcOffset;

pub struct MergeArgs {
    pub payload: PathBuf,
    pub config: PathBuf,
    pub loads: PathBuf,
    pub rows: bool,
    /// `None` defers to the config file.
    pub annotate: Option<bool>,
    pub out: Option<PathBuf>,
    pub utc: bool,
}

/// Read a whole file, or stdin for "-".
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin().lock().read_to_string(&mut s)?;
        Ok(s)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn load_table(path: &Path, rows: bool) -> Result<LoadTable> {
    let text = read_input(path)?;
    if rows {
        Ok(LoadTable::from_rows(text.lines()))
    } else {
        LoadTable::from_json_str(&text)
    }
}

pub fn handle_merge(args: MergeArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    tracing::debug!(
        config = %args.config.display(),
        allowed = config.custom.len(),
        "config loaded"
    );
    let loads = load_table(&args.loads, args.rows)?;
    let bulk = read_input(&args.payload)?;

    let opts = MergeOptions {
        annotate_load: args.annotate.unwrap_or(config.annotate_load),
        expiry_zone: if args.utc {
            ExpiryZone::Fixed(UtcOffset::UTC)
        } else {
            ExpiryZone::Local
        },
    };
    let merged = merge_with(&bulk, &config.allow_list(), &loads, &opts)?;

    match args.out.or(config.sink.root) {
        Some(root) => {
            let sink = open_sink(
                Backend::Fs,
                SinkParams {
                    root,
                    filename: config.sink.filename,
                },
            )?;
            let receipt = sink.push(&merged.payload, &merged.usage)?;
            eprintln!(
                "merge: {} node(s), {} bytes, blake3={}{}",
                merged.nodes.len(),
                receipt.bytes,
                receipt.digest,
                if receipt.unchanged { " (unchanged)" } else { "" }
            );
        }
        None => {
            println!("{}", merged.payload);
            eprintln!("{}", merged.usage_metadata());
        }
    }
    Ok(())
}

pub fn handle_inspect(payload: PathBuf) -> Result<()> {
    let lines = decode_lines(&read_input(&payload)?)?;
    for (i, line) in lines.iter().enumerate() {
        let n = NodeDescriptor::parse(line)?;
        if i < 2 {
            println!("meta#{i:<3} {}", n.remarks);
            continue;
        }
        println!(
            "#{:<5} {}:{} group={} id={} remarks={}",
            i - 2,
            n.server,
            n.port,
            n.group,
            n.id().unwrap_or("-"),
            n.remarks
        );
    }
    Ok(())
}

fn link_json(link: &str) -> Result<String> {
    let node = NodeDescriptor::parse(link.trim())?;
    Ok(serde_json::to_string_pretty(&node).map_err(std::io::Error::other)?)
}

pub fn handle_link(link: &str) -> Result<()> {
    println!("{}", link_json(link)?);
    Ok(())
}

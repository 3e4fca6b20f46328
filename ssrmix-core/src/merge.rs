use indexmap::IndexMap;
use time::UtcOffset;
use tracing::{debug, info};

use crate::codec;
use crate::config::AllowList;
use crate::error::{Result, SsrError};
use crate::load::LoadTable;
use crate::meta::{ExpiryZone, SubscriptionMeta, UsageInfo};
use crate::node::NodeDescriptor;

/// Kept nodes keyed by identifier. A repeated identifier keeps its first
/// position but takes the later descriptor.
pub type NodeMap = IndexMap<String, NodeDescriptor>;

#[derive(Clone, Copy, Debug)]
pub struct MergeOptions {
    pub annotate_load: bool,
    /// Zone the expiry timestamp is read in.
    pub expiry_zone: ExpiryZone,
}

impl MergeOptions {
    pub fn local(annotate_load: bool) -> Self {
        Self {
            annotate_load,
            expiry_zone: ExpiryZone::Local,
        }
    }
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            annotate_load: false,
            expiry_zone: ExpiryZone::Fixed(UtcOffset::UTC),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MergedSubscription {
    pub nodes: Vec<NodeDescriptor>,
    pub meta: SubscriptionMeta,
    /// Base64 payload, same shape as the input minus the metadata lines.
    pub payload: String,
    pub usage: UsageInfo,
}

impl MergedSubscription {
    pub fn usage_metadata(&self) -> String {
        self.usage.to_string()
    }
}

/// Merge with the expiry read in local time. Returns `(payload, usage)`.
pub fn merge(
    bulk: &str,
    allow: &AllowList,
    loads: &LoadTable,
    annotate_load: bool,
) -> Result<(String, String)> {
    let merged = merge_with(bulk, allow, loads, &MergeOptions::local(annotate_load))?;
    let usage = merged.usage_metadata();
    Ok((merged.payload, usage))
}

pub fn merge_with(
    bulk: &str,
    allow: &AllowList,
    loads: &LoadTable,
    opts: &MergeOptions,
) -> Result<MergedSubscription> {
    let lines = decode_lines(bulk)?;
    let [quota_line, expiry_line, node_lines @ ..] = &lines[..] else {
        return Err(SsrError::MissingMeta { lines: lines.len() });
    };
    let meta = SubscriptionMeta::from_lines(quota_line, expiry_line, opts.expiry_zone)?;

    let mut kept = select_nodes(node_lines, allow)?;
    attach_loads(&mut kept, loads, opts.annotate_load)?;

    let nodes: Vec<NodeDescriptor> = kept.into_values().collect();
    let payload = encode_nodes(&nodes);
    let usage = meta.usage();
    info!(
        kept = nodes.len(),
        total_gb = meta.quota.total(),
        download_gb = meta.quota.download(),
        expire = meta.expire,
        "subscription merged"
    );
    Ok(MergedSubscription {
        nodes,
        meta,
        payload,
        usage,
    })
}

/// Decode a bulk payload into trimmed lines. Blank lines are dropped.
pub fn decode_lines(bulk: &str) -> Result<Vec<String>> {
    let text = codec::decode(bulk.trim())?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse node lines and keep those whose identifier is allowed, in input order.
pub fn select_nodes<S: AsRef<str>>(lines: &[S], allow: &AllowList) -> Result<NodeMap> {
    let mut kept = NodeMap::new();
    for line in lines {
        let node = NodeDescriptor::parse(line.as_ref())?;
        let Some(id) = node.id().filter(|id| allow.contains(*id)) else {
            debug!(server = %node.server, remarks = %node.remarks, "not in allow-list");
            continue;
        };
        let id = id.to_string();
        if kept.insert(id.clone(), node).is_some() {
            debug!(%id, "duplicate identifier, keeping the later node");
        }
    }
    Ok(kept)
}

/// Join every kept node with its load. A missing entry fails the whole batch.
pub fn attach_loads(nodes: &mut NodeMap, loads: &LoadTable, annotate: bool) -> Result<()> {
    for (id, node) in nodes.iter_mut() {
        let load = loads.lookup(id)?;
        if annotate {
            node.remarks.push_str(&format!(" ({load})"));
        }
        node.load = Some(load.to_string());
    }
    Ok(())
}

pub fn encode_nodes(nodes: &[NodeDescriptor]) -> String {
    let links: Vec<String> = nodes.iter().map(NodeDescriptor::to_link).collect();
    codec::encode(&links.join("\n"))
}

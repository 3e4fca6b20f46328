#![allow(dead_code)]

use ssrmix_core::codec;
use ssrmix_core::{AllowList, LoadTable};

pub const EXPIRY: &str = "过期时间：2020-01-01 00:00:00";

pub fn link(server: &str, remarks: &str, group: &str) -> String {
    let inner = format!(
        "{server}:443:auth_chain_a:none:http_simple:{}/?obfsparam={}&protoparam={}&remarks={}&group={}",
        codec::encode("pw"),
        codec::encode("obfs.example.com"),
        codec::encode(""),
        codec::encode(remarks),
        codec::encode(group),
    );
    format!("ssr://{}", codec::encode(&inner))
}

pub fn bulk_with_expiry(quota: &str, expiry: &str, nodes: &[String]) -> String {
    let mut lines = vec![
        link("0.0.0.0", quota, "MAYING"),
        link("0.0.0.0", expiry, "MAYING"),
    ];
    lines.extend_from_slice(nodes);
    codec::encode(&lines.join("\n"))
}

pub fn bulk(quota: &str, nodes: &[String]) -> String {
    bulk_with_expiry(quota, EXPIRY, nodes)
}

pub fn allow(ids: &[&str]) -> AllowList {
    ids.iter().map(|s| s.to_string()).collect()
}

pub fn loads(pairs: &[(&str, &str)]) -> LoadTable {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

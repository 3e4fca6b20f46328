use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::codec;
use crate::error::{Result, SsrError};

pub const SCHEME: &str = "ssr://";

/// Group whose remarks carry `<id>-<magnification>`.
pub const TAGGED_GROUP: &str = "MAYING";

/// Identifier/magnification pair split out of the remarks of a tagged node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeTag {
    pub id: String,
    pub magnification: String,
}

impl NodeTag {
    fn from_remarks(remarks: &str) -> Self {
        let mut parts = remarks.split('-');
        Self {
            id: parts.next().unwrap_or_default().to_string(),
            magnification: parts.next().unwrap_or_default().to_string(),
        }
    }
}

/// One SSR endpoint.
///
/// `port` stays textual so a link survives a parse/serialize cycle unchanged.
/// `tag` is derived once at parse time and is `Some` exactly when `group`
/// matches [`TAGGED_GROUP`] case-insensitively; later edits to `remarks` do
/// not touch it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub server: String,
    pub port: String,
    pub protocol: String,
    pub method: String,
    pub obfs: String,
    pub password: String,
    pub protoparam: String,
    pub obfsparam: String,
    pub remarks: String,
    pub group: String,
    pub tag: Option<NodeTag>,
    /// Scraped load, joined in by the merger. Never serialized into the link.
    pub load: Option<String>,
}

impl NodeDescriptor {
    /// Parse one `ssr://` link. Decode failures of any inner token report
    /// the whole link.
    pub fn parse(link: &str) -> Result<Self> {
        Self::parse_link(link).map_err(|e| e.in_line(link))
    }

    fn parse_link(link: &str) -> Result<Self> {
        let malformed = |reason: &str| SsrError::MalformedLink {
            link: link.to_string(),
            reason: reason.to_string(),
        };

        let body = link
            .get(SCHEME.len()..)
            .ok_or_else(|| malformed("shorter than the scheme prefix"))?;
        let decoded = codec::decode(body)?;

        let parts: Vec<&str> = decoded.split(':').collect();
        let [server, port, protocol, method, obfs, tail] = parts[..] else {
            return Err(malformed(&format!(
                "expected 6 ':'-separated fields, got {}",
                parts.len()
            )));
        };

        let (password_b64, query) = tail
            .split_once("/?")
            .ok_or_else(|| malformed("no `/?` between password and parameters"))?;
        let password = codec::decode(password_b64)?;

        let mut params = HashMap::new();
        for item in query.split('&').filter(|s| !s.is_empty()) {
            let (k, v) = item.split_once('=').unwrap_or((item, ""));
            params.insert(k, codec::decode(v)?);
        }
        let mut take = |field: &'static str| {
            params.remove(field).ok_or_else(|| SsrError::MissingField {
                link: link.to_string(),
                field,
            })
        };
        let obfsparam = take("obfsparam")?;
        let protoparam = take("protoparam")?;
        let remarks = take("remarks")?;
        let group = take("group")?;

        let tag = group
            .eq_ignore_ascii_case(TAGGED_GROUP)
            .then(|| NodeTag::from_remarks(&remarks));

        Ok(Self {
            server: server.to_string(),
            port: port.to_string(),
            protocol: protocol.to_string(),
            method: method.to_string(),
            obfs: obfs.to_string(),
            password,
            protoparam,
            obfsparam,
            remarks,
            group,
            tag,
            load: None,
        })
    }

    /// Identifier of a tagged node.
    pub fn id(&self) -> Option<&str> {
        self.tag.as_ref().map(|t| t.id.as_str())
    }

    pub fn magnification(&self) -> Option<&str> {
        self.tag.as_ref().map(|t| t.magnification.as_str())
    }

    /// Rebuild the `ssr://` link. Query keys are always emitted in the order
    /// obfsparam, protoparam, remarks, group.
    pub fn to_link(&self) -> String {
        let inner = format!(
            "{}:{}:{}:{}:{}:{}/?obfsparam={}&protoparam={}&remarks={}&group={}",
            self.server,
            self.port,
            self.protocol,
            self.method,
            self.obfs,
            codec::encode(&self.password),
            codec::encode(&self.obfsparam),
            codec::encode(&self.protoparam),
            codec::encode(&self.remarks),
            codec::encode(&self.group),
        );
        format!("{SCHEME}{}", codec::encode(&inner))
    }
}

impl FromStr for NodeDescriptor {
    type Err = SsrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_link())
    }
}

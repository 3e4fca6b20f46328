use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::meta::UsageInfo;
use crate::sink::{PushReceipt, SinkParams, SubscriptionSink};

pub const USERINFO_EXT: &str = "userinfo";

/// Writes `<root>/<filename>.userinfo`, then `<root>/<filename>`.
///
/// Each file is replaced atomically. If the payload write fails the push
/// returns the error with the new header already in place; pushing again
/// completes the pair.
pub struct FsSink {
    payload_path: PathBuf,
    userinfo_path: PathBuf,
}

impl FsSink {
    pub fn new(params: SinkParams) -> Result<Self> {
        fs::create_dir_all(&params.root)?;
        Ok(Self {
            payload_path: params.root.join(&params.filename),
            userinfo_path: params
                .root
                .join(format!("{}.{USERINFO_EXT}", params.filename)),
        })
    }

    pub fn payload_path(&self) -> &Path {
        &self.payload_path
    }

    pub fn userinfo_path(&self) -> &Path {
        &self.userinfo_path
    }
}

impl SubscriptionSink for FsSink {
    fn push(&self, payload: &str, usage: &UsageInfo) -> Result<PushReceipt> {
        // header first: expiry and quota move even when the node list does not
        write_atomic(&self.userinfo_path, usage.header_value().as_bytes())?;

        let hash = blake3::hash(payload.as_bytes());
        let unchanged = match fs::read(&self.payload_path) {
            Ok(existing) => blake3::hash(&existing) == hash,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if !unchanged {
            write_atomic(&self.payload_path, payload.as_bytes())?;
        }

        let receipt = PushReceipt {
            digest: hex::encode(hash.as_bytes()),
            bytes: payload.len() as u64,
            unchanged,
        };
        info!(
            path = %self.payload_path.display(),
            digest = %receipt.digest,
            unchanged,
            "subscription pushed"
        );
        Ok(receipt)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

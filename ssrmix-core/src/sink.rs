// ssrmix_core/src/sink.rs
use crate::error::Result;
use crate::meta::UsageInfo;

#[derive(Clone, Debug)]
pub struct SinkParams {
    pub root: std::path::PathBuf,
    pub filename: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushReceipt {
    /// Hex BLAKE3 of the payload bytes.
    pub digest: String,
    pub bytes: u64,
    /// The stored payload already matched; only the usage header was rewritten.
    pub unchanged: bool,
}

/// Destination for one merged subscription. Payload and usage header are
/// pushed together; a failed push must be retried as a whole.
pub trait SubscriptionSink: Send + Sync {
    fn push(&self, payload: &str, usage: &UsageInfo) -> Result<PushReceipt>;
}

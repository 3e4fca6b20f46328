use crate::error::Result;
use crate::sink::{SinkParams, SubscriptionSink};
use crate::sink_fs::FsSink;

pub enum Backend {
    Fs,
}

pub fn open_sink(backend: Backend, p: SinkParams) -> Result<Box<dyn SubscriptionSink>> {
    match backend {
        Backend::Fs => Ok(Box::new(FsSink::new(p)?)),
    }
}

#![forbid(unsafe_code)]

pub mod error;

pub mod codec;
pub mod config;
pub mod load;
pub mod merge;
pub mod meta;
pub mod node;

pub mod sink;
pub mod sink_factory;
pub mod sink_fs;

// Re-exports: stable API surface
pub use config::{AllowList, Config};
pub use load::LoadTable;
pub use merge::{MergeOptions, MergedSubscription, merge, merge_with};
pub use meta::{ExpiryZone, SubscriptionMeta, UsageInfo};
pub use node::NodeDescriptor;

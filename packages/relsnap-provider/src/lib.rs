pub mod base_provider;
pub mod data;
pub mod listing;
pub mod providers;
pub mod registry;
pub mod wikitext;

// Re-export common types
pub use base_provider::{ReleaseSource, SourceError, SourceKind};
pub use data::{ChannelReleases, ReleaseInfo};
pub use registry::ProviderRegistry;

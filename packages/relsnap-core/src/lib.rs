// Core module that ties providers into a single snapshot

pub mod error;
pub mod output;
pub mod snapshot;

pub use error::{CoreError, Result};
pub use output::{write_output, OutputTarget};
pub use snapshot::{collect_all, collect_from, ChannelMap, Snapshot};

pub use relsnap_provider::{ChannelReleases, ProviderRegistry, ReleaseInfo, ReleaseSource};
pub use relsnap_utils::FetchConfig;

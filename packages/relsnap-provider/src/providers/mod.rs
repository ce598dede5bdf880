//! Release sources, one per operating system or browser.
//!
//! Each provider implements [`ReleaseSource`](crate::base_provider::ReleaseSource)
//! and is listed in [`ProviderRegistry::builtin`](crate::registry::ProviderRegistry::builtin),
//! which fixes the order the snapshot is collected in.

pub mod chrome;
pub mod edge;
pub mod firefox;
pub mod opera;
pub mod wikipedia;

// Re-export all providers for convenience
pub use chrome::ChromeProvider;
pub use edge::EdgeProvider;
pub use firefox::FirefoxProvider;
pub use opera::OperaProvider;
pub use wikipedia::WikipediaProvider;

use crate::base_provider::{ReleaseSource, SourceKind};
use crate::providers::{
    ChromeProvider, EdgeProvider, FirefoxProvider, OperaProvider, WikipediaProvider,
};

/// Ordered set of release sources.
///
/// Order matters: sources are fetched, and appear in the snapshot, in the
/// order they were registered.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn ReleaseSource>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProviderRegistry {
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Every supported operating system, then every supported browser.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(WikipediaProvider::windows());
        registry.register(WikipediaProvider::macos());
        registry.register(WikipediaProvider::android());
        registry.register(WikipediaProvider::ios());
        registry.register(WikipediaProvider::ipados());
        registry.register(ChromeProvider::new());
        registry.register(FirefoxProvider::new());
        registry.register(OperaProvider::new());
        registry.register(EdgeProvider::new());
        registry.register(WikipediaProvider::safari());
        registry.register(WikipediaProvider::whale());
        registry
    }

    pub fn register<P: ReleaseSource + 'static>(&mut self, provider: P) {
        self.register_boxed(Box::new(provider));
    }

    pub fn register_boxed(&mut self, provider: Box<dyn ReleaseSource>) {
        self.providers.push(provider);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ReleaseSource> {
        self.providers
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ReleaseSource> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn names(&self, kind: SourceKind) -> Vec<&'static str> {
        self.iter()
            .filter(|p| p.kind() == kind)
            .map(|p| p.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

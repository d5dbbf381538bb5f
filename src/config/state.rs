// Application state module
// Immutable configuration plus the injected path and listing strategies

use std::sync::Arc;

use super::types::Config;
use crate::handler::{DirectoryLister, HtmlLister, PathResolver, RootResolver};

/// Shared, read-only state handed to every connection
pub struct AppState {
    pub config: Config,
    pub resolver: Arc<dyn PathResolver>,
    pub lister: Arc<dyn DirectoryLister>,
}

impl AppState {
    /// State with the default strategies: confinement to `server.root_dir`
    /// and HTML listings
    pub fn new(config: Config) -> Self {
        let resolver = Arc::new(RootResolver::new(config.server.root_dir.clone()));
        Self::with_strategies(config, resolver, Arc::new(HtmlLister))
    }

    pub fn with_strategies(
        config: Config,
        resolver: Arc<dyn PathResolver>,
        lister: Arc<dyn DirectoryLister>,
    ) -> Self {
        Self {
            config,
            resolver,
            lister,
        }
    }
}

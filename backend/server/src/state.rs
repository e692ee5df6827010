use std::sync::Arc;

use super::{config::Config, upstream::Upstream};

/// Shared by every handler; immutable after startup.
pub struct RelayState {
    pub config: Config,
    pub upstream: Upstream,
}

impl RelayState {
    pub fn new(config: Config) -> Result<Arc<Self>, reqwest::Error> {
        let upstream = Upstream::new(&config.api_base_url, config.api_timeout)?;

        Ok(Arc::new(Self { config, upstream }))
    }
}

use std::sync::Arc;

use cil_fabric::EventFabric;
use cil_ledger::{ChainReader, ChainWriter, InMemoryChain};
use cil_types::ReportPayload;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared state behind every handler: the chain store and the event fabric.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<InMemoryChain>,
    pub fabric: Arc<EventFabric>,
    pub config: ServerConfig,
}

impl AppState {
    /// Build fresh state, optionally seeding a bootstrap genesis block.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let chain = Arc::new(InMemoryChain::new());
        if config.bootstrap_genesis && chain.is_empty()? {
            chain.append(ReportPayload::bootstrap())?;
        }
        Ok(Self {
            fabric: Arc::new(EventFabric::new(config.channel_capacity)),
            chain,
            config,
        })
    }

    /// Build state over an existing chain store (rehydrated or shared).
    pub fn with_chain(config: ServerConfig, chain: Arc<InMemoryChain>) -> Self {
        Self {
            fabric: Arc::new(EventFabric::new(config.channel_capacity)),
            chain,
            config,
        }
    }
}

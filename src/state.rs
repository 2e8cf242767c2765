use crate::backend::BackendClient;
use crate::compose::Mt700Composer;
use crate::config::Config;

/// Application state shared across all request handlers.
/// Holds no per-request data; every pipeline run starts from scratch.
pub struct AppState {
    pub composer: Mt700Composer,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&config)?;
        let composer = Mt700Composer::new(backend, config.log_payloads);

        Ok(Self { composer })
    }
}

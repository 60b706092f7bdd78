use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use lostfound::{LostFound, LostFoundConfig};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Store, matcher and intake policy (shared across requests)
    pub service: Arc<LostFound>,
}

impl ServerState {
    /// Create new server state, loading the service YAML if one is configured.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let mut service_cfg = match config.service_config.as_deref() {
            Some(path) => LostFoundConfig::from_file(path)
                .map_err(|err| ServerError::Config(format!("{path}: {err}")))?,
            None => LostFoundConfig::default(),
        };
        if let Some(dir) = &config.data_dir {
            service_cfg.store.data_dir = dir.clone();
        }

        let service = LostFound::open(&service_cfg)?;
        Ok(Self::with_service(config, service))
    }

    pub fn with_service(config: ServerConfig, service: LostFound) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Run store work on the blocking pool so file I/O never stalls the runtime.
    pub async fn blocking<T, F>(&self, f: F) -> ServerResult<T>
    where
        F: FnOnce(&LostFound) -> Result<T, lostfound::PipelineError> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.service.clone();
        let result = tokio::task::spawn_blocking(move || f(&service)).await?;
        Ok(result?)
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}

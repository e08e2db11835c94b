use std::sync::Arc;

use common::prelude::*;

use super::config::{Config, ConfigError};

#[derive(Clone)]
pub struct State {
    config: Arc<Config>,
    http: reqwest::Client,
    identity: TokenProvider,
    graph: GraphClient,
    // replaces the configured container when set
    blob_sink: Option<Arc<dyn BlobSink>>,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let http = reqwest::Client::builder()
            .user_agent(build_info().user_agent())
            .build()?;

        let identity = TokenProvider::new(http.clone(), config.authority_host.clone());
        let graph = GraphClient::new(http.clone(), config.graph_base_url.clone());
        tracing::info!("Graph endpoint: {}", config.graph_base_url);
        tracing::info!("Drive selection: {}", config.library_match);

        Ok(Self {
            config: Arc::new(config.clone()),
            http,
            identity,
            graph,
            blob_sink: None,
        })
    }

    /// Send uploads to `sink` instead of the configured container.
    pub fn with_blob_sink(mut self, sink: Arc<dyn BlobSink>) -> Self {
        self.blob_sink = Some(sink);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn identity(&self) -> &TokenProvider {
        &self.identity
    }

    pub fn graph(&self) -> &GraphClient {
        &self.graph
    }

    /// Upload destination for one run. The configured container is
    /// re-read from config every time.
    pub fn blob_sink(&self) -> Result<Arc<dyn BlobSink>, ConfigError> {
        if let Some(sink) = &self.blob_sink {
            return Ok(sink.clone());
        }
        let (connection_string, container) = self.config.blob_target()?;
        Ok(Arc::new(BlobContainerClient::new(
            self.http.clone(),
            connection_string,
            container,
        )))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to build the http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

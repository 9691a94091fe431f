//! Artifact stores and model-set loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use eysh_core::traits::{
    ModelSet, PretrainedModel, LEVEL_PREDICTOR, ROADMAP_GENERATOR, WEAKNESS_DETECTOR,
};

use crate::artifact::ModelArtifact;
use crate::error::ArtifactError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Somewhere model artifacts can be fetched from by name.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Fetch an artifact. A missing artifact is `Ok(None)`, not an error.
    async fn fetch(&self, name: &str) -> Result<Option<ModelArtifact>, ArtifactError>;
}

/// Artifacts stored as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl ArtifactStore for LocalStore {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn fetch(&self, name: &str) -> Result<Option<ModelArtifact>, ArtifactError> {
        let path = self.path_for(name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ArtifactError::Io { path, source }),
        };
        ModelArtifact::from_json(name, &content).map(Some)
    }
}

/// Artifacts served over HTTP at `<base_url>/<name>.json`.
pub struct HttpStore {
    base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str, api_token: Option<String>) -> Result<Self, ArtifactError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ArtifactError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            client,
        })
    }

    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{name}.json", self.base_url)
    }
}

#[async_trait]
impl ArtifactStore for HttpStore {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    #[instrument(skip(self))]
    async fn fetch(&self, name: &str) -> Result<Option<ModelArtifact>, ArtifactError> {
        let url = self.url_for(name);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ArtifactError::Network(format!("request to {url} timed out"))
            } else if e.is_connect() {
                ArtifactError::Network(format!(
                    "artifact server not reachable at {}",
                    self.base_url
                ))
            } else {
                ArtifactError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if status >= 400 {
            return Err(ArtifactError::Http { status, url });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ArtifactError::Network(format!("failed to read response: {e}")))?;
        ModelArtifact::from_json(name, &body).map(Some)
    }
}

/// Fetch and validate one model. Any failure leaves the model out.
pub async fn load_model(store: &dyn ArtifactStore, name: &str) -> Option<PretrainedModel> {
    let artifact = match store.fetch(name).await {
        Ok(Some(artifact)) => artifact,
        Ok(None) => {
            tracing::info!(
                model = name,
                store = %store.describe(),
                "model not found, using rule-based fallback"
            );
            return None;
        }
        Err(e) => {
            tracing::warn!(model = name, "failed to fetch model, using rule-based fallback: {e}");
            return None;
        }
    };

    if artifact.name != name {
        tracing::warn!(
            model = name,
            artifact = %artifact.name,
            "artifact name does not match the file it came from"
        );
    }

    match artifact.into_model() {
        Ok(model) => {
            tracing::info!(model = name, store = %store.describe(), "model loaded");
            Some(model)
        }
        Err(e) => {
            tracing::warn!(model = name, "rejecting model: {e}");
            None
        }
    }
}

/// Load all three engine models concurrently.
pub async fn load_model_set(store: &dyn ArtifactStore) -> ModelSet {
    let (level, weakness, roadmap) = futures::join!(
        load_model(store, LEVEL_PREDICTOR),
        load_model(store, WEAKNESS_DETECTOR),
        load_model(store, ROADMAP_GENERATOR),
    );
    ModelSet {
        level,
        weakness,
        roadmap,
    }
}

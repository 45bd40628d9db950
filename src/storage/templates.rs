use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinSet;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Template task failed: {0}")]
    TaskFailed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String, TemplateError>;
}

pub struct FsTemplateSource {
    root: PathBuf,
}

impl FsTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateSource for FsTemplateSource {
    async fn fetch(&self, location: &str) -> Result<String, TemplateError> {
        let path = self.root.join(location);
        tracing::debug!("Reading template {}", path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TemplateError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

pub struct HttpTemplateSource {
    base_url: Option<String>,
    client: reqwest::Client,
}

impl HttpTemplateSource {
    pub fn new() -> Self {
        Self {
            base_url: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    fn url_for(&self, location: &str) -> Result<String, TemplateError> {
        if is_url(location) {
            return Ok(location.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!("{}/{}", base, location.trim_start_matches('/'))),
            None => Err(TemplateError::RequestError(format!(
                "No base URL to resolve template {}",
                location
            ))),
        }
    }
}

impl Default for HttpTemplateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    async fn fetch(&self, location: &str) -> Result<String, TemplateError> {
        let url = self.url_for(location)?;
        tracing::info!("Fetching template from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == 404 {
            tracing::error!("Template not found: {}", url);
            return Err(TemplateError::NotFound(url));
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to fetch template. Status: {}, Body: {}", status, body);
            return Err(TemplateError::RequestError(format!("Status {}: {}", status, body)));
        }

        Ok(response.text().await?)
    }
}

pub struct LocationTemplateSource {
    fs: FsTemplateSource,
    http: HttpTemplateSource,
}

impl LocationTemplateSource {
    pub fn new(fs: FsTemplateSource, http: HttpTemplateSource) -> Self {
        Self { fs, http }
    }
}

#[async_trait]
impl TemplateSource for LocationTemplateSource {
    async fn fetch(&self, location: &str) -> Result<String, TemplateError> {
        if is_url(location) {
            self.http.fetch(location).await
        } else {
            self.fs.fetch(location).await
        }
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub async fn load_templates<S>(
    source: Arc<S>,
    locations: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, TemplateError>
where
    S: TemplateSource + ?Sized + 'static,
{
    let mut tasks = JoinSet::new();

    for (name, location) in locations {
        let source = Arc::clone(&source);
        let name = name.clone();
        let location = location.clone();
        tasks.spawn(async move {
            let content = source.fetch(&location).await?;
            Ok::<_, TemplateError>((name, content))
        });
    }

    let mut loaded = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        let (name, content) = joined.map_err(|e| TemplateError::TaskFailed(e.to_string()))??;
        loaded.insert(name, content);
    }

    tracing::info!("Loaded {} templates", loaded.len());
    Ok(loaded)
}

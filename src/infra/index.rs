//! Index sources: the published JSON document over HTTP or from disk.

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
    application::store::{FetchError, IndexSource},
    config::IndexSettings,
    infra::error::InfraError,
};

pub struct HttpIndexSource {
    client: Client,
    url: Url,
}

impl HttpIndexSource {
    pub fn new(url: Url) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::http(err.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn user_agent() -> &'static str {
        concat!("postscope/", env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let origin = self.describe();
        debug!(url = %self.url, "requesting post index");

        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| FetchError::transport(origin.clone(), err.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| FetchError::transport(origin.clone(), err.to_string()))?;
        if !status.is_success() {
            return Err(FetchError::transport(origin, format!("status {status}")));
        }
        Ok(bytes.to_vec())
    }
}

pub struct FileIndexSource {
    path: PathBuf,
}

impl FileIndexSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IndexSource for FileIndexSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        debug!(path = %self.path.display(), "reading post index");
        tokio::fs::read(&self.path)
            .await
            .map_err(|err| FetchError::transport(self.describe(), err.to_string()))
    }
}

/// Build the configured source.
pub fn source_from_settings(index: &IndexSettings) -> Result<Arc<dyn IndexSource>, InfraError> {
    Ok(match index {
        IndexSettings::Url(url) => Arc::new(HttpIndexSource::new(url.clone())?),
        IndexSettings::Path(path) => Arc::new(FileIndexSource::new(path.clone())),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use httpmock::MockServer;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::application::store::PostStore;

    const INDEX: &str = r#"[{"title":"Rust","excerpt":"e","date":"2024-03-01","url":"/rust/","category":"dev","tags":["rust"]}]"#;

    fn http_source(server: &MockServer, path: &str) -> HttpIndexSource {
        let url = Url::parse(&server.url(path)).expect("mock url");
        HttpIndexSource::new(url).expect("client builds")
    }

    #[tokio::test]
    async fn http_source_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/index.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(INDEX);
        });

        let body = http_source(&server, "/index.json")
            .fetch()
            .await
            .expect("fetch succeeds");
        mock.assert();
        assert_eq!(body, INDEX.as_bytes());
    }

    #[tokio::test]
    async fn http_error_status_is_a_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/index.json");
            then.status(404).body("missing");
        });

        let err = http_source(&server, "/index.json")
            .fetch()
            .await
            .expect_err("404 fails");
        assert!(matches!(err, FetchError::Transport { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn store_over_http_loads_once() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/index.json");
            then.status(200).body(INDEX);
        });

        let store = PostStore::new(Arc::new(http_source(&server, "/index.json")));
        let first = store.load().await.expect("index loads");
        let second = store.load().await.expect("index loads");

        mock.assert_calls(1);
        assert_eq!(first.len(), 1);
        assert_eq!(second[0].title, "Rust");
    }

    #[tokio::test]
    async fn file_source_reads_document() {
        let mut file = NamedTempFile::new().expect("tmp file");
        file.write_all(INDEX.as_bytes()).expect("write tmp");

        let source = FileIndexSource::new(file.path());
        assert_eq!(source.fetch().await.expect("read"), INDEX.as_bytes());
    }

    #[tokio::test]
    async fn missing_file_is_a_transport_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let source = FileIndexSource::new(dir.path().join("absent.json"));
        assert!(matches!(
            source.fetch().await,
            Err(FetchError::Transport { .. })
        ));
    }
}

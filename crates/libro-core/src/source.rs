//! Sheet sources: where the raw CSV text of each sheet comes from

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use libro_config::SourcesConfig;
use libro_parser::RecordKind;

use crate::error::{CoreError, CoreResult, FetchError};

/// Source reference type
pub type SourceRef = Arc<dyn SheetSource>;

/// Trait for anything that can deliver the text of a sheet
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Fetch the full CSV text of one sheet, header row included
    async fn fetch(&self, kind: RecordKind) -> Result<String, FetchError>;
}

/// Fetches published spreadsheet exports over HTTP.
///
/// No retries and no timeout: a failed fetch fails the whole load.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    http: reqwest::Client,
    sources: SourcesConfig,
}

impl HttpSheetSource {
    /// Create a new source from configured URLs
    pub fn new(sources: &SourcesConfig) -> CoreResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(sources.user_agent.clone())
            .build()
            .map_err(|e| CoreError::InternalError {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            sources: sources.clone(),
        })
    }

    /// URL configured for a sheet
    pub fn url_for(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Transactions => &self.sources.transactions_url,
            RecordKind::Debits => &self.sources.debits_url,
            RecordKind::Credits => &self.sources.credits_url,
        }
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch(&self, kind: RecordKind) -> Result<String, FetchError> {
        let url = self.url_for(kind);
        log::debug!(target: "libro::source", "Fetching {} from {}", kind, url);

        let response = self.http.get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        log::debug!(target: "libro::source", "Fetched {} ({} bytes)", kind, text.len());
        Ok(text)
    }
}

/// In-memory sheets, for embedding callers that already hold the text
/// and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSheetSource {
    sheets: HashMap<RecordKind, Result<String, FetchError>>,
}

impl StaticSheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `kind`
    pub fn with_sheet(mut self, kind: RecordKind, content: impl Into<String>) -> Self {
        self.sheets.insert(kind, Ok(content.into()));
        self
    }

    /// Fail every fetch of `kind` with `error`
    pub fn with_failure(mut self, kind: RecordKind, error: FetchError) -> Self {
        self.sheets.insert(kind, Err(error));
        self
    }
}

#[async_trait]
impl SheetSource for StaticSheetSource {
    async fn fetch(&self, kind: RecordKind) -> Result<String, FetchError> {
        self.sheets
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Unavailable(kind.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> SourcesConfig {
        SourcesConfig {
            transactions_url: "https://example.com/tx.csv".to_string(),
            debits_url: "https://example.com/debe.csv".to_string(),
            credits_url: "https://example.com/haber.csv".to_string(),
            user_agent: "libro-test".to_string(),
        }
    }

    #[test]
    fn test_url_for_each_sheet() {
        let source = HttpSheetSource::new(&sources()).unwrap();
        assert_eq!(source.url_for(RecordKind::Transactions), "https://example.com/tx.csv");
        assert_eq!(source.url_for(RecordKind::Debits), "https://example.com/debe.csv");
        assert_eq!(source.url_for(RecordKind::Credits), "https://example.com/haber.csv");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let mut config = sources();
        config.transactions_url = "http://127.0.0.1:9/tx.csv".to_string();
        let source = HttpSheetSource::new(&config).unwrap();

        let result = source.fetch(RecordKind::Transactions).await;
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSheetSource::new()
            .with_sheet(RecordKind::Debits, "h\n")
            .with_failure(RecordKind::Credits, FetchError::Http { status: 500, body: String::new() });

        assert_eq!(source.fetch(RecordKind::Debits).await.unwrap(), "h\n");
        assert!(matches!(
            source.fetch(RecordKind::Credits).await,
            Err(FetchError::Http { status: 500, .. })
        ));
        assert_eq!(
            source.fetch(RecordKind::Transactions).await,
            Err(FetchError::Unavailable("transactions".to_string()))
        );
    }
}

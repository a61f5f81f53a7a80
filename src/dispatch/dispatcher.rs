//! Request → record → blob reply.

use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;

use crate::blob::{self, PayloadError, Reply};
use crate::cache::RecordCache;
use crate::observability::metrics;
use crate::registry::{LookupError, RegistryLookup};

/// Path served for `/`.
pub const INDEX_PATH: &str = "/index.html";

/// Terminal failures of a dispatch. All of them are a bare 500.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no client key: forwarding header absent and no default configured")]
    MissingClientKey,

    #[error("registry lookup failed: {0}")]
    LookupFailure(#[source] LookupError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::MissingClientKey
            | DispatchError::LookupFailure(_)
            | DispatchError::Payload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Map `/` to the index document; every other path is served as given.
pub fn normalize_path(path: &str) -> &str {
    if path == "/" {
        INDEX_PATH
    } else {
        path
    }
}

/// Turns one request into one reply.
#[derive(Clone)]
pub struct RequestDispatcher {
    registry: Arc<dyn RegistryLookup>,
    cache: RecordCache,
    default_key: Option<String>,
}

impl RequestDispatcher {
    /// `default_key` is used when the forwarding header is missing or empty.
    pub fn new(
        registry: Arc<dyn RegistryLookup>,
        cache: RecordCache,
        default_key: Option<String>,
    ) -> Self {
        Self {
            registry,
            cache,
            default_key: default_key.filter(|key| !key.is_empty()),
        }
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Dispatch a request, mapping failures to their bare status.
    pub async fn dispatch(&self, forwarded: Option<&str>, path: &str) -> Reply {
        match self.try_dispatch(forwarded, path).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, path = %path, "Request failed");
                Reply::failure(err.status())
            }
        }
    }

    /// Run the pipeline, surfacing the failure instead of a reply.
    pub async fn try_dispatch(
        &self,
        forwarded: Option<&str>,
        path: &str,
    ) -> Result<Reply, DispatchError> {
        let key = self.resolve_key(forwarded)?;
        let record = self.record_for(key).await?;
        let path = normalize_path(path);

        Ok(blob::extract(&record, path)?)
    }

    /// The forwarding header if present and non-empty, else the configured default.
    pub fn resolve_key<'a>(&'a self, forwarded: Option<&'a str>) -> Result<&'a str, DispatchError> {
        forwarded
            .filter(|key| !key.is_empty())
            .or(self.default_key.as_deref())
            .ok_or(DispatchError::MissingClientKey)
    }

    async fn record_for(&self, key: &str) -> Result<Arc<str>, DispatchError> {
        if let Some(record) = self.cache.get(key) {
            metrics::record_cache_lookup(true);
            return Ok(record);
        }
        metrics::record_cache_lookup(false);

        let result = self.registry.lookup(key).await;
        metrics::record_registry_lookup(result.is_ok());

        let record: Arc<str> = result.map_err(DispatchError::LookupFailure)?.into();
        tracing::debug!(client_key = %key, bytes = record.len(), "Cached registry record");
        self.cache.put(key, Arc::clone(&record));

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const RECORD: &str = "\
route6:         2001:db8::/32
remarks:        rbs$/index.html$text/html$
remarks:        <h1>home</h1>
remarks:        rbs$
remarks:        rbs$/a.txt$text/plain$
remarks:        HELLO
remarks:        rbs$
remarks:        rbs$/broken.png$image/png$
remarks:        !!!
remarks:        rbs$
";

    /// Registry fake that records every key it is asked for.
    #[derive(Default)]
    struct FakeRegistry {
        record: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRegistry {
        fn serving(record: &'static str) -> Arc<Self> {
            Arc::new(Self {
                record: Some(record),
                ..Self::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RegistryLookup for FakeRegistry {
        async fn lookup(&self, client_key: &str) -> Result<String, LookupError> {
            self.calls.lock().unwrap().push(client_key.to_string());
            tokio::task::yield_now().await;
            self.record.map(str::to_string).ok_or(LookupError::Timeout {
                server: "fake".to_string(),
            })
        }
    }

    fn dispatcher(registry: Arc<FakeRegistry>, default_key: Option<&str>) -> RequestDispatcher {
        RequestDispatcher::new(registry, RecordCache::new(), default_key.map(str::to_string))
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/index.html");
        assert_eq!(normalize_path("/a.txt"), "/a.txt");
        assert_eq!(normalize_path("/dir/"), "/dir/");
    }

    #[tokio::test]
    async fn test_serves_blob() {
        let registry = FakeRegistry::serving(RECORD);
        let dispatcher = dispatcher(registry.clone(), None);

        let reply = dispatcher.dispatch(Some("192.0.2.1"), "/a.txt").await;
        assert_eq!(reply, Reply::ok("HELLO", "text/plain"));
        assert_eq!(registry.calls(), ["192.0.2.1"]);
    }

    #[tokio::test]
    async fn test_root_is_index() {
        let dispatcher = dispatcher(FakeRegistry::serving(RECORD), None);

        let root = dispatcher.dispatch(Some("192.0.2.1"), "/").await;
        let index = dispatcher.dispatch(Some("192.0.2.1"), "/index.html").await;
        assert_eq!(root, index);
        assert_eq!(root.body().map(|b| &b[..]), Some(&b"<h1>home</h1>"[..]));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let dispatcher = dispatcher(FakeRegistry::serving(RECORD), None);
        let reply = dispatcher.dispatch(Some("192.0.2.1"), "/missing").await;
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_second_request_uses_cache() {
        let registry = FakeRegistry::serving(RECORD);
        let dispatcher = dispatcher(registry.clone(), None);

        dispatcher.dispatch(Some("192.0.2.1"), "/a.txt").await;
        dispatcher.dispatch(Some("192.0.2.1"), "/missing").await;
        assert_eq!(registry.calls().len(), 1);

        dispatcher.dispatch(Some("192.0.2.2"), "/a.txt").await;
        assert_eq!(registry.calls(), ["192.0.2.1", "192.0.2.2"]);
    }

    #[tokio::test]
    async fn test_clear_forces_new_lookup() {
        let registry = FakeRegistry::serving(RECORD);
        let dispatcher = dispatcher(registry.clone(), None);

        dispatcher.dispatch(Some("192.0.2.1"), "/a.txt").await;
        dispatcher.cache().clear();
        dispatcher.dispatch(Some("192.0.2.1"), "/a.txt").await;

        assert_eq!(registry.calls(), ["192.0.2.1", "192.0.2.1"]);
    }

    #[tokio::test]
    async fn test_missing_key_never_looks_up() {
        let registry = FakeRegistry::serving(RECORD);
        let dispatcher = dispatcher(registry.clone(), None);

        let reply = dispatcher.dispatch(None, "/a.txt").await;
        assert_eq!(reply, Reply::failure(StatusCode::INTERNAL_SERVER_ERROR));

        let reply = dispatcher.dispatch(Some(""), "/a.txt").await;
        assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(registry.calls().is_empty());

        let empty_default = RequestDispatcher::new(registry.clone(), RecordCache::new(), Some(String::new()));
        assert!(matches!(
            empty_default.try_dispatch(None, "/").await,
            Err(DispatchError::MissingClientKey)
        ));
        assert!(registry.calls().is_empty());
    }

    #[tokio::test]
    async fn test_default_key_fallback() {
        let registry = FakeRegistry::serving(RECORD);
        let dispatcher = dispatcher(registry.clone(), Some("198.51.100.1"));

        dispatcher.dispatch(None, "/a.txt").await;
        dispatcher.dispatch(Some(""), "/a.txt").await;
        dispatcher.dispatch(Some("192.0.2.1"), "/a.txt").await;

        assert_eq!(registry.calls(), ["198.51.100.1", "192.0.2.1"]);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_500_and_not_cached() {
        let registry = FakeRegistry::failing();
        let dispatcher = dispatcher(registry.clone(), None);

        let reply = dispatcher.dispatch(Some("192.0.2.1"), "/a.txt").await;
        assert_eq!(reply, Reply::failure(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(dispatcher.cache().is_empty());

        let err = dispatcher.try_dispatch(Some("192.0.2.1"), "/a.txt").await.unwrap_err();
        assert!(matches!(err, DispatchError::LookupFailure(_)));
        assert_eq!(registry.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_bad_base64_is_500() {
        let dispatcher = dispatcher(FakeRegistry::serving(RECORD), None);

        let err = dispatcher.try_dispatch(Some("192.0.2.1"), "/broken.png").await.unwrap_err();
        assert!(matches!(err, DispatchError::Payload(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // The record itself stays cached.
        assert_eq!(dispatcher.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_are_benign() {
        let registry = FakeRegistry::serving(RECORD);
        let dispatcher = dispatcher(registry.clone(), None);

        let (first, second) = tokio::join!(
            dispatcher.dispatch(Some("192.0.2.1"), "/a.txt"),
            dispatcher.dispatch(Some("192.0.2.1"), "/a.txt"),
        );

        assert_eq!(first, second);
        assert!(registry.calls().len() <= 2);
        assert_eq!(dispatcher.cache().len(), 1);
    }
}

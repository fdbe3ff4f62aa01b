pub mod create;
pub mod delete;
pub mod get;
pub mod update;

pub use create::create_record;
pub use delete::delete_record;
pub use get::get_record;
pub use update::update_record;

use axum::{
    extract::{Query, State},
    http::{Method, Uri},
    response::Response,
};

use crate::error::ApiError;
use crate::models::ServerInfoQuery;
use crate::state::AppState;

/// Longest key memcached accepts
pub const MAX_KEY_LEN: usize = 250;

/// Entry point for every record request.
///
/// Extracts the key from the first path segment, then dispatches on method.
/// A path without a usable key is 404 whatever the method.
pub async fn record_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, ApiError> {
    let Some(key) = extract_key(uri.path()) else {
        tracing::debug!("No usable record key in path: {}", uri.path());
        return Err(ApiError::NotFound);
    };

    match method {
        Method::GET => get_record(&state, key).await,
        Method::POST => create_record(&state, key, record_query(&uri)?).await,
        Method::PATCH => update_record(&state, key, record_query(&uri)?).await,
        Method::DELETE => delete_record(&state, key).await,
        _ => {
            tracing::debug!("Rejected {} {}", method, uri.path());
            Err(ApiError::MethodNotAllowed)
        }
    }
}

/// Key is the second element of the path split on `/`.
///
/// Returns `None` when that segment is missing, empty, or not a legal
/// memcached key (over 250 bytes, whitespace or control characters).
pub fn extract_key(path: &str) -> Option<&str> {
    let key = path.split('/').nth(1)?;
    let legal = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key
            .bytes()
            .any(|b| b.is_ascii_whitespace() || b.is_ascii_control());
    legal.then_some(key)
}

fn record_query(uri: &Uri) -> Result<ServerInfoQuery, ApiError> {
    let Query(query) = Query::<ServerInfoQuery>::try_from_uri(uri)?;
    Ok(query)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{Router, body::Body, http::HeaderMap, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use crate::config::{Config, StoreBackend};
    use crate::state::AppState;
    use crate::store::{MemoryStore, RecordStore, StoreError};

    /// Memory store that counts calls and can be switched to fail every call
    #[derive(Default)]
    pub struct FakeStore {
        pub inner: MemoryStore,
        pub failing: bool,
        pub gets: AtomicUsize,
        pub sets: AtomicUsize,
        pub deletes: AtomicUsize,
    }

    impl FakeStore {
        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.gets.load(Ordering::SeqCst)
                + self.sets.load(Ordering::SeqCst)
                + self.deletes.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.failing {
                Err(StoreError::Backend(anyhow::anyhow!("connection refused")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> Result<(), StoreError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.inner.delete(key).await
        }
    }

    pub fn test_config() -> Config {
        Config {
            store_backend: StoreBackend::Memory,
            memcached_addr: None,
            memcached_pool_size: 1,
            memcached_timeout: Duration::from_secs(1),
            record_ttl_seconds: 0,
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
            docs_enabled: false,
        }
    }

    pub fn setup_test_app(store: Arc<FakeStore>) -> Router {
        let state = AppState {
            store,
            config: Arc::new(test_config()),
        };
        crate::app::build_router(state)
    }

    pub async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }
}

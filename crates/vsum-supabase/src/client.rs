//! Supabase REST (PostgREST) client.
//!
//! Production-grade client with:
//! - HTTP client tuning (pooling, timeouts)
//! - Exponential backoff with jitter
//! - Observability (tracing spans, metrics)

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};

use crate::error::{SupabaseError, SupabaseResult};
use crate::metrics::record_request;
use crate::query::Query;
use crate::retry::{with_retry, RetryConfig};

// =============================================================================
// Configuration
// =============================================================================

/// Supabase client configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// API key sent as `apikey` and bearer token
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl SupabaseConfig {
    /// Create config from environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        let url = first_env(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]).ok_or_else(|| {
            SupabaseError::config_error("SUPABASE_URL or NEXT_PUBLIC_SUPABASE_URL must be set")
        })?;
        let api_key = first_env(&["SUPABASE_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"]).ok_or_else(
            || SupabaseError::config_error("SUPABASE_KEY or NEXT_PUBLIC_SUPABASE_ANON_KEY must be set"),
        )?;

        let connect_timeout_secs: u64 = std::env::var("SUPABASE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            url,
            api_key,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
        })
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

// =============================================================================
// Client
// =============================================================================

/// Supabase REST client.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
    rest_url: String,
}

impl SupabaseClient {
    /// Create a new Supabase client.
    pub fn new(config: SupabaseConfig) -> SupabaseResult<Self> {
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| SupabaseError::config_error("Supabase API key contains invalid characters"))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| SupabaseError::config_error("Supabase API key contains invalid characters"))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("vsum-supabase/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SupabaseError::Network)?;

        let rest_url = format!("{}/rest/v1", config.url.trim_end_matches('/'));

        Ok(Self {
            http,
            config,
            rest_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        Self::new(SupabaseConfig::from_env()?)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    // =========================================================================
    // Table Operations
    // =========================================================================

    /// Select rows matching a query.
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> SupabaseResult<Vec<T>> {
        self.request("select", table, Method::GET, query, None).await
    }

    /// Insert a row and return the stored representation.
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> SupabaseResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(row)?;
        self.request("insert", table, Method::POST, &Query::new(), Some(&body))
            .await
    }

    /// Delete rows matching a query and return the deleted rows.
    pub async fn delete<T: DeserializeOwned>(&self, table: &str, query: &Query) -> SupabaseResult<Vec<T>> {
        self.request("delete", table, Method::DELETE, query, None).await
    }

    /// Probe the REST endpoint with a minimal select.
    pub async fn check_connectivity(&self, table: &str) -> SupabaseResult<()> {
        let query = Query::new().select("id").limit(1);
        let url = self.table_url(table);
        let response = self.http.get(&url).query(query.params()).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::handle_error_response(status, &url, response).await)
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        operation: &str,
        table: &str,
        method: Method,
        query: &Query,
        body: Option<&serde_json::Value>,
    ) -> SupabaseResult<Vec<T>> {
        let url = self.table_url(table);
        let (this, url, method) = (self, &url, &method);

        with_retry(&self.config.retry, operation, move || async move {
            this.execute_request(operation, table, async {
                debug!(method = %method, url = %url, "Supabase request");

                let mut request = this
                    .http
                    .request(method.clone(), url)
                    .query(query.params());
                if *method != Method::GET {
                    request = request.header("Prefer", "return=representation");
                }
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = request.send().await?;
                let status = response.status();

                match status {
                    StatusCode::NO_CONTENT => Ok(Vec::new()),
                    s if s.is_success() => {
                        let text = response.text().await?;
                        if text.trim().is_empty() {
                            return Ok(Vec::new());
                        }
                        serde_json::from_str(&text).map_err(|e| {
                            SupabaseError::invalid_response(format!("{} returned unexpected body: {}", url, e))
                        })
                    }
                    _ => Err(Self::handle_error_response(status, url, response).await),
                }
            })
            .await
        })
        .await
    }

    async fn execute_request<T, F>(&self, operation: &str, table: &str, fut: F) -> SupabaseResult<T>
    where
        F: std::future::Future<Output = SupabaseResult<T>>,
    {
        let span = info_span!("supabase_request", operation = %operation, table = %table);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn handle_error_response(status: StatusCode, url: &str, response: reqwest::Response) -> SupabaseError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(0);
            return SupabaseError::RateLimited(retry_after_ms);
        }

        let body = response.text().await.unwrap_or_default();
        SupabaseError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }
}

//! Read-only snapshot of the ERP REST API.
//!
//! The four collections are fetched concurrently. Each one is cached for a
//! short TTL; a failed fetch falls back to the last cached copy (even when
//! stale), then to an empty list. Only when every collection fails with
//! nothing cached does the snapshot itself fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bizpilot_core::{BusinessDataSource, BusinessSnapshot, PageContext, SourceError};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::records::{CustomerRecord, OrderRecord};
use crate::summary::summarize;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Collection {
    Customers,
    Orders,
    Quotations,
    Rfqs,
}

impl Collection {
    fn endpoint(&self) -> &'static str {
        match self {
            Self::Customers => "/api/customers",
            Self::Orders => "/api/orders",
            Self::Quotations => "/api/quotations",
            Self::Rfqs => "/api/rfq",
        }
    }

    /// Key of the array inside the response envelope.
    fn envelope_key(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Orders => "orders",
            Self::Quotations => "quotations",
            Self::Rfqs => "rfqs",
        }
    }
}

struct CachedCollection {
    fetched_at: Instant,
    records: Arc<Vec<Value>>,
}

pub struct HttpDataSource {
    base_url: String,
    client: reqwest::Client,
    cache_ttl: Duration,
    cache: Mutex<HashMap<Collection, CachedCollection>>,
}

impl HttpDataSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Self::client_with_timeout(DEFAULT_REQUEST_TIMEOUT),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::client_with_timeout(timeout);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    fn client_with_timeout(timeout: Duration) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bizpilot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default()
    }

    fn cached(&self, collection: Collection, fresh_only: bool) -> Option<Arc<Vec<Value>>> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(&collection).and_then(|c| {
            if fresh_only && c.fetched_at.elapsed() >= self.cache_ttl {
                None
            } else {
                Some(Arc::clone(&c.records))
            }
        })
    }

    async fn fetch(&self, collection: Collection) -> Result<Vec<Value>, SourceError> {
        let endpoint = collection.endpoint();
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("{endpoint}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|e| SourceError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        extract_records(body, collection.envelope_key()).ok_or_else(|| SourceError::Decode {
            endpoint: endpoint.to_string(),
            reason: format!("expected an array or a '{}' field", collection.envelope_key()),
        })
    }

    /// Fresh cache, then network, then stale cache.
    async fn load(&self, collection: Collection) -> Result<Arc<Vec<Value>>, SourceError> {
        if let Some(records) = self.cached(collection, true) {
            debug!(endpoint = collection.endpoint(), count = records.len(), "Using cached records");
            return Ok(records);
        }

        match self.fetch(collection).await {
            Ok(records) => {
                let records = Arc::new(records);
                let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
                cache.insert(
                    collection,
                    CachedCollection {
                        fetched_at: Instant::now(),
                        records: Arc::clone(&records),
                    },
                );
                Ok(records)
            }
            Err(e) => match self.cached(collection, false) {
                Some(stale) => {
                    warn!(endpoint = collection.endpoint(), error = %e, "Fetch failed, using stale cache");
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }
}

fn extract_records(body: Value, key: &str) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Some(items),
            Some(Value::Null) | None => Some(Vec::new()),
            Some(_) => None,
        },
        _ => None,
    }
}

/// Decode records leniently: rows that do not fit the shape are skipped.
fn decode<T: DeserializeOwned>(records: &[Value]) -> Vec<T> {
    records
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

#[async_trait]
impl BusinessDataSource for HttpDataSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn snapshot(&self, page: Option<&PageContext>) -> Result<BusinessSnapshot, SourceError> {
        let (customers, orders, quotations, rfqs) = futures::join!(
            self.load(Collection::Customers),
            self.load(Collection::Orders),
            self.load(Collection::Quotations),
            self.load(Collection::Rfqs),
        );

        let results = [&customers, &orders, &quotations, &rfqs];
        if results.iter().all(|r| r.is_err()) {
            let reason = match &customers {
                Err(e) => e.to_string(),
                Ok(_) => String::new(),
            };
            return Err(SourceError::Unavailable(reason));
        }

        let mut empty_count = 0;
        let mut or_empty = |r: Result<Arc<Vec<Value>>, SourceError>, name: &str| match r {
            Ok(records) => records,
            Err(e) => {
                warn!(collection = name, error = %e, "Collection unavailable, treating as empty");
                empty_count += 1;
                Arc::new(Vec::new())
            }
        };

        let customers = or_empty(customers, "customers");
        let orders = or_empty(orders, "orders");
        let quotations = or_empty(quotations, "quotations");
        let rfqs = or_empty(rfqs, "rfqs");
        debug!(degraded = empty_count, "Business snapshot assembled");

        Ok(summarize(
            &decode::<CustomerRecord>(&customers),
            &decode::<OrderRecord>(&orders),
            quotations.len(),
            rfqs.len(),
            page.cloned(),
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_or_bare_array() {
        let wrapped = json!({"customers": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(extract_records(wrapped, "customers").unwrap().len(), 2);

        let bare = json!([{"totalAmount": 1}]);
        assert_eq!(extract_records(bare, "orders").unwrap().len(), 1);

        let missing = json!({"success": true});
        assert_eq!(extract_records(missing, "rfqs").unwrap().len(), 0);

        assert!(extract_records(json!({"rfqs": "nope"}), "rfqs").is_none());
        assert!(extract_records(json!("text"), "rfqs").is_none());
    }

    #[test]
    fn decode_skips_malformed_rows() {
        let rows = vec![
            json!({"totalAmount": 10.0}),
            json!({"totalAmount": "ten"}),
            json!({}),
        ];
        let orders: Vec<OrderRecord> = decode(&rows);
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let source = HttpDataSource::new("http://erp.local/");
        assert_eq!(source.base_url, "http://erp.local");
    }

    #[tokio::test]
    async fn unreachable_api_fails_whole_snapshot() {
        let source = HttpDataSource::new("http://127.0.0.1:9")
            .with_request_timeout(Duration::from_millis(500));
        let err = source.snapshot(None).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn stale_cache_survives_outage() {
        let source = HttpDataSource::new("http://127.0.0.1:9")
            .with_request_timeout(Duration::from_millis(500))
            .with_cache_ttl(Duration::ZERO);
        {
            let mut cache = source.cache.lock().unwrap();
            cache.insert(
                Collection::Customers,
                CachedCollection {
                    fetched_at: Instant::now(),
                    records: Arc::new(vec![json!({"name": "Cached Co", "paymentGrade": "A"})]),
                },
            );
        }

        let snap = source.snapshot(None).await.unwrap();
        assert_eq!(snap.total_customers, 1);
        assert_eq!(snap.total_orders, 0);
        assert_eq!(snap.grade_count("A"), 1);
    }
}

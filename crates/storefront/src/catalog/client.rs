//! HTTP client for the product catalog.

use std::sync::Arc;
use std::time::Duration;

use imagine_shop_core::{Product, ProductId};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use crate::config::CatalogConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the catalog API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.api_url.clone(),
                cache,
            }),
        })
    }

    /// Shared HTTP client, reused by the checkout client.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Every product in the catalog, in catalog order.
    ///
    /// Entries that fail [`Product::validate`] are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<[Product]>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let url = self.endpoint(&["products"]);
        let products: Vec<Product> = self.fetch(url).await?;
        let products: Arc<[Product]> = products
            .into_iter()
            .filter(|product| match product.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(product_id = %product.id, error = %e, "Skipping invalid catalog product");
                    false
                }
            })
            .collect();
        debug!(count = products.len(), "Fetched product list");

        // Warm the detail entries too so a click-through skips the network.
        for product in products.iter() {
            self.inner
                .cache
                .insert(
                    CacheKey::Product(product.id.clone()),
                    CacheValue::Product(Box::new(product.clone())),
                )
                .await;
        }
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// One product by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product,
    /// `CatalogError::Invalid` if it fails [`Product::validate`], or another
    /// error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        if id.is_empty() {
            return Err(CatalogError::NotFound("empty product id".to_string()));
        }

        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", id.as_str()]);
        let product: Product = match self.fetch(url).await {
            Err(CatalogError::Status { status: 404, .. }) => {
                return Err(CatalogError::NotFound(format!("Product not found: {id}")));
            }
            other => other?,
        };
        product.validate()?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Public URL of the product image.
    #[must_use]
    pub fn image_url(&self, product: &Product) -> String {
        self.endpoint(&["uploads", &product.file_name]).into()
    }

    /// Drop every cached response.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    /// `base_url` with `segments` appended, each percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        // Base URLs are validated as http(s) in config, which always have a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                %url,
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                %url,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    fn product(file_name: &str) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Camiseta".to_string(),
            price: Decimal::from(50),
            file_name: file_name.to_string(),
            description: String::new(),
            summary: String::new(),
        }
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("https://imagineschool.herokuapp.com");
        assert_eq!(
            client.endpoint(&["products", "abc"]).as_str(),
            "https://imagineschool.herokuapp.com/products/abc"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("http://localhost:8080/api/");
        assert_eq!(
            client.endpoint(&["products"]).as_str(),
            "http://localhost:8080/api/products"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let client = client("http://localhost:8080");
        assert_eq!(
            client.endpoint(&["products", "a/b c"]).as_str(),
            "http://localhost:8080/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_image_url() {
        let client = client("https://imagineschool.herokuapp.com");
        assert_eq!(
            client.image_url(&product("camiseta.png")),
            "https://imagineschool.herokuapp.com/uploads/camiseta.png"
        );
    }

    #[tokio::test]
    async fn test_empty_id_is_not_found() {
        let client = client("http://127.0.0.1:9");
        let err = client.get_product(&ProductId::new("")).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}

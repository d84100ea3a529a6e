//! # Product Catalog Client
//!
//! Read-only accessor for the catalog service. Wire contract:
//! `GET {base}/products/{id}` returning
//! `{id, name, description, price, categoryId, category: {id, name, parentCategoryId}}`.
//!
//! A 404 is a domain answer (`Ok(None)`), not an error; callers decide
//! whether a missing product is fatal (checkout) or ignorable (enrichment).

use async_trait::async_trait;
use flow_core::{
    Currency, FlowError, FlowResult, Price, ProductDetails, ProductKind, ProductLookup,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use uuid::Uuid;

/// HTTP client for the product catalog service
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl ProductLookup for CatalogClient {
    #[instrument(skip(self))]
    async fn product(&self, product_id: Uuid) -> FlowResult<Option<ProductDetails>> {
        let url = format!("{}/products/{}", self.base_url, product_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Product {} not in catalog", product_id);
            return Ok(None);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FlowError::Upstream {
                service: "catalog".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let dto: ProductResponse = serde_json::from_str(&body).map_err(|e| {
            FlowError::Serialization(format!("Failed to parse catalog response: {}", e))
        })?;

        Ok(Some(dto.into_details()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductResponse {
    id: Uuid,
    name: String,
    #[serde(default)]
    description: String,
    /// Decimal price in major units
    price: f64,
    #[serde(default)]
    category_id: Option<Uuid>,
    #[serde(default)]
    category: Option<CategoryResponse>,
    #[serde(default)]
    product_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryResponse {
    id: Uuid,
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    parent_category_id: Option<Uuid>,
}

impl ProductResponse {
    fn into_details(self) -> ProductDetails {
        let kind = match self.product_type.as_deref() {
            Some("digital") => ProductKind::Digital,
            Some("service") => ProductKind::Service,
            _ => ProductKind::Physical,
        };
        ProductDetails {
            id: self.id,
            name: self.name,
            description: self.description,
            price: Price::new(self.price, Currency::USD),
            category_id: self.category.as_ref().map(|c| c.id).or(self.category_id),
            category_name: self.category.map(|c| c.name),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_product_found() {
        let server = MockServer::start().await;
        let product_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(format!("/products/{}", product_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": product_id,
                "name": "Walnut Desk",
                "description": "Solid walnut",
                "price": 249.99,
                "categoryId": category_id,
                "category": {"id": category_id, "name": "Furniture", "parentCategoryId": null},
                "productType": "physical"
            })))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri());
        let product = client.product(product_id).await.unwrap().unwrap();

        assert_eq!(product.name, "Walnut Desk");
        assert_eq!(product.price.amount, 24999);
        assert_eq!(product.category_name.as_deref(), Some("Furniture"));
        assert_eq!(product.kind, ProductKind::Physical);
    }

    #[tokio::test]
    async fn test_product_missing_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri());
        assert!(client.product(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upstream_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri());
        let err = client.product(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, FlowError::Upstream { .. }));
        assert_eq!(err.status_code(), 502);
    }
}

//! Catalog service for the product endpoints.
//!
//! Category filtering happens on the server through the `category` query
//! parameter. Text search is left to the caller (see [`crate::search`]).

use tracing::{debug, instrument};

use jaangkhon_core::{NewProduct, Product, ProductId, ProductPatch};

use crate::api::{ApiClient, ApiResponse};
use crate::error::Result;

/// Catalog service.
#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List products, optionally only those in `category`.
    ///
    /// Products come back in server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let response: ApiResponse<Vec<Product>> =
            self.api.get(&products_endpoint(category)).await?;
        debug!(count = response.data.len(), "Fetched products");
        Ok(response.data)
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        let response: ApiResponse<Product> = self.api.get(&format!("/products/{id}")).await?;
        Ok(response.data)
    }

    /// Create a product and return it as stored by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let response: ApiResponse<Product> = self.api.post("/products", product).await?;
        Ok(response.data)
    }

    /// Apply a partial update and return the updated product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<Product> {
        let response: ApiResponse<Product> =
            self.api.put(&format!("/products/{id}"), patch).await?;
        Ok(response.data)
    }

    /// Delete a product. Returns the envelope's `success` flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let response: ApiResponse<Option<serde_json::Value>> =
            self.api.delete(&format!("/products/{id}")).await?;
        Ok(response.success)
    }
}

/// `/products`, with `?category=` only for a non-empty category.
fn products_endpoint(category: Option<&str>) -> String {
    match category.filter(|c| !c.is_empty()) {
        Some(category) => format!("/products?category={}", urlencoding::encode(category)),
        None => "/products".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_endpoint_without_category() {
        assert_eq!(products_endpoint(None), "/products");
        assert_eq!(products_endpoint(Some("")), "/products");
    }

    #[test]
    fn test_products_endpoint_encodes_category() {
        assert_eq!(products_endpoint(Some("Books")), "/products?category=Books");
        assert_eq!(
            products_endpoint(Some("Home & Garden")),
            "/products?category=Home%20%26%20Garden"
        );
        assert_eq!(
            products_endpoint(Some("อาหาร")),
            "/products?category=%E0%B8%AD%E0%B8%B2%E0%B8%AB%E0%B8%B2%E0%B8%A3"
        );
    }
}

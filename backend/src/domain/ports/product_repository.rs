//! Port for product persistence.

use async_trait::async_trait;

use crate::domain::{Product, ProductId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "product repository query failed: {message}",
        /// A product with the same identifier already exists.
        DuplicateId { product_id: i32 } => "product {product_id} already exists",
    }
}

/// Port for reading and writing inventory products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by identifier.
    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Products with `quantity` strictly below `threshold`, ordered by identifier.
    async fn list_below_quantity(
        &self,
        threshold: i32,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Insert a new product, failing with `DuplicateId` when the id is taken.
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    /// Overwrite an existing product. Returns `false` when no row matched.
    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError>;

    /// Delete a product. Returns `false` when no row matched.
    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError>;
}

/// Fixture implementation for tests that do not exercise product storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductRepository;

#[async_trait]
impl ProductRepository for FixtureProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_below_quantity(
        &self,
        _threshold: i32,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _product: &Product) -> Result<(), ProductRepositoryError> {
        Ok(())
    }

    async fn update(&self, _product: &Product) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: ProductId) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }
}

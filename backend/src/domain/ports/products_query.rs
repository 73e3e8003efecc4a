//! Driving port for product reads and reports.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, InventorySummary, Product, ProductId};

/// Domain use-case port for reading products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductsQuery: Send + Sync {
    /// Every product ordered by id. Public.
    async fn list_products(&self) -> Result<Vec<Product>, Error>;

    /// A single product. Public.
    async fn get_product(&self, id: ProductId) -> Result<Product, Error>;

    /// Products with `quantity < threshold`.
    async fn low_stock(
        &self,
        caller: AuthenticatedUser,
        threshold: i32,
    ) -> Result<Vec<Product>, Error>;

    /// Inventory totals.
    async fn summary(&self, caller: AuthenticatedUser) -> Result<InventorySummary, Error>;
}

/// Fixture query port backed by an empty inventory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductsQuery;

#[async_trait]
impl ProductsQuery for FixtureProductsQuery {
    async fn list_products(&self) -> Result<Vec<Product>, Error> {
        Ok(Vec::new())
    }

    async fn get_product(&self, _id: ProductId) -> Result<Product, Error> {
        Err(Error::not_found("product not found"))
    }

    async fn low_stock(
        &self,
        _caller: AuthenticatedUser,
        _threshold: i32,
    ) -> Result<Vec<Product>, Error> {
        Ok(Vec::new())
    }

    async fn summary(&self, _caller: AuthenticatedUser) -> Result<InventorySummary, Error> {
        Ok(InventorySummary::from_products(&[]))
    }
}

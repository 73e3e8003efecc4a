//! Product service implementing the product command and query ports.
//!
//! Access checks run before any repository call so callers without the
//! required role never learn whether a product exists.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    ProductRepository, ProductRepositoryError, ProductsCommand, ProductsQuery,
};
use crate::domain::{
    Action, AuthenticatedUser, Error, InventorySummary, NewProduct, Product, ProductDraft,
    ProductId, ProductPatch, ProductValidationError, authorize, ensure_can_modify,
};

fn map_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
        ProductRepositoryError::DuplicateId { .. } => {
            Error::conflict("product with this product_id already exists")
        }
    }
}

fn map_validation_error(error: ProductValidationError) -> Error {
    let details = json!({ "field": error.field, "code": error.code });
    Error::invalid_request(error.message).with_details(details)
}

fn not_found() -> Error {
    Error::not_found("product not found")
}

/// Inventory service backed by a [`ProductRepository`].
#[derive(Clone)]
pub struct ProductService<R> {
    products: Arc<R>,
}

impl<R> ProductService<R> {
    pub fn new(products: Arc<R>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl<R> ProductsCommand for ProductService<R>
where
    R: ProductRepository,
{
    async fn create(
        &self,
        caller: AuthenticatedUser,
        draft: ProductDraft,
    ) -> Result<Product, Error> {
        authorize(Some(&caller), Action::CreateProduct)?;
        let new = NewProduct::try_from(draft).map_err(map_validation_error)?;
        let product = Product::from_new(new, Some(caller.user_id));
        self.products
            .insert(&product)
            .await
            .map_err(map_repository_error)?;
        info!(product_id = %product.id, user_id = %caller.user_id, "product created");
        Ok(product)
    }

    async fn update(
        &self,
        caller: AuthenticatedUser,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, Error> {
        authorize(Some(&caller), Action::UpdateProduct)?;
        let patch = patch.validated().map_err(map_validation_error)?;
        let mut product = self
            .products
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)?;
        ensure_can_modify(&caller, &product)?;
        product.apply(patch);
        let updated = self
            .products
            .update(&product)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(not_found());
        }
        info!(product_id = %id, user_id = %caller.user_id, "product updated");
        Ok(product)
    }

    async fn delete(&self, caller: AuthenticatedUser, id: ProductId) -> Result<(), Error> {
        authorize(Some(&caller), Action::DeleteProduct)?;
        let deleted = self
            .products
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(not_found());
        }
        info!(product_id = %id, user_id = %caller.user_id, "product deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> ProductsQuery for ProductService<R>
where
    R: ProductRepository,
{
    async fn list_products(&self) -> Result<Vec<Product>, Error> {
        authorize(None, Action::ListProducts)?;
        self.products.list_all().await.map_err(map_repository_error)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, Error> {
        authorize(None, Action::ViewProduct)?;
        self.products
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)
    }

    async fn low_stock(
        &self,
        caller: AuthenticatedUser,
        threshold: i32,
    ) -> Result<Vec<Product>, Error> {
        authorize(Some(&caller), Action::ViewReports)?;
        self.products
            .list_below_quantity(threshold)
            .await
            .map_err(map_repository_error)
    }

    async fn summary(&self, caller: AuthenticatedUser) -> Result<InventorySummary, Error> {
        authorize(Some(&caller), Action::ViewReports)?;
        let products = self.products.list_all().await.map_err(map_repository_error)?;
        Ok(InventorySummary::from_products(&products))
    }
}

#[cfg(test)]
#[path = "product_service_tests.rs"]
mod tests;

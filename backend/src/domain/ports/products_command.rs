//! Driving port for product mutations.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, Product, ProductDraft, ProductId, ProductPatch};

/// Domain use-case port for creating, updating, and deleting products.
///
/// Implementations enforce the access policy for `caller`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductsCommand: Send + Sync {
    /// Validate and store a new product owned by `caller`.
    async fn create(&self, caller: AuthenticatedUser, draft: ProductDraft)
    -> Result<Product, Error>;

    /// Apply `patch` to an existing product.
    async fn update(
        &self,
        caller: AuthenticatedUser,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, Error>;

    /// Remove a product.
    async fn delete(&self, caller: AuthenticatedUser, id: ProductId) -> Result<(), Error>;
}

/// Fixture command port rejecting every mutation as not found.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductsCommand;

#[async_trait]
impl ProductsCommand for FixtureProductsCommand {
    async fn create(
        &self,
        caller: AuthenticatedUser,
        draft: ProductDraft,
    ) -> Result<Product, Error> {
        let new = crate::domain::NewProduct::try_from(draft)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(Product::from_new(new, Some(caller.user_id)))
    }

    async fn update(
        &self,
        _caller: AuthenticatedUser,
        _id: ProductId,
        _patch: ProductPatch,
    ) -> Result<Product, Error> {
        Err(Error::not_found("product not found"))
    }

    async fn delete(&self, _caller: AuthenticatedUser, _id: ProductId) -> Result<(), Error> {
        Err(Error::not_found("product not found"))
    }
}

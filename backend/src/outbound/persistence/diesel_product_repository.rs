//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{Product, ProductId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::ProductRow;
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the `ProductRepository` port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ProductRepositoryError {
    map_pool_error(error, ProductRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    map_diesel_error(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

fn rows_to_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, ProductRepositoryError> {
    rows.into_iter().map(row_to_product).collect()
}

fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    let product_id = row.product_id;
    Product::try_from(row).map_err(|message| {
        warn!(product_id, %message, "stored product row is invalid");
        ProductRepositoryError::query(format!("invalid product row {product_id}"))
    })
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = products::table
            .order(products::product_id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_products(rows)
    }

    async fn list_below_quantity(
        &self,
        threshold: i32,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = products::table
            .filter(products::quantity.lt(threshold))
            .order(products::product_id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_products(rows)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        products::table
            .find(id.get())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_product)
            .transpose()
    }

    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(products::table)
            .values(ProductRow::from(product))
            .execute(&mut conn)
            .await
            .map_err(|error| {
                if is_unique_violation(&error) {
                    ProductRepositoryError::duplicate_id(product.id.get())
                } else {
                    diesel_error(error)
                }
            })?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(products::table.find(product.id.get()))
            .set(ProductRow::from(product))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(products::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}

//! CSV import of products.
//!
//! Each row passes through the same validation as the HTTP create endpoint.
//! Invalid rows and rows whose id already exists are skipped and counted;
//! storage outages abort the run.

use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{NewProduct, Product, ProductDraft, UserId};

/// Failures that abort a seeding run.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read csv headers: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Repository(ProductRepositoryError),
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub added: usize,
    pub skipped: usize,
}

/// One CSV record. Unknown columns such as `created_by` are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductRow {
    product_id: Option<i32>,
    product_name: Option<String>,
    quantity: Option<i32>,
    price: Option<f64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    category: Option<String>,
    expiry_date: Option<NaiveDate>,
    warranty_period: Option<i32>,
    author: Option<String>,
    pages: Option<i32>,
}

impl From<ProductRow> for ProductDraft {
    fn from(row: ProductRow) -> Self {
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
            kind: row.kind.or(row.category),
            expiry_date: row.expiry_date,
            warranty_period: row.warranty_period,
            author: row.author,
            pages: row.pages,
        }
    }
}

/// Imports products from CSV into a [`ProductRepository`].
pub struct ProductSeeder<R> {
    products: Arc<R>,
    owner: Option<UserId>,
}

impl<R> ProductSeeder<R>
where
    R: ProductRepository,
{
    pub fn new(products: Arc<R>) -> Self {
        Self {
            products,
            owner: None,
        }
    }

    /// Attribute imported products to `owner`.
    #[must_use]
    pub fn with_owner(mut self, owner: Option<UserId>) -> Self {
        self.owner = owner;
        self
    }

    /// Parse every row from `reader`, then insert the valid ones.
    ///
    /// Row numbers in log output are 1-based and exclude the header line.
    pub async fn seed_from_reader(&self, reader: impl Read) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        csv.headers()?;

        let mut parsed = Vec::new();
        for (index, record) in csv.deserialize::<ProductRow>().enumerate() {
            let row = index + 1;
            let draft = match record {
                Ok(record) => ProductDraft::from(record),
                Err(err) => {
                    warn!(row, reason = %err, "skipping unreadable row");
                    report.skipped += 1;
                    continue;
                }
            };
            match NewProduct::try_from(draft) {
                Ok(product) => parsed.push((row, product)),
                Err(err) => {
                    warn!(row, field = %err.field, reason = %err.message, "skipping invalid row");
                    report.skipped += 1;
                }
            }
        }

        for (row, new) in parsed {
            let product = Product::from_new(new, self.owner);
            match self.products.insert(&product).await {
                Ok(()) => report.added += 1,
                Err(ProductRepositoryError::DuplicateId { product_id }) => {
                    warn!(row, product_id, "skipping existing product");
                    report.skipped += 1;
                }
                Err(err) => return Err(SeedError::Repository(err)),
            }
        }

        info!(added = report.added, skipped = report.skipped, "product seeding finished");
        Ok(report)
    }
}

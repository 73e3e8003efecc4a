//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::{Product, ProductId, ProductKind, UserId};

use super::schema::{documents, embeddings, llm_cache, products, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Full product row, used for reads, inserts, and whole-row updates.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(primary_key(product_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
    pub kind: String,
    pub expiry_date: Option<NaiveDate>,
    pub warranty_period: Option<i32>,
    pub author: Option<String>,
    pub pages: Option<i32>,
    pub created_by: Option<i32>,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.get(),
            product_name: product.name.clone(),
            quantity: product.quantity,
            price: product.price,
            kind: product.kind.as_str().to_owned(),
            expiry_date: product.expiry_date,
            warranty_period: product.warranty_period,
            author: product.author.clone(),
            pages: product.pages,
            created_by: product.created_by.map(UserId::get),
        }
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = String;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = ProductId::new(row.product_id).map_err(|err| err.to_string())?;
        let created_by = row
            .created_by
            .map(UserId::new)
            .transpose()
            .map_err(|err| err.to_string())?;
        Ok(Self {
            id,
            name: row.product_name,
            quantity: row.quantity,
            price: row.price,
            kind: ProductKind::parse(&row.kind),
            expiry_date: row.expiry_date,
            warranty_period: row.warranty_period,
            author: row.author,
            pages: row.pages,
            created_by,
        })
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub user_id: i32,
    pub filename: &'a str,
    pub content_type: Option<&'a str>,
    pub text: &'a str,
}

// ---------------------------------------------------------------------------
// Embeddings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = embeddings)]
pub(crate) struct NewEmbeddingRow {
    pub collection: String,
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: serde_json::Value,
    pub user_id: Option<i32>,
    pub product_id: Option<i32>,
    pub document_id: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmbeddingCandidateRow {
    pub content: String,
    pub embedding: Vec<f32>,
}

// ---------------------------------------------------------------------------
// LLM cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = llm_cache)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LlmCacheRow {
    pub response: String,
    pub expiration_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = llm_cache)]
pub(crate) struct NewLlmCacheRow<'a> {
    pub model_name: &'a str,
    pub prompt: &'a str,
    pub prompt_hash: &'a str,
    pub response: &'a str,
    pub user_id: i32,
    pub expiration_time: DateTime<Utc>,
}

//! Product CRUD and inventory report handlers.
//!
//! ```text
//! GET    /api/products
//! GET    /api/products/{id}
//! POST   /api/products
//! PUT    /api/products/{id}
//! DELETE /api/products/{id}
//! GET    /api/products/reports/low-stock?threshold=5
//! GET    /api/products/reports/summary
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Action, DEFAULT_LOW_STOCK_THRESHOLD, Error, InventorySummary, Product, ProductDraft,
    ProductPatch, authorize,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Caller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{json_body, parse_product_id};

/// Confirmation returned after a delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product 7 deleted successfully")]
    pub message: String,
}

/// Query string for the low stock report.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LowStockParams {
    /// Products with `quantity` strictly below this value are listed.
    pub threshold: Option<i32>,
}

/// List every product.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products ordered by id", body = [Product]),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("")]
pub async fn list_products(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Product>>> {
    let products = state.products_query.list_products().await?;
    Ok(web::Json(products))
}

/// Fetch a single product.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security([])
)]
#[get("/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Product>> {
    let id = parse_product_id(path.into_inner())?;
    let product = state.products_query.get_product(id).await?;
    Ok(web::Json(product))
}

/// Create a product owned by the caller.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductDraft,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Duplicate product id", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct",
    security(("bearer" = []))
)]
#[post("")]
pub async fn create_product(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: Result<web::Json<ProductDraft>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let caller = caller.user();
    authorize(Some(&caller), Action::CreateProduct)?;
    let draft = json_body(payload)?;
    let product = state.products.create(caller, draft).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Apply a partial update to a product.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "updateProduct",
    security(("bearer" = []))
)]
#[put("/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i32>,
    payload: Result<web::Json<ProductPatch>, actix_web::Error>,
) -> ApiResult<web::Json<Product>> {
    let caller = caller.user();
    authorize(Some(&caller), Action::UpdateProduct)?;
    let id = parse_product_id(path.into_inner())?;
    let patch = json_body(payload)?;
    let product = state.products.update(caller, id, patch).await?;
    Ok(web::Json(product))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct",
    security(("bearer" = []))
)]
#[delete("/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = caller.user();
    authorize(Some(&caller), Action::DeleteProduct)?;
    let id = parse_product_id(path.into_inner())?;
    state.products.delete(caller, id).await?;
    Ok(web::Json(MessageResponse {
        message: format!("Product {id} deleted successfully"),
    }))
}

/// Products whose quantity is below a threshold.
#[utoipa::path(
    get,
    path = "/api/products/reports/low-stock",
    params(LowStockParams),
    responses(
        (status = 200, description = "Low stock products", body = [Product]),
        (status = 400, description = "Invalid threshold", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reports"],
    operation_id = "lowStockReport",
    security(("bearer" = []))
)]
#[get("/reports/low-stock")]
pub async fn low_stock_report(
    state: web::Data<HttpState>,
    caller: Caller,
    query: Result<web::Query<LowStockParams>, actix_web::Error>,
) -> ApiResult<web::Json<Vec<Product>>> {
    let params = query.map(web::Query::into_inner).map_err(|_| {
        Error::invalid_request("threshold must be an integer")
            .with_details(json!({ "field": "threshold", "code": "invalid_integer" }))
    })?;
    let threshold = params.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let products = state
        .products_query
        .low_stock(caller.user(), threshold)
        .await?;
    Ok(web::Json(products))
}

/// Inventory totals and the highest value product.
#[utoipa::path(
    get,
    path = "/api/products/reports/summary",
    responses(
        (status = 200, description = "Inventory summary", body = InventorySummary),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reports"],
    operation_id = "summaryReport",
    security(("bearer" = []))
)]
#[get("/reports/summary")]
pub async fn summary_report(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<InventorySummary>> {
    let summary = state.products_query.summary(caller.user()).await?;
    Ok(web::Json(summary))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;

//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` and depend only on
//! the driving ports, so they can be exercised without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthCommand, ChatQuery, DocumentsCommand, FixtureAuthCommand, FixtureChatQuery,
    FixtureDocumentsCommand, FixtureProductsCommand, FixtureProductsQuery, ProductsCommand,
    ProductsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthCommand>,
    pub products: Arc<dyn ProductsCommand>,
    pub products_query: Arc<dyn ProductsQuery>,
    pub chat: Arc<dyn ChatQuery>,
    pub documents: Arc<dyn DocumentsCommand>,
}

impl HttpState {
    /// State backed entirely by in-memory fixtures.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use inventory::domain::ports::FixtureProductsQuery;
    /// use inventory::inbound::http::state::HttpState;
    ///
    /// let state = HttpState {
    ///     products_query: Arc::new(FixtureProductsQuery),
    ///     ..HttpState::fixtures()
    /// };
    /// let _products = state.products_query.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            auth: Arc::new(FixtureAuthCommand),
            products: Arc::new(FixtureProductsCommand),
            products_query: Arc::new(FixtureProductsQuery),
            chat: Arc::new(FixtureChatQuery),
            documents: Arc::new(FixtureDocumentsCommand),
        }
    }
}

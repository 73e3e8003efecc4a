//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use inventory::outbound::persistence::DbPool;
use inventory::settings::AppSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) settings: AppSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(settings: AppSettings, bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            settings,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// With a pool the server uses the Diesel repositories and the remote
    /// model providers; without one every port is served by its fixture.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

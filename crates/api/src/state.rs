use std::sync::Arc;

use reelshelf_core::accounts::UserDirectory;
use reelshelf_core::movies::MovieService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Owner-scoped movie operations.
    pub movies: Arc<MovieService>,
    /// Account lookup for login.
    pub users: Arc<dyn UserDirectory>,
}

//! SPBU Server — axum REST API over the in-memory store.
//!
//! Every response body is `{ "data": ... }`; every error is
//! `{ "message": ... }` with a matching status code. Authorization is
//! decided by `spbu_core::permission` and `spbu_core::workflow`, the same
//! rules the client uses to gate its calls.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use tokio::net::TcpListener;
use tracing::info;

pub use config::ServerConfig;
pub use state::AppState;

/// Serve the API on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Starting SPBU API server");
    }
    axum::serve(listener, routes::router(state)).await
}

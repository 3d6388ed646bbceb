//! Backend entry-point: wires the auth, profile, and item vote endpoints.

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use postboard::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    info!(bind_addr = %config.bind_addr, "starting server");
    create_server(config)?.await
}

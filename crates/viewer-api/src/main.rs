//! OBD2 Log Viewer - Main Entry Point

use anyhow::Result;
use tracing::info;
use viewer_api::{init_logging, run_server, ViewerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("=== OBD2 Log Viewer v{} ===", env!("CARGO_PKG_VERSION"));

    let config = ViewerConfig::load()?;
    run_server(config).await?;

    Ok(())
}

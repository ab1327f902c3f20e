//! Server bootstrap.

use crate::config::Config;
use crate::routes::{router, AppState};
use ledgertap_ledger::LedgerService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Run the submission surface until the process is stopped.
pub async fn run_server(
    config: Config,
    ledger: Arc<dyn LedgerService>,
) -> Result<(), std::io::Error> {
    let addr = config.listen_addr;
    let app = router(AppState::new(ledger, config));

    info!(%addr, "Submission surface listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Start the server in the background and return the bound address.
/// Binding to port 0 picks a free port; useful for tests.
pub async fn start_background_server(
    config: Config,
    ledger: Arc<dyn LedgerService>,
) -> Result<SocketAddr, std::io::Error> {
    let addr = config.listen_addr;
    let app = router(AppState::new(ledger, config));

    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Server error");
        }
    });

    Ok(actual_addr)
}

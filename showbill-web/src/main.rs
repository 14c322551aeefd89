// main.rs only boots storage, the router, and the server.

mod forms;
mod handlers;
mod logging;
mod router;
mod state;
mod templates;

use std::env;
use std::sync::Arc;

use showbill_core::storage::SqliteStorage;
use state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "showbill.db".to_string());
    let storage = SqliteStorage::open(&db_path)?;
    let app_state = AppState {
        storage: Arc::new(storage),
    };

    let app = router::app_router(app_state);

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("showbill listening on {bind_addr} (database: {db_path})");
    axum::serve(listener, app).await?;
    Ok(())
}

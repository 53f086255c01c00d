use anyhow::Result;

use flightboard::web::{self, PgPool};

/// Run the read-only query layer for the dashboard.
pub async fn handle_serve(pool: PgPool, listen: &str) -> Result<()> {
    web::serve(pool, listen).await
}

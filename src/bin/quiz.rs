use std::sync::Arc;

use anyhow::Context;
use quiz_questions::config::get_configuration;
use quiz_questions::db::{self, SqliteQuestionRepository};
use quiz_questions::server::app::run_server;
use quiz_questions::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_configuration().context("Failed to read configuration")?;
    init_tracing(&settings.log);

    let pool = db::establish_connection(&settings.database)
        .await
        .with_context(|| format!("Cannot connect to {}", settings.database.path.display()))?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let repo = Arc::new(SqliteQuestionRepository::new(pool));
    run_server(repo, &settings.server).await
}

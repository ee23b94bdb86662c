//! Gulper
//!
//! An MCP server for calorie target planning and weight tracking.

use std::sync::Arc;

use gulper::db::{self, migrations};
use gulper::mcp::GulperService;
use gulper::planner::SystemClock;
use gulper::{build_info, config};
use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gulper=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let db_path = config::database_path();
    let default_user = config::default_user_id();
    eprintln!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        let version = migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    info!(user_id = %default_user, "Serving default user");

    let service = GulperService::new(db_path, database, Arc::new(SystemClock), default_user);

    let server = service.serve((stdin(), stdout())).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}

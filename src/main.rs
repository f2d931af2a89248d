use anyhow::Context;
use clap::Parser;
use frontdesk::config::{get_config, CliArgs};
use frontdesk::{create_app, db, repo, run_migrations};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    if std::fs::metadata(".env").is_ok() {
        dotenv::dotenv().ok();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frontdesk=info,tower_http=info".into()),
        )
        .init();

    let args = CliArgs::parse();
    let config = get_config(args);

    let pool = Arc::new(db::init_pool(&config.database_url));

    {
        let mut conn = pool.get().context("Failed to get a database connection")?;
        run_migrations(&mut conn);
    }

    // First run on an empty database gets an admin account to log in with
    if let Some(admin) = repo::bootstrap_admin(&pool, &config.bootstrap_admin_password).await? {
        info!("Created bootstrap admin user {}", admin.get_username());
    }

    let app = create_app(pool, config.session_ttl());

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

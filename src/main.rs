use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymtrack::config::Config;
use gymtrack::repositories::Repositories;
use gymtrack::version::GIT_VERSION;
use gymtrack::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymtrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);
    let pool = db::create_pool(&config.database_url, config.pool_size)?;

    migrations::run_migrations(&pool)?;

    let repos = Repositories::new(pool);

    let expired = repos.tokens.cleanup_expired().await?;
    if expired > 0 {
        tracing::info!("Removed {} expired tokens", expired);
    }

    let app = routes::create_router(repos);

    let addr = config.server_addr();
    tracing::info!("Starting gymtrack {} at http://{}", GIT_VERSION, addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}

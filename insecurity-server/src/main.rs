use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use insecurity_server::app::build_router;
use insecurity_server::config::{self, Settings};
use insecurity_server::db::Database;
use insecurity_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insecurity_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load settings
    let settings = Settings::new().expect("Failed to load settings");

    if settings.secret_key == config::DEFAULT_SECRET_KEY {
        tracing::warn!("SECRET_KEY is still the insecure default; set it in the environment");
    }

    // Create the instance and upload directories if they do not exist
    if let Some(parent) = Path::new(&settings.database.path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create database directory");
    }
    let uploads_dir = PathBuf::from(&settings.uploads.path);
    std::fs::create_dir_all(&uploads_dir).expect("Failed to create uploads directory");

    // Initialize database
    let db = Database::new(&settings.database.path).expect("Failed to create database");

    db.initialize()
        .expect("Failed to initialize database schema");

    tracing::info!("Database initialized successfully");

    // Create application state and router
    let state = AppState::new(db, uploads_dir);
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .expect("Failed to parse server address");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}

use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Default signing key; startup warns when this is still in use.
pub const DEFAULT_SECRET_KEY: &str = "secret";

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Uploads {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub uploads: Uploads,
    pub secret_key: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Try to load from settings.toml (optional for deployment)
        let config_file_name = "settings.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in insecurity-server directory (for development)
        let dev_path = PathBuf::from("insecurity-server").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.path", "instance/insecurity.db")?
            .set_default("uploads.path", "instance/uploads")?
            .set_default("secret_key", DEFAULT_SECRET_KEY)?;

        // 2. Override with environment variables (highest priority)
        if let Ok(db_path) = std::env::var("DATABASE_PATH") {
            builder = builder.set_override("database.path", db_path)?;
        }
        if let Ok(uploads_path) = std::env::var("UPLOADS_PATH") {
            builder = builder.set_override("uploads.path", uploads_path)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(secret_key) = std::env::var("SECRET_KEY") {
            builder = builder.set_override("secret_key", secret_key)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}

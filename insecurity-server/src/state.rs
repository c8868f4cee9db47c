use std::path::PathBuf;

use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(db: Database, uploads_dir: PathBuf) -> Self {
        Self { db, uploads_dir }
    }
}

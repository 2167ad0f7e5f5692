//! Homebranch personal e-book library server
//!
//! REST JSON API for a self-hosted library: books and their files, book
//! shelves, users with role-based permissions, per-device reading positions
//! and authors enriched in the background from Open Library.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

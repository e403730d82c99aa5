// src/config.rs

use std::env;
use dotenvy::dotenv;

use crate::utils::hash::hash_password;

/// Points a single question is worth.
pub const MAX_POINTS_PER_QUESTION: f64 = 1.0;

/// Decimal places kept for multi-select partial credit.
pub const PARTIAL_CREDIT_DECIMALS: i32 = 4;

/// Most options a question may carry.
pub const MAX_OPTIONS: usize = 6;

/// Time limits a student may pick when the admin has not fixed one. 0 = no limit.
pub const TIME_LIMIT_CHOICES: [u32; 7] = [0, 3, 5, 10, 15, 20, 30];

pub const MAX_TIME_LIMIT_MINUTES: u32 = 120;

/// Attempts older than this are discarded.
pub const ATTEMPT_TTL_HOURS: i64 = 24;

pub const LEADERBOARD_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    /// When set, questions and scores live in PostgreSQL.
    pub database_url: Option<String>,
    /// Flat-file directory, used when `database_url` is unset.
    pub data_dir: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    /// Argon2 hash of the admin password. Admin login is refused when unset.
    pub admin_password_hash: Option<String>,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        let admin_password_hash = match env::var("ADMIN_PASSWORD_HASH") {
            Ok(hash) if !hash.trim().is_empty() => Some(hash.trim().to_string()),
            _ => env::var("ADMIN_PASSWORD")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .map(|p| hash_password(&p).expect("Failed to hash ADMIN_PASSWORD")),
        };

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        Self {
            database_url,
            data_dir,
            jwt_secret,
            jwt_expiration,
            admin_password_hash,
            rust_log,
            port,
        }
    }
}

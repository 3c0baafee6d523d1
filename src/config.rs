// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Wrong answers on one challenge before the solution may be revealed.
pub const REVEAL_AFTER_WRONG_ATTEMPTS: u32 = 3;

/// Completion-count milestones and the badge each one unlocks.
pub const COMPLETION_MILESTONES: [(i64, &str); 3] = [
    (1, "First Steps"),
    (10, "Journey Pioneer"),
    (50, "Challenge Champion"),
];

/// A completion worth exactly this much XP earns "Perfect Score".
pub const PERFECT_SCORE_XP: i32 = 10;
pub const PERFECT_SCORE_BADGE: &str = "Perfect Score";

/// Daily-streak milestones and the badge each one unlocks.
pub const STREAK_MILESTONES: [(i32, &str); 2] = [(7, "Week Warrior"), (30, "Monthly Master")];

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    pub auto_advance: bool,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty() && url != "memory");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let auto_advance = env::var("AUTO_ADVANCE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            auto_advance,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }
}

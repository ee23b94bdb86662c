//! Runtime configuration from environment variables
//!
//! - `GULPER_DATABASE_PATH`: SQLite file. Defaults to `data/gulper.db` next to
//!   the project root (or next to the executable outside of `target/`).
//! - `GULPER_USER_ID`: user the MCP tools act for when a call names none.
//!   Defaults to `local`.

use std::path::PathBuf;

pub const DATABASE_PATH_VAR: &str = "GULPER_DATABASE_PATH";
pub const USER_ID_VAR: &str = "GULPER_USER_ID";
pub const DEFAULT_USER_ID: &str = "local";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("gulper.db");
            path
        })
}

/// User ID for calls that do not name one
pub fn default_user_id() -> String {
    user_id_or_default(std::env::var(USER_ID_VAR).ok())
}

fn user_id_or_default(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
}

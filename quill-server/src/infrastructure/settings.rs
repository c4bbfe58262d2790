use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database: PathBuf,
    pub(crate) database_max_connections: u32,
    pub(crate) secret_key: String,
    pub(crate) session_ttl_seconds: i64,
    pub(crate) secure_cookies: bool,
    pub(crate) http_addr: String,
    pub(crate) log_level: String,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
}

impl Settings {
    pub(crate) fn database_from_env() -> Result<(PathBuf, u32)> {
        let database = std::env::var("DATABASE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("instance/quill.sqlite"));
        let max_connections = parse_usize_env("DATABASE_MAX_CONNECTIONS", 5)?;
        let max_connections = u32::try_from(max_connections)
            .context("DATABASE_MAX_CONNECTIONS is too large")?;
        Ok((database, max_connections))
    }

    pub(crate) fn from_env() -> Result<Self> {
        let (database, database_max_connections) = Self::database_from_env()?;
        let secret_key = get_required("SECRET_KEY").context("SECRET_KEY is required")?;
        let session_ttl_seconds: i64 = std::env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .context("Failed to parse SESSION_TTL_SECONDS, expecting integer")?;

        if secret_key.chars().count() < 32 {
            return Err(anyhow!("SECRET_KEY must be at least 32 characters"));
        }

        let secure_cookies = parse_bool_env("SECURE_COOKIES", false)?;
        let http_addr =
            std::env::var("HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 64 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;

        Ok(Self {
            database,
            database_max_connections,
            secret_key,
            session_ttl_seconds,
            secure_cookies,
            http_addr,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => parse_bool(&raw).ok_or_else(|| anyhow!("{key} must be true or false")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

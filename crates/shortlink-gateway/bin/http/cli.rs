use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "SHORTLINK_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "SHORTLINK_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "SHORTLINK_REDIS_URL";
pub const REDIS_KEY_PREFIX_ENV: &str = "SHORTLINK_REDIS_KEY_PREFIX";
pub const STORAGE_TIMEOUT_MS_ENV: &str = "SHORTLINK_STORAGE_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "SHORTLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIS_KEY_PREFIX: &str = "shortlink:";
pub const DEFAULT_STORAGE_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "shortlink-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_KEY_PREFIX_ENV, default_value = DEFAULT_REDIS_KEY_PREFIX)]
    pub redis_key_prefix: String,

    /// Deadline for every individual storage call, in milliseconds.
    #[arg(long, env = STORAGE_TIMEOUT_MS_ENV, default_value_t = DEFAULT_STORAGE_TIMEOUT_MS)]
    pub storage_timeout_ms: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_in_memory() {
        let cli = CLI::try_parse_from(["shortlink-gateway"]).unwrap();
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(cli.storage_timeout_ms, DEFAULT_STORAGE_TIMEOUT_MS);
    }

    #[test]
    fn redis_requires_url() {
        assert!(CLI::try_parse_from(["shortlink-gateway", "--storage", "redis"]).is_err());

        let cli = CLI::try_parse_from([
            "shortlink-gateway",
            "--storage",
            "redis",
            "--redis-url",
            "redis://127.0.0.1:6379",
        ])
        .unwrap();
        assert_eq!(cli.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
    }
}

//! Server configuration from environment variables
//!
//! ```bash
//! FAMILY_JWT_SECRET=your-super-secret-key-at-least-32-chars
//! FAMILY_DATA_PATH=/var/lib/family/family.jsonl
//! FAMILY_HTTP_PORT=3030
//! FAMILY_ADMIN_EMAIL=admin@example.org FAMILY_ADMIN_PASSWORD=change-me
//! ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::engine::{EngineSettings, DEFAULT_DEPTH, MAX_DEPTH};
use crate::error::{GraphError, GraphResult};

/// Shortest accepted token signing secret
pub const MIN_SECRET_LEN: usize = 32;

const DEFAULT_DATA_FILE: &str = "family.jsonl";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3030;
const DEFAULT_ACCESS_TTL: i64 = 3600;
const DEFAULT_REFRESH_TTL: i64 = 604_800;

/// Credentials for the super admin created at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_ttl: i64,
    pub refresh_token_ttl: i64,
    pub default_depth: i32,
    pub max_depth: i32,
    pub reciprocal_edges: bool,
    pub admin: Option<AdminBootstrap>,
    pub log_level: String,
}

impl Config {
    /// Read the process environment
    pub fn from_env() -> GraphResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> GraphResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("FAMILY_JWT_SECRET")
            .ok_or_else(|| GraphError::Config("FAMILY_JWT_SECRET is not set".to_string()))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(GraphError::Config(format!(
                "FAMILY_JWT_SECRET must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }

        let data_path = match get("FAMILY_DATA_PATH") {
            Some(path) => {
                let path = PathBuf::from(path);
                if path.is_absolute() {
                    path
                } else {
                    env::current_dir()?.join(path)
                }
            }
            None => env::current_dir()?.join(DEFAULT_DATA_FILE),
        };

        let admin = match (get("FAMILY_ADMIN_EMAIL"), get("FAMILY_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (None, None) => None,
            _ => {
                return Err(GraphError::Config(
                    "FAMILY_ADMIN_EMAIL and FAMILY_ADMIN_PASSWORD must be set together".to_string(),
                ))
            }
        };

        let config = Self {
            data_path,
            host: get("FAMILY_HTTP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse(&get, "FAMILY_HTTP_PORT", DEFAULT_PORT)?,
            jwt_secret,
            access_token_ttl: parse(&get, "FAMILY_ACCESS_TOKEN_TTL", DEFAULT_ACCESS_TTL)?,
            refresh_token_ttl: parse(&get, "FAMILY_REFRESH_TOKEN_TTL", DEFAULT_REFRESH_TTL)?,
            default_depth: parse(&get, "FAMILY_DEFAULT_DEPTH", DEFAULT_DEPTH)?,
            max_depth: parse(&get, "FAMILY_MAX_DEPTH", MAX_DEPTH)?,
            reciprocal_edges: parse(&get, "FAMILY_RECIPROCAL_EDGES", false)?,
            admin,
            log_level: get("FAMILY_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        if config.max_depth < 1 || config.default_depth < 1 {
            return Err(GraphError::Config(
                "traversal depths must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            default_depth: self.default_depth,
            max_depth: self.max_depth,
            reciprocal_edges: self.reciprocal_edges,
        }
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T, G>(get: &G, key: &str, default: T) -> GraphResult<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| GraphError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-characters-long";

    fn config(pairs: &[(&str, &str)]) -> GraphResult<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("FAMILY_JWT_SECRET", SECRET)]).unwrap();
        assert_eq!(cfg.bind_address(), "127.0.0.1:3030");
        assert_eq!(cfg.access_token_ttl, 3600);
        assert_eq!(cfg.refresh_token_ttl, 604_800);
        assert!(cfg.data_path.ends_with("family.jsonl"));
        assert!(cfg.data_path.is_absolute());
        assert!(cfg.admin.is_none());
        assert_eq!(cfg.engine_settings(), EngineSettings::default());
    }

    #[test]
    fn test_secret_required_and_long_enough() {
        assert!(matches!(config(&[]), Err(GraphError::Config(_))));
        assert!(matches!(
            config(&[("FAMILY_JWT_SECRET", "short")]),
            Err(GraphError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("FAMILY_JWT_SECRET", SECRET),
            ("FAMILY_DATA_PATH", "/tmp/tree.jsonl"),
            ("FAMILY_HTTP_PORT", "8080"),
            ("FAMILY_MAX_DEPTH", "10"),
            ("FAMILY_RECIPROCAL_EDGES", "true"),
            ("FAMILY_ADMIN_EMAIL", "root@example.org"),
            ("FAMILY_ADMIN_PASSWORD", "pw"),
        ])
        .unwrap();

        assert_eq!(cfg.data_path, PathBuf::from("/tmp/tree.jsonl"));
        assert_eq!(cfg.port, 8080);
        let settings = cfg.engine_settings();
        assert_eq!(settings.max_depth, 10);
        assert!(settings.reciprocal_edges);
        assert_eq!(cfg.admin.unwrap().email, "root@example.org");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config(&[("FAMILY_JWT_SECRET", SECRET), ("FAMILY_HTTP_PORT", "http")]).is_err());
        assert!(config(&[("FAMILY_JWT_SECRET", SECRET), ("FAMILY_MAX_DEPTH", "0")]).is_err());
        assert!(config(&[
            ("FAMILY_JWT_SECRET", SECRET),
            ("FAMILY_ADMIN_EMAIL", "root@example.org")
        ])
        .is_err());
    }
}

//! Database and listener settings from environment variables.
//!
//! The database is described by `DIALECT`, `HOST`, `DBPORT`, `USER`, `NAME` and `PASSWORD`.
//! Empty values fall through to the driver defaults (`PG*` variables, `localhost`).

use crate::error::ConfigError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub dbname: Option<String>,
    pub password: Option<String>,
    pub max_connections: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub bind_addr: SocketAddr,
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Only the postgres dialect is supported.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let dialect = non_empty(&lookup, "DIALECT").unwrap_or_else(|| "postgres".into());
        if !matches!(dialect.to_lowercase().as_str(), "postgres" | "postgresql") {
            return Err(ConfigError::UnsupportedDialect(dialect));
        }
        let port = non_empty(&lookup, "DBPORT")
            .map(|p| {
                p.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                    name: "DBPORT",
                    value: p.clone(),
                })
            })
            .transpose()?;
        let max_connections = match non_empty(&lookup, "DB_MAX_CONNECTIONS") {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "DB_MAX_CONNECTIONS",
                        value: v,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };
        Ok(DbConfig {
            host: non_empty(&lookup, "HOST"),
            port,
            user: non_empty(&lookup, "USER"),
            dbname: non_empty(&lookup, "NAME"),
            password: non_empty(&lookup, "PASSWORD"),
            max_connections,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let mut opts = PgConnectOptions::new().ssl_mode(PgSslMode::Disable);
        if let Some(ref host) = self.host {
            opts = opts.host(host);
        }
        if let Some(port) = self.port {
            opts = opts.port(port);
        }
        if let Some(ref user) = self.user {
            opts = opts.username(user);
        }
        if let Some(ref dbname) = self.dbname {
            opts = opts.database(dbname);
        }
        if let Some(ref password) = self.password {
            opts = opts.password(password);
        }
        opts
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = non_empty(&lookup, "BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind.parse().map_err(|_| ConfigError::InvalidValue {
            name: "BIND_ADDR",
            value: bind.clone(),
        })?;
        Ok(ServerConfig {
            db: DbConfig::from_lookup(lookup)?,
            bind_addr,
        })
    }
}

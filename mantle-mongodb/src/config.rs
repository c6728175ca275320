//! Connection parameters for the MongoDB adapter.

use serde::{Deserialize, Serialize};

/// Default host when none is configured.
pub const DEFAULT_HOST: &str = "localhost";
/// Default MongoDB port when none is configured.
pub const DEFAULT_PORT: u16 = 27017;

/// Parameters describing one database endpoint.
///
/// Immutable once handed to the driver builder. Only the database name is
/// required; host and port fall back to the conventional local deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Host name or address of the deployment.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port the deployment listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Name of the database all operations are scoped to.
    pub database: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ConnectionConfig {
    /// Creates a configuration for a database on the default local endpoint.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            database: database.into(),
        }
    }

    /// Overrides the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Renders the connection string for this endpoint.
    pub fn connection_string(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_endpoint() {
        let config = ConnectionConfig::new("heroics");

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 27017);
        assert_eq!(config.connection_string(), "mongodb://localhost:27017");
    }

    #[test]
    fn overrides_apply() {
        let config = ConnectionConfig::new("heroics")
            .with_host("db.internal")
            .with_port(27018);

        assert_eq!(config.connection_string(), "mongodb://db.internal:27018");
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{ "database": "heroics" }"#).unwrap();

        assert_eq!(config, ConnectionConfig::new("heroics"));
    }
}

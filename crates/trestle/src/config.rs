//! Connection configuration.
//!
//! ```json
//! {
//!     "throw_on_database_error": true,
//!     "throw_on_query_error": false,
//!     "default": "blog",
//!     "connections": {
//!         "blog": { "driver": "SQLite", "database": "blog.sqlite3" }
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use trestle_core::{Blueprint, Dialect};

use crate::dsn::{join_fields, DsnDescriptor};
use crate::error::ConfigError;

/// Connect timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 25;

const fn default_true() -> bool {
    true
}

/// One named connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Dialect: `MySQL` or `SQLite`.
    pub driver: Blueprint,
    /// Database name, or file path for SQLite.
    #[serde(default)]
    pub database: Option<String>,
    /// Server host.
    #[serde(default)]
    pub host: Option<String>,
    /// User name.
    #[serde(default)]
    pub username: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
    /// Server port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Connection charset.
    #[serde(default)]
    pub charset: Option<String>,
    /// Unix socket path.
    #[serde(default)]
    pub socket: Option<String>,
    /// Connect timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Extra driver options, passed as URL parameters.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl ConnectionConfig {
    /// Creates an empty connection for a dialect.
    #[must_use]
    pub const fn new(driver: Blueprint) -> Self {
        Self {
            driver,
            database: None,
            host: None,
            username: None,
            password: None,
            port: None,
            charset: None,
            socket: None,
            timeout: None,
            options: BTreeMap::new(),
        }
    }

    /// A SQLite connection to a file, or `:memory:`.
    #[must_use]
    pub fn sqlite(database: &str) -> Self {
        Self::new(Blueprint::Sqlite).database(database)
    }

    /// Sets the database.
    #[must_use]
    pub fn database(mut self, database: &str) -> Self {
        self.database = Some(String::from(database));
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(String::from(host));
        self
    }

    /// Sets the user name.
    #[must_use]
    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(String::from(username));
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(String::from(password));
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the charset.
    #[must_use]
    pub fn charset(mut self, charset: &str) -> Self {
        self.charset = Some(String::from(charset));
        self
    }

    /// Sets the unix socket.
    #[must_use]
    pub fn socket(mut self, socket: &str) -> Self {
        self.socket = Some(String::from(socket));
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Adds a driver option.
    #[must_use]
    pub fn option(mut self, key: &str, value: &str) -> Self {
        self.options.insert(String::from(key), String::from(value));
        self
    }

    /// Connect timeout, falling back to [`DEFAULT_TIMEOUT_SECS`].
    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Looks a field up by name; unknown names fall through to `options`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "driver" => Some(self.driver.name().to_lowercase()),
            "database" => self.database.clone(),
            "host" => self.host.clone(),
            "username" => self.username.clone(),
            "password" => self.password.clone(),
            "port" => self.port.map(|p| p.to_string()),
            "charset" => self.charset.clone(),
            "socket" => self.socket.clone(),
            "timeout" => self.timeout.map(|t| t.to_string()),
            other => self.options.get(other).cloned(),
        }
    }

    /// Database name for messages, falling back to `fallback`.
    #[must_use]
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.database.as_deref().unwrap_or(fallback)
    }
}

/// Which failures are raised instead of absorbed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    /// Raise connect failures as `DatabaseError`.
    pub throw_on_database_error: bool,
    /// Raise statement failures as `QueryError`.
    pub throw_on_query_error: bool,
}

/// Global settings and named connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Raise connect failures.
    #[serde(default)]
    pub throw_on_database_error: bool,
    /// Raise statement failures.
    #[serde(default)]
    pub throw_on_query_error: bool,
    /// Check required fields on load.
    #[serde(default = "default_true")]
    pub validation: bool,
    /// Connection used when none is named.
    #[serde(default)]
    pub default: Option<String>,
    /// Named connections.
    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates an empty configuration with validation enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            throw_on_database_error: false,
            throw_on_query_error: false,
            validation: true,
            default: None,
            connections: BTreeMap::new(),
        }
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Adds a named connection.
    #[must_use]
    pub fn with_connection(mut self, name: &str, connection: ConnectionConfig) -> Self {
        self.connections.insert(String::from(name), connection);
        self
    }

    /// Sets the default connection.
    #[must_use]
    pub fn default_connection(mut self, name: &str) -> Self {
        self.default = Some(String::from(name));
        self
    }

    /// Sets whether connect failures are raised.
    #[must_use]
    pub const fn throw_on_database_error(mut self, throw: bool) -> Self {
        self.throw_on_database_error = throw;
        self
    }

    /// Sets whether statement failures are raised.
    #[must_use]
    pub const fn throw_on_query_error(mut self, throw: bool) -> Self {
        self.throw_on_query_error = throw;
        self
    }

    /// Sets whether connections are checked for required fields.
    #[must_use]
    pub const fn validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    /// The policy flags.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        Policy {
            throw_on_database_error: self.throw_on_database_error,
            throw_on_query_error: self.throw_on_query_error,
        }
    }

    /// Checks that there is a connection and that each one has the fields
    /// its driver requires.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connections.is_empty() {
            return Err(ConfigError::NoConnections);
        }
        if !self.validation {
            return Ok(());
        }
        for (name, connection) in &self.connections {
            let descriptor = DsnDescriptor::for_blueprint(connection.driver);
            if let Some(missing) = descriptor.missing(connection) {
                return Err(ConfigError::MissingParameters {
                    connection: name.clone(),
                    missing: join_fields(&missing),
                });
            }
        }
        Ok(())
    }

    /// Resolves a connection by name, or the default one.
    pub fn connection(&self, name: Option<&str>) -> Result<(&str, &ConnectionConfig), ConfigError> {
        if self.connections.is_empty() {
            return Err(ConfigError::NoConnections);
        }
        let name = name
            .or(self.default.as_deref())
            .ok_or(ConfigError::NoDefaultConnection)?;
        self.connections
            .get_key_value(name)
            .map(|(name, connection)| (name.as_str(), connection))
            .ok_or_else(|| ConfigError::UnknownConnection(String::from(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json() {
        let config = Config::from_json_str(
            r#"{
                "throw_on_query_error": true,
                "default": "blog",
                "connections": {
                    "blog": { "driver": "sqlite", "database": ":memory:" },
                    "shop": {
                        "driver": "MySQL",
                        "host": "localhost",
                        "username": "root",
                        "port": 3307,
                        "options": { "ssl-mode": "disabled" }
                    }
                }
            }"#,
        )
        .unwrap();
        assert!(config.throw_on_query_error);
        assert!(!config.throw_on_database_error);
        assert!(config.validation);
        let (name, blog) = config.connection(None).unwrap();
        assert_eq!(name, "blog");
        assert_eq!(blog.driver, Blueprint::Sqlite);
        let (_, shop) = config.connection(Some("shop")).unwrap();
        assert_eq!(shop.port, Some(3307));
        assert_eq!(shop.field("ssl-mode").as_deref(), Some("disabled"));
        assert_eq!(shop.timeout_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn reports_missing_fields() {
        let err = Config::from_json_str(
            r#"{ "connections": { "shop": { "driver": "MySQL" } } }"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required parameter(s) host & username from the \"shop\" connection"
        );
    }

    #[test]
    fn validation_can_be_disabled() {
        let config = Config::from_json_str(
            r#"{ "validation": false, "connections": { "shop": { "driver": "MySQL" } } }"#,
        )
        .unwrap();
        assert!(!config.validation);
    }

    #[test]
    fn needs_a_connection() {
        assert!(matches!(
            Config::from_json_str(r#"{ "connections": {} }"#),
            Err(ConfigError::NoConnections)
        ));
    }

    #[test]
    fn resolves_connections() {
        let config = Config::new().with_connection("a", ConnectionConfig::sqlite(":memory:"));
        assert!(matches!(
            config.connection(None),
            Err(ConfigError::NoDefaultConnection)
        ));
        assert!(matches!(
            config.connection(Some("b")),
            Err(ConfigError::UnknownConnection(name)) if name == "b"
        ));
        assert_eq!(config.connection(Some("a")).unwrap().0, "a");
    }

    #[test]
    fn rejects_unknown_driver() {
        assert!(matches!(
            Config::from_json_str(r#"{ "connections": { "x": { "driver": "oracle" } } }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}

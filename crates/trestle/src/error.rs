//! Error types for configuration, connections and execution.

use std::path::PathBuf;

use trestle_core::QueryBuilderError;

/// Malformed or incomplete configuration. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A connection lacks fields its driver requires.
    #[error("Missing required parameter(s) {missing} from the \"{connection}\" connection")]
    MissingParameters {
        /// Connection name.
        connection: String,
        /// Missing fields, formatted `a, b & c`.
        missing: String,
    },

    /// The connection map is empty.
    #[error("At least one connection is required")]
    NoConnections,

    /// The requested connection is not configured.
    #[error("Connection \"{0}\" is not configured")]
    UnknownConnection(String),

    /// No connection was named and there is no default.
    #[error("No connection name given and no default connection configured")]
    NoDefaultConnection,

    /// The configuration file could not be read.
    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for the expected shape.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Connection establishment or lifecycle failure.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The driver refused the connection.
    #[error("Connection failed for \"{database}\" database: {source}")]
    ConnectionFailed {
        /// Database name, or the connection name when none is set.
        database: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// The connection did not open within the configured timeout.
    #[error("Connection to \"{database}\" database timed out after {seconds}s")]
    ConnectTimeout {
        /// Database name, or the connection name when none is set.
        database: String,
        /// Configured timeout.
        seconds: u64,
    },

    /// A statement was run without a live connection.
    #[error("No database connection detected for \"{connection}\", has it been disconnected?")]
    NotConnected {
        /// Connection name.
        connection: String,
    },

    /// The runtime driving the connection could not start.
    #[error("Failed to start the database runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Driver-level execution failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct QueryError {
    /// Driver message.
    pub message: String,
    /// Statement that failed.
    pub sql: String,
}

/// Any error raised by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Connection error.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Builder misuse.
    #[error(transparent)]
    Builder(#[from] QueryBuilderError),

    /// Execution error.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Result type for trestle operations.
pub type Result<T> = std::result::Result<T, Error>;

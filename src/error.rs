use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stage of an export run, carried by every error for diagnosis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    QueryNodes,
    QueryEdges,
    Encode,
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Connect => "connect",
            Phase::QueryNodes => "query-nodes",
            Phase::QueryEdges => "query-edges",
            Phase::Encode => "encode",
            Phase::Write => "write",
        };
        f.write_str(name)
    }
}

/// Main error type for roadgexf
#[derive(Error, Debug)]
pub enum RoadGexfError {
    /// Data source unreachable or rejected at startup
    #[error("Connection error [{phase}]: unable to open {path}: {source}", phase = Phase::Connect)]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A query failed at the data source (syntax or schema mismatch)
    #[error("Query error [{phase}]: {source}")]
    Query {
        phase: Phase,
        #[source]
        source: rusqlite::Error,
    },

    /// Source rows that cannot be turned into a consistent graph
    #[error("Data integrity error [{phase}]: {message}")]
    DataIntegrity { phase: Phase, message: String },

    /// Output sink could not be created or written
    #[error("IO error [{phase}]: {path}: {source}")]
    Io {
        phase: Phase,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blocking database task did not complete
    #[error("Task error: {0}")]
    Task(String),
}

impl RoadGexfError {
    pub fn query(phase: Phase, source: rusqlite::Error) -> Self {
        RoadGexfError::Query { phase, source }
    }

    pub fn integrity(phase: Phase, message: impl Into<String>) -> Self {
        RoadGexfError::DataIntegrity {
            phase,
            message: message.into(),
        }
    }

    pub fn io(phase: Phase, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RoadGexfError::Io {
            phase,
            path: path.into(),
            source,
        }
    }

    /// The phase the run was in when this error occurred, if any
    pub fn phase(&self) -> Option<Phase> {
        match self {
            RoadGexfError::Connection { .. } => Some(Phase::Connect),
            RoadGexfError::Query { phase, .. }
            | RoadGexfError::DataIntegrity { phase, .. }
            | RoadGexfError::Io { phase, .. } => Some(*phase),
            RoadGexfError::Config(_) | RoadGexfError::Task(_) => None,
        }
    }
}

/// Convenient Result type using RoadGexfError
pub type Result<T> = std::result::Result<T, RoadGexfError>;

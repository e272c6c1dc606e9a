use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("cannot start schema runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("cannot connect to database: {0}")]
    Connection(String),

    #[error("schema discovery failed: {0}")]
    Discovery(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("region '{inner}' opened inside region '{outer}' (line {line})")]
    Nested {
        outer: String,
        inner: String,
        line: usize,
    },

    #[error("region '{name}' closed without being opened (line {line})")]
    Unopened { name: String, line: usize },

    #[error("region '{expected}' closed as '{found}' (line {line})")]
    Mismatched {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("region '{0}' is never closed")]
    Unterminated(String),

    #[error("region '{name}' declared twice (line {line})")]
    Duplicate { name: String, line: usize },

    #[error("no preserved region markers found")]
    NoRegions,

    #[error("region '{0}' has no counterpart in the generated code")]
    Orphaned(String),
}

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{name}' is not a valid {what} identifier")]
    InvalidIdentifier { what: &'static str, name: String },

    #[error("refusing to update '{}': {source}", .path.display())]
    Region {
        path: PathBuf,
        #[source]
        source: RegionError,
    },
}

/// What went wrong, without the message. Survives the outcome boundary so
/// callers can branch on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotConfigured,
    AlreadyUsed,
    InvalidConfig,
    Directory,
    EmptyMetadata,
    Schema,
    Emitter,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidConfig => 2,
            ErrorKind::Directory => 3,
            ErrorKind::Schema => 4,
            ErrorKind::EmptyMetadata => 5,
            ErrorKind::Emitter => 6,
            ErrorKind::NotConfigured | ErrorKind::AlreadyUsed => 70,
        }
    }
}

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("generator has not been configured")]
    NotConfigured,

    #[error("generator already ran; configure a new one")]
    AlreadyUsed,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot create directory '{}': {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No metadata found: the database and table filter produced no tables")]
    EmptyMetadata,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Emitter(#[from] EmitError),
}

impl GeneratorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeneratorError::NotConfigured => ErrorKind::NotConfigured,
            GeneratorError::AlreadyUsed => ErrorKind::AlreadyUsed,
            GeneratorError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            GeneratorError::Directory { .. } => ErrorKind::Directory,
            GeneratorError::EmptyMetadata => ErrorKind::EmptyMetadata,
            GeneratorError::Schema(_) => ErrorKind::Schema,
            GeneratorError::Emitter(_) => ErrorKind::Emitter,
        }
    }
}

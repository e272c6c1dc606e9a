pub mod column_mapping;
pub mod config;
pub mod database_schema;
pub mod entities_generator;
pub mod error;
pub mod generator;
pub mod logging;
pub mod metadata_filter;
pub mod name_transform;
pub mod region;
pub mod repositories_generator;
pub mod rustfmt;
pub mod types;

pub use database_schema::{SchemaSource, SqliteSchemaSource};
pub use entities_generator::{EntityEmitter, RustEntityEmitter};
pub use error::{EmitError, ErrorKind, GeneratorError, RegionError, SchemaError};
pub use generator::{generate, GenerationConfig, GenerationOutcome, Generator, GeneratorState};
pub use repositories_generator::{RepositoryEmitter, RustRepositoryEmitter};
pub use types::{ColumnMeta, ForeignKeyMeta, TableMetadata};

use crate::generator::GenerationConfig;
use anyhow::{Context, Result};
use serde_derive::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENTITY_NAMESPACE: &str = "Models\\Entities";
pub const DEFAULT_REPOSITORY_NAMESPACE: &str = "Models\\Repositories";
pub const DEFAULT_DIRECTORY: &str = "generated";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://chinook.db";

/// Optional TOML file with the same settings as the command line.
///
/// ```toml
/// database-url = "sqlite://shop.db"
/// namespace-entity = 'App\Entities'
/// namespace-repository = 'App\Repositories'
/// sequence-prefix = "SEQ"
/// filter = ["orders", "order_items"]
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub namespace_entity: Option<String>,
    pub namespace_repository: Option<String>,
    pub superclass: Option<String>,
    pub sequence_prefix: Option<String>,
    pub directory: Option<PathBuf>,
    pub filter: Vec<String>,
    pub rustfmt: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;

        Self::from_toml(&contents).with_context(|| format!("invalid config file '{}'", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Settings given on the command line; `None` / empty means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub database_url: Option<String>,
    pub namespace_entity: Option<String>,
    pub namespace_repository: Option<String>,
    pub superclass: Option<String>,
    pub sequence_prefix: Option<String>,
    pub directory: Option<PathBuf>,
    pub filter: Vec<String>,
    pub rustfmt: bool,
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub rustfmt: bool,
    pub generation: GenerationConfig,
}

impl Settings {
    /// Command line first, then the file, then the built-in defaults.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Self {
        let filter = if overrides.filter.is_empty() {
            file.filter
        } else {
            overrides.filter
        };

        let entity_namespace = overrides
            .namespace_entity
            .or(file.namespace_entity)
            .unwrap_or_else(|| DEFAULT_ENTITY_NAMESPACE.to_string());
        let repository_namespace = overrides
            .namespace_repository
            .or(file.namespace_repository)
            .unwrap_or_else(|| DEFAULT_REPOSITORY_NAMESPACE.to_string());
        let directory = overrides
            .directory
            .or(file.directory)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY));

        let generation = GenerationConfig::new(&entity_namespace, &repository_namespace, directory)
            .with_superclass(overrides.superclass.or(file.superclass))
            .with_sequence_prefix(overrides.sequence_prefix.or(file.sequence_prefix))
            .with_table_filter(filter);

        Settings {
            database_url: overrides
                .database_url
                .or(file.database_url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            rustfmt: overrides.rustfmt || file.rustfmt.unwrap_or(false),
            generation,
        }
    }
}

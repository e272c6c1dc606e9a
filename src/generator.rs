use crate::database_schema::SchemaSource;
use crate::entities_generator::{EntityEmitter, RustEntityEmitter};
use crate::error::{ErrorKind, GeneratorError};
use crate::metadata_filter;
use crate::name_transform::{normalize_namespace, NAMESPACE_SEPARATOR};
use crate::repositories_generator::{RepositoryEmitter, RustRepositoryEmitter};
use crate::types::TableMetadata;
use std::fs::DirBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Everything one generation run needs. Namespaces are normalized to end
/// with exactly one separator on construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    entity_namespace: String,
    repository_namespace: String,
    superclass_name: Option<String>,
    sequence_prefix: Option<String>,
    table_filter: Vec<String>,
    output_directory: PathBuf,
}

impl GenerationConfig {
    pub fn new(
        entity_namespace: &str,
        repository_namespace: &str,
        output_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            entity_namespace: normalize_namespace(entity_namespace),
            repository_namespace: normalize_namespace(repository_namespace),
            superclass_name: None,
            sequence_prefix: None,
            table_filter: Vec::new(),
            output_directory: output_directory.into(),
        }
    }

    /// Blank names count as absent.
    pub fn with_superclass(mut self, superclass_name: Option<String>) -> Self {
        self.superclass_name = non_blank(superclass_name);
        self
    }

    /// Blank prefixes count as absent.
    pub fn with_sequence_prefix(mut self, sequence_prefix: Option<String>) -> Self {
        self.sequence_prefix = non_blank(sequence_prefix);
        self
    }

    pub fn with_table_filter<I, S>(mut self, table_filter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table_filter = table_filter.into_iter().map(Into::into).collect();
        self
    }

    pub fn entity_namespace(&self) -> &str {
        &self.entity_namespace
    }

    pub fn repository_namespace(&self) -> &str {
        &self.repository_namespace
    }

    pub fn superclass_name(&self) -> Option<&str> {
        self.superclass_name.as_deref()
    }

    pub fn sequence_prefix(&self) -> Option<&str> {
        self.sequence_prefix.as_deref()
    }

    pub fn table_filter(&self) -> &[String] {
        &self.table_filter
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        for (label, namespace) in [
            ("entity namespace", &self.entity_namespace),
            ("repository namespace", &self.repository_namespace),
        ] {
            if namespace.trim_matches(NAMESPACE_SEPARATOR).trim().is_empty() {
                return Err(GeneratorError::InvalidConfig(format!("{} must not be empty", label)));
            }
        }

        if self.output_directory.as_os_str().is_empty() {
            return Err(GeneratorError::InvalidConfig(
                "output directory must not be empty".into(),
            ));
        }

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success {
        message: String,
        tables: usize,
        repositories_written: usize,
    },
    Failure {
        kind: ErrorKind,
        message: String,
    },
}

impl GenerationOutcome {
    fn failure(err: &GeneratorError) -> Self {
        GenerationOutcome::Failure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            GenerationOutcome::Success { message, .. } | GenerationOutcome::Failure { message, .. } => message,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            GenerationOutcome::Success { .. } => None,
            GenerationOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().map_or(0, ErrorKind::exit_code)
    }
}

/// `SEQ` + `orders` -> `SEQ_ORDERS`
pub fn sequence_name(prefix: &str, table_name: &str) -> String {
    format!("{}_{}", prefix, table_name).to_uppercase()
}

/// Repository class for a qualified entity class: the entity namespace is
/// swapped for the repository namespace.
pub fn repository_class_for(entity_class: &str, entity_namespace: &str, repository_namespace: &str) -> String {
    match entity_class.strip_prefix(entity_namespace) {
        Some(class_name) => format!("{}{}", repository_namespace, class_name),
        None => entity_class.replace(entity_namespace, repository_namespace),
    }
}

/// Links every table to its repository and applies the sequence and
/// superclass conventions of `config`.
pub fn annotate(metadata: &mut [TableMetadata], config: &GenerationConfig) {
    for table in metadata.iter_mut() {
        table.repository_class_name = Some(format!("{}{}", config.repository_namespace, table.class_name));
        table.sequence_name = config
            .sequence_prefix()
            .map(|prefix| sequence_name(prefix, &table.table_name));
        table.superclass_name = config.superclass_name.clone();

        debug!(
            table = %table.table_name,
            repository = ?table.repository_class_name,
            sequence = ?table.sequence_name,
            "annotated"
        );
    }
}

#[cfg(unix)]
fn ensure_directory(path: &Path) -> Result<(), GeneratorError> {
    use std::os::unix::fs::DirBuilderExt;

    if path.is_dir() {
        return Ok(());
    }

    DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(path)
        .map_err(|source| GeneratorError::Directory {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
fn ensure_directory(path: &Path) -> Result<(), GeneratorError> {
    if path.is_dir() {
        return Ok(());
    }

    DirBuilder::new()
        .recursive(true)
        .create(path)
        .map_err(|source| GeneratorError::Directory {
            path: path.to_path_buf(),
            source,
        })
}

struct Report {
    tables: usize,
    repositories_written: usize,
}

fn run(
    config: &GenerationConfig,
    source: &dyn SchemaSource,
    entities: &dyn EntityEmitter,
    repositories: &dyn RepositoryEmitter,
) -> Result<Report, GeneratorError> {
    config.validate()?;

    let dir = config.output_directory();
    ensure_directory(dir)?;

    let all_metadata = source.all_metadata(config.entity_namespace())?;
    let discovered = all_metadata.len();

    let mut metadata = metadata_filter::filter(all_metadata, config.table_filter());
    debug!(discovered, kept = metadata.len(), filter = ?config.table_filter(), "metadata filtered");

    if metadata.is_empty() {
        return Err(GeneratorError::EmptyMetadata);
    }

    annotate(&mut metadata, config);

    entities.generate(&metadata, dir)?;

    let mut repositories_written = 0;
    for table in &metadata {
        let class_name = repository_class_for(
            &table.qualified_name(),
            config.entity_namespace(),
            config.repository_namespace(),
        );

        if repositories.write_one(&class_name, dir)? {
            repositories_written += 1;
        }
    }

    Ok(Report {
        tables: metadata.len(),
        repositories_written,
    })
}

/// One generation run. Never fails: every error ends up in
/// [`GenerationOutcome::Failure`]. Files written before a failure stay on
/// disk.
pub fn generate(
    config: &GenerationConfig,
    source: &dyn SchemaSource,
    entities: &dyn EntityEmitter,
    repositories: &dyn RepositoryEmitter,
) -> GenerationOutcome {
    info!(
        directory = %config.output_directory().display(),
        entity_namespace = config.entity_namespace(),
        repository_namespace = config.repository_namespace(),
        "generating entity and repository classes"
    );

    match run(config, source, entities, repositories) {
        Ok(report) => {
            info!(tables = report.tables, repositories_written = report.repositories_written, "generation finished");

            GenerationOutcome::Success {
                message: format!(
                    "Generated entity and repository classes for {} table(s) in '{}'",
                    report.tables,
                    config.output_directory().display()
                ),
                tables: report.tables,
                repositories_written: report.repositories_written,
            }
        }
        Err(err) => {
            error!(kind = ?err.kind(), error = %err, "generation failed");
            GenerationOutcome::failure(&err)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorState {
    Unconfigured,
    Configured,
    Done,
}

enum State {
    Unconfigured,
    Configured(GenerationConfig),
    Done,
}

/// Single-use wrapper around [`generate`]: configure once, generate once.
pub struct Generator<S> {
    source: S,
    entities: Box<dyn EntityEmitter>,
    repositories: Box<dyn RepositoryEmitter>,
    state: State,
}

impl<S: SchemaSource> Generator<S> {
    /// Uses the Rust emitters with the update-in-place entity policy.
    pub fn new(source: S) -> Self {
        Self::with_emitters(
            source,
            Box::new(RustEntityEmitter::new()),
            Box::new(RustRepositoryEmitter::new()),
        )
    }

    pub fn with_emitters(
        source: S,
        entities: Box<dyn EntityEmitter>,
        repositories: Box<dyn RepositoryEmitter>,
    ) -> Self {
        Self {
            source,
            entities,
            repositories,
            state: State::Unconfigured,
        }
    }

    pub fn state(&self) -> GeneratorState {
        match self.state {
            State::Unconfigured => GeneratorState::Unconfigured,
            State::Configured(_) => GeneratorState::Configured,
            State::Done => GeneratorState::Done,
        }
    }

    pub fn configure(&mut self, config: GenerationConfig) -> Result<(), GeneratorError> {
        match self.state {
            State::Unconfigured => {
                config.validate()?;
                self.state = State::Configured(config);
                Ok(())
            }
            State::Configured(_) | State::Done => Err(GeneratorError::AlreadyUsed),
        }
    }

    pub fn generate(&mut self) -> GenerationOutcome {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Configured(config) => generate(
                &config,
                &self.source,
                self.entities.as_ref(),
                self.repositories.as_ref(),
            ),
            State::Unconfigured => {
                self.state = State::Unconfigured;
                GenerationOutcome::failure(&GeneratorError::NotConfigured)
            }
            State::Done => GenerationOutcome::failure(&GeneratorError::AlreadyUsed),
        }
    }
}

use clap::{Args, Parser, Subcommand};
use doctrine_generator::config::Overrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doctrine-generator", version, about = "Generate entity and repository classes from a database schema")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate entity and repository classes
    #[command(name = "doctrine:generate")]
    Generate(GenerateArgs),
}

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Table names selected to generate the files (separate multiple names with a space)
    pub filter: Vec<String>,

    /// The namespace to entity classes [default: Models\Entities]
    #[arg(long)]
    pub namespace_entity: Option<String>,

    /// The namespace to repository classes [default: Models\Repositories]
    #[arg(long)]
    pub namespace_repository: Option<String>,

    /// The superclass name to entity classes
    #[arg(long)]
    pub superclass: Option<String>,

    /// The sequence prefix; sequence names follow SEQUENCEPREFIX_TABLENAME
    #[arg(long)]
    pub sequence_prefix: Option<String>,

    /// The path to generate the entity and repository classes in [default: generated]
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Database to read the schema from [default: sqlite://chinook.db]
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// TOML file with default values for the options above
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run rustfmt over every written file
    #[arg(long)]
    pub rustfmt: bool,
}

impl GenerateArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            database_url: self.database_url.clone(),
            namespace_entity: self.namespace_entity.clone(),
            namespace_repository: self.namespace_repository.clone(),
            superclass: self.superclass.clone(),
            sequence_prefix: self.sequence_prefix.clone(),
            directory: self.directory.clone(),
            filter: self.filter.clone(),
            rustfmt: self.rustfmt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_command() {
        let cli = Cli::parse_from([
            "doctrine-generator",
            "doctrine:generate",
            "orders",
            "order_items",
            "--namespace-entity",
            "App\\Entities",
            "--sequence-prefix",
            "SEQ",
            "--directory",
            "out",
        ]);

        let Commands::Generate(args) = cli.command;
        assert_eq!(args.filter, vec!["orders", "order_items"]);
        assert_eq!(args.namespace_entity.as_deref(), Some("App\\Entities"));
        assert_eq!(args.sequence_prefix.as_deref(), Some("SEQ"));
        assert_eq!(args.directory, Some(PathBuf::from("out")));
        assert_eq!(args.superclass, None);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

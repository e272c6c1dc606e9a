mod cli;

use clap::Parser;
use doctrine_generator::config::{FileConfig, Settings};
use doctrine_generator::logging::init_tracing;
use doctrine_generator::{
    GenerationOutcome, Generator, RustEntityEmitter, RustRepositoryEmitter, SqliteSchemaSource,
};
use std::io::IsTerminal;
use std::process::ExitCode;

use cli::{Cli, Commands, GenerateArgs};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Generate(args) => generate(args),
    }
}

fn generate(args: GenerateArgs) -> ExitCode {
    let file = match args.config.as_deref().map(FileConfig::load).transpose() {
        Ok(file) => file.unwrap_or_default(),
        Err(err) => {
            print_line(RED, &format!("{:#}", err));
            return ExitCode::from(2);
        }
    };

    let settings = Settings::resolve(args.overrides(), file);

    let mut generator = Generator::with_emitters(
        SqliteSchemaSource::new(settings.database_url),
        Box::new(RustEntityEmitter::new().rustfmt(settings.rustfmt)),
        Box::new(RustRepositoryEmitter::new().rustfmt(settings.rustfmt)),
    );

    let outcome = match generator.configure(settings.generation) {
        Ok(()) => generator.generate(),
        Err(err) => {
            print_line(RED, &err.to_string());
            return ExitCode::from(err.kind().exit_code());
        }
    };

    match &outcome {
        GenerationOutcome::Success { message, .. } => print_line(GREEN, message),
        GenerationOutcome::Failure { message, .. } => print_line(RED, message),
    }

    ExitCode::from(outcome.exit_code())
}

fn print_line(color: &str, message: &str) {
    if std::io::stdout().is_terminal() {
        println!("{}{}{}", color, message, RESET);
    } else {
        println!("{}", message);
    }
}

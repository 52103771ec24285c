//! CLI for the mutation engine

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mutation_engine::codegen::{apply_mutation_to_file, write_mutated_source};
use mutation_engine::{
    load_source, operators_for, Config, DiscoveryReport, MutationKind, Position,
};

#[derive(Parser)]
#[command(name = "mutation-engine")]
#[command(author, version, about = "Position-scoped AST mutations for Rust", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available mutation kinds
    Kinds,

    /// List the mutation points in a source file
    Discover {
        /// Rust source file
        file: PathBuf,

        /// Only discover these kinds (defaults to all)
        #[arg(short, long = "kind")]
        kinds: Vec<MutationKind>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply one mutation and print the mutated source
    Apply {
        /// Rust source file
        file: PathBuf,

        /// Mutation kind to apply
        #[arg(short, long)]
        kind: MutationKind,

        /// Line of the mutation point (1-indexed)
        #[arg(short, long)]
        line: usize,

        /// Column of the mutation point (1-indexed)
        #[arg(short, long)]
        column: usize,

        /// Write the mutated source here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Discover mutation points in every file of a config
    Plan {
        /// Path to the mutations config file
        #[arg(short, long, default_value = "mutations.yaml")]
        config: PathBuf,

        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show example configuration
    Example,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Kinds => {
            print_kinds();
            Ok(())
        }
        Commands::Discover { file, kinds, json } => discover(&file, &kinds, json),
        Commands::Apply {
            file,
            kind,
            line,
            column,
            output,
        } => apply(&file, kind, Position::new(line, column), output.as_deref()),
        Commands::Plan {
            config,
            project,
            json,
        } => plan(&config, project, json),
        Commands::Example => {
            print_example();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_kinds() {
    for kind in MutationKind::all() {
        println!("{} {}", format!("{:<24}", kind.id()).bold(), kind.label());
    }
}

fn selected_kinds(kinds: &[MutationKind]) -> Vec<MutationKind> {
    if kinds.is_empty() {
        MutationKind::all().to_vec()
    } else {
        kinds.to_vec()
    }
}

fn discover(file: &Path, kinds: &[MutationKind], json: bool) -> anyhow::Result<()> {
    let source = Rc::new(load_source(file)?);
    let operators = operators_for(&file.display().to_string(), &source, &selected_kinds(kinds));
    let report = DiscoveryReport::from_operators(&operators);

    if json {
        println!("{}", report.to_json()?);
    } else {
        report.print();
    }
    Ok(())
}

fn apply(
    file: &Path,
    kind: MutationKind,
    position: Position,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let prepared = apply_mutation_to_file(file, kind, position)?;

    match output {
        Some(output) => {
            write_mutated_source(output, &prepared)?;
            eprintln!(
                "{} {} -> {}",
                "✓".green(),
                prepared.description,
                output.display()
            );
        }
        None => {
            eprintln!("{} {}", "✓".green(), prepared.description);
            print!("{}", prepared.mutated_source);
        }
    }
    Ok(())
}

fn plan(config_path: &Path, project: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let project_dir = project.unwrap_or_else(|| PathBuf::from("."));

    let config = Config::load(config_path)?;
    if let Err(errors) = config.validate(&project_dir) {
        let messages: Vec<String> = errors.iter().map(|e| format!("  • {}", e)).collect();
        anyhow::bail!("Configuration errors found:\n{}", messages.join("\n"));
    }

    let mut report = DiscoveryReport::default();
    for (label, path) in config.files.iter().zip(config.resolve_files(&project_dir)) {
        let source = Rc::new(
            load_source(&path).with_context(|| format!("while planning {}", label.display()))?,
        );
        let operators = operators_for(&label.display().to_string(), &source, &config.operators);
        report.extend(DiscoveryReport::from_operators(&operators));
    }

    info!(
        files = config.files.len(),
        points = report.total(),
        "Planned mutations"
    );

    if json {
        println!("{}", report.to_json()?);
    } else {
        report.print();
    }
    Ok(())
}

fn print_example() {
    let example = r#"# Example mutations.yaml configuration file
version: "1.0"

# Mutation kinds to discover (all of them when omitted)
operators:
  - negate-conditionals   # == <-> !=, < <-> >=, > <-> <=
  - remove-side-effects   # drop `call();` statements

# Source files, relative to the project directory
files:
  - src/calculator.rs
  - src/validator.rs
"#;

    println!("{}", example);
}

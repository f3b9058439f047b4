//! sbom-importer: import SPDX bills of materials into a release catalog
//!
//! Reads SPDX tag-value and RDF/XML documents and stores their packages as
//! components, releases and projects in a JSON store.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use sbom_importer::{
    cli::{self, ImportAs, ImportCommand, OutputFormat, exit_codes},
    config::{AppConfig, ConfigPreset},
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SPDX serializations:",
        "\n  tag-value (.spdx)",
        "\n  RDF/XML   (.rdf, *rdf.xml)",
        "\n\nImport targets:",
        "\n  release, project"
    )
}

#[derive(Parser)]
#[command(name = "sbom-importer")]
#[command(author = "Binarly.io")]
#[command(version, long_version = build_long_version())]
#[command(about = "Import SPDX bills of materials into a release catalog", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Import succeeded
    1  Import failed (see summary message)
    3  Error occurred

EXAMPLES:
    # Preview what an import would create
    sbom-importer prepare bom.spdx

    # Import as a release with document metadata
    sbom-importer import bom.spdx --user-email jane@example.org --spdx-document

    # Import as a project with a release network
    sbom-importer import bom.rdf --as project --flexible -o json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `import` subcommand
#[derive(Parser)]
struct ImportArgs {
    /// SPDX document to import (.spdx, .rdf or *rdf.xml)
    file: PathBuf,

    /// Import the described package as a release or a project
    #[arg(long = "as", value_enum, default_value = "release")]
    target: ImportAs,

    /// JSON store to import into
    #[arg(long, env = "SBOM_IMPORTER_STORE")]
    store: Option<PathBuf>,

    /// Email of the importing user
    #[arg(long, env = "SBOM_IMPORTER_USER")]
    user_email: Option<String>,

    /// Department of the importing user, used as component business unit
    #[arg(long)]
    department: Option<String>,

    /// Build a release network tree for projects
    #[arg(long)]
    flexible: bool,

    /// Store SPDX document metadata with imported releases
    #[arg(long)]
    spdx_document: bool,

    /// Start from a named preset (default, legacy, full)
    #[arg(long)]
    preset: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and check a document without importing it
    Prepare {
        /// SPDX document to check
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Import a document into the store
    Import(ImportArgs),

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the JSON Schema of the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a commented example config file
    Example,
    /// Print current effective configuration (merged from defaults + file)
    Show,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Prepare { file, output } => cli::run_prepare(&file, output),

        Commands::Import(args) => {
            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides(&args)?);
            if let Some(path) = loaded_from {
                tracing::debug!("Loaded config from {}", path.display());
            }
            cli::run_import(ImportCommand {
                file: args.file,
                target: args.target,
                output: args.output,
                config,
            })
        }

        Commands::Config { action } => {
            match action {
                ConfigAction::Schema { output } => {
                    let schema = sbom_importer::config::generate_json_schema()
                        .context("failed to generate schema")?;
                    match output {
                        Some(path) => {
                            std::fs::write(&path, &schema)
                                .with_context(|| format!("failed to write {}", path.display()))?;
                            eprintln!("Schema written to {}", path.display());
                        }
                        None => println!("{schema}"),
                    }
                }
                ConfigAction::Example => {
                    print!("{}", sbom_importer::config::generate_example_config());
                }
                ConfigAction::Show => {
                    let (config, loaded_from) =
                        sbom_importer::config::load_or_default(cli.config.as_deref());
                    if let Some(path) = &loaded_from {
                        eprintln!("# Loaded from: {}", path.display());
                    } else {
                        eprintln!("# No config file found; showing defaults");
                    }
                    let yaml =
                        serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
                    print!("{yaml}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-importer", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Config values given on the command line.
fn overrides(args: &ImportArgs) -> Result<AppConfig> {
    let mut config = match &args.preset {
        Some(name) => {
            let preset = ConfigPreset::from_name(name).with_context(|| {
                let names: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
                format!("unknown preset '{name}', expected one of: {}", names.join(", "))
            })?;
            AppConfig::from_preset(preset)
        }
        None => AppConfig::default(),
    };
    if args.flexible {
        config.import.flexible_project_release_relationship = true;
    }
    if args.spdx_document {
        config.import.spdx_document_enabled = true;
    }
    if let Some(store) = &args.store {
        config.store.path.clone_from(store);
    }
    if let Some(email) = &args.user_email {
        config.user.email.clone_from(email);
    }
    if let Some(department) = &args.department {
        config.user.department.clone_from(department);
    }
    Ok(config)
}

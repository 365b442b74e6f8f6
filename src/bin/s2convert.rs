//! s2convert — SQL to SingleStore CLI
//!
//! # Usage
//!
//! ```bash
//! # Convert a statement
//! s2convert "SELECT TOP 10 * FROM users"
//!
//! # Convert a stored procedure from a file
//! s2convert --file proc.sql --dialect tsql
//!
//! # Deterministic transpile only
//! s2convert transpile "SELECT ISNULL(a, 0) FROM t"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use s2convert::prelude::*;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "s2convert")]
#[command(version)]
#[command(about = "Convert SQL and stored procedures to SingleStore", long_about = None)]
#[command(after_help = "EXAMPLES:
    s2convert 'SELECT TOP 5 name FROM users'
    s2convert --file proc.sql --dialect tsql
    cat query.sql | s2convert --dialect postgres --format json
    s2convert dialects")]
struct Cli {
    /// The SQL to convert (reads stdin when omitted)
    sql: Option<String>,

    /// Read SQL from a file
    #[arg(short, long, conflicts_with = "sql")]
    file: Option<PathBuf>,

    /// Source dialect
    #[arg(short, long)]
    dialect: Option<String>,

    /// Assistant model
    #[arg(short, long, env = "S2CONVERT_MODEL")]
    model: Option<String>,

    /// Chat service URL
    #[arg(long, env = "S2CONVERT_ENDPOINT")]
    endpoint: Option<String>,

    /// Assistant timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Frame procedures with DELIMITER only, without an assistant rebuild
    #[arg(long)]
    delimited: bool,

    /// Configuration file (defaults to ./s2convert.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dialects accepted as a source
    Dialects,
    /// Transpile deterministically, without the assistant
    Transpile {
        /// The SQL to transpile (reads stdin when omitted)
        sql: Option<String>,
    },
    /// Show how the input would be handled
    Classify {
        /// The SQL to classify (reads stdin when omitted)
        sql: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "s2convert=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let dialect = cli
        .dialect
        .clone()
        .unwrap_or_else(|| config.source_dialect.clone());
    let converter = Converter::from_config(config)?;

    match &cli.command {
        Some(Commands::Dialects) => {
            show_dialects(&converter);
            Ok(())
        }
        Some(Commands::Transpile { sql }) => {
            let Some(input) = read_input(sql.as_deref(), None)? else {
                return usage();
            };
            println!("{}", converter.transpile(&input, &dialect)?);
            Ok(())
        }
        Some(Commands::Classify { sql }) => {
            let Some(input) = read_input(sql.as_deref(), None)? else {
                return usage();
            };
            let class = converter.classify(&input, &dialect)?;
            println!("{} {}", class.to_string().cyan().bold(), class.label().dimmed());
            Ok(())
        }
        None => {
            let Some(input) = read_input(cli.sql.as_deref(), cli.file.as_ref())? else {
                return usage();
            };
            convert(&converter, &input, &dialect, cli).await
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut config = match &cli.config {
        Some(path) => ConverterConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ConverterConfig::discover()?,
    };

    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if cli.delimited {
        config.reassembly = ReassemblyStrategy::Delimited;
    }
    Ok(config)
}

fn read_input(arg: Option<&str>, file: Option<&PathBuf>) -> Result<Option<String>> {
    if let Some(sql) = arg {
        return Ok(Some(sql.to_string()));
    }
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Some(content));
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut content = String::new();
    stdin.lock().read_to_string(&mut content)?;
    Ok(Some(content))
}

fn usage() -> Result<()> {
    println!("{}", "s2convert — SQL to SingleStore".cyan().bold());
    println!();
    println!("Usage: s2convert <SQL> [OPTIONS]");
    println!();
    println!("Try: s2convert --help");
    Ok(())
}

async fn convert(converter: &Converter, sql: &str, dialect: &str, cli: &Cli) -> Result<()> {
    if cli.verbose {
        eprintln!("{} {}", "Dialect:".dimmed(), dialect.yellow());
        eprintln!("{} {}", "Model:".dimmed(), converter.config().model.yellow());
    }

    let report = converter.convert_report(sql, dialect).await?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            let skipped: Vec<&ConvertedStatement> = report.unconverted().collect();
            if !skipped.is_empty() {
                eprintln!(
                    "{} {} of {} statement(s) kept unconverted:",
                    "⚠".yellow(),
                    skipped.len(),
                    report.statements.len()
                );
                for stmt in skipped {
                    eprintln!("    {}", stmt.original.dimmed());
                }
                eprintln!();
            }
            println!("{}", "SingleStore SQL:".green().bold());
            println!("{}", report.output);
        }
    }
    Ok(())
}

fn show_dialects(converter: &Converter) {
    let default = &converter.config().source_dialect;
    println!("{}", "Source dialects".cyan().bold());
    println!("{}", "─".repeat(24).dimmed());
    for name in converter.source_dialects() {
        if &name == default {
            println!("  {} {}", name.white().bold(), "(default)".dimmed());
        } else {
            println!("  {}", name);
        }
    }
    println!();
    println!("{} {}", "Target:".dimmed(), TARGET_DIALECT.green());
}

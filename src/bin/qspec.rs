//! qspec CLI: compile and run query specifications
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL for a specification file
//! qspec compile orders.json --dialect mysql
//!
//! # Count query instead of rows
//! qspec compile orders.toml --mode count
//!
//! # Execute against a database
//! qspec run orders.json --database-url sqlite://shop.db
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qspec::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qspec")]
#[command(version)]
#[command(about = "Compile declarative query specifications to SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    qspec compile orders.json
    qspec compile orders.toml --dialect sqlserver --mode exists
    qspec run orders.json --database-url sqlite://shop.db --format json")]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Normal,
    Count,
    Exists,
}

impl From<ModeArg> for CompileMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normal => CompileMode::Normal,
            ModeArg::Count => CompileMode::Count,
            ModeArg::Exists => CompileMode::Exists,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a specification file and print the SQL
    Compile {
        /// Specification file (.json or .toml)
        file: String,

        /// Target dialect (defaults to the configured one)
        #[arg(short, long)]
        dialect: Option<Dialect>,

        #[arg(short, long, value_enum, default_value = "normal")]
        mode: ModeArg,

        /// Print the compiled query as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported dialects
    Dialects,
    /// Compile a specification and execute it
    Run {
        /// Specification file (.json or .toml)
        file: String,

        /// Database connection URL
        #[arg(long, env = "QSPEC_DATABASE_URL")]
        database_url: Option<String>,

        #[arg(short, long, value_enum, default_value = "normal")]
        mode: ModeArg,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compile {
            file,
            dialect,
            mode,
            json,
        } => compile_file(&file, dialect, mode.into(), json),
        Commands::Dialects => {
            show_dialects();
            Ok(())
        }
        Commands::Run {
            file,
            database_url,
            mode,
            format,
        } => run_file(&file, database_url, mode.into(), &format).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_spec(file: &str) -> Result<Specification> {
    let path = Path::new(file);
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", file))?;

    let spec = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON specification in {}", file))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("invalid TOML specification in {}", file))?,
        _ => bail!("unsupported specification format '{}' (expected .json or .toml)", file),
    };
    Ok(spec)
}

fn compile_file(file: &str, dialect: Option<Dialect>, mode: CompileMode, json: bool) -> Result<()> {
    let config = QspecConfig::load()?;
    let dialect = dialect.unwrap_or(config.dialect);
    let spec = load_spec(file)?;
    let query = spec.compile(dialect, mode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&query)?);
        return Ok(());
    }

    println!("{} {}", "Dialect:".dimmed(), dialect.to_string().cyan());
    println!("{}", "Generated SQL:".green().bold());
    println!("{}", query.sql.white());

    if !query.params.is_empty() {
        println!();
        println!("{}", "Parameters:".cyan());
        for (name, value) in &query.params {
            println!("  @{} = {}", name, value.to_string().yellow());
        }
    }
    Ok(())
}

async fn run_file(
    file: &str,
    database_url: Option<String>,
    mode: CompileMode,
    format: &OutputFormat,
) -> Result<()> {
    let config = QspecConfig::load()?;
    let Some(url) = database_url.or(config.database_url) else {
        bail!("no database URL. Use --database-url or set QSPEC_DATABASE_URL");
    };

    let spec = load_spec(file)?;
    let db = SpecDb::connect_with(&url, config.max_connections).await?;

    match mode {
        CompileMode::Normal => {
            let rows = db.fetch_rows(&spec).await?;
            format_output(&rows, format);
        }
        CompileMode::Count => {
            println!("{}", db.count(&spec).await?.to_string().cyan());
        }
        CompileMode::Exists => {
            println!("{}", db.exists(&spec).await?.to_string().cyan());
        }
    }
    Ok(())
}

fn format_output(rows: &[Row], format: &OutputFormat) {
    if rows.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows).unwrap_or_default());
        }
        OutputFormat::Table => {
            let columns: Vec<&String> = rows[0].keys().collect();

            let widths: Vec<usize> = columns
                .iter()
                .map(|col| {
                    rows.iter()
                        .filter_map(|row| row.get(*col))
                        .map(|val| val_to_string(val).len())
                        .fold(col.len(), usize::max)
                })
                .collect();

            let header: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:width$}", c, width = *w))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in rows {
                let cells: Vec<String> = columns
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| {
                        let val = row.get(*c).map(val_to_string).unwrap_or_default();
                        format!("{:width$}", val, width = *w)
                    })
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", rows.len().to_string().cyan());
        }
    }
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

fn show_dialects() {
    println!("{}", "Supported dialects".cyan().bold());
    println!();
    println!(
        "{:12} {:40} {:10} {}",
        "Name".white().bold(),
        "Paging (skip 20, take 10)".white().bold(),
        "Quoting".white().bold(),
        "Executable".white().bold()
    );
    println!("{}", "─".repeat(76).dimmed());

    for dialect in Dialect::ALL {
        let quoted = dialect
            .quote_identifier("name")
            .unwrap_or_default();
        let executable = if dialect == Dialect::SqlServer { "no" } else { "yes" };
        println!(
            "{:12} {:40} {:10} {}",
            dialect.name().cyan(),
            dialect.limit_offset(20, 10).trim().yellow(),
            quoted,
            executable.dimmed()
        );
    }
}

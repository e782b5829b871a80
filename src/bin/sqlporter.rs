//! sqlporter, the SQL DDL converter CLI
//!
//! # Usage
//!
//! ```bash
//! # Convert an Oracle script to PostgreSQL
//! sqlporter convert --from oracle --to postgres schema.sql -o schema.pg.sql
//!
//! # Dump the parsed schema as JSON
//! sqlporter parse --dialect mysql dump.sql --json
//!
//! # Show the type table between two dialects
//! sqlporter types --from sqlserver --to sqlite
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use sqlporter::prelude::*;
use tokio::io::AsyncRead;

#[derive(Parser)]
#[command(name = "sqlporter")]
#[command(version)]
#[command(about = "Convert SQL DDL between Oracle, MySQL, PostgreSQL, SQL Server and SQLite", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlporter convert --from oracle --to postgres schema.sql
    cat dump.sql | sqlporter parse --dialect mysql --json
    sqlporter types --from oracle --to mysql")]
struct Cli {
    /// Config file (default: <config dir>/sqlporter/config.toml)
    #[arg(long, global = true, env = "SQLPORTER_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DDL script to another dialect
    Convert {
        /// Source dialect
        #[arg(long)]
        from: Option<DialectKind>,
        /// Target dialect
        #[arg(long)]
        to: Option<DialectKind>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        stream: StreamArgs,
    },
    /// Parse a DDL script and summarize it
    Parse {
        /// Dialect of the script
        #[arg(short, long)]
        dialect: DialectKind,
        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        stream: StreamArgs,
    },
    /// Show the type translation table between two dialects
    Types {
        #[arg(long)]
        from: DialectKind,
        #[arg(long)]
        to: DialectKind,
    },
}

#[derive(Args)]
struct StreamArgs {
    /// Input file (default: stdin)
    input: Option<PathBuf>,
    /// Parse workers (0 = available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    /// Minimum batch size in bytes
    #[arg(long)]
    batch_size: Option<usize>,
    /// Deadline in milliseconds (0 = none)
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl StreamArgs {
    fn apply(&self, config: &mut StreamParserConfig) {
        if let Some(n) = self.workers {
            config.workers = n;
        }
        if let Some(n) = self.batch_size {
            config.batch_size = n;
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
    }

    async fn open(&self) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                Ok(Box::new(file))
            }
            _ => Ok(Box::new(tokio::io::stdin())),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("sqlporter={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PorterConfig::load(path)?,
        None => PorterConfig::load_default()?,
    };

    match cli.command {
        Commands::Convert {
            from,
            to,
            output,
            stream,
        } => {
            let (Some(from), Some(to)) = (from.or(config.convert.from), to.or(config.convert.to))
            else {
                bail!("both --from and --to are required (or set [convert] in the config file)");
            };
            let mut stream_config = config.stream;
            stream.apply(&mut stream_config);

            let started = Instant::now();
            let source = stream.open().await?;
            let ddl = Converter::new(stream_config)
                .convert(Some(source), from, to)
                .await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &ddl)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!(
                        "{} {} → {} written to {} in {:.2?}",
                        "✓".green(),
                        from.to_string().cyan(),
                        to.to_string().cyan(),
                        path.display(),
                        started.elapsed()
                    );
                }
                None => print!("{}", ddl),
            }
        }
        Commands::Parse {
            dialect,
            json,
            stream,
        } => {
            let mut stream_config = config.stream;
            stream.apply(&mut stream_config);

            let source = stream.open().await?;
            let schema = Converter::new(stream_config)
                .parse(Some(source), dialect)
                .await?;

            if json {
                println!("{}", schema.to_json()?);
            } else {
                print_summary(&schema, dialect);
            }
        }
        Commands::Types { from, to } => show_types(from, to),
    }
    Ok(())
}

fn print_summary(schema: &Schema, dialect: DialectKind) {
    println!("{} {}", "Parsed".green().bold(), dialect.to_string().cyan());
    println!();

    for table in &schema.tables {
        println!("  {} {}", "TABLE".dimmed(), table.name.white().bold());
        for col in &table.columns {
            let mut flags = Vec::new();
            if col.primary_key {
                flags.push("PK");
            }
            if !col.nullable {
                flags.push("NOT NULL");
            }
            if col.unique {
                flags.push("UNIQUE");
            }
            if col.auto_increment {
                flags.push("AUTO");
            }
            println!(
                "    {:24} {:20} {}",
                col.name,
                col.full_type().yellow(),
                flags.join(" ").dimmed()
            );
        }
        for c in &table.constraints {
            let name = c.name.as_deref().unwrap_or("-");
            println!("    {} {} ({})", c.kind.to_string().cyan(), name, c.columns.join(", "));
        }
    }
    for seq in &schema.sequences {
        println!(
            "  {} {} start={} increment={}",
            "SEQUENCE".dimmed(),
            seq.name.white().bold(),
            seq.start_value,
            seq.increment_by
        );
    }
    for view in &schema.views {
        println!("  {} {}", "VIEW".dimmed(), view.name.white().bold());
    }
    for trigger in &schema.triggers {
        let events: Vec<String> = trigger.events.iter().map(|e| e.to_string()).collect();
        println!(
            "  {} {} {} {} ON {}",
            "TRIGGER".dimmed(),
            trigger.name.white().bold(),
            trigger.timing,
            events.join(" OR "),
            trigger.table
        );
    }

    println!();
    println!(
        "{} table(s), {} sequence(s), {} view(s), {} trigger(s)",
        schema.tables.len().to_string().cyan(),
        schema.sequences.len().to_string().cyan(),
        schema.views.len().to_string().cyan(),
        schema.triggers.len().to_string().cyan()
    );
}

fn show_types(from: DialectKind, to: DialectKind) {
    let Some(map) = DialectRegistry::global().type_map(from, to) else {
        println!("{}", "Same dialect: types are kept as written.".yellow());
        return;
    };

    println!("{} {} → {}", "Type map".cyan().bold(), from, to);
    println!();
    println!("{:24} {}", from.to_string().white().bold(), to.to_string().white().bold());
    println!("{}", "─".repeat(48).dimmed());
    for (source, target) in map.entries {
        println!("{:24} {}", source, target.yellow());
    }
}

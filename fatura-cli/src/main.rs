use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use fatura_core::StatementResult;
use fatura_finance::StatementParser;
use fatura_ingest::parsers::LineAudit;
use fatura_ingest::{
    Column, DumpFormat, FragmentSource, ReconstructedLine, TextFragment, open_source,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "fatura",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FATURA_BUILD_SHA"), ")"),
    about = "Extract credit card transactions from positioned statement text"
)]
struct Cli {
    /// Log scanner decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Parser configuration (defaults to ~/.fatura/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a fragment dump into a statement
    Parse {
        /// Fragment dump (CSV with page,x,y,text columns or a JSON array)
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
        format: FormatArg,

        #[arg(long, value_enum, default_value_t = OutputArg::Json)]
        output: OutputArg,

        /// Print how every line was classified to stderr
        #[arg(long)]
        audit: bool,

        /// Give up if parsing takes longer than this
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Processing date used when the statement has no due date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Print reconstructed lines in reading order
    Lines {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
        format: FormatArg,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default configuration to ~/.fatura/config.toml
    Init,
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Auto,
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputArg {
    Json,
    Summary,
}

impl FormatArg {
    fn resolve(self, file: &Path) -> DumpFormat {
        match self {
            FormatArg::Auto => DumpFormat::from_path(file),
            FormatArg::Csv => DumpFormat::Csv,
            FormatArg::Json => DumpFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse {
            file,
            format,
            output,
            audit,
            timeout_secs,
            today,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let parser = StatementParser::new(&cfg)?;
            let format = format.resolve(&file);
            let today = today.unwrap_or_else(|| Local::now().date_naive());

            let task = tokio::task::spawn_blocking(move || -> Result<(StatementResult, Vec<LineAudit>)> {
                let fragments = load_fragments(&file, format)?;
                Ok(parser.parse_with_audit(&fragments, today))
            });

            let (result, trail) = tokio::time::timeout(Duration::from_secs(timeout_secs), task)
                .await
                .map_err(|_| anyhow!("parse timed out after {timeout_secs}s"))?
                .context("parse task failed")??;

            if audit {
                print_audit(&trail);
            }

            match output {
                OutputArg::Json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                OutputArg::Summary => print_summary(&result),
            }
        }

        Command::Lines { file, format } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let parser = StatementParser::new(&cfg)?;
            let format = format.resolve(&file);

            let lines = tokio::task::spawn_blocking(move || -> Result<Vec<ReconstructedLine>> {
                let fragments = load_fragments(&file, format)?;
                Ok(parser.lines(&fragments))
            })
            .await
            .context("layout task failed")??;

            for l in &lines {
                println!(
                    "p{} {:<5} y={:<5} x={:<7.1} {}",
                    l.page,
                    column_name(l.column),
                    l.y,
                    l.x,
                    l.text
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(cli.config.as_deref())?,
            ConfigCommand::Path => println!("{}", config::config_path()?.display()),
        },
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_fragments(file: &Path, format: DumpFormat) -> Result<Vec<TextFragment>> {
    open_source(file, format)
        .fragments()
        .with_context(|| format!("decoding {}", file.display()))
}

fn column_name(column: Column) -> &'static str {
    match column {
        Column::Left => "left",
        Column::Right => "right",
    }
}

fn print_audit(trail: &[LineAudit]) {
    for a in trail {
        eprintln!(
            "p{} {:<5} y={:<5} {:<16} | {}",
            a.page,
            column_name(a.column),
            a.y,
            a.outcome.label(),
            a.text
        );
    }
}

fn print_summary(result: &StatementResult) {
    println!("Statement {} ({})", result.month_label, result.month);
    if let Some(due) = &result.due_date {
        println!("Due date: {due}");
    }
    println!("Transactions: {}", result.transactions.len());
    println!("Total: R$ {}\n", result.total.to_br_string());

    println!("By card:");
    for (card, t) in &result.by_card {
        println!("  {}: {} transactions, R$ {}", card, t.count, t.total.to_br_string());
    }
    println!();

    for t in &result.transactions {
        println!(
            "{} | {:<40} | {:>12} | {:<12} | {}",
            t.date,
            t.description,
            t.amount.to_br_string(),
            t.category.label(),
            t.owner
        );
    }
}

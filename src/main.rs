//! sqltable - run SQL and print normalized result tables

use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use sqltable::config::{Config, NormalizeConfig, OutputFormat, Strictness};
use sqltable::driver::Connection;
use sqltable::model::DEFAULT_DATETIME_FORMAT;
use sqltable::output::render_to_stdout;
use sqltable::{CellValue, Normalizer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Csv,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStrictness {
    Raw,
    Generic,
    Typed,
}

impl From<CliStrictness> for Strictness {
    fn from(s: CliStrictness) -> Self {
        match s {
            CliStrictness::Raw => Strictness::Raw,
            CliStrictness::Generic => Strictness::Generic,
            CliStrictness::Typed => Strictness::Typed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScalarKind {
    Int,
    Float,
    String,
}

/// Run SQL against a database and print the results as normalized tables
#[derive(Parser, Debug)]
#[command(name = "sqltable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database driver name
    #[arg(long, env = "SQLTABLE_DRIVER", default_value = "sqlite")]
    driver: String,

    /// Data source: a file path for sqlite, or :memory:
    #[arg(long, env = "SQLTABLE_DSN")]
    dsn: String,

    /// Skip the connectivity check after opening
    #[arg(long)]
    no_ping: bool,

    /// Log debug events to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a query and print its result table
    Query {
        /// SQL text
        sql: String,

        /// Bind argument (repeatable, positional order)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Cell conversion policy
        #[arg(long, value_enum, default_value = "typed")]
        strictness: CliStrictness,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: CliOutputFormat,

        /// Group JSON records by this column
        #[arg(short, long)]
        key: Option<String>,

        /// Decimal places kept for DOUBLE columns
        #[arg(long, default_value_t = 6)]
        float_precision: u32,

        /// strftime layout for DATE columns
        #[arg(long, default_value = DEFAULT_DATETIME_FORMAT)]
        datetime_format: String,
    },

    /// Run a statement and print the insert id and affected row count
    Exec {
        /// SQL text
        sql: String,

        /// Bind argument (repeatable, positional order)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the first column of the first row
    Scalar {
        /// SQL text
        sql: String,

        /// Bind argument (repeatable, positional order)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Conversion applied to the value
        #[arg(long = "as", value_enum, default_value = "string")]
        kind: ScalarKind,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_error(err: &anyhow::Error) {
    let choice = if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);

    // Nothing left to report to if stderr itself fails
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "Error:");
    let _ = stderr.reset();
    let _ = writeln!(stderr, " {:#}", err);
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::new(cli.driver, cli.dsn).with_ping(!cli.no_ping);

    if let Command::Query {
        strictness,
        format,
        key,
        float_precision,
        datetime_format,
        ..
    } = &cli.command
    {
        config = config
            .with_strictness((*strictness).into())
            .with_output_format((*format).into())
            .with_normalize(
                NormalizeConfig::default()
                    .with_float_precision(*float_precision)
                    .with_datetime_format(datetime_format.as_str()),
            );
        if let Some(key) = key {
            config = config.with_key_column(key.clone());
        }
    }

    let conn = if config.ping {
        sqltable::connect(&config.driver, &config.dsn)
    } else {
        sqltable::connect_no_ping(&config.driver, &config.dsn)
    }
    .with_context(|| format!("cannot connect to {} database {}", config.driver, config.dsn))?;

    let outcome = dispatch(&*conn, cli.command, &config);
    let closed = sqltable::close(conn);
    outcome?;
    closed?;
    Ok(())
}

fn dispatch(conn: &dyn Connection, command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Query { sql, args, .. } => {
            let normalizer =
                Normalizer::new(config.normalize.clone()).with_strictness(config.strictness);
            let table = sqltable::query_with(conn, &normalizer, &sql, &parse_args(&args))?;
            render_to_stdout(&table, config.output_format, config.key_column.as_deref())?;
        }
        Command::Exec { sql, args } => {
            let result = sqltable::execute(conn, &sql, &parse_args(&args))?;
            println!("last_insert_id: {}", result.last_insert_id);
            println!("rows_affected: {}", result.rows_affected);
        }
        Command::Scalar { sql, args, kind } => {
            let args = parse_args(&args);
            match kind {
                ScalarKind::Int => println!("{}", sqltable::query_scalar_int(conn, &sql, &args)?),
                ScalarKind::Float => println!(
                    "{}",
                    sqltable::query_scalar_float_with(conn, &config.normalize, &sql, &args)?
                ),
                ScalarKind::String => {
                    println!("{}", sqltable::query_scalar_string(conn, &sql, &args)?)
                }
            }
        }
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Vec<CellValue> {
    args.iter().map(|s| parse_arg(s)).collect()
}

/// Infer a bind value from command-line text
fn parse_arg(s: &str) -> CellValue {
    if s.eq_ignore_ascii_case("null") {
        return CellValue::Null;
    }

    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }

    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }

    CellValue::Text(s.to_string())
}

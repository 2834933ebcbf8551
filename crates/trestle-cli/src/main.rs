//! trestle CLI
//!
//! Runs a statement against a configured connection and prints the outcome
//! as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use trestle::{BindList, Config, Database, ResultSet, SqlValue};

/// Run SQL against a trestle connection.
#[derive(Parser)]
#[command(name = "trestle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, env = "TRESTLE_CONFIG", default_value = "trestle.json")]
    config: PathBuf,

    /// Connection to use (the configured default if not specified).
    #[arg(short = 'n', long)]
    connection: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Print the debug bundle instead of the rows.
    #[arg(short, long)]
    debug: bool,

    /// Inline bind values into the SQL instead of sending parameters.
    #[arg(long)]
    inline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run raw SQL.
    Query {
        /// The statement.
        sql: String,

        /// Bind value; `:name=value` binds a named placeholder.
        #[arg(short, long = "bind")]
        binds: Vec<String>,
    },

    /// Read rows from tables.
    Read {
        /// Tables to read from.
        #[arg(required = true)]
        tables: Vec<String>,

        /// Columns to select (all if not specified).
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Maximum number of rows.
        #[arg(short, long)]
        limit: Option<i64>,

        /// Rows to skip.
        #[arg(short, long)]
        offset: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_path(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let db = Database::connect(&config, cli.connection.as_deref())?;
    debug!(connection = db.name(), dialect = %db.blueprint(), "connected");

    let statement = match cli.command {
        Commands::Query { sql, binds } => db.query(&sql, parse_binds(&binds)?)?,
        Commands::Read {
            tables,
            columns,
            limit,
            offset,
        } => {
            let mut statement = db.read_columns(tables, columns)?;
            if let Some(limit) = limit {
                statement = statement.limit(limit)?;
            }
            if let Some(offset) = offset {
                statement = statement.offset(offset)?;
            }
            statement
        }
    };

    let result = if cli.inline {
        statement.exec_raw()?
    } else {
        statement.exec()?
    };
    db.disconnect();

    print(&result, cli.debug)
}

fn print(result: &ResultSet, debug: bool) -> anyhow::Result<()> {
    if debug {
        println!("{}", result.debug().to_json()?);
    } else if result.all().is_empty() {
        println!(
            "{}",
            serde_json::json!({
                "affected": result.count(),
                "last_insert_id": result.last_insert_id(),
            })
        );
    } else {
        println!("{}", serde_json::to_string_pretty(result.all())?);
    }

    if let Some(error) = &result.debug().error {
        bail!("statement failed: {error}");
    }
    Ok(())
}

fn parse_binds(args: &[String]) -> anyhow::Result<BindList> {
    let mut binds = BindList::new();
    for arg in args {
        binds = match arg.strip_prefix(':').and_then(|rest| rest.split_once('=')) {
            Some((name, value)) if !name.is_empty() => binds.with(name, parse_value(value)),
            Some(_) => bail!("bind {arg:?} has an empty name"),
            None => binds.push(parse_value(arg)),
        };
    }
    Ok(binds)
}

/// Integers, floats, `true`/`false` and `null` are typed; anything else is
/// text.
fn parse_value(raw: &str) -> SqlValue {
    if raw.eq_ignore_ascii_case("null") {
        SqlValue::Null
    } else if let Ok(n) = raw.parse::<i64>() {
        SqlValue::Int(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        SqlValue::Float(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        SqlValue::Bool(b)
    } else {
        SqlValue::Text(String::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_values() {
        assert_eq!(parse_value("42"), SqlValue::Int(42));
        assert_eq!(parse_value("1.5"), SqlValue::Float(1.5));
        assert_eq!(parse_value("true"), SqlValue::Bool(true));
        assert_eq!(parse_value("NULL"), SqlValue::Null);
        assert_eq!(parse_value("julian"), SqlValue::Text(String::from("julian")));
    }

    #[test]
    fn parses_named_and_positional_binds() {
        let binds = parse_binds(&[String::from(":id=7"), String::from("x")]).unwrap();
        assert_eq!(binds, BindList::new().with(":id", 7_i64).push("x"));
        assert!(parse_binds(&[String::from(":=7")]).is_err());
    }

    #[test]
    fn cli_parses_read() {
        let cli = Cli::parse_from([
            "trestle", "--config", "db.json", "read", "users", "-c", "id,name", "-l", "5",
        ]);
        assert_eq!(cli.config, PathBuf::from("db.json"));
        let Commands::Read {
            tables,
            columns,
            limit,
            offset,
        } = cli.command
        else {
            panic!("expected read");
        };
        assert_eq!(tables, ["users"]);
        assert_eq!(columns, ["id", "name"]);
        assert_eq!(limit, Some(5));
        assert_eq!(offset, None);
    }
}

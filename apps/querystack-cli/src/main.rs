//! QueryStack CLI - compile query conditions into a DynamoDB expression.
//!
//! Reads a conditions JSON document from a file (or stdin when no path or
//! `-` is given) and prints the compiled expression as JSON.
//!
//! # Usage
//!
//! ```text
//! querystack conditions.json
//! echo '{"tableName":"Users","where":{},"operation":"scan"}' | querystack
//! querystack --wire conditions.json
//! ```
//!
//! `--wire` prints the marshalled low-level request (`QueryInput`,
//! `ScanInput` or `UpdateItemInput`) instead of the document-style expression.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DYNAMO_DB_INDEX_KEYS` | *(empty)* | Comma-separated index key attributes |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::{Context, Result};
use querystack_dynamodb_core::{ExpressionConfig, compile};
use querystack_dynamodb_model::input::{QueryInput, ScanInput, UpdateItemInput};
use querystack_dynamodb_model::{Operation, QueryConditions, QueryExpression};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Read the log level from the environment.
fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    wire: bool,
    path: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();
    for arg in args {
        if arg == "--wire" {
            options.wire = true;
        } else if arg == "-" {
            options.path = None;
        } else if arg.starts_with("--") {
            anyhow::bail!("unknown flag: {arg}");
        } else if options.path.is_some() {
            anyhow::bail!("more than one input path given");
        } else {
            options.path = Some(arg);
        }
    }
    Ok(options)
}

async fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {path}")),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Render the compiled expression, optionally as the low-level request.
fn render(operation: Option<Operation>, expression: QueryExpression, wire: bool) -> Result<Value> {
    let rendered = match (wire, operation) {
        (true, Some(Operation::Query)) => serde_json::to_value(QueryInput::from(expression)),
        (true, Some(Operation::Scan)) => serde_json::to_value(ScanInput::from(expression)),
        (true, Some(Operation::Update)) => serde_json::to_value(UpdateItemInput::from(expression)),
        _ => serde_json::to_value(expression),
    };
    rendered.context("failed to serialize expression")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&log_level())?;

    let options = parse_args(std::env::args().skip(1))?;
    let raw = read_input(options.path.as_deref()).await?;
    if raw.trim().is_empty() {
        anyhow::bail!("missing query conditions");
    }

    let conditions: QueryConditions =
        serde_json::from_str(&raw).context("invalid query conditions")?;
    let config = ExpressionConfig::from_env();
    debug!(index_keys = ?config.index_keys, "loaded expression config");

    let expression = compile(&conditions, &config).context("failed to compile query conditions")?;
    info!(
        operation = ?conditions.operation,
        table = %expression.table_name,
        wire = options.wire,
        "compiled query conditions"
    );

    let output = render(conditions.operation, expression, options.wire)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

//! Parses toy-language source and prints the resulting tree.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use braid::ast::{Expression, Statement, Unit};
use braid::grammar::{complete, Grammar};
use braid::parser::{LineTracking, ParseConfig, ParseFailure};
use clap::Parser as _;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(clap::Parser, Debug)]
#[command(name = "braid")]
#[command(about = "Parse toy-language source and print the tree")]
struct Cli {
    /// Source file containing functions
    #[arg(required_unless_present_any = ["expression", "statement"])]
    file: Option<PathBuf>,

    /// Parse a single expression instead of a file
    #[arg(short, long, conflicts_with_all = ["file", "statement"])]
    expression: Option<String>,

    /// Parse a single statement instead of a file
    #[arg(short, long, conflicts_with = "file")]
    statement: Option<String>,

    /// Maximum nesting of recursive rules
    #[arg(long)]
    max_depth: Option<usize>,

    /// Disable the nesting ceiling
    #[arg(long, conflicts_with = "max_depth")]
    no_depth_limit: bool,

    /// Count every character as one column, ignoring line breaks
    #[arg(long)]
    columns_only: bool,

    /// Print the debug form of the tree as well
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> ParseConfig {
        let mut config = ParseConfig::new();
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if self.no_depth_limit {
            config = config.without_depth_limit();
        }
        if self.columns_only {
            config = config.with_line_tracking(LineTracking::ColumnsOnly);
        }
        config
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    debug!(?config, "parse configuration");

    let grammar = Grammar::new();
    let printed = if let Some(source) = &cli.expression {
        complete(&grammar.expression)
            .parse_with(source.as_str(), config)
            .map(|value| render::<Expression>(value, cli.verbose))
    } else if let Some(source) = &cli.statement {
        complete(&grammar.statement)
            .parse_with(source.as_str(), config)
            .map(|value| render::<Statement>(value, cli.verbose))
    } else {
        let path = cli.file.as_ref().context("no input given")?;
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        info!(path = %path.display(), bytes = source.len(), "parsing file");
        grammar
            .unit
            .parse_with(source.as_str(), config)
            .map(|value| render::<Unit>(value, cli.verbose))
    };

    match printed {
        Ok(text) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            report(&failure);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn render<T>(value: braid::parser::Value, verbose: bool) -> String
where
    T: braid::parser::FromValue + std::fmt::Display + std::fmt::Debug,
{
    match value.extract::<T>() {
        Some(node) if verbose => format!("{node}\n\n{node:#?}"),
        Some(node) => node.to_string(),
        None => String::new(),
    }
}

fn report(failure: &ParseFailure) {
    if let Some(primary) = failure.primary() {
        eprintln!("{primary}");
    }
    for diagnostic in failure.diagnostics.iter().filter(|d| Some(*d) != failure.primary()) {
        eprintln!("  note: {diagnostic}");
    }
}

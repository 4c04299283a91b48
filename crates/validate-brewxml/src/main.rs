//! validate-brewxml - check BeerXML documents against an XSD-like schema

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod report;

const DEFAULT_SCHEMA: &str = "spec/xsd/beerxml.xsd";

#[derive(Parser)]
#[command(name = "validate-brewxml")]
#[command(version)]
#[command(about = "Validate BeerXML documents against a schema", long_about = None)]
struct Cli {
    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate documents and report every error found
    Check {
        /// Files or directories to check; directories are searched for *.xml
        #[arg(value_name = "PATHS", default_value = "samples")]
        paths: Vec<PathBuf>,

        /// Schema to extract record types from
        #[arg(short, long, default_value = DEFAULT_SCHEMA)]
        schema: PathBuf,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,

        /// Show the offending source for each located error
        #[arg(long)]
        show_source: bool,
    },

    /// Generate a Markdown reference for the schema's record types
    Docs {
        /// Schema to document
        #[arg(short, long, default_value = DEFAULT_SCHEMA)]
        schema: PathBuf,

        /// Write to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document title
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the extracted type registry as JSON
    Types {
        /// Schema to extract
        #[arg(short, long, default_value = DEFAULT_SCHEMA)]
        schema: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "validate_brewxml=info",
        1 => "validate_brewxml=debug,brewxml_schema=debug",
        _ => "validate_brewxml=trace,brewxml_schema=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Check {
            paths,
            schema,
            json,
            show_source,
        } => {
            let passed = commands::check::execute(commands::check::CheckArgs {
                paths,
                schema,
                json,
                show_source,
            })?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Docs {
            schema,
            output,
            title,
        } => commands::docs::execute(commands::docs::DocsArgs {
            schema,
            output,
            title,
        }),
        Commands::Types { schema } => commands::types::execute(&schema),
    }
}

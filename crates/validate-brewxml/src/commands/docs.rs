//! Docs command - Markdown reference for a schema's record types

use anyhow::{Context, Result};
use brewxml_schema::{DocOptions, render_markdown};
use std::fs;
use std::path::PathBuf;

/// Arguments for the docs command.
pub struct DocsArgs {
    pub schema: PathBuf,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
}

pub fn execute(args: DocsArgs) -> Result<()> {
    let registry = super::load_registry(&args.schema)?;

    let mut options = DocOptions::beerxml();
    if let Some(file_name) = args.schema.file_name() {
        options = options.with_source(file_name.to_string_lossy());
    }
    if let Some(title) = args.title {
        options.title = title;
    }

    let markdown = render_markdown(&registry, &options);
    match &args.output {
        Some(path) => {
            fs::write(path, markdown)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            tracing::info!(path = %path.display(), "generated schema reference");
        }
        None => print!("{}", markdown),
    }
    Ok(())
}

//! Types command - dump the extracted registry as JSON

use anyhow::Result;
use std::path::Path;

pub fn execute(schema: &Path) -> Result<()> {
    let registry = super::load_registry(schema)?;
    println!("{}", serde_json::to_string_pretty(&registry)?);
    Ok(())
}

//! Command implementations for validate-brewxml
//!
//! Each command handles its CLI arguments and delegates to brewxml-schema.

pub mod check;
pub mod docs;
pub mod types;

use anyhow::{Context, Result};
use brewxml_schema::TypeRegistry;
use std::path::Path;

/// Extract the registry every command starts from.
pub fn load_registry(schema: &Path) -> Result<TypeRegistry> {
    let registry = brewxml_schema::extract_file(schema)
        .with_context(|| format!("Failed to load schema {}", schema.display()))?;
    tracing::debug!(
        schema = %schema.display(),
        types = registry.len(),
        "loaded type registry"
    );
    for name in registry.ambiguous_names() {
        tracing::warn!(type_name = %name, "record type is shadowed for tag matching");
    }
    Ok(registry)
}

//! Schema extractor: XSD-like description → [`TypeRegistry`].
//!
//! Only the constructs the BeerXML schemas use are interpreted:
//! top-level `simpleType`/`restriction`/`enumeration` and top-level
//! `complexType` with an `all` or `sequence` group of `element`s. Anything
//! else (attributes, choices, groups, imports) is ignored.

use crate::error::{SchemaError, SchemaResult};
use crate::types::{FieldDefinition, FieldSet, TypeKind, TypeRegistry, canonical_type_name};
use brewxml_tree::{XmlDocument, XmlElement};
use std::collections::HashMap;
use std::path::Path;

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Extract a registry using the BeerXML preset ([`SchemaExtractor::beerxml`]).
///
/// # Errors
///
/// Returns [`SchemaError::Parse`] if `schema` is not well-formed XML.
pub fn extract(schema: &str) -> SchemaResult<TypeRegistry> {
    SchemaExtractor::beerxml().extract(schema)
}

/// Read and extract a schema file using the BeerXML preset.
pub fn extract_file(path: impl AsRef<Path>) -> SchemaResult<TypeRegistry> {
    SchemaExtractor::beerxml().extract_file(path)
}

/// Configurable schema extractor.
///
/// Aliases classify named simple types the schema itself may not describe
/// in a way the extractor understands. A simple type the schema does
/// classify takes precedence over an alias of the same name.
#[derive(Debug, Clone, Default)]
pub struct SchemaExtractor {
    aliases: HashMap<String, TypeKind>,
}

impl SchemaExtractor {
    /// Extractor that knows only the XSD built-in types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-ins plus the named simple types of the BeerXML schemas.
    pub fn beerxml() -> Self {
        Self::new()
            .with_alias("booleanType", TypeKind::Boolean)
            .with_alias("decimalType", TypeKind::Float)
            .with_alias("temperatureType", TypeKind::Float)
            .with_alias("timeType", TypeKind::Float)
            .with_alias("percentageType", TypeKind::Float)
    }

    pub fn with_alias(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.aliases.insert(name.into(), kind);
        self
    }

    /// Parse and extract a schema description.
    pub fn extract(&self, schema: &str) -> SchemaResult<TypeRegistry> {
        let document = brewxml_tree::parse(schema)?;
        Ok(self.extract_document(&document))
    }

    /// Read, parse and extract a schema file.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> SchemaResult<TypeRegistry> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "extracting schema");
        self.extract(&content)
    }

    /// Extract from an already parsed schema document. Never fails:
    /// declarations the extractor cannot use are skipped.
    pub fn extract_document(&self, document: &XmlDocument) -> TypeRegistry {
        let root = &document.root;
        if root.name != "schema" {
            tracing::warn!(root = %root.qualified_name(), "schema root element is not <schema>");
        }

        let mut resolver = TypeResolver::new(xsd_prefix(root), &self.aliases);
        for simple_type in root.get_children("simpleType") {
            resolver.add_simple_type(simple_type);
        }

        let mut builder = TypeRegistry::builder();
        for complex_type in root.get_children("complexType") {
            let Some(name) = complex_type.get_attribute("name") else {
                tracing::debug!("skipping complexType without a name");
                continue;
            };
            let fields = resolver.field_set(complex_type);
            let canonical = canonical_type_name(name);
            tracing::debug!(type_name = %canonical, fields = fields.len(), "registered record type");
            builder.register(canonical, fields);
        }

        let registry = builder.build();
        tracing::debug!(types = registry.len(), "schema extracted");
        registry
    }
}

/// The prefix bound to the XSD namespace, falling back to the root's own
/// prefix (`xs` in `<xs:schema>`).
fn xsd_prefix(root: &XmlElement) -> Option<String> {
    root.attributes
        .iter()
        .find(|a| a.prefix.as_deref() == Some("xmlns") && a.value == XSD_NAMESPACE)
        .map(|a| a.name.clone())
        .or_else(|| root.prefix.clone())
}

/// XSD built-in primitives, by local name.
fn builtin_kind(local: &str) -> Option<TypeKind> {
    match local {
        "string" | "normalizedString" | "token" => Some(TypeKind::Text),
        "int" | "integer" | "long" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" => Some(TypeKind::Integer),
        "decimal" | "float" | "double" => Some(TypeKind::Float),
        "date" => Some(TypeKind::Date),
        "boolean" => Some(TypeKind::Boolean),
        _ => None,
    }
}

/// Extraction-time type lookup: the enum registry plus classified simple
/// types. Dropped once the registry is built.
struct TypeResolver {
    xsd_prefix: Option<String>,

    /// Simple-type name → permitted literals.
    enums: HashMap<String, Vec<String>>,

    /// Simple-type name → kind, seeded with the extractor's aliases.
    simple: HashMap<String, TypeKind>,
}

impl TypeResolver {
    fn new(xsd_prefix: Option<String>, aliases: &HashMap<String, TypeKind>) -> Self {
        Self {
            xsd_prefix,
            enums: HashMap::new(),
            simple: aliases.clone(),
        }
    }

    fn add_simple_type(&mut self, simple_type: &XmlElement) {
        let Some(name) = simple_type.get_attribute("name") else {
            tracing::debug!("skipping simpleType without a name");
            return;
        };
        let Some(restriction) = simple_type.find_child("restriction") else {
            return;
        };

        let values: Vec<String> = restriction
            .get_children("enumeration")
            .into_iter()
            .filter_map(|e| e.get_attribute("value"))
            .map(str::to_string)
            .collect();

        if !values.is_empty() {
            self.enums.insert(name.to_string(), values);
            return;
        }

        let base = restriction.get_attribute("base").unwrap_or_default();
        match self.restriction_kind(base) {
            Some(kind) => {
                self.simple.insert(name.to_string(), kind);
            }
            None => {
                tracing::debug!(simple_type = %name, base = %base, "leaving simple type unresolved");
            }
        }
    }

    /// Kind of a simple type restricting `base`. Only `string` and `decimal`
    /// bases are classified.
    fn restriction_kind(&self, base: &str) -> Option<TypeKind> {
        let local = match base.split_once(':') {
            Some((prefix, local)) if Some(prefix) == self.xsd_prefix.as_deref() => local,
            Some(_) => return None,
            None => base,
        };
        match local {
            "string" => Some(TypeKind::Text),
            "decimal" => Some(TypeKind::Float),
            _ => None,
        }
    }

    /// Kind for a type name via the simple-type table, then the built-ins.
    fn primitive_kind(&self, type_name: &str) -> Option<TypeKind> {
        if let Some(kind) = self.simple.get(type_name) {
            return Some(*kind);
        }
        match type_name.split_once(':') {
            Some((prefix, local)) if Some(prefix) == self.xsd_prefix.as_deref() => {
                builtin_kind(local)
            }
            Some((_, local)) => self.simple.get(local).copied(),
            None => builtin_kind(type_name),
        }
    }

    fn enum_values(&self, type_name: &str) -> Option<&Vec<String>> {
        self.enums.get(type_name).or_else(|| {
            let (prefix, local) = type_name.split_once(':')?;
            if Some(prefix) == self.xsd_prefix.as_deref() {
                return None;
            }
            self.enums.get(local)
        })
    }

    fn resolve(&self, type_name: &str) -> FieldDefinition {
        if let Some(values) = self.enum_values(type_name) {
            return FieldDefinition::enumeration(type_name, values.clone());
        }
        let kind = self.primitive_kind(type_name).unwrap_or(TypeKind::Unresolved);
        FieldDefinition::new(kind, type_name)
    }

    /// Fields of a complex type, from its `all` group or else its
    /// `sequence` group. No group means no fields.
    fn field_set(&self, complex_type: &XmlElement) -> FieldSet {
        let mut fields = FieldSet::new();
        let Some(container) = complex_type
            .find_child("all")
            .or_else(|| complex_type.find_child("sequence"))
        else {
            return fields;
        };

        for element in container.get_children("element") {
            let Some(name) = element.get_attribute("name") else {
                tracing::debug!("skipping element declaration without a name");
                continue;
            };
            let type_name = element.get_attribute("type").unwrap_or_default();
            let required = element.get_attribute("minOccurs") != Some("0");

            let mut field = self.resolve(type_name).with_required(required);
            if let Some(fixed) = element.get_attribute("fixed") {
                field = field.with_fixed(fixed);
            }
            fields.insert(name.to_string(), field);
        }
        fields
    }
}

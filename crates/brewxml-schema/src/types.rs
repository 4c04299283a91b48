//! Schema data model: field definitions, field sets and the type registry.
//!
//! A [`TypeRegistry`] is produced once per schema (normally by
//! [`crate::extract`]) and is read-only afterwards. The only way to build
//! one is through [`TypeRegistryBuilder`], which is consumed by
//! [`TypeRegistryBuilder::build`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Conventional suffix on schema type names (`hopType`, `recipeType`).
pub const TYPE_SUFFIX: &str = "Type";

/// Primitive classification of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Enum,
    /// Declared type the extractor could not classify: a nested record
    /// reference or an unknown primitive. Validates like `Text`.
    Unresolved,
}

impl TypeKind {
    /// Human-readable name used in reference documentation.
    pub fn display_name(&self) -> &'static str {
        match self {
            TypeKind::Text => "Text",
            TypeKind::Integer => "Integer",
            TypeKind::Float => "Floating Point",
            TypeKind::Boolean => "Boolean",
            TypeKind::Date => "Date",
            TypeKind::Enum => "Enumeration",
            TypeKind::Unresolved => "Unresolved",
        }
    }
}

/// A single field of a record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub kind: TypeKind,

    /// The type name exactly as declared in the schema (`xs:decimal`,
    /// `styleType`, ...). Empty when the declaration had no type.
    pub original_type: String,

    /// False only when the schema declares `minOccurs="0"`.
    pub required: bool,

    /// Permitted literals; `Some` and non-empty iff `kind == Enum`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub enum_values: Option<Vec<String>>,

    /// Value the schema pins this field to, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fixed: Option<String>,
}

impl FieldDefinition {
    /// A required, non-enumerated field.
    ///
    /// [`TypeKind::Enum`] becomes [`TypeKind::Text`], since an enum needs its
    /// values; use [`FieldDefinition::enumeration`] for those.
    pub fn new(kind: TypeKind, original_type: impl Into<String>) -> Self {
        let kind = match kind {
            TypeKind::Enum => TypeKind::Text,
            kind => kind,
        };
        Self {
            kind,
            original_type: original_type.into(),
            required: true,
            enum_values: None,
            fixed: None,
        }
    }

    /// A required enumeration field.
    ///
    /// An empty value list is not an enumeration: the field falls back to
    /// [`TypeKind::Text`] so that `enum_values` is never `Some(vec![])`.
    pub fn enumeration(original_type: impl Into<String>, values: Vec<String>) -> Self {
        if values.is_empty() {
            return Self::new(TypeKind::Text, original_type);
        }
        Self {
            kind: TypeKind::Enum,
            original_type: original_type.into(),
            required: true,
            enum_values: Some(values),
            fixed: None,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_fixed(mut self, fixed: impl Into<String>) -> Self {
        self.fixed = Some(fixed.into());
        self
    }

    /// Record type this field nests, by the `Type` suffix convention.
    ///
    /// `styleType` nests `style`; `tns:styleType` also nests `style`.
    /// Returns `None` for types without the suffix.
    pub fn nested_type(&self) -> Option<&str> {
        let local = self
            .original_type
            .rsplit_once(':')
            .map_or(self.original_type.as_str(), |(_, local)| local);
        strip_type_suffix(local)
    }
}

/// Fields of one record type, in declaration order.
pub type FieldSet = IndexMap<String, FieldDefinition>;

/// Strip the conventional `Type` suffix, if there is anything left after it.
pub fn strip_type_suffix(name: &str) -> Option<&str> {
    name.strip_suffix(TYPE_SUFFIX).filter(|base| !base.is_empty())
}

/// Canonical registry name for a schema type: `hopType` → `hop`.
pub fn canonical_type_name(name: &str) -> &str {
    strip_type_suffix(name).unwrap_or(name)
}

/// Key used to match element tags against type names: uppercase, with
/// `_` and `-` removed. `MASH_STEP`, `mash-step` and `mashStep` agree.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Immutable mapping from record type name to its fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRegistry {
    types: IndexMap<String, FieldSet>,

    /// Normalized name → canonical name, first registration wins.
    normalized: HashMap<String, String>,

    /// Canonical names that lost a normalized-name collision.
    ambiguous: Vec<String>,

    /// Names registered more than once (the last registration was kept).
    duplicates: Vec<String>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Exact lookup by canonical type name.
    pub fn get(&self, name: &str) -> Option<&FieldSet> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Find the record type an element tag stands for, comparing
    /// [`normalize_name`] forms. Returns the canonical name and its fields.
    pub fn resolve_tag(&self, tag: &str) -> Option<(&str, &FieldSet)> {
        let canonical = self.normalized.get(&normalize_name(tag))?;
        self.types
            .get_key_value(canonical)
            .map(|(name, fields)| (name.as_str(), fields))
    }

    /// Record types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSet)> {
        self.types.iter().map(|(name, fields)| (name.as_str(), fields))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types unreachable by tag matching because an earlier type has the
    /// same normalized name. They are still reachable by exact name.
    pub fn ambiguous_names(&self) -> &[String] {
        &self.ambiguous
    }

    /// Types whose name was registered more than once.
    pub fn duplicate_types(&self) -> &[String] {
        &self.duplicates
    }
}

impl Serialize for TypeRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.types.serialize(serializer)
    }
}

/// Collects record types, then freezes them into a [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    types: IndexMap<String, FieldSet>,
    duplicates: Vec<String>,
}

impl TypeRegistryBuilder {
    /// Register a record type. Re-registering a name replaces the earlier
    /// field set but keeps its original position.
    pub fn register(&mut self, name: impl Into<String>, fields: FieldSet) -> &mut Self {
        let name = name.into();
        if self.types.contains_key(&name) {
            tracing::warn!(type_name = %name, "record type declared more than once; keeping the last declaration");
            if !self.duplicates.contains(&name) {
                self.duplicates.push(name.clone());
            }
        }
        self.types.insert(name, fields);
        self
    }

    /// Chaining form of [`TypeRegistryBuilder::register`].
    pub fn with_type(mut self, name: impl Into<String>, fields: FieldSet) -> Self {
        self.register(name, fields);
        self
    }

    pub fn build(self) -> TypeRegistry {
        let mut normalized = HashMap::with_capacity(self.types.len());
        let mut ambiguous = Vec::new();

        for name in self.types.keys() {
            match normalized.entry(normalize_name(name)) {
                Entry::Vacant(slot) => {
                    slot.insert(name.clone());
                }
                Entry::Occupied(existing) => {
                    tracing::warn!(
                        type_name = %name,
                        shadowed_by = %existing.get(),
                        "record type name collides after normalization; tags resolve to the first one"
                    );
                    ambiguous.push(name.clone());
                }
            }
        }

        TypeRegistry {
            types: self.types,
            normalized,
            ambiguous,
            duplicates: self.duplicates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: &[(&str, FieldDefinition)]) -> FieldSet {
        entries
            .iter()
            .map(|(name, def)| (name.to_string(), def.clone()))
            .collect()
    }

    #[test]
    fn test_canonical_type_name() {
        assert_eq!(canonical_type_name("hopType"), "hop");
        assert_eq!(canonical_type_name("RecipeType"), "Recipe");
        assert_eq!(canonical_type_name("Hop"), "Hop");
        assert_eq!(canonical_type_name("Type"), "Type");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("MASH_STEP"), "MASHSTEP");
        assert_eq!(normalize_name("mashStep"), "MASHSTEP");
        assert_eq!(normalize_name("mash-step"), "MASHSTEP");
    }

    #[test]
    fn test_nested_type() {
        let style = FieldDefinition::new(TypeKind::Unresolved, "styleType");
        assert_eq!(style.nested_type(), Some("style"));

        let prefixed = FieldDefinition::new(TypeKind::Unresolved, "tns:styleType");
        assert_eq!(prefixed.nested_type(), Some("style"));

        let text = FieldDefinition::new(TypeKind::Text, "xs:string");
        assert_eq!(text.nested_type(), None);
    }

    #[test]
    fn test_enumeration_never_empty() {
        let empty = FieldDefinition::enumeration("emptyType", vec![]);
        assert_eq!(empty.kind, TypeKind::Text);
        assert_eq!(empty.enum_values, None);

        let style = FieldDefinition::enumeration(
            "styleKindType",
            vec!["Ale".to_string(), "Lager".to_string()],
        );
        assert_eq!(style.kind, TypeKind::Enum);
        assert_eq!(style.enum_values.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_plain_constructor_never_builds_an_enum() {
        let field = FieldDefinition::new(TypeKind::Enum, "hopUseType");
        assert_eq!(field.kind, TypeKind::Text);
        assert_eq!(field.enum_values, None);
        assert_eq!(field.original_type, "hopUseType");
    }

    #[test]
    fn test_resolve_tag_by_normalized_name() {
        let registry = TypeRegistry::builder()
            .with_type(
                "mashStep",
                fields(&[("NAME", FieldDefinition::new(TypeKind::Text, "xs:string"))]),
            )
            .build();

        let (name, fields) = registry.resolve_tag("MASH_STEP").unwrap();
        assert_eq!(name, "mashStep");
        assert!(fields.contains_key("NAME"));
        assert!(registry.resolve_tag("MASH").is_none());
    }

    #[test]
    fn test_first_registered_wins_on_collision() {
        let registry = TypeRegistry::builder()
            .with_type("Hop", FieldSet::new())
            .with_type("HOP", FieldSet::new())
            .build();

        assert_eq!(registry.resolve_tag("hop").map(|(name, _)| name), Some("Hop"));
        assert_eq!(registry.ambiguous_names(), ["HOP".to_string()]);
        assert!(registry.get("HOP").is_some());
    }

    #[test]
    fn test_duplicate_registration_keeps_last() {
        let registry = TypeRegistry::builder()
            .with_type(
                "hop",
                fields(&[("NAME", FieldDefinition::new(TypeKind::Text, "xs:string"))]),
            )
            .with_type("yeast", FieldSet::new())
            .with_type(
                "hop",
                fields(&[("ALPHA", FieldDefinition::new(TypeKind::Float, "xs:decimal"))]),
            )
            .build();

        let hop = registry.get("hop").unwrap();
        assert!(hop.contains_key("ALPHA"));
        assert!(!hop.contains_key("NAME"));
        assert_eq!(registry.type_names().collect::<Vec<_>>(), ["hop", "yeast"]);
        assert_eq!(registry.duplicate_types(), ["hop".to_string()]);
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeRegistry>();
    }

    #[test]
    fn test_registry_serializes_as_type_map() {
        let registry = TypeRegistry::builder()
            .with_type(
                "hop",
                fields(&[(
                    "USE",
                    FieldDefinition::enumeration("hopUseType", vec!["Boil".to_string()])
                        .with_required(false),
                )]),
            )
            .build();

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "hop": {
                    "USE": {
                        "kind": "enum",
                        "original_type": "hopUseType",
                        "required": false,
                        "enum_values": ["Boil"]
                    }
                }
            })
        );
    }
}

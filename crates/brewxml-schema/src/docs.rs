//! Markdown reference tables for a [`TypeRegistry`].

use crate::types::{FieldDefinition, FieldSet, TypeKind, TypeRegistry};
use std::fmt::Write;

/// Presentation options for [`render_markdown`].
#[derive(Debug, Clone, Default)]
pub struct DocOptions {
    pub title: String,

    /// Schema name for the `*Generated from ...*` line; omitted when `None`.
    pub source: Option<String>,

    /// Types to present first, matched by normalized name. Everything else
    /// follows in registry order.
    pub order: Vec<String>,
}

impl DocOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Title and record order of the BeerXML 1.0 reference.
    pub fn beerxml() -> Self {
        Self {
            title: "BeerXML 1.0 Specification".to_string(),
            source: None,
            order: [
                "Recipe",
                "Style",
                "Hop",
                "Fermentable",
                "Yeast",
                "Misc",
                "Water",
                "Equipment",
                "Mash",
                "MashStep",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Render one `## <Type> Record` table per record type.
pub fn render_markdown(registry: &TypeRegistry, options: &DocOptions) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "# {}", options.title);
    if let Some(source) = &options.source {
        let _ = writeln!(out, "\n*Generated from {}*", source);
    }

    for (name, fields) in ordered_types(registry, &options.order) {
        let _ = writeln!(out, "\n## {} Record", name);
        render_table(&mut out, fields);
    }
    out
}

fn ordered_types<'a>(
    registry: &'a TypeRegistry,
    order: &[String],
) -> Vec<(&'a str, &'a FieldSet)> {
    let mut types: Vec<(&str, &FieldSet)> = Vec::with_capacity(registry.len());
    for wanted in order {
        if let Some(entry) = registry.resolve_tag(wanted)
            && !types.iter().any(|(name, _)| *name == entry.0)
        {
            types.push(entry);
        }
    }
    for entry in registry.iter() {
        if !types.iter().any(|(name, _)| *name == entry.0) {
            types.push(entry);
        }
    }
    types
}

fn render_table(out: &mut String, fields: &FieldSet) {
    out.push_str("| Tag | Type | Required | Description |\n");
    out.push_str("| :--- | :--- | :--- | :--- |\n");
    for (name, field) in fields {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            name,
            type_label(field),
            if field.required { "Yes" } else { "No" },
            description(field)
        );
    }
}

fn type_label(field: &FieldDefinition) -> &str {
    match field.kind {
        TypeKind::Enum | TypeKind::Unresolved => field.original_type.as_str(),
        kind => kind.display_name(),
    }
}

fn description(field: &FieldDefinition) -> String {
    let mut parts = Vec::new();
    if let Some(values) = &field.enum_values {
        parts.push(format!("Values: {}", values.join(", ")));
    }
    if let Some(fixed) = &field.fixed {
        parts.push(format!("Fixed: {}", fixed));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;

    const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="hopUseType">
    <xs:restriction base="xs:string">
      <xs:enumeration value="Boil"/>
      <xs:enumeration value="Dry Hop"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:complexType name="hopType">
    <xs:all>
      <xs:element name="NAME" type="xs:string"/>
      <xs:element name="ALPHA" type="percentageType"/>
      <xs:element name="USE" type="hopUseType"/>
      <xs:element name="VERSION" type="xs:int" fixed="1"/>
    </xs:all>
  </xs:complexType>
  <xs:complexType name="notesType">
    <xs:sequence>
      <xs:element name="TEXT" type="xs:string" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecipeType">
    <xs:sequence>
      <xs:element name="NAME" type="xs:string"/>
      <xs:element name="DATE" type="xs:date" minOccurs="0"/>
      <xs:element name="HOPS" type="hopsType" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#;

    #[test]
    fn test_render_beerxml_reference() {
        let registry = extract(SCHEMA).unwrap();
        let options = DocOptions::beerxml().with_source("beerxml.xsd");
        let markdown = render_markdown(&registry, &options);

        insta::assert_snapshot!(markdown, @r"
        # BeerXML 1.0 Specification

        *Generated from beerxml.xsd*

        ## Recipe Record
        | Tag | Type | Required | Description |
        | :--- | :--- | :--- | :--- |
        | NAME | Text | Yes |  |
        | DATE | Date | No |  |
        | HOPS | hopsType | No |  |

        ## hop Record
        | Tag | Type | Required | Description |
        | :--- | :--- | :--- | :--- |
        | NAME | Text | Yes |  |
        | ALPHA | Floating Point | Yes |  |
        | USE | hopUseType | Yes | Values: Boil, Dry Hop |
        | VERSION | Integer | Yes | Fixed: 1 |

        ## notes Record
        | Tag | Type | Required | Description |
        | :--- | :--- | :--- | :--- |
        | TEXT | Text | No |  |
        ");
    }

    #[test]
    fn test_title_without_source() {
        let registry = TypeRegistry::builder().build();
        assert_eq!(
            render_markdown(&registry, &DocOptions::new("Types")),
            "# Types\n"
        );
    }

    #[test]
    fn test_order_skips_absent_types() {
        let registry = TypeRegistry::builder()
            .with_type("yeast", FieldSet::new())
            .with_type("misc", FieldSet::new())
            .build();
        let options = DocOptions {
            title: "T".to_string(),
            source: None,
            order: vec!["Recipe".to_string(), "Misc".to_string()],
        };

        let markdown = render_markdown(&registry, &options);
        let headings: Vec<&str> = markdown.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(headings, ["## misc Record", "## yeast Record"]);
    }
}

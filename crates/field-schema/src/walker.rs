//! Section walker over whole schema documents

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{SchemaError, SchemaResult};
use crate::example::synthesize_section;
use crate::field::{FieldParser, FieldSpec};

/// Well-known sections, walked first and in this order
pub const KNOWN_SECTIONS: [(&str, &str); 4] = [
    ("param", "Path Parameters"),
    ("query", "Query Parameters"),
    ("request_body", "Request Body"),
    ("response", "Response"),
];

/// Sections that get a synthesized example payload by default
pub const DEFAULT_EXAMPLE_SECTIONS: [&str; 2] = ["request_body", "response"];

/// Section-level metadata keys that are never field definitions, even when
/// they hold an object with a `type` key
pub const NON_FIELD_KEYS: [&str; 7] = [
    "fields",
    "title",
    "description",
    "required",
    "content_type",
    "example",
    "examples",
];

/// A schema document: section name to section object, in document order
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    pub sections: IndexMap<String, Map<String, Value>>,
}

impl SchemaDocument {
    /// Parse a document from a string (auto-detects JSON/YAML)
    pub fn parse(content: &str) -> SchemaResult<Self> {
        if content.trim_start().starts_with('{') {
            Self::parse_json(content)
        } else {
            Self::parse_yaml(content)
        }
    }

    /// Parse a document from JSON
    ///
    /// Nesting is not limited here; the field parser's depth guard reports
    /// deep sections individually.
    pub fn parse_json(content: &str) -> SchemaResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(content);
        deserializer.disable_recursion_limit();
        let raw: IndexMap<String, Value> =
            Deserialize::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Ok(Self::from_sections(raw))
    }

    /// Parse a document from YAML
    pub fn parse_yaml(content: &str) -> SchemaResult<Self> {
        let raw: Option<IndexMap<String, Value>> = serde_yaml::from_str(content)?;
        let raw = raw.ok_or_else(|| SchemaError::InvalidDocument("document is empty".to_string()))?;
        Ok(Self::from_sections(raw))
    }

    /// Build a document from an already parsed JSON value
    pub fn from_value(value: Value) -> SchemaResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_sections(map.into_iter().collect())),
            other => Err(SchemaError::InvalidDocument(format!(
                "expected an object of sections, found {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_sections(raw: IndexMap<String, Value>) -> Self {
        let sections = raw
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Object(section) => Some((name, section)),
                other => {
                    warn!("Skipping section {}: expected an object, found {}", name, json_kind(&other));
                    None
                }
            })
            .collect();
        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.sections.get(name)
    }
}

/// Result of walking one section
#[derive(Debug, Clone)]
pub struct WalkedSection {
    /// Section key as it appears in the document
    pub key: String,
    /// Human label (`Request Body`)
    pub label: String,
    /// Numbered heading (`3. Request Body`)
    pub title: String,
    /// Top-level fields, sorted by name
    pub fields: Vec<FieldSpec>,
    /// Example payload for designated sections with at least one field
    pub example: Option<Value>,
}

/// A section that could not be parsed
#[derive(Error, Debug)]
#[error("Section '{key}' failed: {error}")]
pub struct SectionError {
    pub key: String,
    pub label: String,
    pub title: String,
    #[source]
    pub error: SchemaError,
}

pub type SectionOutcome = Result<WalkedSection, SectionError>;

/// All section outcomes of one document, in walk order
#[derive(Debug, Default)]
pub struct WalkedDocument {
    pub sections: Vec<SectionOutcome>,
}

impl WalkedDocument {
    /// Successfully walked sections
    pub fn walked(&self) -> impl Iterator<Item = &WalkedSection> {
        self.sections.iter().filter_map(|s| s.as_ref().ok())
    }

    /// Sections that failed
    pub fn failures(&self) -> impl Iterator<Item = &SectionError> {
        self.sections.iter().filter_map(|s| s.as_ref().err())
    }

    /// Look up a walked section by key
    pub fn section(&self, key: &str) -> Option<&WalkedSection> {
        self.walked().find(|s| s.key == key)
    }
}

/// Runs the field parser over every section of a document
#[derive(Debug, Clone)]
pub struct SchemaWalker {
    parser: FieldParser,
    example_sections: Vec<String>,
}

impl SchemaWalker {
    /// Create a walker with the default parser and example sections
    pub fn new() -> Self {
        Self {
            parser: FieldParser::new(),
            example_sections: DEFAULT_EXAMPLE_SECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Use a specific field parser
    pub fn with_parser(mut self, parser: FieldParser) -> Self {
        self.parser = parser;
        self
    }

    /// Set the sections that get example payloads
    pub fn with_example_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.example_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    /// Walk all sections: known ones first, then the rest in document order
    ///
    /// Known sections keep their fixed numbers (`3. Request Body`) whether or
    /// not the others are present; extra sections are numbered after them.
    pub fn walk(&self, document: &SchemaDocument) -> WalkedDocument {
        let known = KNOWN_SECTIONS
            .iter()
            .enumerate()
            .filter_map(|(index, (key, label))| {
                document
                    .sections
                    .get_key_value(*key)
                    .map(|(key, section)| (index + 1, key, label.to_string(), section))
            });
        let extra = document
            .sections
            .iter()
            .filter(|(key, _)| !KNOWN_SECTIONS.iter().any(|(known, _)| *known == key.as_str()))
            .enumerate()
            .map(|(index, (key, section))| {
                (KNOWN_SECTIONS.len() + index + 1, key, section_label(key), section)
            });

        info!("Walking {} sections", document.sections.len());

        let sections = known
            .chain(extra)
            .map(|(number, key, label, section)| {
                let title = format!("{}. {}", number, label);
                self.walk_section(key, label, title, section)
            })
            .collect();

        WalkedDocument { sections }
    }

    fn walk_section(
        &self,
        key: &str,
        label: String,
        title: String,
        section: &Map<String, Value>,
    ) -> SectionOutcome {
        let mut fields = Vec::new();
        for (name, definition) in extract_fields(key, section) {
            match self.parser.parse_field(name, definition) {
                Ok(field) => fields.push(field),
                Err(error) => {
                    warn!("Section {} failed: {}", key, error);
                    return Err(SectionError {
                        key: key.to_string(),
                        label,
                        title,
                        error,
                    });
                }
            }
        }
        fields.sort_by(|a, b| a.name.cmp(&b.name));

        let example = if !fields.is_empty() && self.example_sections.iter().any(|s| s == key) {
            Some(synthesize_section(&fields))
        } else {
            None
        };

        debug!("Section {} has {} fields", key, fields.len());

        Ok(WalkedSection {
            key: key.to_string(),
            label,
            title,
            fields,
            example,
        })
    }
}

impl Default for SchemaWalker {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the field definitions of a section
///
/// A `fields` object wins when present. Otherwise root entries that are
/// objects carrying a `type` key are taken, except `NON_FIELD_KEYS`.
fn extract_fields<'a>(
    key: &str,
    section: &'a Map<String, Value>,
) -> Vec<(&'a String, &'a Map<String, Value>)> {
    if let Some(fields) = section.get("fields").and_then(Value::as_object) {
        return fields
            .iter()
            .filter_map(|(name, value)| match value.as_object() {
                Some(definition) => Some((name, definition)),
                None => {
                    warn!("Skipping field {}.{}: definition is not an object", key, name);
                    None
                }
            })
            .collect();
    }

    section
        .iter()
        .filter(|(name, _)| !NON_FIELD_KEYS.contains(&name.as_str()))
        .filter_map(|(name, value)| {
            let definition = value.as_object()?;
            if definition.contains_key("type") {
                debug!("Found field {} in root of section {}", name, key);
                Some((name, definition))
            } else {
                None
            }
        })
        .collect()
}

/// Human label for a section key: `custom_headers` -> `Custom Headers`
fn section_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalType;
    use crate::field::{Requirement, DEFAULT_MAX_DEPTH};
    use serde_json::json;

    fn walk(value: Value) -> WalkedDocument {
        SchemaWalker::new().walk(&SchemaDocument::from_value(value).unwrap())
    }

    #[test]
    fn test_request_body_example() {
        let doc = walk(json!({
            "request_body": {"fields": {"id": {"type": "uint64", "required": "Required"}}}
        }));

        assert_eq!(doc.sections.len(), 1);
        let section = doc.section("request_body").unwrap();
        assert_eq!(section.title, "3. Request Body");
        assert_eq!(section.fields.len(), 1);

        let id = &section.fields[0];
        assert_eq!(id.name, "id");
        assert_eq!(id.canonical_type, CanonicalType::Int);
        assert_eq!(id.required, Requirement::Required);
        assert_eq!(section.example, Some(json!({"id": 0})));
    }

    #[test]
    fn test_section_order() {
        let doc = walk(json!({
            "response": {"fields": {}},
            "extra_notes": {"fields": {}},
            "param": {"fields": {}},
            "query": {"fields": {}}
        }));

        let titles: Vec<&str> = doc.walked().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["1. Path Parameters", "2. Query Parameters", "4. Response", "5. Extra Notes"]
        );
    }

    #[test]
    fn test_known_titles_are_fixed() {
        let doc = walk(json!({
            "notes": {"fields": {}},
            "response": {"fields": {}},
            "headers": {"fields": {}}
        }));

        let titles: Vec<&str> = doc.walked().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["4. Response", "5. Notes", "6. Headers"]);
    }

    #[test]
    fn test_inline_fields() {
        let doc = walk(json!({
            "query": {
                "description": "Paging options",
                "page": {"type": "int", "required": false},
                "size": {"type": "int"},
                "meta": {"note": "no type here"},
                "example": {"type": "object"}
            }
        }));

        let section = doc.section("query").unwrap();
        let names: Vec<&str> = section.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["page", "size"]);
        assert_eq!(section.fields[0].required, Requirement::Optional);
        assert!(section.example.is_none());
    }

    #[test]
    fn test_fields_key_wins_over_inline() {
        let doc = walk(json!({
            "param": {
                "fields": {"id": {"type": "string"}},
                "other": {"type": "string"}
            }
        }));

        let section = doc.section("param").unwrap();
        assert_eq!(section.fields.len(), 1);
        assert_eq!(section.fields[0].name, "id");
    }

    #[test]
    fn test_fields_sorted_by_name() {
        let doc = walk(json!({
            "response": {"fields": {
                "b": {"type": "string"},
                "a": {"type": "bool"},
                "c": {"type": "[]int"}
            }}
        }));

        let section = doc.section("response").unwrap();
        let names: Vec<&str> = section.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(
            section.example,
            Some(json!({"a": false, "b": "example_string", "c": [0, 0]}))
        );
    }

    #[test]
    fn test_empty_example_section_has_no_example() {
        let doc = walk(json!({"response": {"fields": {}}}));

        let section = doc.section("response").unwrap();
        assert!(section.fields.is_empty());
        assert!(section.example.is_none());
    }

    #[test]
    fn test_custom_example_sections() {
        let walker = SchemaWalker::new().with_example_sections(["query"]);
        let document = SchemaDocument::from_value(json!({
            "query": {"fields": {"q": {"type": "string"}}},
            "response": {"fields": {"ok": {"type": "bool"}}}
        }))
        .unwrap();

        let doc = walker.walk(&document);
        assert_eq!(doc.section("query").unwrap().example, Some(json!({"q": "example_string"})));
        assert!(doc.section("response").unwrap().example.is_none());
    }

    #[test]
    fn test_depth_error_is_per_section() {
        let walker = SchemaWalker::new().with_parser(FieldParser::new().with_max_depth(1));
        let document = SchemaDocument::from_value(json!({
            "request_body": {"fields": {"deep": {
                "type": "object",
                "properties": {"a": {"type": "object", "properties": {"b": {"type": "string"}}}}
            }}},
            "response": {"fields": {"ok": {"type": "bool"}}}
        }))
        .unwrap();

        let doc = walker.walk(&document);
        assert_eq!(doc.sections.len(), 2);

        let failure = doc.failures().next().unwrap();
        assert_eq!(failure.key, "request_body");
        assert!(matches!(failure.error, SchemaError::TooDeep { .. }));
        assert_eq!(doc.section("response").unwrap().example, Some(json!({"ok": false})));
    }

    /// A field nested `levels` objects deep, as JSON text
    fn deep_field(levels: usize) -> String {
        let mut field = r#"{"type": "string"}"#.to_string();
        for _ in 0..levels {
            field = format!(r#"{{"type": "object", "properties": {{"n": {}}}}}"#, field);
        }
        field
    }

    #[test]
    fn test_deep_json_section_fails_alone() {
        let content = format!(
            r#"{{"request_body": {{"fields": {{"deep": {}}}}}, "response": {{"fields": {{"ok": {{"type": "bool"}}}}}}}}"#,
            deep_field(70)
        );

        let document = SchemaDocument::parse(&content).unwrap();
        let doc = SchemaWalker::new().walk(&document);

        let failure = doc.failures().next().unwrap();
        assert_eq!(failure.key, "request_body");
        assert_eq!(failure.title, "3. Request Body");
        match &failure.error {
            SchemaError::TooDeep { path, max_depth } => {
                assert_eq!(*max_depth, DEFAULT_MAX_DEPTH);
                assert!(path.starts_with("deep.n.n"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(doc.section("response").unwrap().example, Some(json!({"ok": false})));
    }

    #[test]
    fn test_deep_yaml_section_fails_alone() {
        let content = format!(
            "---\nrequest_body:\n  fields:\n    deep: {}\nresponse:\n  fields:\n    ok:\n      type: bool\n",
            deep_field(DEFAULT_MAX_DEPTH + 5)
        );

        let document = SchemaDocument::parse(&content).unwrap();
        let doc = SchemaWalker::new().walk(&document);

        assert!(matches!(
            doc.failures().next().map(|f| &f.error),
            Some(SchemaError::TooDeep { .. })
        ));
        assert!(doc.section("response").is_some());
    }

    #[test]
    fn test_parse_json_and_yaml() {
        let json_doc = SchemaDocument::parse(
            r#"{"param": {"fields": {"id": {"type": "string"}}}, "custom": {}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = json_doc.sections.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["param", "custom"]);

        let yaml_doc = SchemaDocument::parse(
            "response:\n  fields:\n    total:\n      type: integer\n",
        )
        .unwrap();
        let doc = SchemaWalker::new().walk(&yaml_doc);
        assert_eq!(doc.section("response").unwrap().example, Some(json!({"total": 0})));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            SchemaDocument::parse("{not json"),
            Err(SchemaError::JsonError(_))
        ));
        assert!(SchemaDocument::parse_json("[1, 2]").is_err());
        assert!(matches!(
            SchemaDocument::from_value(json!("text")),
            Err(SchemaError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_non_object_sections_are_skipped() {
        let document = SchemaDocument::from_value(json!({
            "version": 2,
            "param": {"fields": {}}
        }))
        .unwrap();

        assert_eq!(document.sections.len(), 1);
        assert!(document.section("param").is_some());
    }

    #[test]
    fn test_section_label() {
        assert_eq!(section_label("request_body"), "Request Body");
        assert_eq!(section_label("custom__headers_"), "Custom Headers");
        assert_eq!(section_label("x"), "X");
    }
}

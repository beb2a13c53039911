//! Field definitions and the recursive field parser

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::canonical::CanonicalType;
use crate::error::{SchemaError, SchemaResult};

/// Default maximum nesting depth accepted by the parser
///
/// A field level costs up to three levels of document nesting (`items`,
/// `properties`, the field itself), so this stays below the 128-level
/// nesting limit of the YAML reader.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Raw type given to arrays whose items are objects
const ARRAY_OBJECT: &str = "array_object";

/// Raw type kept for arrays whose item type cannot be determined
const UNKNOWN_ARRAY: &str = "array";

/// Whether a field is marked as required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Required,
    Optional,
    /// The schema did not carry a usable marker
    #[default]
    Unknown,
}

impl Requirement {
    /// Interpret a `required` value from a field definition
    ///
    /// Accepts booleans and the strings `true`/`Required`/`required` and
    /// `false`/`Optional`/`optional`. Anything else is `Unknown`.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(true)) => Self::Required,
            Some(Value::Bool(false)) => Self::Optional,
            Some(Value::String(s)) => match s.as_str() {
                "true" | "Required" | "required" => Self::Required,
                "false" | "Optional" | "optional" => Self::Optional,
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

/// A parsed schema field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, unique among its siblings
    pub name: String,
    /// Type token after parser rewriting (`array_object`, `[]T`, ...)
    pub raw_type: String,
    /// Canonical type derived from `raw_type`
    pub canonical_type: CanonicalType,
    /// Required marker
    pub required: Requirement,
    /// Format hint, empty when absent
    pub format: String,
    /// Human description, empty when absent
    pub description: String,
    /// Nested fields, sorted by name (objects and arrays of objects only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldSpec>,
}

impl FieldSpec {
    /// Create a field with the given raw type and no other attributes
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        let raw_type = raw_type.into();
        Self {
            name: name.into(),
            canonical_type: CanonicalType::from_token(&raw_type),
            raw_type,
            required: Requirement::Unknown,
            format: String::new(),
            description: String::new(),
            children: Vec::new(),
        }
    }

    /// Set the format hint
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Set the required marker
    pub fn with_required(mut self, required: Requirement) -> Self {
        self.required = required;
        self
    }

    /// Set child fields (kept sorted by name)
    pub fn with_children(mut self, mut children: Vec<FieldSpec>) -> Self {
        children.sort_by(|a, b| a.name.cmp(&b.name));
        self.children = children;
        self
    }

    /// Look up a direct child by name
    pub fn child(&self, name: &str) -> Option<&FieldSpec> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Maximum nesting depth below this field (0 for leaves)
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Recursive parser from raw field definitions to `FieldSpec` trees
#[derive(Debug, Clone, Copy)]
pub struct FieldParser {
    max_depth: usize,
}

impl FieldParser {
    /// Create a parser with the default depth limit
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse one field definition
    ///
    /// Missing or mistyped keys fall back to defaults; the only error is
    /// nesting beyond the configured depth.
    pub fn parse_field(&self, name: &str, raw: &Map<String, Value>) -> SchemaResult<FieldSpec> {
        self.parse_at(name, name, raw, 0)
    }

    fn parse_at(
        &self,
        path: &str,
        name: &str,
        raw: &Map<String, Value>,
        depth: usize,
    ) -> SchemaResult<FieldSpec> {
        if depth > self.max_depth {
            return Err(SchemaError::TooDeep {
                path: path.to_string(),
                max_depth: self.max_depth,
            });
        }

        let (raw_type, children) = match get_str(raw, "type") {
            "array" => self.parse_array(path, raw.get("items"), depth)?,
            "object" => (
                "object".to_string(),
                self.parse_properties(path, raw.get("properties"), depth)?,
            ),
            other => (other.to_string(), Vec::new()),
        };

        let canonical_type = CanonicalType::from_token(&raw_type);
        if raw_type.is_empty() {
            warn!("Field {} has no type", path);
        } else if !canonical_type.is_known() {
            warn!("Field {} has unrecognized type {:?}", path, raw_type);
        }

        debug!(
            "Parsed field {} as {} with {} children",
            path,
            canonical_type,
            children.len()
        );

        Ok(FieldSpec {
            name: name.to_string(),
            raw_type,
            canonical_type,
            required: Requirement::from_value(raw.get("required")),
            format: get_str(raw, "format").to_string(),
            description: get_str(raw, "description").to_string(),
            children,
        })
    }

    /// Resolve the type of an array field from its `items` schema
    fn parse_array(
        &self,
        path: &str,
        items: Option<&Value>,
        depth: usize,
    ) -> SchemaResult<(String, Vec<FieldSpec>)> {
        let Some(items) = items.and_then(Value::as_object) else {
            warn!("Array field {} has no items schema", path);
            return Ok((UNKNOWN_ARRAY.to_string(), Vec::new()));
        };

        let item_type = get_str(items, "type");
        let has_properties = items.get("properties").is_some_and(|p| !p.is_null());

        if item_type == "object" || has_properties {
            let children = self.parse_properties(path, items.get("properties"), depth)?;
            return Ok((ARRAY_OBJECT.to_string(), children));
        }

        if item_type.is_empty() {
            warn!("Array field {} has no item type", path);
            return Ok((UNKNOWN_ARRAY.to_string(), Vec::new()));
        }

        Ok((format!("[]{}", item_type), Vec::new()))
    }

    /// Parse each entry of a `properties` map one level deeper
    ///
    /// Child names match the `properties` keys, except that empty keys and
    /// non-object definitions are skipped.
    fn parse_properties(
        &self,
        path: &str,
        properties: Option<&Value>,
        depth: usize,
    ) -> SchemaResult<Vec<FieldSpec>> {
        let Some(properties) = properties.and_then(Value::as_object) else {
            return Ok(Vec::new());
        };

        let mut children = Vec::with_capacity(properties.len());
        for (name, definition) in properties {
            if name.is_empty() {
                warn!("Skipping unnamed property under {}", path);
                continue;
            }
            let child_path = format!("{}.{}", path, name);
            match definition.as_object() {
                Some(definition) => {
                    children.push(self.parse_at(&child_path, name, definition, depth + 1)?)
                }
                None => warn!("Skipping property {}: definition is not an object", child_path),
            }
        }

        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a string value, treating absent or non-string values as empty
fn get_str<'a>(raw: &'a Map<String, Value>, key: &str) -> &'a str {
    raw.get(key).and_then(Value::as_str).unwrap_or("")
}

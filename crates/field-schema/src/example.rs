//! Example payload synthesis from parsed fields
//!
//! Every value is a fixed placeholder so generated examples are stable
//! across runs. Types without a rule become `null`.

use serde_json::{Map, Value};
use tracing::warn;

use crate::canonical::CanonicalType;
use crate::error::SchemaResult;
use crate::field::{FieldParser, FieldSpec, DEFAULT_MAX_DEPTH};

const EXAMPLE_STRING: &str = "example_string";
const EXAMPLE_DATE: &str = "20240901";
const EXAMPLE_TIME: &str = "14:26:00";
const EXAMPLE_TIMESTAMP: &str = "2024-09-01T14:26:00+09:00";
const EXAMPLE_INT: i64 = 0;
const EXAMPLE_BOOL: bool = false;

/// Number of elements in a synthesized array of scalars
const SCALAR_ARRAY_LEN: usize = 2;

/// Arrays nested deeper than this synthesize to `null`
pub const MAX_EXAMPLE_ARRAY_DIMS: usize = DEFAULT_MAX_DEPTH;

/// Synthesize an example value for a field
pub fn synthesize(field: &FieldSpec) -> Value {
    synthesize_type(&field.canonical_type, &field.format, &field.children)
}

/// Parse a raw field definition and synthesize its example value
pub fn synthesize_raw(
    parser: &FieldParser,
    name: &str,
    raw: &Map<String, Value>,
) -> SchemaResult<Value> {
    parser.parse_field(name, raw).map(|field| synthesize(&field))
}

/// Synthesize an example object keyed by field name
pub fn synthesize_section(fields: &[FieldSpec]) -> Value {
    object_example(fields)
}

fn synthesize_type(ty: &CanonicalType, format: &str, children: &[FieldSpec]) -> Value {
    match ty {
        CanonicalType::String => string_example(format),
        CanonicalType::Int | CanonicalType::Number => Value::from(EXAMPLE_INT),
        CanonicalType::Boolean => Value::Bool(EXAMPLE_BOOL),
        CanonicalType::DateTime => Value::from(EXAMPLE_TIMESTAMP),
        CanonicalType::Object => object_example(children),
        CanonicalType::ArrayObject => Value::Array(vec![object_example(children)]),
        CanonicalType::Array { dims, element } => array_example(*dims, element, format, children),
        CanonicalType::Other(_) => Value::Null,
    }
}

fn string_example(format: &str) -> Value {
    let value = match format {
        "" => EXAMPLE_STRING.to_string(),
        "YYYYMMDD" => EXAMPLE_DATE.to_string(),
        "HHMM" => EXAMPLE_TIME.to_string(),
        "ISO8601" => EXAMPLE_TIMESTAMP.to_string(),
        other => format!("{}<{}>", EXAMPLE_STRING, other),
    };
    Value::String(value)
}

fn object_example(children: &[FieldSpec]) -> Value {
    let object: Map<String, Value> = children
        .iter()
        .map(|child| (child.name.clone(), synthesize(child)))
        .collect();
    Value::Object(object)
}

/// Arrays of scalars hold a few copies of the element example; outer
/// levels and arrays of objects hold one.
fn array_example(
    dims: usize,
    element: &CanonicalType,
    format: &str,
    children: &[FieldSpec],
) -> Value {
    if dims > MAX_EXAMPLE_ARRAY_DIMS {
        warn!(
            "Not synthesizing {}-dimensional array: limit is {}",
            dims, MAX_EXAMPLE_ARRAY_DIMS
        );
        return Value::Null;
    }

    let mut value = synthesize_type(element, format, children);
    if value.is_null() {
        return Value::Null;
    }

    for level in 0..dims {
        let len = match element {
            CanonicalType::ArrayObject => 1,
            _ if level == 0 => SCALAR_ARRAY_LEN,
            _ => 1,
        };
        value = Value::Array(vec![value; len]);
    }
    value
}

//! Canonical type vocabulary for field type tokens

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const ARRAY_PREFIX: &str = "[]";

/// Canonical display type of a field
///
/// Unknown tokens are kept verbatim in `Other` so that new upstream
/// vocabulary still renders instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalType {
    /// `object`
    Object,
    /// Array whose items are objects (`array_object`)
    ArrayObject,
    /// `int`, `int32`, `int64`, `uint32`, `uint64`, `integer`
    Int,
    /// `number`
    Number,
    /// `time.Time`
    DateTime,
    /// `bool`, `boolean`
    Boolean,
    /// `string`
    String,
    /// `[]T` for a non-object `T`, with `dims` levels of `[]`
    ///
    /// `element` is never itself an `Array`, so nesting is flat no matter
    /// how many prefixes the token carries.
    Array { dims: usize, element: Box<CanonicalType> },
    /// Any token without a mapping, passed through unchanged
    Other(String),
}

impl CanonicalType {
    /// Map a raw type token onto the canonical vocabulary
    pub fn from_token(token: &str) -> Self {
        let mut base = token;
        let mut dims = 0usize;
        loop {
            if let Some(ty) = Self::from_base(base) {
                return Self::array(ty, dims);
            }
            match base.strip_prefix(ARRAY_PREFIX) {
                Some(rest) => {
                    base = rest;
                    dims += 1;
                }
                None => return Self::array(Self::Other(base.to_string()), dims),
            }
        }
    }

    fn from_base(token: &str) -> Option<Self> {
        let ty = match token {
            "object" | "obj" => Self::Object,
            "array_object" | "[]obj" => Self::ArrayObject,
            "int" | "int64" | "int32" | "uint64" | "uint32" | "integer" => Self::Int,
            "number" => Self::Number,
            "time.Time" | "datetime" => Self::DateTime,
            "bool" | "boolean" => Self::Boolean,
            "string" => Self::String,
            _ => return None,
        };
        Some(ty)
    }

    /// Wrap `element` in `dims` array levels
    ///
    /// Nested arrays merge into one level count and an array of objects
    /// becomes `ArrayObject`.
    pub fn array(element: Self, dims: usize) -> Self {
        if dims == 0 {
            return element;
        }
        match element {
            Self::Object => Self::array(Self::ArrayObject, dims - 1),
            Self::Array { dims: inner, element } => Self::Array {
                dims: dims.saturating_add(inner),
                element,
            },
            element => Self::Array {
                dims,
                element: Box::new(element),
            },
        }
    }

    /// Number of `[]` levels (0 for non-arrays)
    pub fn dims(&self) -> usize {
        match self {
            Self::Array { dims, .. } => *dims,
            _ => 0,
        }
    }

    /// Whether the token had a mapping (the element's, for arrays)
    pub fn is_known(&self) -> bool {
        !matches!(self.element(), Self::Other(_))
    }

    /// Innermost element type, unwrapping every array level
    pub fn element(&self) -> &Self {
        match self {
            Self::Array { element, .. } => element,
            ty => ty,
        }
    }

    /// Whether fields of this type carry child fields
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Object | Self::ArrayObject)
    }
}

impl std::fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object => write!(f, "obj"),
            Self::ArrayObject => write!(f, "[]obj"),
            Self::Int => write!(f, "int"),
            Self::Number => write!(f, "number"),
            Self::DateTime => write!(f, "datetime"),
            Self::Boolean => write!(f, "boolean"),
            Self::String => write!(f, "string"),
            Self::Array { dims, element } => {
                for _ in 0..*dims {
                    f.write_str(ARRAY_PREFIX)?;
                }
                write!(f, "{}", element)
            }
            Self::Other(token) => write!(f, "{}", token),
        }
    }
}

impl Serialize for CanonicalType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token))
    }
}

/// Canonical display string for a raw type token
pub fn canonicalize(token: &str) -> String {
    CanonicalType::from_token(token).to_string()
}

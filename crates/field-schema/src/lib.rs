//! # field-schema
//!
//! Field schema parser for schema-docs.
//! Turns loosely-typed field descriptions into canonical `FieldSpec` trees
//! and synthesizes example payloads from them.

mod canonical;
mod error;
mod example;
mod field;
mod walker;

pub use canonical::{canonicalize, CanonicalType};
pub use error::{SchemaError, SchemaResult};
pub use example::{synthesize, synthesize_raw, synthesize_section, MAX_EXAMPLE_ARRAY_DIMS};
pub use field::{FieldParser, FieldSpec, Requirement, DEFAULT_MAX_DEPTH};
pub use walker::{
    SchemaDocument, SchemaWalker, SectionError, SectionOutcome, WalkedDocument, WalkedSection,
    DEFAULT_EXAMPLE_SECTIONS, KNOWN_SECTIONS, NON_FIELD_KEYS,
};

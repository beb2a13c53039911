//! # schema-docs
//!
//! Documentation generator for field schemas.
//! Renders field tables and example payloads from schema documents and
//! publishes them to Notion or to local Markdown files.

pub mod error;
mod generator;
pub mod publish;
pub mod render;
mod secret;
pub mod settings;

pub use error::{DocsError, DocsResult};
pub use generator::{DocsGenerator, GeneratedPage};
pub use publish::{MarkdownPublisher, NotionPublisher, PageId, Publisher};
pub use render::{Block, CellStyle, DocumentRenderer, Table, TableCell};
pub use secret::ApiToken;
pub use settings::{NotionSettings, ParserSettings, RenderSettings, Settings, SettingsManager};

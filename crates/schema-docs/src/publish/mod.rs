//! Publishing backends for rendered documents
//!
//! Two backends are provided:
//! 1. Notion (pages created in a database)
//! 2. Markdown files (dry run, no network)

mod markdown;
mod notion;
mod traits;

pub use markdown::MarkdownPublisher;
pub use notion::NotionPublisher;
pub use traits::{PageId, Publisher};

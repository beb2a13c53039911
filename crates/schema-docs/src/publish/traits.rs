//! Publisher trait definitions

use async_trait::async_trait;

use crate::error::DocsResult;
use crate::render::Block;

/// Identifier of a published page, opaque to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageId(pub String);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for document publishing backends
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a titled document and return the new page's identifier
    async fn publish(&self, title: &str, blocks: &[Block]) -> DocsResult<PageId>;

    /// Get a human-readable name for this backend
    fn backend_name(&self) -> &'static str;
}

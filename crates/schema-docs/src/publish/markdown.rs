//! Markdown file backend for dry runs

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use super::traits::{PageId, Publisher};
use crate::error::DocsResult;
use crate::render::{Block, DocumentRenderer};

/// Writes each document to `<out_dir>/<slug>.md`
///
/// Existing files are never overwritten; a numeric suffix is added instead.
pub struct MarkdownPublisher {
    out_dir: PathBuf,
}

impl MarkdownPublisher {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    async fn unique_path(&self, slug: &str) -> DocsResult<PathBuf> {
        let mut path = self.out_dir.join(format!("{}.md", slug));
        let mut n = 2;
        while tokio::fs::try_exists(&path).await? {
            path = self.out_dir.join(format!("{}-{}.md", slug, n));
            n += 1;
        }
        Ok(path)
    }
}

#[async_trait]
impl Publisher for MarkdownPublisher {
    async fn publish(&self, title: &str, blocks: &[Block]) -> DocsResult<PageId> {
        tokio::fs::create_dir_all(&self.out_dir).await?;

        let path = self.unique_path(&slugify(title)).await?;
        let contents = format!("# {}\n\n{}", title, DocumentRenderer::to_markdown(blocks));
        tokio::fs::write(&path, contents).await?;

        info!("Wrote {} blocks to {:?}", blocks.len(), path);
        Ok(PageId(path.display().to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "Markdown"
    }
}

/// File-name-safe form of a title
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "page".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("JSON Schema Documentation"), "json-schema-documentation");
        assert_eq!(slugify("  Orders / v2 API!  "), "orders-v2-api");
        assert_eq!(slugify("???"), "page");
    }

    #[tokio::test]
    async fn test_publish_writes_markdown() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = MarkdownPublisher::new(temp_dir.path().join("out"));
        let blocks = vec![
            Block::Heading("1. Response".to_string()),
            Block::Paragraph("Example Response:".to_string()),
        ];

        let page = publisher.publish("Orders API", &blocks).await.unwrap();

        let path = temp_dir.path().join("out").join("orders-api.md");
        assert_eq!(page.0, path.display().to_string());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Orders API\n\n## 1. Response"));
        assert!(contents.contains("Example Response:"));
    }

    #[tokio::test]
    async fn test_publish_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = MarkdownPublisher::new(temp_dir.path());

        let first = publisher.publish("Same", &[]).await.unwrap();
        let second = publisher.publish("Same", &[]).await.unwrap();
        let third = publisher.publish("Same", &[]).await.unwrap();

        assert!(first.0.ends_with("same.md"));
        assert!(second.0.ends_with("same-2.md"));
        assert!(third.0.ends_with("same-3.md"));
    }
}

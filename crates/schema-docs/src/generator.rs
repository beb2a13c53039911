//! Generate and publish documentation for schema files

use field_schema::{FieldParser, SchemaDocument, SchemaWalker};
use std::path::Path;
use tracing::{info, warn};

use crate::error::DocsResult;
use crate::publish::{PageId, Publisher};
use crate::render::{Block, DocumentRenderer};
use crate::settings::Settings;

/// Outcome of documenting one schema document
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    /// Identifier returned by the publisher
    pub page_id: PageId,
    /// Number of sections documented
    pub sections: usize,
    /// Keys of sections that could not be parsed
    pub failed_sections: Vec<String>,
}

/// Parses, renders and publishes schema documents
pub struct DocsGenerator {
    walker: SchemaWalker,
    renderer: DocumentRenderer,
    publisher: Box<dyn Publisher>,
}

impl DocsGenerator {
    /// Create a generator with default parser and renderer settings
    pub fn new(publisher: Box<dyn Publisher>) -> Self {
        Self {
            walker: SchemaWalker::new(),
            renderer: DocumentRenderer::new(),
            publisher,
        }
    }

    /// Create a generator configured from settings
    pub fn from_settings(settings: &Settings, publisher: Box<dyn Publisher>) -> Self {
        let parser = FieldParser::new().with_max_depth(settings.parser.max_depth);
        Self {
            walker: SchemaWalker::new()
                .with_parser(parser)
                .with_example_sections(settings.parser.example_sections.iter().cloned()),
            renderer: DocumentRenderer::new().with_chunk_size(settings.render.code_chunk_size),
            publisher,
        }
    }

    pub fn publisher(&self) -> &dyn Publisher {
        self.publisher.as_ref()
    }

    /// Render a document without publishing it
    pub fn render(&self, content: &str) -> DocsResult<Vec<Block>> {
        let document = SchemaDocument::parse(content)?;
        Ok(self.renderer.render(&self.walker.walk(&document)))
    }

    /// Read, render and publish one schema file
    pub async fn process_file(&self, path: &Path, title: &str) -> DocsResult<GeneratedPage> {
        info!("Processing {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        self.process_str(&content, title).await
    }

    /// Render and publish one schema document
    pub async fn process_str(&self, content: &str, title: &str) -> DocsResult<GeneratedPage> {
        let document = SchemaDocument::parse(content)?;
        let walked = self.walker.walk(&document);

        let failed_sections: Vec<String> = walked.failures().map(|f| f.key.clone()).collect();
        for key in &failed_sections {
            warn!("Section {} was documented as failed", key);
        }

        let blocks = self.renderer.render(&walked);
        let page_id = self.publisher.publish(title, &blocks).await?;
        info!(
            "Published {:?} via {} as {}",
            title,
            self.publisher.backend_name(),
            page_id
        );

        Ok(GeneratedPage {
            page_id,
            sections: walked.sections.len(),
            failed_sections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocsError;
    use crate::publish::MarkdownPublisher;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct RecordingPublisher {
        published: Arc<Mutex<Vec<(String, Vec<Block>)>>>,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, title: &str, blocks: &[Block]) -> DocsResult<PageId> {
            let mut published = self.published.lock().unwrap();
            published.push((title.to_string(), blocks.to_vec()));
            Ok(PageId(format!("page-{}", published.len())))
        }

        fn backend_name(&self) -> &'static str {
            "Recording"
        }
    }

    const DOCUMENT: &str = r#"{
        "param": {"fields": {"id": {"type": "uint64", "required": "Required"}}},
        "request_body": {"fields": {
            "items": {"type": "array", "items": {"type": "object", "properties": {
                "sku": {"type": "string"},
                "qty": {"type": "int32"}
            }}}
        }}
    }"#;

    #[tokio::test]
    async fn test_process_str_publishes_blocks() {
        let recorder = RecordingPublisher::default();
        let generator = DocsGenerator::new(Box::new(recorder.clone()));

        let page = generator.process_str(DOCUMENT, "Orders").await.unwrap();
        assert_eq!(page.page_id, PageId("page-1".to_string()));
        assert_eq!(page.sections, 2);
        assert!(page.failed_sections.is_empty());

        let published = recorder.published.lock().unwrap();
        let (title, blocks) = &published[0];
        assert_eq!(title, "Orders");
        assert!(blocks.contains(&Block::Heading("1. Path Parameters".to_string())));
        assert!(blocks.contains(&Block::Heading("3. Request Body".to_string())));
        assert!(blocks.contains(&Block::Paragraph("Example Request Body:".to_string())));
    }

    #[tokio::test]
    async fn test_settings_are_applied() {
        let recorder = RecordingPublisher::default();
        let mut settings = Settings::default();
        settings.parser.max_depth = 0;
        settings.parser.example_sections = vec!["param".to_string()];
        let generator = DocsGenerator::from_settings(&settings, Box::new(recorder.clone()));

        let page = generator.process_str(DOCUMENT, "Orders").await.unwrap();
        assert_eq!(page.failed_sections, vec!["request_body".to_string()]);

        let published = recorder.published.lock().unwrap();
        let blocks = &published[0].1;
        assert!(blocks.contains(&Block::Paragraph("Example Path Parameters:".to_string())));
        assert!(!blocks.contains(&Block::Paragraph("Example Request Body:".to_string())));
    }

    #[tokio::test]
    async fn test_deep_section_does_not_block_page() {
        let mut deep = r#"{"type": "bool"}"#.to_string();
        for _ in 0..80 {
            deep = format!(r#"{{"type": "object", "properties": {{"n": {}}}}}"#, deep);
        }
        let content = format!(
            r#"{{"request_body": {{"fields": {{"deep": {}}}}}, "param": {{"fields": {{"id": {{"type": "string"}}}}}}}}"#,
            deep
        );

        let recorder = RecordingPublisher::default();
        let generator = DocsGenerator::new(Box::new(recorder.clone()));
        let page = generator.process_str(&content, "Deep").await.unwrap();

        assert_eq!(page.sections, 2);
        assert_eq!(page.failed_sections, vec!["request_body".to_string()]);
        let published = recorder.published.lock().unwrap();
        assert!(published[0]
            .1
            .contains(&Block::Heading("1. Path Parameters".to_string())));
    }

    #[tokio::test]
    async fn test_malformed_document_is_not_published() {
        let recorder = RecordingPublisher::default();
        let generator = DocsGenerator::new(Box::new(recorder.clone()));

        let result = generator.process_str("{\"param\": ", "Broken").await;
        assert!(matches!(result, Err(DocsError::Schema(_))));
        assert!(recorder.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_file_with_markdown() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("orders.json");
        std::fs::write(&input, DOCUMENT).unwrap();

        let out_dir = temp_dir.path().join("docs");
        let generator = DocsGenerator::new(Box::new(MarkdownPublisher::new(&out_dir)));
        let page = generator.process_file(&input, "Orders API").await.unwrap();

        let markdown = std::fs::read_to_string(&page.page_id.0).unwrap();
        assert!(markdown.contains("| `id` |  | int | ✅ |  |  |"));
        assert!(markdown.contains("|  | `qty` | int | ❌ |  |  |"));
        assert!(markdown.contains("\"sku\": \"example_string\""));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let generator = DocsGenerator::new(Box::new(RecordingPublisher::default()));
        let result = generator
            .process_file(Path::new("/nonexistent/schema.json"), "x")
            .await;
        assert!(matches!(result, Err(DocsError::Io(_))));
    }

    #[test]
    fn test_render_only() {
        let generator = DocsGenerator::new(Box::new(RecordingPublisher::default()));
        let blocks = generator.render(DOCUMENT).unwrap();
        assert_eq!(generator.publisher().backend_name(), "Recording");
        assert!(blocks.iter().any(|b| matches!(b, Block::Code { .. })));
    }
}

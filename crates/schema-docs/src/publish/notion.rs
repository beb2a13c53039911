//! Notion publishing backend

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use super::traits::{PageId, Publisher};
use crate::error::{DocsError, DocsResult};
use crate::render::{Block, CellStyle, Table, TableCell};
use crate::secret::ApiToken;
use crate::settings::NotionSettings;

/// Notion accepts at most this many elements in any one array of a request
/// (page children, table rows, rich text items)
const MAX_CHILDREN_PER_REQUEST: usize = 100;

/// Creates one Notion page per document in a database
pub struct NotionPublisher {
    client: Client,
    base_url: Url,
    token: ApiToken,
    database_id: String,
    api_version: String,
}

impl NotionPublisher {
    /// Create a publisher from settings and a token
    pub fn new(settings: &NotionSettings, token: ApiToken) -> DocsResult<Self> {
        if token.is_empty() {
            return Err(DocsError::MissingConfig(
                "Notion token (--token or NOTION_TOKEN)".to_string(),
            ));
        }

        let database_id = settings
            .database_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                DocsError::MissingConfig(
                    "Notion database id (--database-id or NOTION_DATABASE_ID)".to_string(),
                )
            })?;

        // keep a trailing slash so joins extend the base path
        let mut base = settings.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token,
            database_id,
            api_version: settings.api_version.clone(),
        })
    }

    /// Build the page creation body
    fn page_request(&self, title: &str, children: &[Value]) -> Value {
        json!({
            "parent": {"database_id": self.database_id},
            "properties": {
                "Name": {"title": [rich_text(title, CellStyle::Plain)]}
            },
            "children": children,
        })
    }

    async fn send(&self, request: RequestBuilder) -> DocsResult<Value> {
        let response = request
            .bearer_auth(self.token.expose())
            .header("Notion-Version", &self.api_version)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Notion response status: {}", status);

        if !status.is_success() {
            error!("Notion request failed with status {}: {}", status, body);
            return Err(DocsError::Publish {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Publisher for NotionPublisher {
    async fn publish(&self, title: &str, blocks: &[Block]) -> DocsResult<PageId> {
        let children: Vec<Value> = blocks.iter().flat_map(block_to_notion).collect();
        let (first, rest) = children.split_at(children.len().min(MAX_CHILDREN_PER_REQUEST));

        let endpoint = self.base_url.join("v1/pages")?;
        info!("Creating Notion page {:?} with {} blocks", title, children.len());

        let page = self
            .send(self.client.post(endpoint).json(&self.page_request(title, first)))
            .await?;
        let page_id = page
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| DocsError::InvalidResponse("page response has no id".to_string()))?
            .to_string();

        for batch in rest.chunks(MAX_CHILDREN_PER_REQUEST) {
            let endpoint = self
                .base_url
                .join(&format!("v1/blocks/{}/children", page_id))?;
            debug!("Appending {} blocks to page {}", batch.len(), page_id);
            self.send(self.client.patch(endpoint).json(&json!({"children": batch})))
                .await?;
        }

        Ok(PageId(page_id))
    }

    fn backend_name(&self) -> &'static str {
        "Notion"
    }
}

/// Convert a block to its Notion API representation
///
/// Tables and code blocks that exceed the per-array limit are split across
/// consecutive blocks; every table part repeats the header row.
fn block_to_notion(block: &Block) -> Vec<Value> {
    match block {
        Block::Heading(text) => vec![json!({
            "object": "block",
            "type": "heading_1",
            "heading_1": {"rich_text": [rich_text(text, CellStyle::Plain)]}
        })],
        Block::Paragraph(text) => vec![json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": {"rich_text": [rich_text(text, CellStyle::Plain)]}
        })],
        Block::Table(table) => table_to_notion(table),
        Block::Code { language, segments } => {
            if segments.is_empty() {
                return vec![code_block(language, &[])];
            }
            segments
                .chunks(MAX_CHILDREN_PER_REQUEST)
                .map(|part| code_block(language, part))
                .collect()
        }
    }
}

fn code_block(language: &str, segments: &[String]) -> Value {
    let rich: Vec<Value> = segments
        .iter()
        .map(|segment| rich_text(segment, CellStyle::Plain))
        .collect();
    json!({
        "object": "block",
        "type": "code",
        "code": {"language": language, "rich_text": rich}
    })
}

fn table_to_notion(table: &Table) -> Vec<Value> {
    let Some((header, body)) = table.rows.split_first() else {
        return vec![table_block(table.width, &[])];
    };
    if body.is_empty() {
        return vec![table_block(table.width, std::slice::from_ref(header))];
    }

    body.chunks(MAX_CHILDREN_PER_REQUEST - 1)
        .map(|part| {
            let mut rows = Vec::with_capacity(part.len() + 1);
            rows.push(header.clone());
            rows.extend_from_slice(part);
            table_block(table.width, &rows)
        })
        .collect()
}

fn table_block(width: usize, rows: &[Vec<TableCell>]) -> Value {
    let rows: Vec<Value> = rows
        .iter()
        .map(|row| {
            let cells: Vec<Value> = row.iter().map(cell_to_notion).collect();
            json!({
                "object": "block",
                "type": "table_row",
                "table_row": {"cells": cells}
            })
        })
        .collect();

    json!({
        "object": "block",
        "type": "table",
        "table": {
            "table_width": width,
            "has_column_header": true,
            "has_row_header": false,
            "children": rows
        }
    })
}

fn cell_to_notion(cell: &TableCell) -> Value {
    json!([rich_text(&cell.text, cell.style)])
}

fn rich_text(content: &str, style: CellStyle) -> Value {
    let mut text = json!({
        "type": "text",
        "text": {"content": content}
    });
    let annotations = match style {
        CellStyle::Plain => None,
        CellStyle::Code => Some(json!({"code": true, "color": "red"})),
        CellStyle::Muted => Some(json!({"italic": true, "color": "gray"})),
    };
    if let (Some(annotations), Some(obj)) = (annotations, text.as_object_mut()) {
        obj.insert("annotations".to_string(), annotations);
    }
    text
}

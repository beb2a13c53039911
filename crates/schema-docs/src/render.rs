//! Render walked schema documents into publishable blocks

use field_schema::{FieldSpec, SectionError, WalkedDocument, WalkedSection};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::warn;

/// Default maximum characters per code block segment
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

const LEGEND: &str = "Special characters: —— ❌ —— ✅︎ ——";
const REQUIRED_MARK: &str = "✅";
const NOT_REQUIRED_MARK: &str = "❌";
const EMPTY_SECTION: &str = "No fields defined for this section";
const HEADER: [&str; 6] = ["Name", "", "Type", "Required", "Format", "Description"];

/// Visual style of a table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    Plain,
    /// Inline code, used for field names
    Code,
    /// Italic gray, used for placeholder rows
    Muted,
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub style: CellStyle,
}

impl TableCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::Plain,
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::Code,
        }
    }

    pub fn muted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::Muted,
        }
    }
}

/// A table whose first row is the column header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub width: usize,
    pub rows: Vec<Vec<TableCell>>,
}

/// Document building blocks, independent of the publishing backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    Table(Table),
    /// Code text split into sequential segments
    Code {
        language: String,
        segments: Vec<String>,
    },
}

impl Block {
    /// Render this block as Markdown
    pub fn to_markdown(&self) -> String {
        match self {
            Block::Heading(text) => format!("## {}", text),
            Block::Paragraph(text) => text.clone(),
            Block::Table(table) => table_to_markdown(table),
            Block::Code { language, segments } => {
                format!("```{}\n{}\n```", language, segments.concat())
            }
        }
    }
}

/// Turns walked documents into blocks
#[derive(Debug, Clone, Copy)]
pub struct DocumentRenderer {
    chunk_size: usize,
}

impl DocumentRenderer {
    /// Create a renderer with the default chunk size
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the maximum characters per code segment (0 disables chunking)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Render a whole document
    pub fn render(&self, document: &WalkedDocument) -> Vec<Block> {
        let mut blocks = vec![Block::Paragraph(LEGEND.to_string())];

        for outcome in &document.sections {
            match outcome {
                Ok(section) => blocks.extend(self.render_section(section)),
                Err(failure) => blocks.extend(self.render_failure(failure)),
            }
        }

        blocks
    }

    /// Join rendered blocks into one Markdown document
    pub fn to_markdown(blocks: &[Block]) -> String {
        let mut out = blocks
            .iter()
            .map(Block::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        out
    }

    fn render_section(&self, section: &WalkedSection) -> Vec<Block> {
        let mut blocks = vec![
            Block::Heading(section.title.clone()),
            Block::Table(field_table(&section.fields)),
        ];

        if let Some(example) = &section.example {
            blocks.push(Block::Paragraph(format!("Example {}:", section.label)));
            blocks.push(self.example_block(example));
        }

        blocks
    }

    fn render_failure(&self, failure: &SectionError) -> Vec<Block> {
        vec![
            Block::Heading(failure.title.clone()),
            Block::Paragraph(format!("This section could not be documented: {}", failure.error)),
        ]
    }

    fn example_block(&self, example: &Value) -> Block {
        let text = match pretty_json(example) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to serialize example: {}", e);
                format!("Error creating example: {}", e)
            }
        };

        Block::Code {
            language: "json".to_string(),
            segments: chunk_text(&text, self.chunk_size),
        }
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// One row per field plus one row per immediate child
fn field_table(fields: &[FieldSpec]) -> Table {
    let mut rows = vec![HEADER.iter().map(|h| TableCell::plain(*h)).collect::<Vec<_>>()];

    if fields.is_empty() {
        let mut row = vec![TableCell::muted(EMPTY_SECTION)];
        row.extend((1..HEADER.len()).map(|_| TableCell::plain("")));
        rows.push(row);
    }

    for field in fields {
        rows.push(field_row(field, false));
        for child in &field.children {
            rows.push(field_row(child, true));
        }
    }

    Table {
        width: HEADER.len(),
        rows,
    }
}

fn field_row(field: &FieldSpec, nested: bool) -> Vec<TableCell> {
    let (first, second) = if nested {
        (TableCell::plain(""), TableCell::code(&field.name))
    } else {
        (TableCell::code(&field.name), TableCell::plain(""))
    };
    let required = if field.required.is_required() {
        REQUIRED_MARK
    } else {
        NOT_REQUIRED_MARK
    };

    vec![
        first,
        second,
        TableCell::plain(field.canonical_type.to_string()),
        TableCell::plain(required),
        TableCell::plain(&field.format),
        TableCell::plain(&field.description),
    ]
}

/// Pretty-print with four-space indentation and sorted keys
fn pretty_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Split text into segments of at most `size` characters
fn chunk_text(text: &str, size: usize) -> Vec<String> {
    if size == 0 || text.chars().count() <= size {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

fn table_to_markdown(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    for (i, row) in table.rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(cell_to_markdown).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            lines.push(format!("|{}", " --- |".repeat(table.width)));
        }
    }
    lines.join("\n")
}

fn cell_to_markdown(cell: &TableCell) -> String {
    let text = cell.text.replace('|', "\\|").replace('\n', " ");
    if text.is_empty() {
        return text;
    }
    match cell.style {
        CellStyle::Plain => text,
        CellStyle::Code => format!("`{}`", text),
        CellStyle::Muted => format!("*{}*", text),
    }
}

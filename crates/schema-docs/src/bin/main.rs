//! schema-docs CLI - publish field schema documentation
//!
//! Reads one or more schema documents, renders a field table and example
//! payloads for each, and creates one Notion page per document. With
//! `--dry-run <dir>` the pages are written as Markdown files instead.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use schema_docs::{
    ApiToken, DocsGenerator, MarkdownPublisher, NotionPublisher, Publisher, SettingsManager,
};

/// Generate API field documentation from schema files and publish it
#[derive(Parser, Debug)]
#[command(name = "schema-docs")]
#[command(version)]
#[command(about = "Generate API field documentation from schema files and publish it")]
struct Args {
    /// Schema documents (JSON or YAML)
    #[arg(required_unless_present = "write_config")]
    files: Vec<PathBuf>,

    /// Page title (defaults to the configured title)
    #[arg(long)]
    title: Option<String>,

    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Notion database that receives the pages
    #[arg(long, env = "NOTION_DATABASE_ID")]
    database_id: Option<String>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write Markdown files to this directory instead of publishing
    #[arg(long, value_name = "DIR")]
    dry_run: Option<PathBuf>,

    /// Maximum field nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Save the effective settings to the settings file and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut manager = match args.config {
        Some(path) => SettingsManager::load(path),
        None => SettingsManager::load_default(),
    }
    .context("Failed to load settings")?;

    if let Some(database_id) = args.database_id {
        manager.get_mut().notion.database_id = Some(database_id);
    }
    if let Some(max_depth) = args.max_depth {
        manager.get_mut().parser.max_depth = max_depth;
    }

    if args.write_config {
        manager.save().await.context("Failed to save settings")?;
        println!("Settings written to {}", manager.path().display());
        return Ok(());
    }

    let settings = manager.get();
    let publisher: Box<dyn Publisher> = match args.dry_run {
        Some(dir) => Box::new(MarkdownPublisher::new(dir)),
        None => {
            let token = ApiToken::new(args.token.unwrap_or_default());
            Box::new(NotionPublisher::new(&settings.notion, token)?)
        }
    };
    info!("Publishing via {}", publisher.backend_name());

    let title = args
        .title
        .unwrap_or_else(|| settings.render.default_title.clone());
    let generator = DocsGenerator::from_settings(settings, publisher);

    let mut failures = 0usize;
    for file in &args.files {
        match generator.process_file(file, &title).await {
            Ok(page) => {
                if !page.failed_sections.is_empty() {
                    warn!(
                        "{}: sections documented as failed: {}",
                        file.display(),
                        page.failed_sections.join(", ")
                    );
                }
                println!(
                    "Page created successfully for {} with ID: {}",
                    file.display(),
                    page.page_id
                );
            }
            Err(e) => {
                error!("Error processing {}: {}", file.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, args.files.len());
    }

    Ok(())
}

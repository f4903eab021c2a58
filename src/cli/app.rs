use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use respondent_home::{
    AppConfig, DocumentStore, FileDocumentStore, InMemoryDocumentStore, InMemoryEventPublisher,
    LinkAccessCodeRequest, RespondentHome, StoreBackend,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "respondent_home")]
#[command(about = "Respondent record store: replay queue events, query and link access codes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay newline-delimited inbound events through the worker pool.
    Ingest { file: PathBuf },
    /// Show an access code merged with its case.
    Get { code_hash: String },
    /// Link an access code using a JSON link request.
    Link { code_hash: String, request: PathBuf },
    /// Show a case by id.
    Case { case_id: String },
    /// List cases at an address.
    Uprn {
        uprn: String,
        /// Only the latest valid non-individual case.
        #[arg(long)]
        latest: bool,
    },
}

pub struct App {
    home: RespondentHome,
    publisher: Arc<InMemoryEventPublisher>,
    workers: usize,
}

impl App {
    pub async fn open(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Memory => {
                info!("document store: memory");
                Arc::new(InMemoryDocumentStore::new())
            }
            StoreBackend::File => {
                info!(path = %config.store_path.display(), "document store: file");
                fs::create_dir_all(&config.store_path)
                    .await
                    .with_context(|| {
                        format!("failed to create store directory {}", config.store_path.display())
                    })?;
                Arc::new(FileDocumentStore::new(&config.store_path))
            }
        };

        let publisher = Arc::new(InMemoryEventPublisher::new());
        let home = RespondentHome::from_config(&config, store, publisher.clone());

        Ok(Self {
            home,
            publisher,
            workers: config.workers,
        })
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Ingest { file } => self.ingest(file).await?,
            Command::Get { code_hash } => {
                let view = self.home.access_codes().get_access_code(&code_hash).await?;
                print_json(&view)?;
            }
            Command::Link { code_hash, request } => {
                let body = fs::read_to_string(&request)
                    .await
                    .with_context(|| format!("failed to read {}", request.display()))?;
                let request: LinkAccessCodeRequest =
                    serde_json::from_str(&body).context("invalid link request")?;
                let view = self
                    .home
                    .access_codes()
                    .link_access_code(&code_hash, &request)
                    .await?;
                print_json(&view)?;
            }
            Command::Case { case_id } => {
                let case = self.home.cases().get_case(&case_id).await?;
                print_json(&case)?;
            }
            Command::Uprn { uprn, latest } => {
                if latest {
                    let case = self.home.cases().get_latest_valid_case_by_uprn(&uprn).await?;
                    print_json(&case)?;
                } else {
                    let cases = self.home.cases().get_cases_by_uprn(&uprn).await?;
                    print_json(&cases)?;
                }
            }
        }

        for event in self.publisher.take().await {
            println!("{}", serde_json::to_string(&event)?);
        }
        Ok(())
    }

    async fn ingest(&self, file: PathBuf) -> Result<()> {
        let body = fs::read_to_string(&file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;
        let messages: Vec<(usize, String)> = body
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| (index + 1, line.to_string()))
            .collect();

        let inbound = self.home.inbound();
        let outcomes: Vec<bool> = stream::iter(messages)
            .map(|(line, message)| async move {
                match inbound.handle_message(&message).await {
                    Ok(_) => true,
                    Err(err) => {
                        error!(line, error = %err, "inbound event rejected");
                        false
                    }
                }
            })
            .buffer_unordered(self.workers.max(1))
            .collect()
            .await;

        let stored = outcomes.iter().filter(|ok| **ok).count();
        let failed = outcomes.len() - stored;
        info!(stored, failed, "ingest finished");
        if failed > 0 {
            anyhow::bail!("{failed} of {} events failed", outcomes.len());
        }
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use docqa::core::Config;
use docqa::llm::build_provider;
use docqa::pdf;
use docqa::questions::{collect_pdfs, QuestionGenerator};
use docqa::rag::RagPipeline;
use docqa::repl;

#[derive(Parser)]
#[command(name = "docqa", about = "Ask questions about PDF documents", version)]
struct Cli {
    /// Path to a config file (defaults to ./docqa.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for log files (stdout only when omitted)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a PDF and answer questions about it
    Ask {
        /// Path to the PDF file
        path: PathBuf,

        /// Answer a single question instead of starting the interactive loop
        #[arg(long)]
        question: Option<String>,

        /// Number of segments retrieved per question
        #[arg(long)]
        top_k: Option<usize>,

        /// Chunk size in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Overlap between consecutive chunks, in characters
        #[arg(long)]
        chunk_overlap: Option<usize>,

        /// Restructure the document into model-titled sections before chunking
        #[arg(long)]
        sections: bool,
    },

    /// Generate study questions for a PDF, or every PDF in a folder
    Questions {
        /// A PDF file or a folder containing PDF files
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docqa::logging::init(cli.log_dir.as_deref());

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Command::Ask {
            path,
            question,
            top_k,
            chunk_size,
            chunk_overlap,
            sections,
        } => {
            if let Some(k) = top_k {
                config.retrieval.top_k = k;
            }
            if let Some(size) = chunk_size {
                config.chunking.chunk_size = size;
            }
            if let Some(overlap) = chunk_overlap {
                config.chunking.chunk_overlap = overlap;
            }
            config.validate().context("invalid configuration")?;

            let provider = build_provider(&config.provider)?;
            if !provider.health_check().await.unwrap_or(false) {
                tracing::warn!(
                    "provider '{}' at {} is not responding, requests may fail",
                    provider.name(),
                    config.provider.base_url
                );
            }

            let pages = pdf::extract_pages(&path)?;
            let source = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            let mut pipeline = RagPipeline::new(provider, &config)?;
            if sections {
                pipeline.build_sectioned(&pages, &source).await?;
            } else {
                pipeline.build_from_pages(&pages, &source).await?;
            }
            tracing::info!("ready, {} segments indexed", pipeline.segment_count());

            match question {
                Some(question) => {
                    let answer = pipeline.ask(&question).await?;
                    println!("{}", answer);
                }
                None => repl::run(&pipeline).await?,
            }
        }

        Command::Questions { path } => {
            config.validate().context("invalid configuration")?;
            let provider = build_provider(&config.provider)?;
            let generator = QuestionGenerator::new(
                provider,
                config.provider.chat_model.clone(),
                config.generation.clone(),
            );

            for pdf_path in collect_pdfs(&path)? {
                match generator.generate_for_file(&pdf_path).await {
                    Ok(out) => println!("{} -> {}", pdf_path.display(), out.display()),
                    Err(e) => tracing::error!("skipping {}: {}", pdf_path.display(), e),
                }
            }
        }
    }

    Ok(())
}

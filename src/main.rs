use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use session_notes::{
    create_router, AppState, Config, LocalObjectStore, MemoryStore, NotesStore, OpenAiGenerator,
    SqliteStore, SummaryPipeline,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "session-notes", about = "Therapy session summaries")]
struct Cli {
    /// Config file (extension optional; missing file means defaults)
    #[arg(long, default_value = "config/session-notes")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve {
        /// Keep everything in memory instead of SQLite
        #[arg(long)]
        in_memory: bool,
    },
    /// Summarize a text file once and print the stored summary as JSON
    Summarize {
        file: PathBuf,

        #[arg(long)]
        user: String,

        /// Treat the file as a single-speaker voice note
        #[arg(long)]
        voice_note: bool,
    },
}

fn build_pipeline(cfg: &Config, in_memory: bool) -> Result<SummaryPipeline> {
    let generator = OpenAiGenerator::from_config(&cfg.generator)
        .context("Failed to configure generation provider")?;

    let store: Arc<dyn NotesStore> = if in_memory {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(
            SqliteStore::new(&cfg.storage.database_path)
                .context("Failed to open session-notes database")?,
        )
    };

    Ok(SummaryPipeline::new(
        cfg.summary.pipeline_config(),
        Arc::new(generator),
        store,
        Arc::new(LocalObjectStore::new(&cfg.storage.objects_path)),
    ))
}

async fn serve(cfg: Config, in_memory: bool) -> Result<()> {
    let pipeline = Arc::new(build_pipeline(&cfg, in_memory)?);

    if cfg.auth.tokens.is_empty() {
        tracing::warn!("No API tokens configured; every /api request will be rejected");
    }

    let app = create_router(AppState::new(pipeline, cfg.auth.clone()));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("{} listening on {}", cfg.service.name, addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

async fn summarize(cfg: Config, file: PathBuf, user: String, voice_note: bool) -> Result<()> {
    let text = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let pipeline = build_pipeline(&cfg, false)?;

    let summary = if voice_note {
        pipeline.create_voice_note_summary(&user, &text).await?
    } else {
        pipeline.create_transcript_summary(&user, &text, None).await?
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Loaded config: {}", cfg.service.name);

    match cli.command.unwrap_or(Command::Serve { in_memory: false }) {
        Command::Serve { in_memory } => serve(cfg, in_memory).await,
        Command::Summarize {
            file,
            user,
            voice_note,
        } => summarize(cfg, file, user, voice_note).await,
    }
}

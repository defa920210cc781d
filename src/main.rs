//! CLI entry point for the kindle-notebook tool.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use kindle_notebook::{
    ClientConfig, KindleClient, SessionContext, load_cookie_file, load_session_file,
};
use serde::Serialize;
use tracing::{debug, info};

mod app_config;
mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(command = ?args.command, "CLI arguments parsed");

    let loaded = app_config::load_client_config(args.config.as_deref())?;
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), "loaded client config");
    }

    let session = load_session(&args, &loaded.config)?;
    let client = KindleClient::with_config(session, loaded.config)
        .context("Failed to create the reader client")?;

    run(&client, args.command).await
}

fn load_session(args: &Args, config: &ClientConfig) -> Result<SessionContext> {
    if let Some(path) = &args.session {
        return load_session_file(path)
            .with_context(|| format!("Failed to load session file '{}'", path.display()));
    }

    let (Some(cookie_path), Some(device_token)) = (&args.cookies, &args.device_token) else {
        bail!("No session provided\n  Suggestion: pass --session FILE, or --cookies FILE with --device-token TOKEN");
    };

    let read_base = config.read_base()?;
    let host = read_base.host_str().unwrap_or_default();
    load_cookie_file(cookie_path, host, device_token.as_str())
        .with_context(|| format!("Failed to load cookie file '{}'", cookie_path.display()))
}

async fn run(client: &KindleClient, command: Command) -> Result<()> {
    match command {
        Command::Library { with_details } => {
            let books = client.fetch_library().await?;
            if !with_details {
                return print_json(&books);
            }
            let mut detailed = Vec::with_capacity(books.len());
            for book in books {
                let (details, metadata) = client
                    .fetch_book_details_and_metadata(&book.asin)
                    .await
                    .with_context(|| format!("Failed to fetch details for {}", book.asin))?;
                detailed.push(book.attach(details, metadata));
            }
            info!(books = detailed.len(), "attached details to library");
            print_json(&detailed)
        }
        Command::Details { asin } => {
            let (details, metadata) = client.fetch_book_details_and_metadata(&asin).await?;
            print_json(&DetailsOutput { details, metadata })
        }
        Command::Annotations {
            asin,
            ref_em_id,
            yj_format_version,
        } => {
            let annotations = client
                .fetch_annotations(&asin, &ref_em_id, &yj_format_version)
                .await?;
            print_json(&annotations)
        }
        Command::NotebookLibrary => print_json(&client.fetch_notebook_library().await?),
        Command::NotebookAnnotations { asin } => {
            print_json(&client.fetch_notebook_annotations(&asin).await?)
        }
    }
}

#[derive(Serialize)]
struct DetailsOutput {
    details: kindle_notebook::BookDetails,
    metadata: kindle_notebook::BookMetadata,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

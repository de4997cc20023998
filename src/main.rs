mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, PrefsAction};
use suwayomi_runners::preferences::{FileStore, TRACK_KEY};
use suwayomi_runners::prelude::*;
use suwayomi_runners::transport::ReqwestClient;

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn prefs_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(p) = flag {
        return Ok(p);
    }
    if let Some(p) = std::env::var_os("SUWAYOMI_PREFS").filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    FileStore::default_path().context("locating preference file")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = Arc::new(FileStore::new(prefs_path(cli.prefs)?));
    let network = Arc::new(ReqwestClient::new());
    let source = SuwayomiSource::new(network.clone(), store.clone());
    let tracker = SuwayomiTracker::new(network, store.clone());

    match cli.command {
        Commands::Directory { query } => {
            let page = source.get_directory(DirectoryRequest { query, ..Default::default() }).await?;
            for h in &page.results {
                println!("{:>6}  {}", h.id, h.title);
            }
        }
        Commands::Content { id } => print(&source.get_content(&id).await?)?,
        Commands::Chapters { id } => {
            for c in source.get_chapters(&id).await? {
                let title = c.title.as_deref().unwrap_or("");
                let group = c.providers.first().map(|p| p.name.as_str()).unwrap_or("");
                println!("{:>4}  #{:<7} {:>8}  {}  [{}]", c.index, c.number, c.chapter_id, title, group);
            }
        }
        Commands::Pages { chapter_id } => {
            for page in source.get_chapter_data("", &chapter_id).await?.pages {
                println!("{}", page.url);
            }
        }
        Commands::Progress { id } => print(&source.get_progress_state(&id).await?)?,
        Commands::Track { id } => print(&tracker.get_track_item(&id).await?)?,
        Commands::SetProgress { id, number } => {
            let form = FormValues::from([("progress".to_string(), FieldValue::Number(number))]);
            tracker
                .did_submit_entry_form(&id, form)
                .await
                .with_context(|| format!("setting progress of {id} to {number}"))?;
            println!("progress of {id} set to {number}");
        }
        Commands::Match { titles } => print(&tracker.get_results_for_titles(&titles).await?)?,
        Commands::Prefs { action } => match action {
            PrefsAction::Show => {
                println!("# {}", store.path().display());
                print(&source.get_preference_menu().await?)?;
            }
            PrefsAction::Set { key, value } => {
                let value = if key == TRACK_KEY {
                    FieldValue::Bool(value.parse().with_context(|| format!("{key} expects true or false"))?)
                } else {
                    FieldValue::Text(value)
                };
                source.update_preference(&key, value).await?;
            }
        },
    }
    Ok(())
}

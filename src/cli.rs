use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Debugging CLI: runs the runners against a live server
#[derive(Parser)]
#[command(name = "suwayomi-runners")]
#[command(about = "Exercise the Suwayomi content source and tracker runners", long_about = None)]
pub struct Cli {
    /// Preference file (TOML). Defaults to $SUWAYOMI_PREFS, then the platform config dir
    #[arg(long, global = true)]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the library, or search it
    Directory {
        /// Title filter
        query: Option<String>,
    },
    /// Show a manga's details
    Content { id: String },
    /// List a manga's chapters, newest first
    Chapters { id: String },
    /// List the page URLs of a chapter
    Pages { chapter_id: String },
    /// Show the reading progress the source would report
    Progress { id: String },
    /// Show the tracker entry for a manga
    Track { id: String },
    /// Set tracker progress: chapters up to NUMBER become read, later ones unread
    SetProgress { id: String, number: f64 },
    /// Search the library by one or more titles, as the tracker does
    Match { titles: Vec<String> },
    /// Manage stored preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print the preference form with current values
    Show,
    /// Set a preference (suwayomi_url, suwayomi_username, suwayomi_password, suwayomi_track)
    Set { key: String, value: String },
}

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "in-dexer")]
#[command(about = "Index folders into a local database and search them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register a folder and index everything beneath it
    Add { path: String },
    /// Remove a top-level folder and its files from the index
    Remove {
        path: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Re-walk every indexed folder
    Refresh,
    /// List indexed folders with their file counts
    Roots,
    /// Print the folder hierarchy
    Tree {
        /// Only print nodes up to this depth
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// List the files stored directly in a folder
    Ls { path: String },
    /// Search file names and folders
    Search {
        term: String,
        /// Match folders instead of files
        #[arg(short, long)]
        folders: bool,
    },
    /// Show where a folder sits in the hierarchy
    Reveal { path: String },
    /// Print configuration values
    PrintConfig,
}

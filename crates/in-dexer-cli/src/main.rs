mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use in_dexer_core::platform::basename;
use in_dexer_core::storage::{Database, FileFilter};
use in_dexer_core::{AppConfig, FileHit, IndexEngine, RootOutcome, SearchMode, SearchResults};
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match in_dexer_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let Some(command) = args.command else {
        let _ = Cli::command().print_long_help();
        return;
    };

    if let Err(err) = run(command, &config) {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Add { path } => run_add(config, &path),
        Commands::Remove { path, yes } => run_remove(config, &path, yes),
        Commands::Refresh => run_refresh(config),
        Commands::Roots => run_roots(config),
        Commands::Tree { depth } => run_tree(config, depth),
        Commands::Ls { path } => run_ls(config, &path),
        Commands::Search { term, folders } => {
            let mode = if folders {
                SearchMode::Folders
            } else {
                SearchMode::Files
            };
            run_search(config, &term, mode)
        }
        Commands::Reveal { path } => run_reveal(config, &path),
        Commands::PrintConfig => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
    }
}

fn open_engine(config: &AppConfig) -> Result<IndexEngine> {
    let db = Database::open(&config.db_path)
        .with_context(|| format!("Error opening database {}", config.db_path))?;
    Ok(IndexEngine::new(db).with_reporter(CliReporter::new()))
}

fn run_add(config: &AppConfig, path: &str) -> Result<()> {
    let engine = open_engine(config)?;
    info!("Indexing {}...", path);
    let report = engine.index_root(path)?;
    println!(
        "Successfully indexed {} files.",
        format!("{}", report.files_indexed).green()
    );
    if report.skipped.total() > 0 {
        println!(
            "{} files could not be read and were skipped.",
            format!("{}", report.skipped.total()).yellow()
        );
    }
    Ok(())
}

fn run_remove(config: &AppConfig, path: &str, yes: bool) -> Result<()> {
    let engine = open_engine(config)?;
    if engine.database().root_id(path)?.is_none() {
        warn!("{} is not a top-level indexed folder", path);
        return Ok(());
    }

    let confirmed = yes
        || prompt_confirm(
            &format!(
                "Are you sure you want to remove '{}' from the index?",
                basename(path)
            ),
            Some(false),
        )?;
    if !confirmed {
        return Ok(());
    }

    engine.remove_root(path)?;
    println!("Removed {}", path.cyan());
    print_refresh(&engine.refresh_all()?);
    Ok(())
}

fn run_refresh(config: &AppConfig) -> Result<()> {
    let engine = open_engine(config)?;
    for root in &config.root_paths {
        engine.add_root(root)?;
    }
    print_refresh(&engine.refresh_all()?);
    Ok(())
}

fn print_refresh(summary: &in_dexer_core::RefreshSummary) {
    println!(
        "Refresh complete. {} files indexed.",
        format!("{}", summary.total_files()).green()
    );
    for outcome in &summary.outcomes {
        if let RootOutcome::Failed { path, error } = outcome {
            println!("  {} {}: {}", "failed".red(), path, error);
        }
    }
}

fn run_roots(config: &AppConfig) -> Result<()> {
    let engine = open_engine(config)?;
    let db = engine.database();
    let roots = db.list_roots()?;
    if roots.is_empty() {
        println!("No folders indexed.");
        return Ok(());
    }
    for root in roots {
        let count = db.count_files(FileFilter::Root(root.id))?;
        println!("{:>8}  {}", count, root.path.cyan());
    }
    Ok(())
}

fn run_tree(config: &AppConfig, depth: Option<usize>) -> Result<()> {
    let engine = open_engine(config)?;
    let tree = engine.build_hierarchy()?;
    if tree.is_empty() {
        println!("No folders indexed.");
        return Ok(());
    }
    for (level, node) in tree.depth_first() {
        if depth.is_some_and(|max| level > max) {
            continue;
        }
        println!("{}{}", "  ".repeat(level), node.label);
    }
    Ok(())
}

fn run_ls(config: &AppConfig, path: &str) -> Result<()> {
    let engine = open_engine(config)?;
    print_file_hits(&engine.files_in_directory(path)?);
    Ok(())
}

fn run_search(config: &AppConfig, term: &str, mode: SearchMode) -> Result<()> {
    let engine = open_engine(config)?;
    match engine.search(term, mode)? {
        SearchResults::Files(hits) => print_file_hits(&hits),
        SearchResults::Folders(hits) => {
            if !hits.is_empty() {
                println!("{}", format!("{:<32} {}", "Folder Name", "Full Path").bold());
            }
            for hit in &hits {
                println!("{:<32} {}", hit.name, hit.path);
            }
            println!("{} folders", hits.len());
        }
    }
    Ok(())
}

fn run_reveal(config: &AppConfig, path: &str) -> Result<()> {
    let engine = open_engine(config)?;
    let tree = engine.build_hierarchy()?;
    match tree.lookup_directory_node(path) {
        Some(node) => {
            let chain: Vec<&str> = tree
                .ancestors(node.id)
                .iter()
                .map(|n| n.label.as_str())
                .collect();
            println!("{}", chain.join(" > ").cyan());
            for child in tree.children(node.id) {
                println!("  {}", child.label);
            }
        }
        None => println!("{} is not in the index.", path),
    }
    Ok(())
}

fn print_file_hits(hits: &[FileHit]) {
    if !hits.is_empty() {
        println!(
            "{}",
            format!(
                "{:<32} {:>12}  {:<19}  {:<19}  {}",
                "Name", "Size", "Date Modified", "Date Created", "Directory"
            )
            .bold()
        );
    }
    for hit in hits {
        println!(
            "{:<32} {:>12}  {:<19}  {:<19}  {}",
            hit.name,
            hit.size,
            hit.modification_date.as_deref().unwrap_or(""),
            hit.creation_date.as_deref().unwrap_or(""),
            hit.directory
        );
    }
    println!("{} files", hits.len());
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}

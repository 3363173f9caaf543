//! `birthday-keeper`: interactive editor for the birthday records document.
//!
//! # Responsibility
//! - Parse paths and logging options from the command line.
//! - Bootstrap logging, load the store and hand it to the menu session.

mod console;
mod session;

use anyhow::{Context, Result};
use birthday_core::{
    default_log_level, init_logging, RecordStore, DEFAULT_IMAGES_DIR, DEFAULT_RECORDS_FILE,
};
use clap::{Parser, Subcommand};
use console::Console;
use log::{error, info};
use session::{describe, Session};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "birthday-keeper")]
#[command(about = "Edit the birthday records JSON file and track avatar images", long_about = None)]
#[command(version)]
struct Cli {
    /// Birthday records JSON file
    #[arg(default_value = DEFAULT_RECORDS_FILE)]
    file: PathBuf,

    /// Directory holding avatar images
    #[arg(default_value = DEFAULT_IMAGES_DIR)]
    images: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for rolling log files (defaults to ./logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print all records and exit
    List,
    /// Print images not used by any record and exit
    Unused,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("cannot resolve current directory")?;

    let log_dir = absolutize(&cwd, cli.log_dir.as_deref().unwrap_or(Path::new("logs")));
    let log_level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(log_level, &log_dir).context("failed to initialize logging")?;

    if !cli.images.exists() {
        std::fs::create_dir_all(&cli.images).with_context(|| {
            format!("failed to create images directory `{}`", cli.images.display())
        })?;
        info!(
            "event=images_dir_created module=cli status=ok dir={}",
            cli.images.display()
        );
    }

    let store = match RecordStore::load(&cli.file) {
        Ok(store) => store,
        Err(err) => {
            error!("event=cli_start module=cli status=error error_code=load_failed");
            return Err(err).context(format!("cannot open `{}`", cli.file.display()));
        }
    };

    match cli.command {
        Some(Commands::List) => cmd_list(&store),
        Some(Commands::Unused) => cmd_unused(&store, &cli.images),
        None => {
            let stdin = std::io::stdin();
            let console = Console::new(stdin.lock(), std::io::stdout());
            Session::new(store, cli.file, cli.images, console).run()
        }
    }
}

fn cmd_list(store: &RecordStore) -> Result<()> {
    if store.is_empty() {
        println!("There are no birthday records yet.");
        return Ok(());
    }
    for (index, record) in store.records().iter().enumerate() {
        println!("{}", describe(index, record));
    }
    Ok(())
}

fn cmd_unused(store: &RecordStore, images: &Path) -> Result<()> {
    let unused = store.list_unused_assets(images)?;
    if unused.directory_missing {
        eprintln!(
            "Warning: images directory {} does not exist.",
            images.display()
        );
    }
    for name in &unused.files {
        println!("{name}");
    }
    Ok(())
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

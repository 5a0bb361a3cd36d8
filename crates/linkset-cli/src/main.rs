//! linkset CLI
//!
//! Command-line interface for linkset - folders of links, imported from
//! browsers without duplicates.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use linkset_core::{Config, Store};

mod commands;
mod editor;
mod metadata;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkset")]
#[command(about = "linkset - Organize links into folders")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Queue a link for the next session without opening the library
    Capture {
        /// URL to capture (http or https)
        url: String,
        /// Name to use instead of the page title
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List links
    #[command(alias = "ls")]
    List {
        /// Only links whose name, URL, tags or folders contain this text
        #[arg(short = 'Q', long)]
        query: Option<String>,
        /// Only links in this folder (e.g. Work/Frontend)
        #[arg(short, long)]
        path: Option<String>,
        /// Exclude links in subfolders of --path
        #[arg(long, requires = "path")]
        level_only: bool,
    },
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Open a link in the browser
    Open {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Manage folders
    Folder {
        #[command(subcommand)]
        command: FolderCommands,
    },
    /// Import links, skipping URLs already saved
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
    /// Export all links as JSON
    Export {
        /// Output file ("-" for stdout)
        #[arg(short, long, default_value = "linkset.json")]
        output: PathBuf,
    },
    /// Push to or pull from the remote mirror
    Mirror {
        #[command(subcommand)]
        command: MirrorCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (counts, data locations, mirror)
    Status,
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Add a link
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Name (defaults to the page title, then the URL)
        #[arg(short, long)]
        name: Option<String>,
        /// Folder path, e.g. Work/Frontend
        #[arg(short, long)]
        path: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Show link details
    Show {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Edit a link (interactive unless a field is given)
    Edit {
        /// Link ID (full UUID or prefix)
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        /// New folder path ("" to unfile)
        #[arg(short, long)]
        path: Option<String>,
        /// Replace tags
        #[arg(short, long)]
        tag: Option<Vec<String>>,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Show the folder tree
    Tree,
    /// Create a folder
    Add {
        /// Folder name
        name: String,
        /// Parent folder (defaults to the top level)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a folder, moving everything inside it
    Rename {
        /// Folder path, e.g. Work/Frontend
        path: String,
        /// New name for the last segment
        new_name: String,
    },
    /// Delete a folder with its subfolders and links
    #[command(alias = "rm")]
    Delete {
        /// Folder path, e.g. Work/Frontend
        path: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ImportCommands {
    /// Netscape bookmark file exported by a browser
    Html { file: PathBuf },
    /// JSON array of {name, url, tags}, e.g. a linkset export
    Json { file: PathBuf },
    /// The browser's own bookmarks
    Bookmarks {
        /// Chromium `Bookmarks` file (defaults to config, then the usual profile)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum MirrorCommands {
    /// Overwrite the mirror with every link
    Push,
    /// Merge links from the mirror
    Pull,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, mirror_dir, bookmarks_file, log_file)
        key: String,
        /// Configuration value ("none" clears optional keys)
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_deref();

    // Config commands work even when the config file is broken
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config, cli.verbose);
    debug!("Using data directory {:?}", config.data_dir);

    // Capture must not open the library
    if let Commands::Capture { url, name } = cli.command {
        return commands::capture::capture(&config, url, name, &output).await;
    }

    let mut store = Store::open_with_config(config).context("Failed to open library")?;

    let result = match cli.command {
        Commands::Capture { .. } | Commands::Config { .. } => unreachable!(), // Handled above
        Commands::List {
            query,
            path,
            level_only,
        } => commands::link::list(&store, query, path, level_only, &output),
        Commands::Link { command } => handle_link_command(command, &mut store, &output).await,
        Commands::Open { id } => commands::link::open(&store, id, &output),
        Commands::Folder { command } => handle_folder_command(command, &mut store, &output),
        Commands::Import { command } => match command {
            ImportCommands::Html { file } => commands::import::html(&mut store, &file, &output),
            ImportCommands::Json { file } => commands::import::json(&mut store, &file, &output),
            ImportCommands::Bookmarks { file } => {
                commands::import::bookmarks(&mut store, file, &output)
            }
        },
        Commands::Export { output: target } => commands::export::export(&store, &target, &output),
        Commands::Mirror { command } => match command {
            MirrorCommands::Push => commands::mirror::push(&store, &output),
            MirrorCommands::Pull => commands::mirror::pull(&mut store, &output),
        },
        Commands::Status => commands::status::show(&store, &output),
    };

    // Surface a failed save once, whatever the command did
    if let Some(warning) = store.take_save_warning() {
        output.warning(&warning);
    }

    result
}

async fn handle_link_command(
    command: LinkCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::Add {
            url,
            name,
            path,
            tag,
        } => commands::link::add(store, url, name, path, tag, output).await,
        LinkCommands::Show { id } => commands::link::show(store, id, output),
        LinkCommands::Edit {
            id,
            name,
            url,
            path,
            tag,
        } => commands::link::edit(
            store,
            id,
            commands::link::LinkEdit {
                name,
                url,
                path,
                tags: tag,
            },
            output,
        ),
        LinkCommands::Delete { id } => commands::link::delete(store, id, output),
    }
}

fn handle_folder_command(command: FolderCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        FolderCommands::Tree => commands::folder::tree(store, output),
        FolderCommands::Add { name, parent } => commands::folder::add(store, name, parent, output),
        FolderCommands::Rename { path, new_name } => {
            commands::folder::rename(store, path, new_name, output)
        }
        FolderCommands::Delete { path, yes } => commands::folder::delete(store, path, yes, output),
    }
}

/// Initialize logging
///
/// Defaults to warnings only; `RUST_LOG` overrides the filter and
/// `--verbose` forces debug. Logs go to `config.log_file` when set,
/// otherwise to stderr.
fn init_logging(config: &Config, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("linkset_core=debug,linkset_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("linkset_core=warn,linkset_cli=warn"))
    };

    if let Some(log_path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(log_file) => {
                // Ignore error if already initialized
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(log_file))
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

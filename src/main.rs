//! markbar - command-line front end
//!
//! Drives the toolbar engine and the preview renderer from the shell so a
//! host can be prototyped or scripted without a browser.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, error};

use markbar::config::{load_config, Settings};
use markbar::{
    apply_command, render_markdown, visible_commands, CommentStats, FeatureFlags, Result,
    SelectionRange,
};

#[derive(Parser, Debug)]
#[command(name = "markbar")]
#[command(about = "Markdown formatting toolbar and preview for comment editors")]
#[command(version)]
/// Command-line arguments.
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Feature switches layered on top of the configured flags.
#[derive(Args, Debug, Clone, Copy)]
struct FeatureArgs {
    /// Treat links as plain text
    #[arg(long = "no-links", action = ArgAction::SetTrue)]
    no_links: bool,

    /// Treat images as plain text
    #[arg(long = "no-images", action = ArgAction::SetTrue)]
    no_images: bool,

    /// Treat tables as plain text
    #[arg(long = "no-tables", action = ArgAction::SetTrue)]
    no_tables: bool,
}

impl FeatureArgs {
    fn apply_to(self, mut flags: FeatureFlags) -> FeatureFlags {
        flags.links &= !self.no_links;
        flags.images &= !self.no_images;
        flags.tables &= !self.no_tables;
        flags
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render Markdown to preview HTML
    Render {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        features: FeatureArgs,
    },
    /// Apply a toolbar command and print the new buffer and selection as JSON
    Apply {
        /// Command id, e.g. bold, link, numbered-list
        command: String,

        /// Selection in UTF-16 units: "3", "0,3" or "0..3"
        #[arg(long, short = 's', default_value = "0")]
        selection: SelectionRange,

        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        features: FeatureArgs,
    },
    /// List the toolbar buttons shown for the configured features
    Commands {
        #[command(flatten)]
        features: FeatureArgs,
    },
    /// Print word and character counts
    Stats {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Character limit, overriding the configured one
        #[arg(long)]
        max_length: Option<usize>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = load_config();
    debug!("Loaded settings: {:?}", settings);

    match run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("markbar: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Render { file, features } => {
            let flags = features.apply_to(settings.features);
            let buffer = read_input(file.as_deref())?;
            println!("{}", render_markdown(&buffer, &flags));
        }
        Command::Apply {
            command,
            selection,
            file,
            features,
        } => {
            let flags = features.apply_to(settings.features);
            let buffer = read_input(file.as_deref())?;
            let result = apply_command(&command, &buffer, selection, &flags)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Commands { features } => {
            let flags = features.apply_to(settings.features);
            for id in visible_commands(&flags) {
                println!("{:<14} {}", id.as_str(), id.tooltip());
            }
        }
        Command::Stats { file, max_length } => {
            let buffer = read_input(file.as_deref())?;
            let stats =
                CommentStats::from_text(&buffer, max_length.or(settings.max_comment_length));
            println!("{}", stats.format_compact());
        }
    }
    Ok(())
}

/// Read the whole input file, or stdin when no file is given.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            debug!("Reading {}", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

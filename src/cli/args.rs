//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Structural design patterns as small, typed components
#[derive(Parser, Debug)]
#[command(name = "gofpat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: $XDG_CONFIG_HOME/gofpat/gofpat.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price and tear down a nested equipment assembly
    Composite,

    /// Draw dialogs from a shared icon registry
    Flyweight {
        /// Icon keys for a custom dialog (default: the two stock dialogs)
        keys: Vec<String>,
    },

    /// Draw lazily loaded images through proxies
    Proxy {
        /// Number of proxies (default: gallery_size from config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,

    /// Show config path
    Path,

    /// Print config template
    Init,
}

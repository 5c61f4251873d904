//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// Extension Installer - Plan and confirm extension installs for a site
#[derive(Parser, Debug)]
#[command(name = "extinstall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the site config file
    #[arg(
        short,
        long,
        global = true,
        env = "EXTINSTALL_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List installable extensions grouped by package
    ///
    /// Hidden and already-enabled extensions are left out.
    ///
    /// Examples:
    ///   extinstall list               # Everything installable
    ///   extinstall list -f views      # Name, title, or description contains "views"
    List {
        /// Only show extensions matching this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show whether one extension can be selected, and why not
    Show {
        /// Machine name of the extension
        name: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Compute the install set for a selection and stash it for confirm
    ///
    /// Profile-required extensions and every dependency are added.
    /// Extensions failing a requirements check are dropped together with
    /// what depends on them.
    ///
    /// Examples:
    ///   extinstall plan forum views_ui
    Plan {
        /// Extensions to enable
        #[arg(required = true)]
        names: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Report the install set stashed by the last plan
    ///
    /// The plan is consumed; run plan again to confirm a new selection.
    Confirm {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

//! Extension Installer CLI
//!
//! Lists installable extensions, plans an install set for a selection, and
//! confirms the stashed plan.

mod cli;
mod commands;
mod config;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use config::Config;
use context::SiteContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} failed to initialise logging: {}", "warning:".yellow().bold(), e);
    }
    tracing::debug!("Using config {}", cli.config.display());

    match cli.command {
        Some(cmd) => execute_command(&cli.config, cmd),
        None => {
            println!("{} Extension Installer", "extinstall".green().bold());
            println!();
            println!("Run {} for available commands.", "extinstall --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(config_path: &std::path::Path, cmd: Commands) -> Result<()> {
    let site = SiteContext::load(Config::load(config_path)?)?;

    match cmd {
        Commands::List { filter, json } => commands::run_list(&site, filter.as_deref(), json),
        Commands::Show { name, json } => commands::run_show(&site, &name, json),
        Commands::Plan { names, json } => commands::run_plan(&site, &names, json).map(|_| ()),
        Commands::Confirm { json } => commands::run_confirm(&site, json).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ext_test_utils::site::TestSite;
    use pretty_assertions::assert_eq;

    fn load(site: &TestSite) -> SiteContext {
        SiteContext::load(Config::load(&site.config_path()).unwrap()).unwrap()
    }

    #[test]
    fn test_plan_then_confirm() {
        let site = TestSite::with_sample();
        let ctx = load(&site);

        let planned = commands::run_plan(&ctx, &["forum".to_string()], true).unwrap();
        assert_eq!(
            planned.names().collect::<Vec<_>>(),
            vec!["comment", "dblog", "forum", "taxonomy", "text"]
        );
        site.assert_file_exists("handoff/install-plan.tester.json");

        let confirmed = commands::run_confirm(&ctx, true).unwrap();
        assert_eq!(confirmed, planned);
        site.assert_file_not_exists("handoff/install-plan.tester.json");
    }

    #[test]
    fn test_confirm_without_plan_is_a_user_error() {
        let site = TestSite::with_sample();
        let err = commands::run_confirm(&load(&site), false).unwrap_err();
        assert!(matches!(err, error::CliError::User { .. }));
    }

    #[test]
    fn test_plan_rejects_unselectable() {
        let site = TestSite::with_sample();
        let err = commands::run_plan(&load(&site), &["broken".to_string()], false).unwrap_err();
        assert!(err.to_string().contains("requires ghost (missing)"));
    }

    #[test]
    fn test_show_unknown_extension() {
        let site = TestSite::with_sample();
        assert!(commands::run_show(&load(&site), "nope", false).is_err());
        assert!(commands::run_show(&load(&site), "forum", false).is_ok());
    }

    #[test]
    fn test_list_runs() {
        let site = TestSite::with_sample();
        assert!(commands::run_list(&load(&site), None, false).is_ok());
        assert!(commands::run_list(&load(&site), Some("views"), true).is_ok());
    }
}
